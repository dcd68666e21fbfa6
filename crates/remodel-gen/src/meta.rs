//! Generated metadata descriptor: the singleton type descriptor plus one
//! attribute constant per persistent property, wired with lazy suppliers to
//! related descriptors so relationship cycles stay representable.

use crate::{
    helper::{quote_option, quote_slice},
    name::{accessor_names, logical_name, meta_type_name, state_field_name},
};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use convert_case::{Case, Casing};
use remodel_schema::{
    graph::EntityGraph,
    node::{Callback, Entity, Property},
};

/// Render the metadata artifact for one descriptor. Superclasses and
/// immutables are included: the runtime reads them as metadata even when no
/// implementation artifact exists.
#[must_use]
pub fn entity_meta(entity: &Entity, graph: &EntityGraph) -> TokenStream {
    let ident = format_ident!("{}", meta_type_name(entity));

    let persistent = entity.persistent_properties();
    let attributes: Vec<TokenStream> = persistent
        .iter()
        .map(|p| attribute_const(entity, p, graph))
        .collect();

    let attribute_refs = quote_slice(&persistent, |p| {
        let const_ident = attribute_ident(p);
        quote!(&Self::#const_ident)
    });

    let callbacks = quote_slice(&entity.callbacks, callback_meta);

    let name = logical_name(entity);
    let table = &entity.table_name;
    let qualified = &entity.qualified_name;
    let model = &entity.model_name;
    let is_read_only = entity.is_read_only;
    let is_stateless = entity.is_stateless;
    let is_immutable = entity.is_immutable;
    let is_view = entity.is_view;
    let is_cacheable = entity.is_cacheable;

    quote! {
        pub struct #ident;

        impl #ident {
            #(#attributes)*

            pub const TYPE: ::remodel::meta::TypeMeta = ::remodel::meta::TypeMeta {
                name: #name,
                table: #table,
                qualified_name: #qualified,
                model: #model,
                is_read_only: #is_read_only,
                is_stateless: #is_stateless,
                is_immutable: #is_immutable,
                is_view: #is_view,
                is_cacheable: #is_cacheable,
                attributes: #attribute_refs,
                callbacks: #callbacks,
            };
        }
    }
}

fn attribute_ident(property: &Property) -> syn::Ident {
    format_ident!("{}", property.name.to_case(Case::UpperSnake))
}

fn attribute_const(entity: &Entity, property: &Property, graph: &EntityGraph) -> TokenStream {
    let const_ident = attribute_ident(property);
    let name = &property.name;
    let column = &property.column_name;

    let (getter, setter) = accessor_names(entity, property);
    let state = if entity.is_stateless || property.is_read_only {
        quote!(None)
    } else {
        let state = state_field_name(property);
        quote!(Some(#state))
    };

    let is_key = property.is_key;
    let is_generated = property.is_generated;
    let is_version = property.is_version;
    let is_nullable = property.is_nullable;
    let is_read_only = property.is_read_only;
    let is_lazy = property.is_lazy;

    let cardinality = quote_option(property.cardinality.as_ref(), |c| quote!(#c));
    let referenced = quote_option(referenced_meta(entity, property, graph).as_ref(), |path| {
        quote!(|| &#path::TYPE)
    });

    quote! {
        pub const #const_ident: ::remodel::meta::AttributeMeta = ::remodel::meta::AttributeMeta {
            name: #name,
            column: #column,
            getter: #getter,
            setter: #setter,
            state: #state,
            is_key: #is_key,
            is_generated: #is_generated,
            is_version: #is_version,
            is_nullable: #is_nullable,
            is_read_only: #is_read_only,
            is_lazy: #is_lazy,
            cardinality: #cardinality,
            referenced: #referenced,
        };
    }
}

// Path to the related descriptor's metadata type, when the relationship
// target resolved to a known descriptor.
fn referenced_meta(entity: &Entity, property: &Property, graph: &EntityGraph) -> Option<TokenStream> {
    let target = property.relation_target()?;
    let target = graph.descriptor(target)?;

    let ident = format_ident!("{}", meta_type_name(target));
    if target.package_name == entity.package_name {
        return Some(quote!(#ident));
    }

    let segments: Vec<syn::Ident> = target
        .package_name
        .split("::")
        .filter(|s| *s != "crate" && !s.is_empty())
        .map(|s| format_ident!("{s}"))
        .collect();

    Some(quote!(crate::#(#segments::)*#ident))
}

fn callback_meta(callback: &Callback) -> TokenStream {
    let kind = callback.kind;
    let method = &callback.method;

    quote! {
        ::remodel::meta::CallbackMeta {
            kind: #kind,
            method: #method,
        }
    }
}
