//! Generated entity implementation: the mutable runtime shape of one
//! descriptor, with state-tracked setters and key-based identity.

use crate::name::{accessor_names, field_name, impl_type_name, state_field_name};
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use remodel_schema::{
    node::{Entity, Property},
    types::{ContainerShape, PropertyVisibility},
};

/// Render the implementation artifact for one non-immutable entity.
pub fn entity_impl(entity: &Entity) -> syn::Result<TokenStream> {
    let ident = format_ident!("{}", impl_type_name(entity));
    let field_vis = match entity.visibility {
        PropertyVisibility::Public => quote!(pub),
        _ => TokenStream::new(),
    };

    let mut fields = Vec::new();
    let mut accessors = Vec::new();

    for property in entity.persistent_properties() {
        let field = format_ident!("{}", field_name(property));
        let ty = property_type(property)?;

        fields.push(quote!(#field_vis #field: #ty));
        if !entity.is_stateless {
            let state = format_ident!("{}", state_field_name(property));
            fields.push(quote!(#field_vis #state: ::remodel::meta::PropertyState));
        }

        accessors.push(getter(entity, property, &field, &ty));
        if !property.is_read_only {
            accessors.push(setter(entity, property, &field, &ty));
        }
    }

    let identity = identity_impls(entity, &ident);

    Ok(quote! {
        pub struct #ident {
            #(#fields),*
        }

        impl #ident {
            #(#accessors)*
        }

        #identity
    })
}

fn getter(entity: &Entity, property: &Property, field: &syn::Ident, ty: &TokenStream) -> TokenStream {
    let (getter, _) = accessor_names(entity, property);
    let getter = format_ident!("{getter}");

    // Booleans read by value, everything else by reference.
    if property.is_boolean && !property.is_nullable {
        quote! {
            pub fn #getter(&self) -> bool {
                self.#field
            }
        }
    } else {
        quote! {
            pub fn #getter(&self) -> &#ty {
                &self.#field
            }
        }
    }
}

fn setter(entity: &Entity, property: &Property, field: &syn::Ident, ty: &TokenStream) -> TokenStream {
    let (_, setter) = accessor_names(entity, property);
    let setter = format_ident!("{setter}");

    if entity.is_stateless {
        quote! {
            pub fn #setter(&mut self, value: #ty) {
                self.#field = value;
            }
        }
    } else {
        let state = format_ident!("{}", state_field_name(property));

        quote! {
            pub fn #setter(&mut self, value: #ty) {
                self.#state = ::remodel::meta::PropertyState::Modified;
                self.#field = value;
            }
        }
    }
}

// Equality and hashing run over key properties when any exist, otherwise
// over every persistent property.
fn identity_impls(entity: &Entity, ident: &syn::Ident) -> TokenStream {
    let keys = entity.key_properties();
    let identity: Vec<&Property> = if keys.is_empty() {
        entity.persistent_properties()
    } else {
        keys
    };

    let fields: Vec<syn::Ident> = identity
        .iter()
        .map(|p| format_ident!("{}", field_name(p)))
        .collect();

    let eq = if fields.is_empty() {
        quote!(true)
    } else {
        let cmps: Vec<TokenStream> = fields
            .iter()
            .map(|f| quote!(self.#f == other.#f))
            .collect();
        quote!(#(#cmps)&&*)
    };

    quote! {
        impl ::core::cmp::PartialEq for #ident {
            fn eq(&self, other: &Self) -> bool {
                #eq
            }
        }

        impl ::core::hash::Hash for #ident {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                #(self.#fields.hash(state);)*
            }
        }
    }
}

// Canonical container types in the generated shape; the map family keeps
// its key/value split, and nullability wraps the whole thing.
fn property_type(property: &Property) -> syn::Result<TokenStream> {
    let base = match property.container {
        Some(ContainerShape::List) => {
            let element = parse_type(property.element_type.as_deref(), property)?;
            quote!(Vec<#element>)
        }
        Some(ContainerShape::Set) => {
            let element = parse_type(property.element_type.as_deref(), property)?;
            quote!(::std::collections::HashSet<#element>)
        }
        Some(ContainerShape::Map) => {
            let key = parse_type(property.key_type.as_deref(), property)?;
            let value = parse_type(property.element_type.as_deref(), property)?;
            quote!(::std::collections::HashMap<#key, #value>)
        }
        None => {
            let ty = parse_type(Some(&property.declared_type), property)?;
            quote!(#ty)
        }
    };

    if property.is_nullable {
        Ok(quote!(Option<#base>))
    } else {
        Ok(base)
    }
}

fn parse_type(name: Option<&str>, property: &Property) -> syn::Result<syn::Type> {
    let name = name.ok_or_else(|| {
        syn::Error::new(
            Span::call_site(),
            format!("property '{}' is missing a container type argument", property.origin),
        )
    })?;

    syn::parse_str(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use remodel_schema::types::{EntityKind, PropertyNameStyle};

    fn entity(simple: &str) -> Entity {
        Entity {
            package_name: "model".to_string(),
            simple_name: simple.to_string(),
            qualified_name: format!("model::{simple}"),
            entity_name: None,
            model_name: "default".to_string(),
            table_name: simple.to_string(),
            kind: EntityKind::Entity,
            is_abstract: false,
            is_interface: false,
            is_immutable: false,
            is_view: false,
            is_read_only: false,
            is_stateless: false,
            is_cacheable: true,
            name_style: PropertyNameStyle::default(),
            visibility: PropertyVisibility::default(),
            properties: Vec::new(),
            callbacks: Vec::new(),
        }
    }

    fn property(name: &str, declared: &str) -> Property {
        Property {
            name: name.to_string(),
            column_name: name.to_string(),
            declared_type: declared.to_string(),
            element_type: None,
            key_type: None,
            container: None,
            cardinality: None,
            is_key: false,
            is_generated: false,
            is_version: false,
            is_nullable: false,
            is_transient: false,
            is_lazy: false,
            is_read_only: false,
            is_collection: false,
            is_boolean: false,
            origin: format!("model::T::{name}"),
        }
    }

    #[test]
    fn generates_state_tracked_setters() {
        let mut person = entity("Person");
        let mut id = property("id", "i64");
        id.is_key = true;
        person.push_property(id);
        person.push_property(property("name", "String"));

        let rendered = entity_impl(&person).expect("renders").to_string();

        assert!(rendered.contains("pub struct PersonEntity"));
        assert!(rendered.contains("name_state"));
        assert!(rendered.contains("PropertyState :: Modified"));
        assert!(rendered.contains("pub fn get_name"));
        assert!(rendered.contains("pub fn set_name"));
    }

    #[test]
    fn boolean_getters_use_is_prefix() {
        let mut person = entity("Person");
        let mut active = property("active", "bool");
        active.is_boolean = true;
        person.push_property(active);

        let rendered = entity_impl(&person).expect("renders").to_string();
        assert!(rendered.contains("pub fn is_active"));
        assert!(!rendered.contains("pub fn get_active"));
    }

    #[test]
    fn equality_runs_over_key_properties() {
        let mut person = entity("Person");
        let mut id = property("id", "i64");
        id.is_key = true;
        person.push_property(id);
        person.push_property(property("name", "String"));

        let rendered = entity_impl(&person).expect("renders").to_string();
        assert!(rendered.contains("self . id == other . id"));
        assert!(!rendered.contains("self . name == other . name"));
    }

    #[test]
    fn transient_properties_are_not_generated() {
        let mut person = entity("Person");
        let mut cached = property("cached", "String");
        cached.is_transient = true;
        person.push_property(cached);
        person.push_property(property("name", "String"));

        let rendered = entity_impl(&person).expect("renders").to_string();
        assert!(!rendered.contains("cached"));
        assert!(rendered.contains("name"));
    }

    #[test]
    fn stateless_entities_skip_state_fields() {
        let mut person = entity("Person");
        person.is_stateless = true;
        person.push_property(property("name", "String"));

        let rendered = entity_impl(&person).expect("renders").to_string();
        assert!(!rendered.contains("name_state"));
        assert!(rendered.contains("pub fn set_name"));
    }

    #[test]
    fn read_only_properties_get_no_setter() {
        let mut person = entity("Person");
        let mut created = property("created", "u64");
        created.is_read_only = true;
        person.push_property(created);

        let rendered = entity_impl(&person).expect("renders").to_string();
        assert!(rendered.contains("pub fn get_created"));
        assert!(!rendered.contains("pub fn set_created"));
    }

    #[test]
    fn containers_render_canonical_types() {
        let mut person = entity("Person");
        let mut tags = property("tags", "Vec");
        tags.container = Some(ContainerShape::List);
        tags.element_type = Some("String".to_string());
        tags.is_collection = true;
        person.push_property(tags);

        let mut settings = property("settings", "HashMap");
        settings.container = Some(ContainerShape::Map);
        settings.key_type = Some("String".to_string());
        settings.element_type = Some("i64".to_string());
        person.push_property(settings);

        let rendered = entity_impl(&person).expect("renders").to_string();
        assert!(rendered.contains("Vec < String >"));
        assert!(rendered.contains("HashMap < String , i64 >"));
    }
}
