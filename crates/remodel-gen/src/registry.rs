//! Per-package model registry aggregating the package's type descriptors.

use crate::{helper::quote_slice, name::meta_type_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use remodel_schema::node::Entity;

/// Render the registry artifact for one output package.
#[must_use]
pub fn package_registry(package: &str, descriptors: &[&Entity]) -> TokenStream {
    let types = quote_slice(descriptors, |entity| {
        let ident = format_ident!("{}", meta_type_name(entity));
        quote!(|| &#ident::TYPE)
    });

    quote! {
        pub static MODELS: ::remodel::meta::ModelRegistry = ::remodel::meta::ModelRegistry {
            package: #package,
            types: #types,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remodel_schema::types::{EntityKind, PropertyNameStyle, PropertyVisibility};

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

    #[test]
    fn registry_lists_every_package_type() {
        let person = entity("Person");
        let address = entity("Address");

        let rendered = package_registry("model", &[&person, &address]).to_string();
        assert!(rendered.contains("package : \"model\""));
        assert!(rendered.contains("PersonMeta :: TYPE"));
        assert!(rendered.contains("AddressMeta :: TYPE"));
    }
}
