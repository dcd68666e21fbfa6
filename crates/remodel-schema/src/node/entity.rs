use crate::{
    node::Property,
    types::{CallbackKind, EntityKind, PropertyNameStyle, PropertyVisibility},
};
use serde::Serialize;

///
/// Callback
///
/// Lifecycle callback method registered on a mapped type.
///

#[derive(Clone, Debug, Serialize)]
pub struct Callback {
    pub kind: CallbackKind,
    pub method: String,
}

///
/// Entity
///
/// One mapped type: entity, superclass, or embeddable. Built once from a
/// class declaration plus zero or more previously-built ancestor
/// descriptors, keyed by qualified name for the remainder of the run.
///

#[derive(Clone, Debug, Serialize)]
pub struct Entity {
    pub package_name: String,
    pub simple_name: String,

    /// Globally unique key.
    pub qualified_name: String,

    /// Explicit marker name override, validated as an identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    pub model_name: String,
    pub table_name: String,
    pub kind: EntityKind,

    pub is_abstract: bool,
    pub is_interface: bool,
    pub is_immutable: bool,
    pub is_view: bool,
    pub is_read_only: bool,
    pub is_stateless: bool,
    pub is_cacheable: bool,

    pub name_style: PropertyNameStyle,
    pub visibility: PropertyVisibility,

    /// Insertion order is declaration order for own members followed by
    /// ancestor merge order. Names are unique.
    pub properties: Vec<Property>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub callbacks: Vec<Callback>,
}

impl Entity {
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Add an own property, dropping it when the name already exists.
    /// The same logical property can surface through both a field and its
    /// getter; the first occurrence wins.
    pub fn push_property(&mut self, property: Property) -> bool {
        if self.has_property(&property.name) {
            return false;
        }
        self.properties.push(property);

        true
    }

    /// Copy every ancestor property and callback this descriptor does not
    /// already declare. Local members always shadow inherited ones.
    pub fn merge_from(&mut self, ancestor: &Self) {
        for property in &ancestor.properties {
            if !self.has_property(&property.name) {
                self.properties.push(property.clone());
            }
        }
        for callback in &ancestor.callbacks {
            if !self.has_callback(callback) {
                self.callbacks.push(callback.clone());
            }
        }
    }

    pub fn push_callback(&mut self, callback: Callback) {
        if !self.has_callback(&callback) {
            self.callbacks.push(callback);
        }
    }

    fn has_callback(&self, callback: &Callback) -> bool {
        self.callbacks
            .iter()
            .any(|c| c.kind == callback.kind && c.method == callback.method)
    }

    #[must_use]
    pub fn key_properties(&self) -> Vec<&Property> {
        self.properties
            .iter()
            .filter(|p| p.is_key && !p.is_transient)
            .collect()
    }

    #[must_use]
    pub fn version_properties(&self) -> Vec<&Property> {
        self.properties
            .iter()
            .filter(|p| p.is_version && !p.is_transient)
            .collect()
    }

    /// Properties that participate in storage and emitted metadata.
    #[must_use]
    pub fn persistent_properties(&self) -> Vec<&Property> {
        self.properties.iter().filter(|p| !p.is_transient).collect()
    }
}
