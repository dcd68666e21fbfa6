use crate::types::{Cardinality, ContainerShape};
use serde::Serialize;

///
/// Property
///
/// One mapped attribute of a type, produced once by the extractor from a
/// single declared member and immutable afterwards. Ancestor properties are
/// merged into descendants by value, so a clone here is a real copy and a
/// later change to the ancestor's descriptor can never reach a descendant.
///

#[derive(Clone, Debug, Serialize)]
pub struct Property {
    pub name: String,
    pub column_name: String,

    /// Fully qualified semantic type of the member.
    pub declared_type: String,

    /// Element type for container-shaped members; a map's value type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,

    /// Key type for map-shaped members.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerShape>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<Cardinality>,

    pub is_key: bool,
    pub is_generated: bool,
    pub is_version: bool,
    pub is_nullable: bool,
    pub is_transient: bool,
    pub is_lazy: bool,
    pub is_read_only: bool,
    pub is_collection: bool,
    pub is_boolean: bool,

    /// Display path of the originating member, kept for error reporting only.
    pub origin: String,
}

impl Property {
    /// Target type used for relationship edge resolution: the container's
    /// element for collections, the declared type otherwise.
    #[must_use]
    pub fn relation_target(&self) -> Option<&str> {
        self.cardinality?;

        if self.is_collection {
            self.element_type.as_deref()
        } else {
            Some(&self.declared_type)
        }
    }
}
