pub mod context;
pub mod diagnostic;
pub mod graph;
pub mod node;
pub mod types;
pub mod validate;

/// Class-name prefixes stripped when deriving default table names.
pub const TABLE_PREFIXES: [&str; 2] = ["Abstract", "Base"];

/// Strip a recognized class-name prefix: `AbstractPerson` becomes `Person`,
/// `BaseAccount` becomes `Account`. A prefix only counts when an upper-case
/// character follows, so `Abstractions` stays whole.
#[must_use]
pub fn strip_class_prefixes(name: &str, prefixes: &[String]) -> String {
    for prefix in prefixes {
        if let Some(stripped) = name.strip_prefix(prefix.as_str())
            && stripped.chars().next().is_some_and(char::is_uppercase)
        {
            return stripped.to_string();
        }
    }

    name.to_string()
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        context::ModelContext,
        diagnostic::{Diagnostic, Diagnostics, Severity},
        err,
        graph::{EntityGraph, RelationshipEdge},
        node::{Callback, Entity, Property},
        types::{
            CallbackKind, Cardinality, ContainerShape, EntityKind, PropertyNameStyle,
            PropertyVisibility,
        },
        warning,
    };
    pub use serde::Serialize;
}
