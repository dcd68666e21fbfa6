//! Declaration adapter: the owned, host-neutral view of annotated class
//! declarations the rest of the pipeline consumes. The extractor and builder
//! only ever see these records; `syn` stays behind [`source::SourceReader`].

mod annotation;
mod dialect;
mod source;

pub use annotation::{Annotation, EntityMarker, NameMarker};
pub use dialect::resolve_annotation;
pub use source::{ReadOutcome, SourceReader};

use remodel_schema::types::{CallbackKind, Cardinality, ContainerShape, EntityKind};

///
/// TypeRef
///
/// Resolved member or supertype reference. A reference the host model
/// cannot resolve is carried as an explicit sentinel so one broken type is
/// a per-declaration diagnostic, never a process abort.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeRef {
    Named(NamedType),
    Unresolved(String),
}

impl TypeRef {
    #[must_use]
    pub fn qualified_name(&self) -> Option<&str> {
        match self {
            Self::Named(named) => Some(&named.qualified),
            Self::Unresolved(_) => None,
        }
    }

    #[must_use]
    pub fn named(&self) -> Option<&NamedType> {
        match self {
            Self::Named(named) => Some(named),
            Self::Unresolved(_) => None,
        }
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Named(named) if named.qualified == "()")
    }
}

///
/// NamedType
///
/// A resolved type with its generic arguments. Container families are
/// recognized here, in the adapter's structural model, from a closed set of
/// shapes; user types with container-like names never match.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamedType {
    pub qualified: String,
    pub arguments: Vec<TypeRef>,
    pub container: Option<ContainerShape>,
}

impl NamedType {
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        self.qualified == "bool"
    }

    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(
            self.qualified.as_str(),
            "Option" | "core::option::Option" | "std::option::Option"
        )
    }

    /// First generic argument, used for container elements and optional
    /// unwrapping.
    #[must_use]
    pub fn first_argument(&self) -> Option<&TypeRef> {
        self.arguments.first()
    }
}

///
/// MemberKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemberKind {
    Field,
    Getter,
}

///
/// Member
///
/// One declared member: a field or a no-argument getter-style method.
///

#[derive(Clone, Debug)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub is_private: bool,
    pub is_static: bool,
    pub ty: TypeRef,
    pub annotations: Vec<Annotation>,
}

impl Member {
    #[must_use]
    pub fn has_transient(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| matches!(a, Annotation::Transient))
    }

    #[must_use]
    pub fn column_override(&self) -> Option<&str> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::Column(marker) => marker.name.as_deref().filter(|n| !n.is_empty()),
            _ => None,
        })
    }

    /// Relationship markers present on the member, in the fixed priority
    /// order used for cardinality derivation.
    #[must_use]
    pub fn relationship_markers(&self) -> Vec<Cardinality> {
        Cardinality::PRIORITY
            .into_iter()
            .filter(|wanted| {
                self.annotations
                    .iter()
                    .any(|a| matches!(a, Annotation::Relationship(c) if c == wanted))
            })
            .collect()
    }

    #[must_use]
    pub fn callback_kinds(&self) -> Vec<CallbackKind> {
        self.annotations
            .iter()
            .filter_map(|a| match a {
                Annotation::Callback(kind) => Some(*kind),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn has(&self, wanted: &Annotation) -> bool {
        self.annotations.iter().any(|a| a == wanted)
    }
}

///
/// ClassDecl
///
/// One class-like declaration lowered from the host model: a struct
/// (fields) or a trait (interface with getter members). Supertypes are in
/// declaration order: supertraits for traits, `extends`/`implements`
/// markers for structs.
///

#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub package: String,
    pub simple_name: String,
    pub is_interface: bool,
    pub is_abstract: bool,

    /// Structurally sealed declarations cannot be implemented downstream
    /// and are treated as immutable value types.
    pub is_sealed: bool,

    pub annotations: Vec<Annotation>,
    pub members: Vec<Member>,
    pub supertypes: Vec<TypeRef>,
}

impl ClassDecl {
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.simple_name.clone()
        } else {
            format!("{}::{}", self.package, self.simple_name)
        }
    }

    /// Which mapped-type kind this declaration is a candidate for. Both
    /// annotation dialects land in the same marker set, so precedence here
    /// is across kinds only: entity, then superclass, then embeddable.
    #[must_use]
    pub fn marker_kind(&self) -> Option<EntityKind> {
        if self.entity_marker().is_some() {
            Some(EntityKind::Entity)
        } else if self.has_annotation(|a| matches!(a, Annotation::Superclass)) {
            Some(EntityKind::Superclass)
        } else if self.has_annotation(|a| matches!(a, Annotation::Embeddable)) {
            Some(EntityKind::Embeddable)
        } else {
            None
        }
    }

    #[must_use]
    pub fn entity_marker(&self) -> Option<&EntityMarker> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::Entity(marker) => Some(marker),
            _ => None,
        })
    }

    #[must_use]
    pub fn table_override(&self) -> Option<&str> {
        self.annotations.iter().find_map(|a| match a {
            Annotation::Table(marker) | Annotation::View(marker) => {
                marker.name.as_deref().filter(|n| !n.is_empty())
            }
            _ => None,
        })
    }

    #[must_use]
    pub fn has_annotation(&self, matcher: impl Fn(&Annotation) -> bool) -> bool {
        self.annotations.iter().any(matcher)
    }
}
