//! Property extraction: one declared member in, one property descriptor out.
//!
//! Extraction is a pure function of the member, its annotations, and the
//! owning type's context. It emits no diagnostics of its own; recoverable
//! problems come back as typed errors for the builder to report, and
//! everything structural is validated later over the complete graph.

use crate::adapter::{Annotation, Member, MemberKind, NamedType, TypeRef};
use remodel_schema::{
    node::Property,
    types::{Cardinality, ContainerShape},
};
use thiserror::Error as ThisError;

///
/// ExtractError
///

#[derive(Debug, ThisError)]
pub enum ExtractError {
    #[error("member '{member}' declares more than one relationship cardinality")]
    ConflictingCardinality { member: String },

    #[error("member '{member}' has unresolvable type '{raw}'")]
    UnresolvedType { member: String, raw: String },
}

///
/// OwnerContext
///
/// The slice of the owning declaration extraction needs: identity for
/// origin paths, and the interface/immutable flags that change member
/// eligibility.
///

#[derive(Clone, Copy, Debug)]
pub struct OwnerContext<'a> {
    pub qualified_name: &'a str,
    pub is_interface: bool,
    pub is_immutable: bool,
}

/// Extract one property from one member. `Ok(None)` means the member is not
/// eligible and is skipped silently.
pub fn extract(member: &Member, owner: &OwnerContext<'_>) -> Result<Option<Property>, ExtractError> {
    if !is_eligible(member, owner) {
        return Ok(None);
    }

    let Some(name) = derived_name(member) else {
        return Ok(None);
    };

    let named = resolve_member_type(member)?;

    // Option-shaped members contribute nullability, not structure.
    let (named, optional) = unwrap_optional(member, named)?;

    let container = named.container;
    let is_collection = container.is_some_and(ContainerShape::is_relation_collection);

    let (element_type, key_type) = container_arguments(&named, container);

    let is_transient = member.has_transient();
    let cardinality = if is_transient {
        // Transient properties never participate in relationships.
        None
    } else {
        derive_cardinality(member)?
    };

    let column_name = member
        .column_override()
        .map_or_else(|| name.clone(), ToString::to_string);

    Ok(Some(Property {
        origin: format!("{}.{}", owner.qualified_name, member.name),
        column_name,
        declared_type: named.qualified.clone(),
        element_type,
        key_type,
        container,
        cardinality,
        is_key: member.has(&Annotation::Key),
        is_generated: member.has(&Annotation::Generated),
        is_version: member.has(&Annotation::Version),
        is_nullable: optional || member.has(&Annotation::Nullable),
        is_transient,
        is_lazy: member.has(&Annotation::Lazy),
        is_read_only: member.has(&Annotation::ReadOnly),
        is_collection,
        is_boolean: named.is_boolean(),
        name,
    }))
}

// Member eligibility, applied identically to fields and getters.
fn is_eligible(member: &Member, owner: &OwnerContext<'_>) -> bool {
    if member.is_private || member.is_static || member.ty.is_void() {
        return false;
    }

    // Synthetic component accessors of data-style immutable types.
    if owner.is_immutable && member.kind == MemberKind::Getter && is_component_accessor(&member.name)
    {
        return false;
    }

    // A member returning the owner itself on an immutable type is a
    // builder-return pattern, not mapped state.
    if owner.is_immutable
        && member.ty.qualified_name() == Some(owner.qualified_name)
    {
        return false;
    }

    // Transient only means something on interface-style owners; class-style
    // owners exclude transient members structurally.
    if member.has_transient() && !owner.is_interface {
        return false;
    }

    true
}

fn is_component_accessor(name: &str) -> bool {
    name.strip_prefix("component")
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

fn derived_name(member: &Member) -> Option<String> {
    match member.kind {
        MemberKind::Field => Some(member.name.clone()),
        MemberKind::Getter => strip_accessor_prefix(&member.name),
    }
}

/// Derive a property name from a getter: strip a leading `get`/`is`, drop
/// the separator, and lower-case the first remaining character. Handles
/// both `getEmailAddress` and `get_email_address` shapes; names that match
/// neither accessor pattern yield `None` and the member is skipped.
#[must_use]
pub fn strip_accessor_prefix(name: &str) -> Option<String> {
    let rest = name
        .strip_prefix("get")
        .or_else(|| name.strip_prefix("is"))?;

    let head = rest.chars().next()?;
    let rest = if head == '_' {
        &rest[1..]
    } else if head.is_uppercase() {
        rest
    } else {
        // `getter`, `island`: not an accessor pattern.
        return None;
    };

    let mut chars = rest.chars();
    let first = chars.next()?;
    let mut derived = String::new();
    derived.extend(first.to_lowercase());
    derived.extend(chars);

    Some(derived)
}

fn resolve_member_type(member: &Member) -> Result<NamedType, ExtractError> {
    match &member.ty {
        TypeRef::Named(named) => Ok(named.clone()),
        TypeRef::Unresolved(raw) => Err(ExtractError::UnresolvedType {
            member: member.name.clone(),
            raw: raw.clone(),
        }),
    }
}

fn unwrap_optional(member: &Member, named: NamedType) -> Result<(NamedType, bool), ExtractError> {
    if !named.is_optional() {
        return Ok((named, false));
    }

    match named.first_argument() {
        Some(TypeRef::Named(inner)) => Ok((inner.clone(), true)),
        Some(TypeRef::Unresolved(raw)) => Err(ExtractError::UnresolvedType {
            member: member.name.clone(),
            raw: raw.clone(),
        }),
        None => Ok((named, false)),
    }
}

fn container_arguments(
    named: &NamedType,
    container: Option<ContainerShape>,
) -> (Option<String>, Option<String>) {
    match container {
        Some(ContainerShape::List | ContainerShape::Set) => {
            let element = named
                .first_argument()
                .and_then(TypeRef::qualified_name)
                .map(ToString::to_string);

            (element, None)
        }
        // Maps carry key and value; the value is the element.
        Some(ContainerShape::Map) => {
            let key = named
                .arguments
                .first()
                .and_then(TypeRef::qualified_name)
                .map(ToString::to_string);
            let value = named
                .arguments
                .get(1)
                .and_then(TypeRef::qualified_name)
                .map(ToString::to_string);

            (value, key)
        }
        None => (None, None),
    }
}

// First match in priority order wins; more than one distinct marker is a
// configuration error, not a silent preference.
fn derive_cardinality(member: &Member) -> Result<Option<Cardinality>, ExtractError> {
    let markers = member.relationship_markers();

    if markers.len() > 1 {
        return Err(ExtractError::ConflictingCardinality {
            member: member.name.clone(),
        });
    }

    Ok(markers.first().copied())
}
