//! Entity builder: one class declaration plus previously-built ancestor
//! descriptors in, one entity descriptor out.
//!
//! Building performs no cross-entity validation; key presence and
//! relationship shape checks run later against the complete graph.

use crate::{
    adapter::{Annotation, ClassDecl, EntityMarker, Member, MemberKind},
    extract::{OwnerContext, extract},
};
use remodel_schema::{
    context::ModelContext,
    diagnostic::Diagnostics,
    err,
    node::{Callback, Entity},
    strip_class_prefixes,
    types::EntityKind,
};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// BuildError
///
/// Fatal per-declaration failures. The processor records the declaration as
/// invalid and the run continues with the rest of the batch.
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("declaration '{0}' has no qualified name")]
    MissingQualifiedName(String),
}

/// Build one descriptor. `decls` is the adapter's full declaration set,
/// used to walk the supertype chain; `ctx` holds every ancestor descriptor
/// completed in an earlier phase.
pub fn build(
    decl: &ClassDecl,
    kind: EntityKind,
    ctx: &ModelContext,
    decls: &BTreeMap<String, ClassDecl>,
    table_prefixes: &[String],
    diags: &mut Diagnostics,
) -> Result<Entity, BuildError> {
    if decl.simple_name.is_empty() || decl.package.is_empty() {
        return Err(BuildError::MissingQualifiedName(decl.simple_name.clone()));
    }
    let qualified_name = decl.qualified_name();

    let marker = decl.entity_marker();

    let unimplementable =
        decl.is_sealed || marker.is_some_and(|m| m.extendable == Some(false));
    let is_immutable = decl.has_annotation(|a| matches!(a, Annotation::Immutable))
        || unimplementable
        || marker.is_some_and(|m| m.immutable);

    let entity_name = marker.and_then(|m| m.name.clone()).filter(|n| !n.is_empty());
    if let Some(name) = &entity_name
        && !is_identifier(name)
    {
        err!(diags, &qualified_name, "invalid entity name '{name}'");
    }

    let mut entity = Entity {
        package_name: decl.package.clone(),
        simple_name: decl.simple_name.clone(),
        qualified_name: qualified_name.clone(),
        entity_name,
        model_name: model_name(decl, marker),
        table_name: table_name(decl, is_immutable, table_prefixes),
        kind,
        is_abstract: decl.is_abstract,
        is_interface: decl.is_interface,
        is_immutable,
        is_view: decl.has_annotation(|a| matches!(a, Annotation::View(_))),
        is_read_only: decl.has_annotation(|a| matches!(a, Annotation::ReadOnly)),
        is_stateless: is_immutable
            || unimplementable
            || marker.is_some_and(|m| m.stateless),
        is_cacheable: marker.and_then(|m| m.cacheable).unwrap_or(true),
        name_style: marker.and_then(|m| m.name_style).unwrap_or_default(),
        visibility: marker.and_then(|m| m.visibility).unwrap_or_default(),
        properties: Vec::new(),
        callbacks: Vec::new(),
    };

    let owner = OwnerContext {
        qualified_name: &qualified_name,
        is_interface: decl.is_interface,
        is_immutable,
    };

    for member in eligible_members(decl) {
        match extract(member, &owner) {
            Ok(Some(property)) => {
                // First occurrence wins; a field and its getter can surface
                // the same logical property.
                entity.push_property(property);
            }
            Ok(None) => {}
            Err(e) => {
                err!(diags, &qualified_name, "{e}");
            }
        }
    }

    for member in &decl.members {
        for callback_kind in member.callback_kinds() {
            entity.push_callback(Callback {
                kind: callback_kind,
                method: member.name.clone(),
            });
        }
    }

    if kind == EntityKind::Entity {
        merge_ancestors(&mut entity, decl, ctx, decls);
    }

    Ok(entity)
}

// Interface owners enumerate getters. Class owners enumerate fields and
// fall back to getters when no eligible field exists, so accessor-only
// declarations still map.
fn eligible_members(decl: &ClassDecl) -> Vec<&Member> {
    if decl.is_interface {
        return getters(decl);
    }

    let fields: Vec<&Member> = decl
        .members
        .iter()
        .filter(|m| m.kind == MemberKind::Field && !m.is_private && !m.is_static)
        .collect();

    if fields.is_empty() { getters(decl) } else { fields }
}

fn getters(decl: &ClassDecl) -> Vec<&Member> {
    decl.members
        .iter()
        .filter(|m| m.kind == MemberKind::Getter)
        .collect()
}

// Directly implemented interfaces contribute one level; the class chain is
// walked one level at a time until a supertype stops resolving to a known
// class declaration. The visited set keeps unexpected cycles from hanging.
fn merge_ancestors(
    entity: &mut Entity,
    decl: &ClassDecl,
    ctx: &ModelContext,
    decls: &BTreeMap<String, ClassDecl>,
) {
    let mut merged = BTreeSet::new();

    for supertype in &decl.supertypes {
        let Some(name) = supertype.qualified_name() else {
            continue;
        };
        if merged.insert(name.to_string())
            && let Some(ancestor) = ctx.ancestor(name)
        {
            entity.merge_from(ancestor);
        }
    }

    let mut chain = BTreeSet::new();
    let mut current = decl;
    while let Some(parent) = next_class_parent(current, decls) {
        let name = parent.qualified_name();
        if !chain.insert(name.clone()) {
            break;
        }
        if merged.insert(name.clone())
            && let Some(ancestor) = ctx.ancestor(&name)
        {
            entity.merge_from(ancestor);
        }
        current = parent;
    }
}

// First supertype resolving to a known class declaration, if any.
fn next_class_parent<'a>(
    decl: &ClassDecl,
    decls: &'a BTreeMap<String, ClassDecl>,
) -> Option<&'a ClassDecl> {
    decl.supertypes
        .iter()
        .filter_map(|t| t.qualified_name())
        .find_map(|q| decls.get(q).filter(|d| !d.is_interface))
}

fn table_name(decl: &ClassDecl, is_immutable: bool, prefixes: &[String]) -> String {
    if let Some(name) = decl.table_override() {
        return name.to_string();
    }

    if decl.is_interface || is_immutable {
        decl.simple_name.clone()
    } else {
        strip_class_prefixes(&decl.simple_name, prefixes)
    }
}

// The native dialect names its model explicitly and falls back to
// "default"; the standard dialect derives it from the last package segment.
fn model_name(decl: &ClassDecl, marker: Option<&EntityMarker>) -> String {
    match marker {
        Some(m) if m.standard_dialect => decl
            .package
            .rsplit("::")
            .next()
            .unwrap_or(&decl.package)
            .to_string(),
        Some(m) => m
            .model
            .clone()
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| "default".to_string()),
        None => "default".to_string(),
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_alphabetic() || first == '_') && chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::SourceReader;
    use remodel_schema::types::CallbackKind;

    fn default_prefixes() -> Vec<String> {
        vec!["Abstract".to_string(), "Base".to_string()]
    }

    fn read_decls(source: &str) -> (Vec<ClassDecl>, BTreeMap<String, ClassDecl>) {
        let outcome = SourceReader::new("model")
            .read_source(source)
            .expect("source parses");
        assert!(
            outcome.diagnostics.is_empty(),
            "unexpected reader diagnostics: {}",
            outcome.diagnostics
        );

        let map = outcome
            .declarations
            .iter()
            .map(|d| (d.qualified_name(), d.clone()))
            .collect();

        (outcome.declarations, map)
    }

    fn build_one(
        decls: &[ClassDecl],
        map: &BTreeMap<String, ClassDecl>,
        ctx: &ModelContext,
        name: &str,
        kind: EntityKind,
        diags: &mut Diagnostics,
    ) -> Entity {
        let decl = decls
            .iter()
            .find(|d| d.simple_name == name)
            .expect("declaration present");

        build(decl, kind, ctx, map, &default_prefixes(), diags).expect("build succeeds")
    }

    #[test]
    fn builds_simple_entity_with_declaration_order() {
        let (decls, map) = read_decls(
            r#"
            #[entity]
            #[table(name = "people")]
            pub struct Person {
                #[key]
                #[generated]
                pub id: i64,
                #[column(name = "full_name")]
                pub name: String,
                pub active: bool,
            }
            "#,
        );

        let ctx = ModelContext::new();
        let mut diags = Diagnostics::new();
        let entity = build_one(&decls, &map, &ctx, "Person", EntityKind::Entity, &mut diags);

        assert!(diags.is_empty(), "unexpected diagnostics: {diags}");
        assert_eq!(entity.qualified_name, "model::Person");
        assert_eq!(entity.table_name, "people");

        let names: Vec<&str> = entity.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "active"]);

        let id = entity.property("id").expect("id");
        assert!(id.is_key && id.is_generated);
        assert_eq!(
            entity.property("name").expect("name").column_name,
            "full_name"
        );
        assert!(entity.property("active").expect("active").is_boolean);
    }

    #[test]
    fn table_name_strips_class_prefixes() {
        let (decls, map) = read_decls(
            r"
            #[entity]
            pub struct AbstractPerson {
                #[key]
                pub id: i64,
            }
            ",
        );

        let ctx = ModelContext::new();
        let mut diags = Diagnostics::new();
        let entity = build_one(
            &decls,
            &map,
            &ctx,
            "AbstractPerson",
            EntityKind::Entity,
            &mut diags,
        );

        assert_eq!(entity.table_name, "Person");
        assert_eq!(entity.simple_name, "AbstractPerson");
    }

    #[test]
    fn local_properties_shadow_inherited_ones() {
        let (decls, map) = read_decls(
            r"
            #[superclass]
            pub struct AuditBase {
                pub age: i32,
                pub created: u64,
            }

            #[entity]
            #[extends(AuditBase)]
            pub struct Person {
                #[key]
                pub id: i64,
                pub age: i32,
            }
            ",
        );

        let mut ctx = ModelContext::new();
        let mut diags = Diagnostics::new();

        let base = build_one(
            &decls,
            &map,
            &ctx,
            "AuditBase",
            EntityKind::Superclass,
            &mut diags,
        );
        ctx.insert(base).expect("insert base");

        let person = build_one(&decls, &map, &ctx, "Person", EntityKind::Entity, &mut diags);
        assert!(diags.is_empty());

        let names: Vec<&str> = person.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "age", "created"]);

        let age = person.property("age").expect("age");
        assert_eq!(age.origin, "model::Person.age", "local age wins");
    }

    #[test]
    fn superclass_chain_merges_transitively() {
        let (decls, map) = read_decls(
            r"
            #[superclass]
            pub struct Root {
                pub root_flag: bool,
            }

            #[superclass]
            #[extends(Root)]
            pub struct AuditBase {
                pub created: u64,
            }

            #[entity]
            #[extends(AuditBase)]
            pub struct Person {
                #[key]
                pub id: i64,
            }
            ",
        );

        let mut ctx = ModelContext::new();
        let mut diags = Diagnostics::new();
        let root = build_one(&decls, &map, &ctx, "Root", EntityKind::Superclass, &mut diags);
        ctx.insert(root).expect("insert root");
        let base = build_one(
            &decls,
            &map,
            &ctx,
            "AuditBase",
            EntityKind::Superclass,
            &mut diags,
        );
        ctx.insert(base).expect("insert base");

        let person = build_one(&decls, &map, &ctx, "Person", EntityKind::Entity, &mut diags);
        assert!(person.has_property("created"));
        assert!(person.has_property("root_flag"));
    }

    #[test]
    fn conflicting_cardinality_is_reported_and_dropped() {
        let (decls, map) = read_decls(
            r"
            #[entity]
            pub struct Person {
                #[key]
                pub id: i64,
                #[one_to_one]
                #[many_to_one]
                pub other: Other,
            }
            ",
        );

        let ctx = ModelContext::new();
        let mut diags = Diagnostics::new();
        let entity = build_one(&decls, &map, &ctx, "Person", EntityKind::Entity, &mut diags);

        assert_eq!(diags.errors().count(), 1);
        assert!(
            diags
                .to_string()
                .contains("more than one relationship cardinality")
        );
        assert!(!entity.has_property("other"), "conflicted member is dropped");
    }

    #[test]
    fn immutable_entities_resolve_from_markers_and_structure() {
        let (decls, map) = read_decls(
            r"
            #[entity]
            #[immutable]
            pub struct Snapshot {
                #[key]
                pub id: i64,
            }

            #[entity]
            #[non_exhaustive]
            pub struct Sealed {
                #[key]
                pub id: i64,
            }

            #[entity(extendable = false)]
            pub struct Pinned {
                #[key]
                pub id: i64,
            }
            ",
        );

        let ctx = ModelContext::new();
        let mut diags = Diagnostics::new();
        for name in ["Snapshot", "Sealed", "Pinned"] {
            let entity = build_one(&decls, &map, &ctx, name, EntityKind::Entity, &mut diags);
            assert!(entity.is_immutable, "{name} should be immutable");
            assert!(entity.is_stateless, "{name} should be stateless");
        }
    }

    #[test]
    fn interface_entities_extract_getters() {
        let (decls, map) = read_decls(
            r"
            #[entity]
            pub trait Person {
                #[key]
                fn get_id(&self) -> i64;
                fn get_name(&self) -> String;
                #[transient]
                fn get_cached(&self) -> String;
            }
            ",
        );

        let ctx = ModelContext::new();
        let mut diags = Diagnostics::new();
        let entity = build_one(&decls, &map, &ctx, "Person", EntityKind::Entity, &mut diags);

        assert!(entity.is_interface);
        let names: Vec<&str> = entity.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "cached"]);
        assert!(entity.property("cached").expect("cached").is_transient);
    }

    #[test]
    fn invalid_entity_name_override_is_reported() {
        let (decls, map) = read_decls(
            r#"
            #[entity(name = "not a name")]
            pub struct Person {
                #[key]
                pub id: i64,
            }
            "#,
        );

        let ctx = ModelContext::new();
        let mut diags = Diagnostics::new();
        build_one(&decls, &map, &ctx, "Person", EntityKind::Entity, &mut diags);

        assert_eq!(diags.errors().count(), 1);
        assert!(diags.to_string().contains("invalid entity name"));
    }

    #[test]
    fn standard_dialect_model_name_uses_package_segment() {
        let (decls, map) = read_decls(
            r"
            #[persist::entity]
            pub struct Person {
                #[persist::id]
                pub id: i64,
            }
            ",
        );

        let ctx = ModelContext::new();
        let mut diags = Diagnostics::new();
        let entity = build_one(&decls, &map, &ctx, "Person", EntityKind::Entity, &mut diags);

        assert_eq!(entity.model_name, "model");
        let id = entity.property("id").expect("id");
        assert!(id.is_key);
    }

    #[test]
    fn callbacks_collect_and_merge() {
        let (decls, map) = read_decls(
            r"
            #[superclass]
            pub trait Audited {
                #[pre_insert]
                fn stamp(&self);
            }

            #[entity]
            pub trait Person: Audited {
                #[key]
                fn get_id(&self) -> i64;
                #[post_load]
                fn warm(&self);
            }
            ",
        );

        let mut ctx = ModelContext::new();
        let mut diags = Diagnostics::new();
        let audited = build_one(
            &decls,
            &map,
            &ctx,
            "Audited",
            EntityKind::Superclass,
            &mut diags,
        );
        ctx.insert(audited).expect("insert audited");

        let person = build_one(&decls, &map, &ctx, "Person", EntityKind::Entity, &mut diags);
        let kinds: Vec<CallbackKind> = person.callbacks.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CallbackKind::PostLoad, CallbackKind::PreInsert]);
    }

    #[test]
    fn supertype_cycles_terminate() {
        let (decls, map) = read_decls(
            r"
            #[superclass]
            #[extends(B)]
            pub struct A {
                pub a: i32,
            }

            #[superclass]
            #[extends(A)]
            pub struct B {
                pub b: i32,
            }

            #[entity]
            #[extends(A)]
            pub struct Person {
                #[key]
                pub id: i64,
            }
            ",
        );

        let mut ctx = ModelContext::new();
        let mut diags = Diagnostics::new();
        for name in ["A", "B"] {
            let sc = build_one(&decls, &map, &ctx, name, EntityKind::Superclass, &mut diags);
            ctx.insert(sc).expect("insert superclass");
        }

        let person = build_one(&decls, &map, &ctx, "Person", EntityKind::Entity, &mut diags);
        assert!(person.has_property("a"));
        assert!(person.has_property("b"));
    }
}
