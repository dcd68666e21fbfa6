//! Structural validation over the frozen entity graph.
//!
//! Every check runs independently over every descriptor, property, and edge;
//! nothing short-circuits, so one pass reports every problem in the model.

pub mod reserved;

use crate::{
    diagnostic::Diagnostics,
    err,
    graph::EntityGraph,
    node::Entity,
    warning,
};
use reserved::is_reserved_word;

/// Run the full check battery. The graph is never mutated; findings come
/// back as data and policy is the caller's concern.
#[must_use]
pub fn validate(graph: &EntityGraph) -> Diagnostics {
    let mut diags = Diagnostics::new();

    for entity in graph.descriptors() {
        validate_keys(entity, &mut diags);
        validate_versions(entity, &mut diags);
        validate_relationship_shapes(entity, &mut diags);
        validate_population(entity, &mut diags);
        validate_table_name(entity, &mut diags);
    }

    validate_edges(graph, &mut diags);

    diags
}

// Every ENTITY needs at least one key; superclasses and embeddables are
// exempt since they are never persisted directly.
fn validate_keys(entity: &Entity, diags: &mut Diagnostics) {
    if entity.kind.is_entity() && entity.key_properties().is_empty() {
        err!(
            diags,
            &entity.qualified_name,
            "entity '{}' requires at least one key property",
            entity.simple_name
        );
    }
}

// One error per entity, not per offending property.
fn validate_versions(entity: &Entity, diags: &mut Diagnostics) {
    if entity.kind.is_entity() && entity.version_properties().len() > 1 {
        err!(
            diags,
            &entity.qualified_name,
            "entity '{}' declares more than one version property",
            entity.simple_name
        );
    }
}

// A to-one return shape on a to-many relationship is a modeling mistake.
fn validate_relationship_shapes(entity: &Entity, diags: &mut Diagnostics) {
    for property in &entity.properties {
        let Some(cardinality) = property.cardinality else {
            continue;
        };

        if cardinality.is_to_many() && !property.is_collection {
            err!(
                diags,
                format!("{}.{}", entity.qualified_name, property.name),
                "{cardinality} property '{}' must be a collection",
                property.name
            );
        }
    }
}

fn validate_population(entity: &Entity, diags: &mut Diagnostics) {
    if entity.properties.is_empty() {
        warning!(
            diags,
            &entity.qualified_name,
            "entity '{}' contains no properties",
            entity.simple_name
        );
        return;
    }

    // A lone generated key leaves nothing else to persist.
    if entity.kind.is_entity() && !entity.is_read_only && entity.properties.len() == 1 {
        let only = &entity.properties[0];
        if only.is_key && only.is_generated {
            warning!(
                diags,
                &entity.qualified_name,
                "entity '{}' contains only a single generated key and may fail to persist",
                entity.simple_name
            );
        }
    }
}

fn validate_table_name(entity: &Entity, diags: &mut Diagnostics) {
    if is_reserved_word(&entity.table_name) {
        warning!(
            diags,
            &entity.qualified_name,
            "table or view name '{}' may need to be escaped",
            entity.table_name
        );
    }
}

// Assembly never inserts an edge with an unknown endpoint, so any hit here
// is an internal fault worth surfacing loudly.
fn validate_edges(graph: &EntityGraph, diags: &mut Diagnostics) {
    for edge in graph.edges() {
        if graph.descriptor(&edge.source).is_none() {
            err!(
                diags,
                format!("{}.{}", edge.source, edge.property),
                "relationship source '{}' is not part of the graph",
                edge.source
            );
        }
        if graph.descriptor(&edge.target).is_none() {
            err!(
                diags,
                format!("{}.{}", edge.source, edge.property),
                "relationship target '{}' is not part of the graph",
                edge.target
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::ModelContext,
        graph::assemble,
        node::Property,
        types::{Cardinality, EntityKind, PropertyNameStyle, PropertyVisibility},
    };

    fn entity(qualified: &str, kind: EntityKind) -> Entity {
        let simple = qualified.rsplit("::").next().unwrap_or(qualified);

        Entity {
            package_name: "model".to_string(),
            simple_name: simple.to_string(),
            qualified_name: qualified.to_string(),
            entity_name: None,
            model_name: "default".to_string(),
            table_name: simple.to_string(),
            kind,
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

    fn key_property(name: &str) -> Property {
        let mut p = property(name, "i64");
        p.is_key = true;
        p
    }

    fn graph_of(entities: Vec<Entity>) -> EntityGraph {
        let mut ctx = ModelContext::new();
        for e in entities {
            ctx.insert(e).expect("insert descriptor");
        }
        assemble(&ctx)
    }

    #[test]
    fn keyless_entity_yields_exactly_one_error() {
        let mut person = entity("model::Person", EntityKind::Entity);
        person.push_property(property("name", "String"));

        let diags = validate(&graph_of(vec![person]));
        assert_eq!(diags.errors().count(), 1);
        assert!(diags.to_string().contains("at least one key property"));
    }

    #[test]
    fn keyless_superclass_and_embeddable_pass() {
        let mut base = entity("model::Base", EntityKind::Superclass);
        base.push_property(property("created", "u64"));
        let mut coord = entity("model::Coord", EntityKind::Embeddable);
        coord.push_property(property("x", "f64"));

        let diags = validate(&graph_of(vec![base, coord]));
        assert_eq!(diags.errors().count(), 0);
    }

    #[test]
    fn duplicate_version_error_names_the_entity_once() {
        let mut person = entity("model::Person", EntityKind::Entity);
        person.push_property(key_property("id"));
        let mut v1 = property("rev_a", "i64");
        v1.is_version = true;
        let mut v2 = property("rev_b", "i64");
        v2.is_version = true;
        person.push_property(v1);
        person.push_property(v2);

        let diags = validate(&graph_of(vec![person]));
        let errors: Vec<_> = diags.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].subject, "model::Person");
        assert!(errors[0].message.contains("more than one version"));
    }

    #[test]
    fn to_many_without_collection_shape_is_an_error() {
        let mut person = entity("model::Person", EntityKind::Entity);
        person.push_property(key_property("id"));
        let mut posts = property("posts", "model::Post");
        posts.cardinality = Some(Cardinality::ManyToMany);
        person.push_property(posts);

        let diags = validate(&graph_of(vec![person]));
        let errors: Vec<_> = diags.errors().collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("must be a collection"));
        assert_eq!(errors[0].subject, "model::Person.posts");
    }

    #[test]
    fn empty_entity_warns_without_blocking() {
        let diags = validate(&graph_of(vec![entity("model::Empty", EntityKind::Entity)]));
        // Missing key error plus the empty warning.
        assert_eq!(diags.warnings().count(), 1);
        assert!(diags.to_string().contains("contains no properties"));
    }

    #[test]
    fn lone_generated_key_warns() {
        let mut person = entity("model::Person", EntityKind::Entity);
        let mut id = key_property("id");
        id.is_generated = true;
        person.push_property(id);

        let diags = validate(&graph_of(vec![person]));
        assert_eq!(diags.errors().count(), 0);
        assert_eq!(diags.warnings().count(), 1);
        assert!(diags.to_string().contains("single generated key"));
    }

    #[test]
    fn reserved_table_name_warns_case_insensitively() {
        let mut order = entity("model::Order", EntityKind::Entity);
        order.push_property(key_property("id"));

        let diags = validate(&graph_of(vec![order]));
        assert_eq!(diags.warnings().count(), 1);
        assert!(diags.to_string().contains("may need to be escaped"));
    }

    #[test]
    fn clean_model_validates_clean() {
        let mut person = entity("model::Person", EntityKind::Entity);
        person.push_property(key_property("id"));
        person.push_property(property("name", "String"));

        let diags = validate(&graph_of(vec![person]));
        assert!(diags.is_empty(), "expected no findings, got: {diags}");
    }
}
