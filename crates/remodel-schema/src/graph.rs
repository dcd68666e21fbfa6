use crate::{
    context::ModelContext,
    node::{Entity, Property},
    types::{Cardinality, EntityKind},
};
use serde::Serialize;

///
/// RelationshipEdge
///
/// One relationship occurrence: a property on `source` whose target type
/// resolved to another known descriptor.
///

#[derive(Clone, Debug, Serialize)]
pub struct RelationshipEdge {
    pub source: String,
    pub target: String,
    pub property: String,
    pub cardinality: Cardinality,
}

///
/// PropertyRef
///
/// Flat (owner, property) pair kept for metadata purposes regardless of
/// whether the property produced an edge.
///

#[derive(Clone, Debug, Serialize)]
pub struct PropertyRef {
    pub owner: String,
    pub property: String,
}

///
/// EntityGraph
///
/// Run-scoped aggregate over every completed descriptor. Append-only during
/// assembly, then frozen: the validator only reads it.
///

#[derive(Debug, Default, Serialize)]
pub struct EntityGraph {
    descriptors: Vec<Entity>,
    properties: Vec<PropertyRef>,
    edges: Vec<RelationshipEdge>,
}

impl EntityGraph {
    #[must_use]
    pub fn descriptors(&self) -> &[Entity] {
        &self.descriptors
    }

    #[must_use]
    pub fn descriptor(&self, qualified_name: &str) -> Option<&Entity> {
        self.descriptors
            .iter()
            .find(|e| e.qualified_name == qualified_name)
    }

    /// Descriptors of kind ENTITY only.
    #[must_use]
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.descriptors
            .iter()
            .filter(|e| e.kind == EntityKind::Entity)
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyRef] {
        &self.properties
    }

    #[must_use]
    pub fn edges(&self) -> &[RelationshipEdge] {
        &self.edges
    }

    #[must_use]
    pub fn edges_from(&self, source: &str) -> impl Iterator<Item = &RelationshipEdge> {
        self.edges.iter().filter(move |e| e.source == source)
    }

    /// Serialized dump of the frozen graph for tests and tooling.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Derive the global graph from the completed descriptor set. For every
/// relationship-bearing property the target type is resolved first among
/// entities, then among superclass descriptors; an unresolved target drops
/// the edge (the type may be external or unmapped) while the property stays
/// in the flat list.
#[must_use]
pub fn assemble(ctx: &ModelContext) -> EntityGraph {
    let mut graph = EntityGraph::default();

    for entity in ctx.superclasses() {
        graph.descriptors.push(entity.clone());
    }
    for entity in ctx.embeddables() {
        graph.descriptors.push(entity.clone());
    }
    for entity in ctx.entities() {
        graph.descriptors.push(entity.clone());
    }

    for entity in ctx.entities() {
        for property in entity.persistent_properties() {
            graph.properties.push(PropertyRef {
                owner: entity.qualified_name.clone(),
                property: property.name.clone(),
            });

            if let Some(edge) = resolve_edge(ctx, entity, property) {
                graph.edges.push(edge);
            }
        }
    }

    graph
}

fn resolve_edge(ctx: &ModelContext, owner: &Entity, property: &Property) -> Option<RelationshipEdge> {
    let cardinality = property.cardinality?;
    let target = property.relation_target()?;

    let resolved = ctx
        .entity(target)
        .or_else(|| ctx.superclass(target))?;

    Some(RelationshipEdge {
        source: owner.qualified_name.clone(),
        target: resolved.qualified_name.clone(),
        property: property.name.clone(),
        cardinality,
    })
}
