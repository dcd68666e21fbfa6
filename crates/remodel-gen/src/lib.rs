//! Metadata emission: renders a validated graph into generated-source
//! artifacts. File writing belongs to the host build integration; this
//! crate only produces token streams.

pub mod entity;
pub mod helper;
pub mod meta;
pub mod name;
pub mod registry;

use proc_macro2::TokenStream;
use remodel_schema::{diagnostic::Diagnostics, err, graph::EntityGraph, types::EntityKind};
use std::collections::BTreeMap;

///
/// ArtifactKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ArtifactKind {
    Implementation,
    Metadata,
    Registry,
}

///
/// Artifact
///
/// One generated compilation unit, addressed by output package and type
/// name.
///

#[derive(Clone, Debug)]
pub struct Artifact {
    pub package: String,
    pub name: String,
    pub kind: ArtifactKind,
    pub tokens: TokenStream,
}

impl Artifact {
    #[must_use]
    pub fn render(&self) -> String {
        self.tokens.to_string()
    }
}

///
/// EmitOutcome
///

#[derive(Debug, Default)]
pub struct EmitOutcome {
    pub artifacts: Vec<Artifact>,
    pub diagnostics: Diagnostics,
}

/// Emit every artifact the output contract names: one implementation per
/// non-immutable entity, one metadata descriptor per descriptor of any
/// kind, and one registry per output package.
#[must_use]
pub fn emit(graph: &EntityGraph) -> EmitOutcome {
    let mut outcome = EmitOutcome::default();
    let mut packages: BTreeMap<&str, Vec<&remodel_schema::node::Entity>> = BTreeMap::new();

    for descriptor in graph.descriptors() {
        packages
            .entry(&descriptor.package_name)
            .or_default()
            .push(descriptor);

        outcome.artifacts.push(Artifact {
            package: descriptor.package_name.clone(),
            name: name::meta_type_name(descriptor),
            kind: ArtifactKind::Metadata,
            tokens: meta::entity_meta(descriptor, graph),
        });

        if descriptor.kind == EntityKind::Entity && !descriptor.is_immutable {
            match entity::entity_impl(descriptor) {
                Ok(tokens) => outcome.artifacts.push(Artifact {
                    package: descriptor.package_name.clone(),
                    name: name::impl_type_name(descriptor),
                    kind: ArtifactKind::Implementation,
                    tokens,
                }),
                Err(e) => {
                    err!(outcome.diagnostics, &descriptor.qualified_name, "{e}");
                }
            }
        }
    }

    for (package, descriptors) in packages {
        outcome.artifacts.push(Artifact {
            package: package.to_string(),
            name: "Models".to_string(),
            kind: ArtifactKind::Registry,
            tokens: registry::package_registry(package, &descriptors),
        });
    }

    outcome
}
