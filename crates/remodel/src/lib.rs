//! ## Crate layout
//! - `schema`: descriptor nodes, the entity graph, diagnostics, and the
//!   validation battery.
//! - `build`: the declaration adapter, property extraction, entity
//!   building, and run orchestration.
//! - `gen`: metadata emission into generated-source token streams.
//!
//! [`compile`] drives the whole pipeline for one batch of annotated
//! declarations: read, build, assemble, validate, emit.

pub use remodel_build as build;
pub use remodel_gen as r#gen;
pub use remodel_schema as schema;

use crate::{
    build::{Processor, ProcessorOptions, SourceReader},
    r#gen::Artifact,
    schema::{diagnostic::Diagnostics, graph::EntityGraph},
};
use thiserror::Error as ThisError;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Compilation, compile, compile_with,
        build::{ProcessOutcome, Processor, ProcessorOptions, SourceReader},
        r#gen::{Artifact, ArtifactKind},
        schema::{
            context::ModelContext,
            diagnostic::{Diagnostic, Diagnostics, Severity},
            graph::{EntityGraph, RelationshipEdge},
            node::{Callback, Entity, Property},
            types::{Cardinality, ContainerShape, EntityKind},
        },
    };
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("source parse failed: {0}")]
    Parse(#[from] syn::Error),
}

///
/// Compilation
///
/// Everything one run produces: the frozen graph, the full diagnostic
/// batch, the declarations that failed to build, and the emitted artifacts
/// (empty when the caller's policy suppressed emission).
///

#[derive(Debug)]
pub struct Compilation {
    pub graph: EntityGraph,
    pub diagnostics: Diagnostics,
    pub invalid: Vec<String>,
    pub artifacts: Vec<Artifact>,
}

/// Compile one source batch with default options.
pub fn compile(package: &str, source: &str) -> Result<Compilation, Error> {
    compile_with(package, source, ProcessorOptions::default())
}

/// Compile one source batch: read declarations, build and validate the
/// graph, then emit unless the policy says otherwise. Diagnostics from
/// every stage come back together.
pub fn compile_with(
    package: &str,
    source: &str,
    options: ProcessorOptions,
) -> Result<Compilation, Error> {
    let read = SourceReader::new(package).read_source(source)?;

    let processor = Processor::new(options);
    let mut outcome = processor.process(&read.declarations);

    let mut diagnostics = read.diagnostics;
    diagnostics.merge(std::mem::take(&mut outcome.diagnostics));
    outcome.diagnostics = diagnostics;

    let artifacts = if processor.should_emit(&outcome) {
        let emitted = r#gen::emit(&outcome.graph);
        outcome.diagnostics.merge(emitted.diagnostics);
        emitted.artifacts
    } else {
        Vec::new()
    };

    Ok(Compilation {
        graph: outcome.graph,
        diagnostics: outcome.diagnostics,
        invalid: outcome.invalid,
        artifacts,
    })
}
