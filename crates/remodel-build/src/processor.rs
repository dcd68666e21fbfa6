//! Run orchestration: one batch of declarations in, one validated graph out.
//!
//! Descriptors build in two phases so ancestors always exist before their
//! descendants read them: superclasses and embeddables first (topologically
//! ordered along supertype dependencies), then entities in declaration
//! order. One malformed declaration lands in the invalid set and never
//! aborts the batch.

use crate::{adapter::ClassDecl, build::build};
use remodel_schema::{
    TABLE_PREFIXES,
    context::ModelContext,
    diagnostic::Diagnostics,
    err,
    graph::{EntityGraph, assemble},
    types::EntityKind,
    validate::validate,
};
use std::collections::{BTreeMap, BTreeSet};

///
/// ProcessorOptions
///

#[derive(Clone, Debug)]
pub struct ProcessorOptions {
    /// Suppress emission entirely when any error diagnostic exists. Errors
    /// never abort the run either way.
    pub suppress_on_error: bool,

    /// Class-name prefixes stripped when deriving default table names.
    pub table_prefixes: Vec<String>,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            suppress_on_error: false,
            table_prefixes: TABLE_PREFIXES.iter().map(ToString::to_string).collect(),
        }
    }
}

///
/// ProcessOutcome
///

#[derive(Debug)]
pub struct ProcessOutcome {
    pub graph: EntityGraph,
    pub diagnostics: Diagnostics,

    /// Qualified names of declarations that failed to build.
    pub invalid: Vec<String>,
}

///
/// Processor
///

#[derive(Debug, Default)]
pub struct Processor {
    options: ProcessorOptions,
}

impl Processor {
    #[must_use]
    pub fn new(options: ProcessorOptions) -> Self {
        Self { options }
    }

    /// Whether the caller's policy allows handing the outcome to the
    /// emitter.
    #[must_use]
    pub fn should_emit(&self, outcome: &ProcessOutcome) -> bool {
        !(self.options.suppress_on_error && outcome.diagnostics.has_errors())
    }

    #[must_use]
    pub fn process(&self, declarations: &[ClassDecl]) -> ProcessOutcome {
        let mut diags = Diagnostics::new();
        let mut invalid = Vec::new();
        let mut ctx = ModelContext::new();

        let decls: BTreeMap<String, ClassDecl> = declarations
            .iter()
            .map(|d| (d.qualified_name(), d.clone()))
            .collect();

        // Both annotation dialects already resolved into one marker set, so
        // partitioning here is dialect-blind.
        let phase_one: Vec<(&ClassDecl, EntityKind)> = declarations
            .iter()
            .filter_map(|d| match d.marker_kind() {
                Some(kind @ (EntityKind::Superclass | EntityKind::Embeddable)) => Some((d, kind)),
                _ => None,
            })
            .collect();

        for (decl, kind) in phase_one_order(&phase_one) {
            self.build_into(decl, kind, &mut ctx, &decls, &mut diags, &mut invalid);
        }

        for decl in declarations {
            if decl.marker_kind() == Some(EntityKind::Entity) {
                self.build_into(
                    decl,
                    EntityKind::Entity,
                    &mut ctx,
                    &decls,
                    &mut diags,
                    &mut invalid,
                );
            }
        }

        let graph = assemble(&ctx);
        diags.merge(validate(&graph));

        ProcessOutcome {
            graph,
            diagnostics: diags,
            invalid,
        }
    }

    fn build_into(
        &self,
        decl: &ClassDecl,
        kind: EntityKind,
        ctx: &mut ModelContext,
        decls: &BTreeMap<String, ClassDecl>,
        diags: &mut Diagnostics,
        invalid: &mut Vec<String>,
    ) {
        let qualified = decl.qualified_name();

        match build(decl, kind, ctx, decls, &self.options.table_prefixes, diags) {
            Ok(entity) => {
                if let Err(e) = ctx.insert(entity) {
                    err!(diags, &qualified, "{e}");
                    invalid.push(qualified);
                }
            }
            Err(e) => {
                err!(diags, &qualified, "{e}");
                invalid.push(qualified);
            }
        }
    }
}

// Postorder walk along supertype dependencies within the phase-one
// candidate set; ancestors come out before descendants, and the visited set
// keeps unexpected cycles from recursing forever.
fn phase_one_order<'a>(
    candidates: &[(&'a ClassDecl, EntityKind)],
) -> Vec<(&'a ClassDecl, EntityKind)> {
    let index: BTreeMap<String, usize> = candidates
        .iter()
        .enumerate()
        .map(|(i, (d, _))| (d.qualified_name(), i))
        .collect();

    let mut visited = BTreeSet::new();
    let mut ordered = Vec::with_capacity(candidates.len());

    for i in 0..candidates.len() {
        visit(i, candidates, &index, &mut visited, &mut ordered);
    }

    ordered
}

fn visit<'a>(
    i: usize,
    candidates: &[(&'a ClassDecl, EntityKind)],
    index: &BTreeMap<String, usize>,
    visited: &mut BTreeSet<usize>,
    ordered: &mut Vec<(&'a ClassDecl, EntityKind)>,
) {
    if !visited.insert(i) {
        return;
    }

    let (decl, kind) = candidates[i];
    for supertype in &decl.supertypes {
        let Some(name) = supertype.qualified_name() else {
            continue;
        };
        // Only dependencies that are themselves phase-one candidates order
        // the build.
        if let Some(&dep) = index.get(name) {
            visit(dep, candidates, index, visited, ordered);
        }
    }

    ordered.push((decl, kind));
}
