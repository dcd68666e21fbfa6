//! Declaration reading and descriptor construction.
//!
//! - `adapter`: the owned declaration model plus the syn-backed source
//!   reader; the only module that touches the host AST.
//! - `extract`: member-to-property extraction.
//! - `build`: per-declaration entity building and ancestor merging.
//! - `processor`: two-phase run orchestration over a whole batch.

pub mod adapter;
pub mod build;
pub mod extract;
pub mod processor;

pub use adapter::{ReadOutcome, SourceReader};
pub use build::BuildError;
pub use extract::ExtractError;
pub use processor::{ProcessOutcome, Processor, ProcessorOptions};
