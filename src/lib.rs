//! Multihop: composable multi-hop questions from single-hop QA corpora
//!
//! Questions whose answers are linked to knowledge-base entities become
//! facts `(question entity) -> (answer entity)`. Facts are chained through
//! shared entities into multi-hop paths of six fixed shapes, and every path
//! is written back out as the full corpus records it was built from.
//!
//! # Core Concepts
//!
//! - **Facts**: one row per (question entity, answer entity) pair of a question
//! - **Shapes**: linear chains of 2-4 hops and convergent pairs sharing a tail
//! - **Provenance**: composed paths deduplicated on fact ids, then restored
//!
//! # Example
//!
//! ```
//! use multihop::{Fact, FactTable, Shape, ShapeSet};
//!
//! let table = FactTable::new(vec![
//!     Fact::linked(0, "Q103569", "Q56005", "P0"),
//!     Fact::linked(1, "Q56005", "Q215609", "P1"),
//! ])
//! .unwrap();
//! let shapes = ShapeSet::compose(&table);
//! assert_eq!(shapes.row_count(Shape::Linear2), 1);
//! ```

pub mod compose;
pub mod config;
pub mod corpus;
mod graph;
pub mod linking;
pub mod pipeline;
pub mod provenance;

pub use compose::{Role, Shape, ShapeSet};
pub use config::{Config, ConfigError, LinkerConfig, Overrides};
pub use corpus::{Corpus, CorpusError, QaEntry};
pub use graph::{EntityId, Fact, FactId, FactTable, FactTableError, PassageId, RowId};
pub use linking::{
    build_linker, CommandLinker, EntityLinker, LexiconEntry, LexiconLinker, LinkError,
    LinkedMention, MockLinker,
};
pub use pipeline::{
    run_fact_file, run_file, run_files, CancellationToken, FileOutcome, FileReport,
    PipelineError, WorkerOptions,
};
pub use provenance::{ProvenanceError, RestoredRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
