//! Provenance restoration: composed paths back to full corpus records.

pub mod restore;
pub mod types;

pub use restore::{
    debug_rows, debug_shape, project, restore, restore_paths, restore_shape, ProvenanceError,
};
pub use types::{DebugRow, FactTuple, RestoredRecord};
