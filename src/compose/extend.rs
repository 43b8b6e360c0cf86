//! Path extension: gluing two paths at a shared fact

use super::types::{Entry, Exit, Glued};
use crate::graph::{FactId, FactTable};
use std::collections::HashMap;

/// Glue every `left` path to every `right` path whose first role is the same
/// fact as the left path's last role.
///
/// The join key is the fact id, not an entity: the shared role was already
/// proven joinable on both sides, so its two rows may carry different entity
/// pairs. No filtering happens here; each shape applies its own cycle and
/// passage checks to the result. Gluing a `Linear2` on the left with a
/// `Convergent2` on the right is the switched orientation that yields
/// `Convergent3b`.
pub fn extend<L, R>(table: &FactTable, left: &[L], right: &[R]) -> Vec<Glued<L, R>>
where
    L: Exit + Copy,
    R: Entry + Copy,
{
    let mut by_entry: HashMap<FactId, Vec<R>> = HashMap::new();
    for path in right {
        by_entry
            .entry(table.fact_id(path.entry()))
            .or_default()
            .push(*path);
    }

    let mut glued = Vec::new();
    for path in left {
        if let Some(continuations) = by_entry.get(&table.fact_id(path.exit())) {
            glued.extend(continuations.iter().map(|next| Glued {
                left: *path,
                right: *next,
            }));
        }
    }

    glued
}
