//! FactTable: the immutable relation every composition stage reads from

use super::fact::{Fact, FactId, PassageId};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors raised while building a fact table
#[derive(Debug, Error)]
pub enum FactTableError {
    #[error("fact {fact_id} carries conflicting passages '{first}' and '{second}'")]
    ConflictingPassage {
        fact_id: FactId,
        first: PassageId,
        second: PassageId,
    },
}

/// Position of a row inside a [`FactTable`]
///
/// Only minted by the table that owns the row, so lookups never go out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(usize);

impl RowId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The relation of single-hop facts for one corpus file
///
/// Rows are unique: a linker reporting the same entity twice in one document
/// collapses to a single row. Every row of one `fact_id` shares one passage.
#[derive(Debug, Clone, Default)]
pub struct FactTable {
    rows: Vec<Fact>,
}

impl FactTable {
    /// Build a table, dropping duplicate rows and rejecting inconsistent facts
    pub fn new(facts: impl IntoIterator<Item = Fact>) -> Result<Self, FactTableError> {
        let mut passages: HashMap<FactId, PassageId> = HashMap::new();
        let mut seen: HashSet<Fact> = HashSet::new();
        let mut rows = Vec::new();

        for fact in facts {
            match passages.get(&fact.fact_id) {
                Some(first) if first != &fact.passage_id => {
                    return Err(FactTableError::ConflictingPassage {
                        fact_id: fact.fact_id,
                        first: first.clone(),
                        second: fact.passage_id,
                    });
                }
                Some(_) => {}
                None => {
                    passages.insert(fact.fact_id, fact.passage_id.clone());
                }
            }

            if seen.insert(fact.clone()) {
                rows.push(fact);
            }
        }

        Ok(Self { rows })
    }

    /// Get the fact stored at a row
    pub fn fact(&self, row: RowId) -> &Fact {
        &self.rows[row.0]
    }

    /// Shorthand for `fact(row).fact_id`
    pub fn fact_id(&self, row: RowId) -> FactId {
        self.rows[row.0].fact_id
    }

    /// All row ids in insertion order
    pub fn row_ids(&self) -> Vec<RowId> {
        (0..self.rows.len()).map(RowId).collect()
    }

    /// Iterate rows with their ids
    pub fn iter(&self) -> impl Iterator<Item = (RowId, &Fact)> + '_ {
        self.rows.iter().enumerate().map(|(i, fact)| (RowId(i), fact))
    }

    pub fn facts(&self) -> &[Fact] {
        &self.rows
    }

    /// Number of rows (entity pairs)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct corpus entries with at least one row
    pub fn distinct_fact_count(&self) -> usize {
        self.rows
            .iter()
            .map(|fact| fact.fact_id)
            .collect::<HashSet<_>>()
            .len()
    }
}
