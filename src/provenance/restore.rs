//! Provenance restoration: deduplicate composed paths and resolve corpus records

use super::types::{DebugRow, FactTuple, RestoredRecord};
use crate::compose::{Path, Shape, ShapeSet};
use crate::graph::{FactId, FactTable};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while mapping fact ids back to corpus records
#[derive(Debug, Error)]
pub enum ProvenanceError {
    #[error("{role} references question {fact_id} but the corpus has {corpus_len} entries")]
    UnknownFact {
        role: &'static str,
        fact_id: FactId,
        corpus_len: usize,
    },
}

/// Project paths to role -> fact id tuples, keeping the first of each duplicate.
///
/// Paths built from different entity rows of the same facts collapse here,
/// before any corpus text is touched.
pub fn project<P: Path>(table: &FactTable, paths: &[P]) -> Vec<FactTuple> {
    let mut seen: HashSet<FactTuple> = HashSet::new();
    let mut tuples = Vec::new();

    for path in paths {
        let tuple = FactTuple(
            path.columns()
                .into_iter()
                .map(|(role, row)| (role, table.fact_id(row)))
                .collect(),
        );
        if seen.insert(tuple.clone()) {
            tuples.push(tuple);
        }
    }

    tuples
}

/// Resolve every role of every tuple to its corpus record by index
pub fn restore<'c>(
    tuples: &[FactTuple],
    records: &'c [Value],
) -> Result<Vec<RestoredRecord<'c>>, ProvenanceError> {
    tuples
        .iter()
        .map(|tuple| {
            let fields = tuple
                .roles()
                .iter()
                .map(|&(role, fact_id)| {
                    records
                        .get(fact_id.index())
                        .map(|record| (role, record))
                        .ok_or(ProvenanceError::UnknownFact {
                            role: role.column(),
                            fact_id,
                            corpus_len: records.len(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RestoredRecord { fields })
        })
        .collect()
}

/// Deduplicate and restore one relation
pub fn restore_paths<'c, P: Path>(
    table: &FactTable,
    paths: &[P],
    records: &'c [Value],
) -> Result<Vec<RestoredRecord<'c>>, ProvenanceError> {
    restore(&project(table, paths), records)
}

/// Deduplicate and restore the relation of one shape
pub fn restore_shape<'c>(
    shapes: &ShapeSet,
    shape: Shape,
    table: &FactTable,
    records: &'c [Value],
) -> Result<Vec<RestoredRecord<'c>>, ProvenanceError> {
    match shape {
        Shape::Linear2 => restore_paths(table, &shapes.linear2, records),
        Shape::Convergent2 => restore_paths(table, &shapes.convergent2, records),
        Shape::Linear3 => restore_paths(table, &shapes.linear3, records),
        Shape::Convergent3a => restore_paths(table, &shapes.convergent3a, records),
        Shape::Convergent3b => restore_paths(table, &shapes.convergent3b, records),
        Shape::Linear4 => restore_paths(table, &shapes.linear4, records),
    }
}

/// Pre-restoration rows of one relation, one per composed path
///
/// Each row lists every fact row the path holds, so glued roles and the
/// shared tail of a convergent pair show both of their entity pairs.
pub fn debug_rows<'t, P: Path>(table: &'t FactTable, paths: &[P]) -> Vec<DebugRow<'t>> {
    paths
        .iter()
        .map(|path| DebugRow {
            fields: path
                .rows()
                .into_iter()
                .map(|(role, row)| (role, table.fact(row)))
                .collect(),
        })
        .collect()
}

/// Pre-restoration rows of one shape
pub fn debug_shape<'t>(shapes: &ShapeSet, shape: Shape, table: &'t FactTable) -> Vec<DebugRow<'t>> {
    match shape {
        Shape::Linear2 => debug_rows(table, &shapes.linear2),
        Shape::Convergent2 => debug_rows(table, &shapes.convergent2),
        Shape::Linear3 => debug_rows(table, &shapes.linear3),
        Shape::Convergent3a => debug_rows(table, &shapes.convergent3a),
        Shape::Convergent3b => debug_rows(table, &shapes.convergent3b),
        Shape::Linear4 => debug_rows(table, &shapes.linear4),
    }
}
