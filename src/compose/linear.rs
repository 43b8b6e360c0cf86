//! Linear composition: joining facts at a shared entity

use super::filter::forms_no_cycle;
use super::types::Linear2;
use crate::graph::{EntityId, FactTable, RowId};
use std::collections::HashMap;

/// Compose 2-hop paths where a head's answer entity is a tail's question entity.
///
/// Pairs that repeat a fact, share a passage, or answer back into the head's
/// question entity are dropped. Rows with a null entity on the joining side
/// never enter the join. Passing the same rows as `heads` and `tails` is a
/// self-join; swapping the arguments switches which relation plays the head.
/// Output follows `heads` order, then `tails` order within each head.
pub fn compose_linear(table: &FactTable, heads: &[RowId], tails: &[RowId]) -> Vec<Linear2> {
    let index = EntityIndex::build(table, tails);
    let mut paths = Vec::new();

    for &head in heads {
        let Some(bridge) = table.fact(head).answer_entity.as_ref() else {
            continue;
        };

        for &tail in index.asking(bridge) {
            if forms_no_cycle(table, head, tail) {
                paths.push(Linear2 { head, tail });
            }
        }
    }

    paths
}

/// Index from question entity to the rows that ask about it
struct EntityIndex<'a> {
    by_question: HashMap<&'a EntityId, Vec<RowId>>,
}

impl<'a> EntityIndex<'a> {
    fn build(table: &'a FactTable, rows: &[RowId]) -> Self {
        let mut by_question: HashMap<&EntityId, Vec<RowId>> = HashMap::new();

        for &row in rows {
            if let Some(entity) = table.fact(row).question_entity.as_ref() {
                by_question.entry(entity).or_default().push(row);
            }
        }

        Self { by_question }
    }

    fn asking(&self, entity: &EntityId) -> &[RowId] {
        self.by_question
            .get(entity)
            .map(|rows| rows.as_slice())
            .unwrap_or(&[])
    }
}
