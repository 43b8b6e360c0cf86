//! Cycle and degeneracy filters applied between composition stages
//!
//! Filter scope differs by shape and is kept exactly that way:
//! most shapes compare the new tail against the head role(s) only, while
//! `Linear4` additionally checks its first interior role (see `forms_no_loop`).

use crate::graph::{EntityId, FactTable, RowId};

/// Entity inequality where a missing entity never equals anything
pub fn entities_differ(a: Option<&EntityId>, b: Option<&EntityId>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a != b,
        _ => true,
    }
}

/// Head and tail are different questions from different passages, and the
/// tail does not answer back into the head's question entity.
pub fn forms_no_cycle(table: &FactTable, head: RowId, tail: RowId) -> bool {
    let head = table.fact(head);
    let tail = table.fact(tail);

    head.fact_id != tail.fact_id
        && entities_differ(tail.answer_entity.as_ref(), head.question_entity.as_ref())
        && head.passage_id != tail.passage_id
}

/// Every row of an interior role passes the cycle check against the tail
pub fn forms_no_loop(table: &FactTable, interior: &[RowId], tail: RowId) -> bool {
    interior.iter().all(|&row| forms_no_cycle(table, row, tail))
}

/// Two convergent heads are genuinely different questions
pub fn heads_distinct(table: &FactTable, head1: RowId, head2: RowId) -> bool {
    let a = table.fact(head1);
    let b = table.fact(head2);

    a.fact_id != b.fact_id
        && entities_differ(a.question_entity.as_ref(), b.question_entity.as_ref())
        && a.passage_id != b.passage_id
}
