//! Convergent composition: two 2-hop paths funneling into one tail fact

use super::filter::heads_distinct;
use super::types::{Convergent2, Linear2};
use crate::graph::{FactId, FactTable};
use std::collections::HashMap;

/// Pair up 2-hop paths that end on the same tail fact.
///
/// The heads of a pair must differ in fact, question entity and passage. Each
/// unordered pair of branches is emitted once with `head1.fact_id <
/// head2.fact_id`, and the result is ordered by `(head1.fact_id,
/// head2.fact_id)`; ties keep input order.
pub fn compose_convergent(table: &FactTable, paths: &[Linear2]) -> Vec<Convergent2> {
    let mut by_tail: HashMap<FactId, Vec<&Linear2>> = HashMap::new();
    for path in paths {
        by_tail.entry(table.fact_id(path.tail)).or_default().push(path);
    }

    let mut pairs = Vec::new();
    for first in paths {
        let Some(siblings) = by_tail.get(&table.fact_id(first.tail)) else {
            continue;
        };

        for second in siblings {
            if table.fact_id(first.head) < table.fact_id(second.head)
                && heads_distinct(table, first.head, second.head)
            {
                pairs.push(Convergent2 {
                    head1: first.head,
                    head2: second.head,
                    tail1: first.tail,
                    tail2: second.tail,
                });
            }
        }
    }

    pairs.sort_by_key(|pair| (table.fact_id(pair.head1), table.fact_id(pair.head2)));
    pairs
}
