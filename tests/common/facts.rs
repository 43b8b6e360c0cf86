//! Fact table builders

use multihop::compose::{Path, Role};
use multihop::provenance::project;
use multihop::{EntityId, Fact, FactId, FactTable, PassageId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build a table from `(fact_id, question_entity, answer_entity, passage)` rows
pub fn table(rows: &[(usize, &str, &str, &str)]) -> FactTable {
    FactTable::new(
        rows.iter()
            .map(|&(id, q, a, p)| Fact::linked(id, q, a, p)),
    )
    .expect("fixture table is consistent")
}

/// Deduplicated fact-id tuples of a relation, as plain `usize` per role
pub fn fact_ids<P: Path>(table: &FactTable, paths: &[P]) -> Vec<Vec<(Role, usize)>> {
    project(table, paths)
        .iter()
        .map(|t| t.roles().iter().map(|&(r, id)| (r, id.index())).collect())
        .collect()
}

/// Shorthand for an expected tuple
pub fn tuple(roles: &[(Role, usize)]) -> Vec<(Role, usize)> {
    roles.to_vec()
}

/// A random table over a small entity vocabulary.
///
/// Each question gets one or two entity rows; roughly one entity in ten is
/// missing. Passages are a function of the fact id so the table is always
/// consistent, and several questions share a passage.
pub fn random_table(seed: u64, questions: usize, vocabulary: usize) -> FactTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let entity = |rng: &mut StdRng| -> Option<EntityId> {
        if rng.gen_bool(0.1) {
            None
        } else {
            Some(EntityId::from(format!("E{}", rng.gen_range(0..vocabulary))))
        }
    };

    let mut facts = Vec::new();
    for id in 0..questions {
        let passage = PassageId::from(format!("P{}", id % 7).as_str());
        for _ in 0..rng.gen_range(1..=2) {
            let question = entity(&mut rng);
            let answer = entity(&mut rng);
            facts.push(Fact::new(FactId::new(id), question, answer, passage.clone()));
        }
    }

    FactTable::new(facts).expect("random table is consistent")
}
