//! Shape composition on small hand-built fact tables
//!
//! Each fixture pins one behaviour of the assembler: which pairings the
//! linear and convergent joins admit, and how far each glued shape's cycle
//! check reaches.

mod common;

use common::{fact_ids, table, tuple};
use multihop::compose::Role;
use multihop::{Shape, ShapeSet};

const CONVERGING: &[(usize, &str, &str, &str)] = &[
    (0, "E1", "E2", "P0"),
    (1, "E2", "E3", "P1"),
    (10, "E2", "E3", "Pt"),
    (11, "E1", "E2", "Ph1"),
    (12, "E9", "E2", "Ph2"),
];

#[test]
fn test_linear_pairs_over_shared_entity() {
    let t = table(CONVERGING);
    let shapes = ShapeSet::compose(&t);
    let linear2 = fact_ids(&t, &shapes.linear2);

    for (head, tail) in [(0, 1), (11, 10), (12, 10)] {
        assert!(
            linear2.contains(&tuple(&[(Role::Head, head), (Role::Tail, tail)])),
            "missing 2-hop ({head}, {tail})"
        );
    }
    // Nothing answers into E1 or E9, and nothing starts from E3.
    assert!(linear2
        .iter()
        .all(|row| ![1, 10].contains(&row[0].1) && ![0, 11, 12].contains(&row[1].1)));
}

#[test]
fn test_convergent_pairs_over_shared_tail() {
    let t = table(CONVERGING);
    let shapes = ShapeSet::compose(&t);
    let convergent2 = fact_ids(&t, &shapes.convergent2);

    let over_10_with_11_and_12 = convergent2
        .iter()
        .filter(|row| {
            **row == tuple(&[(Role::Head1, 11), (Role::Tail, 10), (Role::Head2, 12)])
        })
        .count();
    assert_eq!(over_10_with_11_and_12, 1);

    // 0 and 11 ask about the same entity.
    assert!(convergent2.iter().all(|row| {
        let heads = [row[0].1, row[2].1];
        !(heads.contains(&0) && heads.contains(&11))
    }));

    // Fact 1 is never a head: nothing it answers is asked about.
    assert!(convergent2.iter().all(|row| row[0].1 != 1 && row[2].1 != 1));

    // Each unordered head pair appears once per tail.
    assert!(convergent2.iter().all(|row| row[0].1 < row[2].1));
}

#[test]
fn test_three_hops_need_a_continuation() {
    let t = table(CONVERGING);
    assert!(ShapeSet::compose(&t).linear3.is_empty());

    let mut rows = CONVERGING.to_vec();
    rows.push((13, "E3", "E5", "P13"));
    let t = table(&rows);
    let shapes = ShapeSet::compose(&t);

    let linear3 = fact_ids(&t, &shapes.linear3);
    assert!(linear3.contains(&tuple(&[(Role::Head, 0), (Role::Mid, 1), (Role::Tail, 13)])));
    assert!(linear3.contains(&tuple(&[(Role::Head, 11), (Role::Mid, 10), (Role::Tail, 13)])));
    assert_eq!(linear3.len(), 6);
}

#[test]
fn test_convergent_extension_checks_both_heads() {
    let base = [
        (0, "Z1", "Z2", "PA"),
        (1, "Z3", "Z2", "PB"),
        (2, "Z2", "Z4", "PC"),
        (3, "Z4", "Z5", "PD"),
    ];
    let t = table(&base);
    let shapes = ShapeSet::compose(&t);
    assert_eq!(
        fact_ids(&t, &shapes.convergent3a),
        vec![tuple(&[
            (Role::Head1, 0),
            (Role::Mid, 2),
            (Role::Head2, 1),
            (Role::Tail, 3)
        ])]
    );

    // The tail now answers back into the second head's question entity.
    let mut returning = base;
    returning[3] = (3, "Z4", "Z3", "PD");
    let t = table(&returning);
    let shapes = ShapeSet::compose(&t);
    assert_eq!(shapes.row_count(Shape::Convergent2), 1);
    assert!(shapes.convergent3a.is_empty());
}

#[test]
fn test_switched_convergent_checks_head_against_tail_only() {
    // N shares H's passage but only sits in the second-head role.
    let t = table(&[
        (0, "W1", "W2", "PH"),
        (1, "W2", "W3", "PM"),
        (2, "W3", "W4", "PT"),
        (3, "W5", "W3", "PH"),
    ]);
    let shapes = ShapeSet::compose(&t);

    assert_eq!(
        fact_ids(&t, &shapes.convergent3b),
        vec![tuple(&[
            (Role::Head, 0),
            (Role::Mid, 1),
            (Role::Mid1, 1),
            (Role::Mid2, 3),
            (Role::Tail, 2)
        ])]
    );
}

#[test]
fn test_switched_convergent_enters_higher_head() {
    // 5 answers into 12, the second head of the (11, 12) pair over tail 10
    let mut rows = CONVERGING[2..].to_vec();
    rows.push((5, "E0", "E9", "P5"));
    let t = table(&rows);
    let shapes = ShapeSet::compose(&t);

    assert_eq!(
        fact_ids(&t, &shapes.convergent2),
        vec![tuple(&[(Role::Head1, 11), (Role::Tail, 10), (Role::Head2, 12)])]
    );
    assert_eq!(
        fact_ids(&t, &shapes.convergent3b),
        vec![tuple(&[
            (Role::Head, 5),
            (Role::Mid, 12),
            (Role::Mid1, 12),
            (Role::Mid2, 11),
            (Role::Tail, 10)
        ])]
    );

    // Entering the lower head instead yields the mirror image.
    rows.pop();
    rows.push((5, "E0", "E1", "P5"));
    let t = table(&rows);
    assert_eq!(
        fact_ids(&t, &ShapeSet::compose(&t).convergent3b),
        vec![tuple(&[
            (Role::Head, 5),
            (Role::Mid, 11),
            (Role::Mid1, 11),
            (Role::Mid2, 12),
            (Role::Tail, 10)
        ])]
    );
}

#[test]
fn test_switched_convergent_drops_return_to_head() {
    let t = table(&[
        (0, "W1", "W2", "PH"),
        (1, "W2", "W3", "PM"),
        (2, "W3", "W1", "PT"),
        (3, "W5", "W3", "PN"),
    ]);
    let shapes = ShapeSet::compose(&t);

    assert_eq!(shapes.row_count(Shape::Convergent2), 1);
    assert!(shapes.convergent3b.is_empty());
}

#[test]
fn test_four_hops_and_loop_through_first_interior() {
    let chain = [
        (0, "X1", "X2", "P0"),
        (1, "X2", "X3", "P1"),
        (2, "X3", "X4", "P2"),
        (3, "X4", "X5", "P3"),
    ];
    let t = table(&chain);
    let shapes = ShapeSet::compose(&t);
    assert_eq!(
        fact_ids(&t, &shapes.linear4),
        vec![tuple(&[
            (Role::Head, 0),
            (Role::Mid0, 1),
            (Role::Mid, 2),
            (Role::Tail, 3)
        ])]
    );

    // Returning to the first interior's question entity is a loop.
    let mut looping = chain;
    looping[3] = (3, "X4", "X2", "P3");
    let t = table(&looping);
    let shapes = ShapeSet::compose(&t);
    assert_eq!(
        fact_ids(&t, &shapes.linear3),
        vec![tuple(&[(Role::Head, 0), (Role::Mid, 1), (Role::Tail, 2)])]
    );
    assert!(shapes.linear4.is_empty());

    // Sharing the first interior's passage is a loop too.
    let mut same_passage = chain;
    same_passage[3] = (3, "X4", "X5", "P1");
    let t = table(&same_passage);
    assert!(ShapeSet::compose(&t).linear4.is_empty());
}
