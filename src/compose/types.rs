//! Path types and role bookkeeping
//!
//! Every shape is a fixed struct of row references into a [`FactTable`].
//! Longer shapes are built by gluing two shorter paths at a shared fact, so
//! they are instances of [`Glued`] rather than new structs:
//!
//! ```text
//! Linear2       h ---> t
//! Convergent2   h1 ---> t <--- h2
//! Linear3       Glued<Linear2, Linear2>        h ---> m ---> t
//! Linear4       Glued<Linear3, Linear2>        h ---> m0 ---> m ---> t
//! Convergent3a  Glued<Convergent2, Linear2>    h1 ---> m <--- h2,  m ---> t
//! Convergent3b  Glued<Linear2, Convergent2>    h ---> m1 ---> t <--- m2
//! ```
//!
//! A `Convergent3b` may enter either head of its pair; the assembler glues
//! against both orientations (see [`Convergent2::mirrored`]).
//!
//! A glued role keeps both of its rows: the row it had as the tail of the left
//! path and the row it had as the head of the right path. Both rows share one
//! `fact_id` but may carry different entity pairs.

use crate::graph::{FactId, FactTable, RowId};

/// Positional role of a fact inside a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Head,
    Head1,
    Head2,
    Mid,
    Mid0,
    Mid1,
    Mid2,
    Tail,
}

impl Role {
    /// Short label used in debug dumps
    pub fn label(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Head1 => "head1",
            Self::Head2 => "head2",
            Self::Mid => "mid",
            Self::Mid0 => "mid0",
            Self::Mid1 => "mid1",
            Self::Mid2 => "mid2",
            Self::Tail => "tail",
        }
    }

    /// Column name used in restored output records
    pub fn column(self) -> &'static str {
        match self {
            Self::Head => "question_head",
            Self::Head1 => "question_head1",
            Self::Head2 => "question_head2",
            Self::Mid => "question_mid",
            Self::Mid0 => "question_mid0",
            Self::Mid1 => "question_mid1",
            Self::Mid2 => "question_mid2",
            Self::Tail => "question_tail",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A composed path whose roles can be enumerated
pub trait Path {
    /// Each role exactly once, in output order, with the row that introduced it
    fn roles(&self) -> Vec<(Role, RowId)>;

    /// Output columns of a restored record, in order
    ///
    /// Usually the roles themselves; a shape may add a column repeating
    /// another role's fact.
    fn columns(&self) -> Vec<(Role, RowId)> {
        self.roles()
    }

    /// Every row the path was built from, in output order
    ///
    /// A glued or shared role appears once per row it holds, so each join
    /// in the path can be read off its own rows.
    fn rows(&self) -> Vec<(Role, RowId)> {
        self.roles()
    }

    /// Row whose question entity is the path's source entity
    fn source(&self) -> RowId;

    /// Row whose answer entity is the path's sink entity
    fn sink(&self) -> RowId;

    /// Role -> fact id projection
    fn fact_ids(&self, table: &FactTable) -> Vec<(Role, FactId)> {
        self.roles()
            .into_iter()
            .map(|(role, row)| (role, table.fact_id(row)))
            .collect()
    }

    /// True when no two roles reference the same corpus entry
    fn has_distinct_facts(&self, table: &FactTable) -> bool {
        let ids = self.fact_ids(table);
        ids.iter()
            .enumerate()
            .all(|(i, (_, a))| ids[i + 1..].iter().all(|(_, b)| a != b))
    }
}

/// A path that can be glued on its last role
pub trait Exit {
    fn exit(&self) -> RowId;
}

/// A path that can be glued on its first role
pub trait Entry {
    fn entry(&self) -> RowId;
}

/// Two facts joined by entity: `head.answer_entity == tail.question_entity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Linear2 {
    pub head: RowId,
    pub tail: RowId,
}

impl Path for Linear2 {
    fn roles(&self) -> Vec<(Role, RowId)> {
        vec![(Role::Head, self.head), (Role::Tail, self.tail)]
    }

    fn source(&self) -> RowId {
        self.head
    }

    fn sink(&self) -> RowId {
        self.tail
    }
}

impl Exit for Linear2 {
    fn exit(&self) -> RowId {
        self.tail
    }
}

impl Entry for Linear2 {
    fn entry(&self) -> RowId {
        self.head
    }
}

/// Two 2-hop paths ending on the same tail fact
///
/// `tail1` and `tail2` are the tail rows of each branch; they share a `fact_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Convergent2 {
    pub head1: RowId,
    pub head2: RowId,
    pub tail1: RowId,
    pub tail2: RowId,
}

impl Convergent2 {
    /// The two branches as standalone 2-hop paths
    pub fn branches(&self) -> [Linear2; 2] {
        [
            Linear2 {
                head: self.head1,
                tail: self.tail1,
            },
            Linear2 {
                head: self.head2,
                tail: self.tail2,
            },
        ]
    }

    /// The same pair with its branches swapped
    pub fn mirrored(&self) -> Self {
        Self {
            head1: self.head2,
            head2: self.head1,
            tail1: self.tail2,
            tail2: self.tail1,
        }
    }
}

impl Path for Convergent2 {
    fn roles(&self) -> Vec<(Role, RowId)> {
        vec![
            (Role::Head1, self.head1),
            (Role::Tail, self.tail1),
            (Role::Head2, self.head2),
        ]
    }

    fn rows(&self) -> Vec<(Role, RowId)> {
        vec![
            (Role::Head1, self.head1),
            (Role::Tail, self.tail1),
            (Role::Tail, self.tail2),
            (Role::Head2, self.head2),
        ]
    }

    fn source(&self) -> RowId {
        self.head1
    }

    fn sink(&self) -> RowId {
        self.tail1
    }
}

impl Exit for Convergent2 {
    fn exit(&self) -> RowId {
        self.tail1
    }
}

impl Entry for Convergent2 {
    fn entry(&self) -> RowId {
        self.head1
    }
}

/// Two paths overlapping on one fact: the left's last role is the right's first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glued<L, R> {
    pub left: L,
    pub right: R,
}

impl<L: Entry, R> Entry for Glued<L, R> {
    fn entry(&self) -> RowId {
        self.left.entry()
    }
}

impl<L, R: Exit> Exit for Glued<L, R> {
    fn exit(&self) -> RowId {
        self.right.exit()
    }
}

pub type Linear3 = Glued<Linear2, Linear2>;
pub type Linear4 = Glued<Linear3, Linear2>;
pub type Convergent3a = Glued<Convergent2, Linear2>;
pub type Convergent3b = Glued<Linear2, Convergent2>;

impl Linear3 {
    pub fn head(&self) -> RowId {
        self.left.head
    }

    /// Both rows of the glued middle fact
    pub fn mid(&self) -> [RowId; 2] {
        [self.left.tail, self.right.head]
    }

    pub fn tail(&self) -> RowId {
        self.right.tail
    }
}

impl Path for Linear3 {
    fn roles(&self) -> Vec<(Role, RowId)> {
        vec![
            (Role::Head, self.head()),
            (Role::Mid, self.left.tail),
            (Role::Tail, self.tail()),
        ]
    }

    fn rows(&self) -> Vec<(Role, RowId)> {
        let [mid, next] = self.mid();
        vec![
            (Role::Head, self.head()),
            (Role::Mid, mid),
            (Role::Mid, next),
            (Role::Tail, self.tail()),
        ]
    }

    fn source(&self) -> RowId {
        self.head()
    }

    fn sink(&self) -> RowId {
        self.tail()
    }
}

impl Linear4 {
    pub fn head(&self) -> RowId {
        self.left.head()
    }

    /// Both rows of the first interior fact
    pub fn mid0(&self) -> [RowId; 2] {
        self.left.mid()
    }

    /// Both rows of the second interior fact
    pub fn mid(&self) -> [RowId; 2] {
        [self.left.tail(), self.right.head]
    }

    pub fn tail(&self) -> RowId {
        self.right.tail
    }
}

impl Path for Linear4 {
    fn roles(&self) -> Vec<(Role, RowId)> {
        vec![
            (Role::Head, self.head()),
            (Role::Mid0, self.left.left.tail),
            (Role::Mid, self.left.tail()),
            (Role::Tail, self.tail()),
        ]
    }

    fn rows(&self) -> Vec<(Role, RowId)> {
        let [mid0, mid0_next] = self.mid0();
        let [mid, mid_next] = self.mid();
        vec![
            (Role::Head, self.head()),
            (Role::Mid0, mid0),
            (Role::Mid0, mid0_next),
            (Role::Mid, mid),
            (Role::Mid, mid_next),
            (Role::Tail, self.tail()),
        ]
    }

    fn source(&self) -> RowId {
        self.head()
    }

    fn sink(&self) -> RowId {
        self.tail()
    }
}

impl Convergent3a {
    pub fn head1(&self) -> RowId {
        self.left.head1
    }

    pub fn head2(&self) -> RowId {
        self.left.head2
    }

    /// The shared fact: both branch tail rows plus the row it continues with
    pub fn mid(&self) -> [RowId; 3] {
        [self.left.tail1, self.left.tail2, self.right.head]
    }

    pub fn tail(&self) -> RowId {
        self.right.tail
    }
}

impl Path for Convergent3a {
    fn roles(&self) -> Vec<(Role, RowId)> {
        vec![
            (Role::Head1, self.head1()),
            (Role::Mid, self.left.tail1),
            (Role::Head2, self.head2()),
            (Role::Tail, self.tail()),
        ]
    }

    fn rows(&self) -> Vec<(Role, RowId)> {
        let [mid1, mid2, next] = self.mid();
        vec![
            (Role::Head1, self.head1()),
            (Role::Mid, mid1),
            (Role::Mid, mid2),
            (Role::Mid, next),
            (Role::Head2, self.head2()),
            (Role::Tail, self.tail()),
        ]
    }

    fn source(&self) -> RowId {
        self.head1()
    }

    fn sink(&self) -> RowId {
        self.tail()
    }
}

impl Convergent3b {
    pub fn head(&self) -> RowId {
        self.left.head
    }

    /// Both rows of the junction fact (linear tail, first fork head)
    pub fn mid1(&self) -> [RowId; 2] {
        [self.left.tail, self.right.head1]
    }

    /// Head of the second fork branch
    pub fn mid2(&self) -> RowId {
        self.right.head2
    }

    pub fn tail(&self) -> RowId {
        self.right.tail1
    }
}

impl Path for Convergent3b {
    fn roles(&self) -> Vec<(Role, RowId)> {
        vec![
            (Role::Head, self.head()),
            (Role::Mid1, self.left.tail),
            (Role::Mid2, self.mid2()),
            (Role::Tail, self.tail()),
        ]
    }

    /// `question_mid` repeats the junction fact ahead of `question_mid1`
    fn columns(&self) -> Vec<(Role, RowId)> {
        vec![
            (Role::Head, self.head()),
            (Role::Mid, self.left.tail),
            (Role::Mid1, self.left.tail),
            (Role::Mid2, self.mid2()),
            (Role::Tail, self.tail()),
        ]
    }

    fn rows(&self) -> Vec<(Role, RowId)> {
        let [mid1, next] = self.mid1();
        vec![
            (Role::Head, self.head()),
            (Role::Mid1, mid1),
            (Role::Mid1, next),
            (Role::Mid2, self.mid2()),
            (Role::Tail, self.right.tail1),
            (Role::Tail, self.right.tail2),
        ]
    }

    fn source(&self) -> RowId {
        self.head()
    }

    fn sink(&self) -> RowId {
        self.tail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Fact;

    fn table() -> FactTable {
        FactTable::new(vec![
            Fact::linked(0, "A", "B", "p0"),
            Fact::linked(1, "B", "C", "p1"),
            Fact::linked(1, "X", "C", "p1"),
            Fact::linked(2, "C", "D", "p2"),
            Fact::linked(3, "D", "E", "p3"),
        ])
        .unwrap()
    }

    #[test]
    fn test_role_columns() {
        assert_eq!(Role::Head.column(), "question_head");
        assert_eq!(Role::Mid0.column(), "question_mid0");
        assert_eq!(Role::Head2.to_string(), "head2");
    }

    #[test]
    fn test_linear3_roles_and_mid_rows() {
        let t = table();
        let r = t.row_ids();
        let path: Linear3 = Glued {
            left: Linear2 { head: r[0], tail: r[1] },
            right: Linear2 { head: r[2], tail: r[3] },
        };

        let ids: Vec<usize> = path
            .fact_ids(&t)
            .into_iter()
            .map(|(_, id)| id.index())
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(path.mid(), [r[1], r[2]]);
        assert_eq!(path.entry(), r[0]);
        assert_eq!(path.exit(), r[3]);
        assert!(path.has_distinct_facts(&t));
    }

    #[test]
    fn test_linear4_exposes_both_interior_roles() {
        let t = table();
        let r = t.row_ids();
        let path: Linear4 = Glued {
            left: Glued {
                left: Linear2 { head: r[0], tail: r[1] },
                right: Linear2 { head: r[1], tail: r[3] },
            },
            right: Linear2 { head: r[3], tail: r[4] },
        };

        let roles: Vec<Role> = path.roles().into_iter().map(|(role, _)| role).collect();
        assert_eq!(roles, vec![Role::Head, Role::Mid0, Role::Mid, Role::Tail]);
        assert_eq!(path.mid0(), [r[1], r[1]]);
        assert_eq!(path.sink(), r[4]);
    }

    #[test]
    fn test_convergent_lists_shared_tail_once() {
        let t = table();
        let r = t.row_ids();
        let pair = Convergent2 {
            head1: r[0],
            head2: r[3],
            tail1: r[1],
            tail2: r[2],
        };

        assert_eq!(pair.roles().len(), 3);
        assert!(pair.has_distinct_facts(&t));
        assert_eq!(pair.branches()[1], Linear2 { head: r[3], tail: r[2] });
    }

    #[test]
    fn test_repeated_fact_detected() {
        let t = table();
        let r = t.row_ids();
        let path: Convergent3b = Glued {
            left: Linear2 { head: r[0], tail: r[1] },
            right: Convergent2 {
                head1: r[2],
                head2: r[0],
                tail1: r[3],
                tail2: r[3],
            },
        };

        assert!(!path.has_distinct_facts(&t));
    }
}
