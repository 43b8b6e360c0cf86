//! Shape assembly: the fixed pipeline producing all six path topologies

use super::convergent::compose_convergent;
use super::extend::extend;
use super::filter::{forms_no_cycle, forms_no_loop};
use super::linear::compose_linear;
use super::types::{Convergent2, Convergent3a, Convergent3b, Linear2, Linear3, Linear4, Path};
use crate::graph::FactTable;
use tracing::debug;

/// The six path topologies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `0--->0`
    Linear2,
    /// `0--->0<---0`
    Convergent2,
    /// `0--->0--->0`
    Linear3,
    /// `0--->0--->0<---0`
    Convergent3a,
    /// A linear hop into either head of a convergent pair
    Convergent3b,
    /// `0--->0--->0--->0`
    Linear4,
}

impl Shape {
    /// Every shape, in assembly order
    pub const ALL: [Shape; 6] = [
        Shape::Linear2,
        Shape::Convergent2,
        Shape::Linear3,
        Shape::Convergent3a,
        Shape::Convergent3b,
        Shape::Linear4,
    ];

    /// Name used in output file names
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear2 => "2hop",
            Self::Convergent2 => "2hop_with_adjacent_head",
            Self::Linear3 => "3hop",
            Self::Convergent3a => "3hop_with_adjacent_head",
            Self::Convergent3b => "3hop_with_adjacent_head2",
            Self::Linear4 => "4hop",
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// All composed relations for one fact table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeSet {
    pub linear2: Vec<Linear2>,
    pub convergent2: Vec<Convergent2>,
    pub linear3: Vec<Linear3>,
    pub convergent3a: Vec<Convergent3a>,
    pub convergent3b: Vec<Convergent3b>,
    pub linear4: Vec<Linear4>,
}

impl ShapeSet {
    /// Run the full assembly pipeline.
    ///
    /// 1. `Linear2`: entity self-join of the table
    /// 2. `Convergent2`: `Linear2` pairs sharing a tail fact
    /// 3. `Linear3`: `Linear2` glued to `Linear2`, cycle-checked head vs tail
    /// 4. `Convergent3a`: `Convergent2` glued to `Linear2`, cycle-checked from both heads
    /// 5. `Convergent3b`: `Linear2` glued to either head of a `Convergent2`,
    ///    cycle-checked head vs tail
    /// 6. `Linear4`: `Linear3` glued to `Linear2`, cycle-checked head vs tail and
    ///    from both rows of `mid0`
    ///
    /// Any row whose roles repeat a fact is dropped as well.
    pub fn compose(table: &FactTable) -> Self {
        let rows = table.row_ids();

        let linear2 = compose_linear(table, &rows, &rows);
        debug!(shape = %Shape::Linear2, rows = linear2.len(), "composed");

        let convergent2 = compose_convergent(table, &linear2);
        debug!(shape = %Shape::Convergent2, rows = convergent2.len(), "composed");

        let linear3 = retain(table, Shape::Linear3, extend(table, &linear2, &linear2), |p| {
            forms_no_cycle(table, p.head(), p.tail())
        });

        let convergent3a = retain(
            table,
            Shape::Convergent3a,
            extend(table, &convergent2, &linear2),
            |p| forms_no_cycle(table, p.head1(), p.tail()) && forms_no_cycle(table, p.head2(), p.tail()),
        );

        // Pairs are stored once, so the hop may enter head1 or head2.
        let forks: Vec<Convergent2> = convergent2
            .iter()
            .flat_map(|pair| [*pair, pair.mirrored()])
            .collect();
        let convergent3b = retain(
            table,
            Shape::Convergent3b,
            extend(table, &linear2, &forks),
            |p| forms_no_cycle(table, p.head(), p.tail()),
        );

        let linear4 = retain(table, Shape::Linear4, extend(table, &linear3, &linear2), |p| {
            forms_no_cycle(table, p.head(), p.tail()) && forms_no_loop(table, &p.mid0(), p.tail())
        });

        Self {
            linear2,
            convergent2,
            linear3,
            convergent3a,
            convergent3b,
            linear4,
        }
    }

    /// Number of composed rows for a shape (before deduplication)
    pub fn row_count(&self, shape: Shape) -> usize {
        match shape {
            Shape::Linear2 => self.linear2.len(),
            Shape::Convergent2 => self.convergent2.len(),
            Shape::Linear3 => self.linear3.len(),
            Shape::Convergent3a => self.convergent3a.len(),
            Shape::Convergent3b => self.convergent3b.len(),
            Shape::Linear4 => self.linear4.len(),
        }
    }
}

/// Keep glued candidates that pass the shape filter and use each fact once
fn retain<P: Path>(
    table: &FactTable,
    shape: Shape,
    candidates: Vec<P>,
    keep: impl Fn(&P) -> bool,
) -> Vec<P> {
    let candidate_count = candidates.len();
    let kept: Vec<P> = candidates
        .into_iter()
        .filter(|path| keep(path) && path.has_distinct_facts(table))
        .collect();

    debug!(
        shape = %shape,
        candidates = candidate_count,
        rows = kept.len(),
        "composed"
    );
    kept
}
