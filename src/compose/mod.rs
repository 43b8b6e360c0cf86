//! Composition of single-hop facts into multi-hop paths
//!
//! Provides the linear (entity) join, the convergent (shared tail) join,
//! the fact-glue extender, and the assembler that runs them in order.

mod convergent;
mod extend;
mod filter;
mod linear;
mod shape;
mod types;

pub use convergent::compose_convergent;
pub use extend::extend;
pub use filter::{entities_differ, forms_no_cycle, forms_no_loop, heads_distinct};
pub use linear::compose_linear;
pub use shape::{Shape, ShapeSet};
pub use types::{
    Convergent2, Convergent3a, Convergent3b, Entry, Exit, Glued, Linear2, Linear3, Linear4, Path,
    Role,
};
