//! Core fact data structures

mod fact;
mod table;


pub use fact::{EntityId, Fact, FactId, PassageId};
pub use table::{FactTable, FactTableError, RowId};
