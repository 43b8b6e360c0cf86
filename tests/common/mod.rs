//! Common test utilities for multihop integration tests
//!
//! Shared helpers for building fact tables, generating random tables, and
//! writing small corpora and lexicons to temporary directories.

#![allow(dead_code)]

pub mod corpus;
pub mod facts;

pub use corpus::{scenario_corpus, scenario_lexicon, write_corpus, write_lexicon};
pub use facts::{fact_ids, random_table, table, tuple};
