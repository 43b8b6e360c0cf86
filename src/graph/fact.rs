//! Fact representation: one single-hop edge between linked entities

use serde::{Deserialize, Serialize};

/// Index of a question in its corpus file (line position)
///
/// Serializes as a plain integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactId(usize);

impl FactId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the owning entry in the corpus
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for FactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for FactId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Identifier of a disambiguated real-world entity
///
/// Serializes as a plain string (e.g. a Wikidata QID like "Q90").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Identifier of the passage a question was written from
///
/// Corpora use either integer or string ids; both round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PassageId {
    Int(i64),
    Str(String),
}

impl std::fmt::Display for PassageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{}", id),
            Self::Str(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for PassageId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<i64> for PassageId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

/// A single-hop fact: a question entity linked to an answer entity
///
/// One corpus entry with k question entities and m answer entities yields
/// k x m facts that all share the entry's `fact_id`. The serialized field
/// names follow the fact record format (`question`, `passage`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
    /// Owning corpus entry
    #[serde(rename = "question")]
    pub fact_id: FactId,
    /// Entity mentioned in the question, if any was linked
    #[serde(default)]
    pub question_entity: Option<EntityId>,
    /// Entity mentioned in the answer, if any was linked
    #[serde(default)]
    pub answer_entity: Option<EntityId>,
    /// Source passage of the question
    #[serde(rename = "passage")]
    pub passage_id: PassageId,
}

impl Fact {
    pub fn new(
        fact_id: impl Into<FactId>,
        question_entity: Option<EntityId>,
        answer_entity: Option<EntityId>,
        passage_id: PassageId,
    ) -> Self {
        Self {
            fact_id: fact_id.into(),
            question_entity,
            answer_entity,
            passage_id,
        }
    }

    /// Shorthand for a fully linked fact
    pub fn linked(
        fact_id: usize,
        question_entity: impl Into<EntityId>,
        answer_entity: impl Into<EntityId>,
        passage_id: impl Into<PassageId>,
    ) -> Self {
        Self::new(
            fact_id,
            Some(question_entity.into()),
            Some(answer_entity.into()),
            passage_id.into(),
        )
    }
}
