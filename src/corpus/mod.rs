//! Question-answer corpus: JSON-lines records and their linkable view
//!
//! Each line of a corpus file is one single-hop question with its answers and
//! the passage it was drawn from. The line position is the question's fact id.
//! Records are kept verbatim so output rows can embed them unchanged.

mod jsonl;

pub use jsonl::{read_jsonl, write_jsonl};

use crate::graph::{FactId, PassageId};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading or writing corpus files
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}:{line}: malformed JSON: {source}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("{path}:{line}: {reason}")]
    InvalidRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for corpus operations
pub type CorpusResult<T> = Result<T, CorpusError>;

/// Passage reference as it appears under `passage` or inside `passages`
#[derive(Deserialize)]
#[serde(untagged)]
enum PassageRef {
    Object { id: PassageId },
    Bare(PassageId),
}

impl PassageRef {
    fn into_id(self) -> PassageId {
        match self {
            PassageRef::Object { id } | PassageRef::Bare(id) => id,
        }
    }
}

#[derive(Deserialize)]
struct RawEntry {
    question: String,
    #[serde(default)]
    answers: Vec<String>,
    #[serde(default)]
    passage_id: Option<PassageId>,
    #[serde(default)]
    passage: Option<PassageRef>,
    #[serde(default)]
    passages: Vec<PassageRef>,
}

/// The linkable view of one corpus record.
#[derive(Debug, Clone, PartialEq)]
pub struct QaEntry {
    pub fact_id: FactId,
    pub question: String,
    pub answers: Vec<String>,
    pub passage_id: PassageId,
}

impl QaEntry {
    /// Parse a corpus record found at `fact_id`.
    ///
    /// The passage id is taken from `passage_id`, then `passage` (an object
    /// with an `id` or a bare id), then the first element of `passages`.
    pub fn from_value(fact_id: FactId, value: &Value) -> Result<Self, String> {
        let raw = RawEntry::deserialize(value).map_err(|e| e.to_string())?;

        let passage_id = raw
            .passage_id
            .or_else(|| raw.passage.map(PassageRef::into_id))
            .or_else(|| raw.passages.into_iter().next().map(PassageRef::into_id))
            .ok_or_else(|| "record has no passage id".to_string())?;

        Ok(Self {
            fact_id,
            question: raw.question,
            answers: raw.answers,
            passage_id,
        })
    }

    /// All answers as one document for the linker
    pub fn answer_document(&self) -> String {
        self.answers.join(" , ")
    }
}

/// A loaded corpus: raw records plus their parsed entries, index-aligned.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<Value>,
    entries: Vec<QaEntry>,
}

impl Corpus {
    /// Read and parse a corpus file
    pub fn load(path: &Path) -> CorpusResult<Self> {
        let records = read_jsonl(path)?;
        Self::from_values(path, records)
    }

    /// Parse already-read records; `path` is only used for error messages.
    pub fn from_values(path: &Path, records: Vec<Value>) -> CorpusResult<Self> {
        let entries = records
            .iter()
            .enumerate()
            .map(|(i, value)| {
                QaEntry::from_value(FactId::new(i), value).map_err(|reason| {
                    CorpusError::InvalidRecord {
                        path: path.to_path_buf(),
                        line: i + 1,
                        reason,
                    }
                })
            })
            .collect::<CorpusResult<Vec<_>>>()?;

        Ok(Self { records, entries })
    }

    pub fn records(&self) -> &[Value] {
        &self.records
    }

    pub fn entries(&self) -> &[QaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Prefix for a file's outputs: its name without the final extension
pub fn output_prefix(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_passage_id_variants() {
        let direct = json!({"question": "q", "answers": ["a"], "passage_id": "P1"});
        let object = json!({"question": "q", "answers": ["a"], "passage": {"id": 7, "title": "T"}});
        let bare = json!({"question": "q", "answers": ["a"], "passage": "P3"});
        let listed = json!({"question": "q", "answers": ["a"], "passages": [{"id": "P4"}, {"id": "P5"}]});

        let id = |v: &Value| QaEntry::from_value(FactId::new(0), v).unwrap().passage_id;
        assert_eq!(id(&direct), PassageId::from("P1"));
        assert_eq!(id(&object), PassageId::from(7));
        assert_eq!(id(&bare), PassageId::from("P3"));
        assert_eq!(id(&listed), PassageId::from("P4"));
    }

    #[test]
    fn test_missing_passage_is_invalid() {
        let records = vec![
            json!({"question": "q", "answers": [], "passage_id": "P0"}),
            json!({"question": "q", "answers": []}),
        ];

        let err = Corpus::from_values(Path::new("c.jsonl"), records).unwrap_err();
        match err {
            CorpusError::InvalidRecord { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("passage"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_answers_joined_for_linking() {
        let value = json!({"question": "Who wrote it?", "answers": ["Voltaire", "Arouet"], "passage_id": 1});
        let entry = QaEntry::from_value(FactId::new(3), &value).unwrap();

        assert_eq!(entry.fact_id, FactId::new(3));
        assert_eq!(entry.answer_document(), "Voltaire , Arouet");
    }

    #[test]
    fn test_records_kept_verbatim() {
        let records = vec![json!({"question": "q", "answers": ["a"], "passage_id": "P0", "extra": {"k": 1}})];
        let corpus = Corpus::from_values(Path::new("c.jsonl"), records.clone()).unwrap();

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.records(), records.as_slice());
        assert_eq!(corpus.entries()[0].question, "q");
    }

    #[test]
    fn test_output_prefix() {
        assert_eq!(output_prefix(Path::new("/data/dev_split.jsonl")), "dev_split");
        assert_eq!(output_prefix(Path::new("train")), "train");
    }
}
