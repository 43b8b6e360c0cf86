//! Entity linking: turning corpus questions and answers into facts
//!
//! Defines the linker trait and the fact builder that drives it.
//! Implementations:
//! - `LexiconLinker`: gazetteer lookup over a surface-form lexicon (offline)
//! - `CommandLinker`: pipes document batches to an external program
//! - `MockLinker`: returns preconfigured links (testing)

mod command;
mod lexicon;

pub use command::CommandLinker;
pub use lexicon::{LexiconEntry, LexiconLinker};

use crate::config::LinkerConfig;
use crate::corpus::Corpus;
use crate::graph::{EntityId, Fact, FactTable, FactTableError};
use crate::pipeline::CancellationToken;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// One resolved entity mention in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedMention {
    /// Stable entity identifier (e.g. a Wikidata QID)
    pub id: String,
    /// Canonical entity title, when the linker knows it
    #[serde(default)]
    pub title: Option<String>,
    /// Surface text as it appeared in the document
    #[serde(default)]
    pub mention: String,
    /// Entity type label (e.g. `PERSON`)
    #[serde(default)]
    pub label: Option<String>,
}

impl LinkedMention {
    pub fn new(id: impl Into<String>, mention: impl Into<String>) -> Self {
        let mention: String = mention.into();
        Self {
            id: id.into(),
            title: None,
            mention: clean_mention(&mention),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Errors from entity linking.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("linker not available: {0}")]
    Unavailable(String),
    #[error("invocation failed: {0}")]
    InvocationFailed(String),
    #[error("response parse error: {0}")]
    ParseError(String),
    #[error("lexicon error: {0}")]
    Lexicon(String),
    #[error("linker returned {got} results for {expected} documents")]
    CountMismatch { expected: usize, got: usize },
    #[error("linking cancelled")]
    Cancelled,
    #[error(transparent)]
    Table(#[from] FactTableError),
}

/// Linker trait over a batch of documents.
///
/// Returns one mention list per input document, in input order.
/// Unresolved mentions are simply absent.
#[async_trait]
pub trait EntityLinker: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    async fn link(&self, documents: &[String]) -> Result<Vec<Vec<LinkedMention>>, LinkError>;
}

/// Trim a mention and collapse internal runs of whitespace to one space
pub fn clean_mention(mention: &str) -> String {
    mention.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build the linker a configuration selects
pub fn build_linker(config: &LinkerConfig) -> Result<Arc<dyn EntityLinker>, LinkError> {
    match config {
        LinkerConfig::Lexicon { path } => Ok(Arc::new(LexiconLinker::load(path)?)),
        LinkerConfig::Command { program, args } => {
            Ok(Arc::new(CommandLinker::new(program.clone(), args.clone())))
        }
    }
}

async fn link_checked(
    linker: &dyn EntityLinker,
    documents: &[String],
) -> Result<Vec<Vec<LinkedMention>>, LinkError> {
    let results = linker.link(documents).await?;
    if results.len() != documents.len() {
        return Err(LinkError::CountMismatch {
            expected: documents.len(),
            got: results.len(),
        });
    }
    Ok(results)
}

fn entity_ids(mentions: Vec<LinkedMention>, fact: usize) -> Vec<EntityId> {
    mentions
        .into_iter()
        .filter_map(|m| {
            if m.id.trim().is_empty() {
                warn!(fact, mention = %m.mention, "linker returned an empty entity id, dropping");
                None
            } else {
                Some(EntityId::from(m.id))
            }
        })
        .collect()
}

/// Link every corpus entry and form its facts.
///
/// Entries are linked `batch_size` at a time: questions in one call, joined
/// answers in a second. Each entry yields one fact per (question entity,
/// answer entity) pair; an entry with no entity on either side yields none.
/// The token is checked before every batch.
pub async fn link_corpus(
    corpus: &Corpus,
    linker: &dyn EntityLinker,
    batch_size: usize,
    cancel: &CancellationToken,
) -> Result<Vec<Fact>, LinkError> {
    let mut facts = Vec::new();

    for (batch, entries) in corpus.entries().chunks(batch_size.max(1)).enumerate() {
        if cancel.is_cancelled() {
            return Err(LinkError::Cancelled);
        }

        let questions: Vec<String> = entries.iter().map(|e| e.question.clone()).collect();
        let answers: Vec<String> = entries.iter().map(|e| e.answer_document()).collect();

        let question_links = link_checked(linker, &questions).await?;
        let answer_links = link_checked(linker, &answers).await?;

        for ((entry, q_mentions), a_mentions) in
            entries.iter().zip(question_links).zip(answer_links)
        {
            let q_ids = entity_ids(q_mentions, entry.fact_id.index());
            let a_ids = entity_ids(a_mentions, entry.fact_id.index());

            for q in &q_ids {
                for a in &a_ids {
                    facts.push(Fact::new(
                        entry.fact_id,
                        Some(q.clone()),
                        Some(a.clone()),
                        entry.passage_id.clone(),
                    ));
                }
            }
        }

        debug!(linker = linker.name(), batch, entries = entries.len(), "linked batch");
    }

    Ok(facts)
}

/// Link a corpus and assemble its validated fact table
pub async fn build_fact_table(
    corpus: &Corpus,
    linker: &dyn EntityLinker,
    batch_size: usize,
    cancel: &CancellationToken,
) -> Result<FactTable, LinkError> {
    let facts = link_corpus(corpus, linker, batch_size, cancel).await?;
    Ok(FactTable::new(facts)?)
}

/// Mock linker for testing: returns preconfigured links per document text.
///
/// Documents without a registered response link to nothing.
pub struct MockLinker {
    available: bool,
    responses: HashMap<String, Vec<LinkedMention>>,
    truncate: bool,
}

impl MockLinker {
    /// Create a mock linker that answers every call.
    pub fn available() -> Self {
        Self {
            available: true,
            responses: HashMap::new(),
            truncate: false,
        }
    }

    /// Create a mock linker whose every call fails.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::available()
        }
    }

    /// Register the links returned for one document text.
    pub fn with_links(mut self, document: impl Into<String>, ids: &[&str]) -> Self {
        let mentions = ids.iter().map(|id| LinkedMention::new(*id, *id)).collect();
        self.responses.insert(document.into(), mentions);
        self
    }

    /// Make every call return one result fewer than it was given documents.
    pub fn truncating(mut self) -> Self {
        self.truncate = true;
        self
    }
}

#[async_trait]
impl EntityLinker for MockLinker {
    fn name(&self) -> &str {
        "mock"
    }

    async fn link(&self, documents: &[String]) -> Result<Vec<Vec<LinkedMention>>, LinkError> {
        if !self.available {
            return Err(LinkError::Unavailable(
                "mock linker configured as unavailable".to_string(),
            ));
        }

        let mut results: Vec<Vec<LinkedMention>> = documents
            .iter()
            .map(|doc| self.responses.get(doc).cloned().unwrap_or_default())
            .collect();
        if self.truncate {
            results.pop();
        }
        Ok(results)
    }
}
