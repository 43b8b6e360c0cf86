//! Gazetteer linker: whole-word, case-insensitive longest match over a lexicon

use super::{EntityLinker, LinkError, LinkedMention};
use crate::corpus::read_jsonl;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One surface form of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub surface: String,
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl LexiconEntry {
    pub fn new(surface: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            id: id.into(),
            label: None,
            title: None,
        }
    }
}

/// Links mentions by exact token-sequence lookup.
///
/// Tokens are maximal alphanumeric runs compared in lowercase, so
/// `"new  york"` in a document matches the surface `"New York"`. At each
/// position the longest matching surface wins and matched tokens are
/// consumed. The first entry registered for a surface takes precedence.
#[derive(Debug, Clone, Default)]
pub struct LexiconLinker {
    entries: Vec<LexiconEntry>,
    index: HashMap<Vec<String>, usize>,
    max_tokens: usize,
}

/// (byte start, byte end, lowercase text) of one token
type Token = (usize, usize, String);

fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match (c.is_alphanumeric(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                tokens.push((s, i, text[s..i].to_lowercase()));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push((s, text.len(), text[s..].to_lowercase()));
    }

    tokens
}

impl LexiconLinker {
    pub fn new(entries: impl IntoIterator<Item = LexiconEntry>) -> Self {
        let mut linker = Self::default();
        for entry in entries {
            let key: Vec<String> = tokenize(&entry.surface).into_iter().map(|t| t.2).collect();
            if key.is_empty() || entry.id.trim().is_empty() {
                continue;
            }
            if linker.index.contains_key(&key) {
                continue;
            }
            linker.max_tokens = linker.max_tokens.max(key.len());
            linker.index.insert(key, linker.entries.len());
            linker.entries.push(entry);
        }
        linker
    }

    /// Load a lexicon: a YAML list of entries, or JSON lines for `.jsonl`.
    pub fn load(path: &Path) -> Result<Self, LinkError> {
        let is_jsonl = path
            .extension()
            .is_some_and(|ext| ext == "jsonl" || ext == "json");

        let entries: Vec<LexiconEntry> = if is_jsonl {
            read_jsonl(path).map_err(|e| LinkError::Lexicon(e.to_string()))?
        } else {
            let content = std::fs::read_to_string(path)
                .map_err(|e| LinkError::Lexicon(format!("{}: {}", path.display(), e)))?;
            serde_yaml::from_str(&content)
                .map_err(|e| LinkError::Lexicon(format!("{}: {}", path.display(), e)))?
        };

        Ok(Self::new(entries))
    }

    /// Number of distinct surfaces
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Link one document
    pub fn link_document(&self, document: &str) -> Vec<LinkedMention> {
        let tokens = tokenize(document);
        let mut mentions = Vec::new();
        let mut pos = 0;

        while pos < tokens.len() {
            let longest = self.max_tokens.min(tokens.len() - pos);
            let hit = (1..=longest).rev().find_map(|n| {
                let key: Vec<String> = tokens[pos..pos + n].iter().map(|t| t.2.clone()).collect();
                self.index.get(&key).map(|&entry| (n, entry))
            });

            match hit {
                Some((n, entry)) => {
                    let entry = &self.entries[entry];
                    let text = &document[tokens[pos].0..tokens[pos + n - 1].1];
                    let mut mention = LinkedMention::new(entry.id.clone(), text);
                    mention.label = entry.label.clone();
                    mention.title = entry.title.clone();
                    mentions.push(mention);
                    pos += n;
                }
                None => pos += 1,
            }
        }

        mentions
    }
}

#[async_trait]
impl EntityLinker for LexiconLinker {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn link(&self, documents: &[String]) -> Result<Vec<Vec<LinkedMention>>, LinkError> {
        Ok(documents.iter().map(|doc| self.link_document(doc)).collect())
    }
}
