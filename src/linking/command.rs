//! External-process linker
//!
//! Each batch spawns the configured program, writes
//! `{"documents": [...]}` to its stdin and reads
//! `{"results": [[{"id", "mention", "label", "title"}, ...], ...]}` from its
//! stdout, one inner list per document.

use super::{EntityLinker, LinkError, LinkedMention};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Serialize)]
struct Request<'a> {
    documents: &'a [String],
}

#[derive(Deserialize)]
struct Response {
    results: Vec<Vec<LinkedMention>>,
}

/// Links by invoking an external program once per batch
#[derive(Debug, Clone)]
pub struct CommandLinker {
    program: String,
    args: Vec<String>,
}

impl CommandLinker {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl EntityLinker for CommandLinker {
    fn name(&self) -> &str {
        &self.program
    }

    async fn link(&self, documents: &[String]) -> Result<Vec<Vec<LinkedMention>>, LinkError> {
        let input = serde_json::to_vec(&Request { documents })
            .map_err(|e| LinkError::InvocationFailed(e.to_string()))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| LinkError::Unavailable(format!("failed to start {}: {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| LinkError::InvocationFailed("no stdin".to_string()))?;
        // Feed stdin concurrently so a program that answers while still
        // reading cannot block on a full stdout pipe.
        let writer = tokio::spawn(async move {
            let written = stdin.write_all(&input).await;
            drop(stdin);
            written
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| LinkError::InvocationFailed(format!("failed to wait for output: {}", e)))?;

        let written = writer
            .await
            .map_err(|e| LinkError::InvocationFailed(format!("stdin writer failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LinkError::InvocationFailed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        // A program may answer without reading all of its input.
        match written {
            Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                return Err(LinkError::InvocationFailed(format!(
                    "failed to write to stdin: {}",
                    e
                )));
            }
            _ => {}
        }

        let response: Response = serde_json::from_slice(&output.stdout)
            .map_err(|e| LinkError::ParseError(e.to_string()))?;

        Ok(response
            .results
            .into_iter()
            .map(|doc| {
                doc.into_iter()
                    .map(|mut m| {
                        m.mention = super::clean_mention(&m.mention);
                        m
                    })
                    .collect()
            })
            .collect())
    }
}
