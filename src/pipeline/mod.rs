//! File workers: corpus in, one question file per shape out
//!
//! A worker reads a corpus, links it into a fact table (or reads a prebuilt
//! fact file), composes every shape, restores all of them and only then
//! writes. Composition and file I/O run on the blocking pool. Several files
//! run concurrently under a job limit and fail independently.

mod cancel;

pub use cancel::CancellationToken;

use crate::compose::{Shape, ShapeSet};
use crate::corpus::{output_prefix, read_jsonl, write_jsonl, Corpus, CorpusError};
use crate::graph::{Fact, FactTable, FactTableError};
use crate::linking::{build_fact_table, EntityLinker, LinkError};
use crate::provenance::{debug_shape, restore_shape, ProvenanceError, RestoredRecord};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Errors that fail one file
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Link(#[from] LinkError),

    #[error("corrupted fact table: {0}")]
    FactTable(#[from] FactTableError),

    #[error("corrupted fact table: {0}")]
    Provenance(#[from] ProvenanceError),

    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cancelled")]
    Cancelled,

    #[error("worker failed: {0}")]
    Join(String),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Per-run settings shared by every worker
#[derive(Debug, Clone)]
pub struct WorkerOptions {
    pub out_path: PathBuf,
    pub batch_size: usize,
    pub debug: bool,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            out_path: PathBuf::from("."),
            batch_size: 8,
            debug: false,
        }
    }
}

/// One written shape file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeReport {
    pub shape: Shape,
    pub rows: usize,
    pub path: PathBuf,
}

/// What a worker produced for one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub input: PathBuf,
    /// Corpus entries
    pub entries: usize,
    /// Entity-level fact rows
    pub facts: usize,
    pub shapes: Vec<ShapeReport>,
}

impl FileReport {
    pub fn rows(&self, shape: Shape) -> usize {
        self.shapes
            .iter()
            .find(|r| r.shape == shape)
            .map(|r| r.rows)
            .unwrap_or(0)
    }
}

/// Outcome of one file in a multi-file run
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: PipelineResult<FileReport>,
}

fn output_file(options: &WorkerOptions, prefix: &str, suffix: &str) -> PathBuf {
    options.out_path.join(format!("{prefix}_{suffix}.jsonl"))
}

fn compose_and_write(
    input: &Path,
    corpus: &Corpus,
    table: &FactTable,
    options: &WorkerOptions,
    cancel: &CancellationToken,
) -> PipelineResult<FileReport> {
    let file = input.display().to_string();
    let prefix = output_prefix(input);
    let shapes = ShapeSet::compose(table);

    // Every shape is restored before anything is written.
    let restored = Shape::ALL
        .iter()
        .map(|&shape| Ok((shape, restore_shape(&shapes, shape, table, corpus.records())?)))
        .collect::<Result<Vec<(Shape, Vec<RestoredRecord<'_>>)>, ProvenanceError>>()?;

    if cancel.is_cancelled() {
        return Err(PipelineError::Cancelled);
    }

    std::fs::create_dir_all(&options.out_path).map_err(|source| PipelineError::OutputDir {
        path: options.out_path.clone(),
        source,
    })?;

    let mut reports = Vec::with_capacity(restored.len());
    for (shape, records) in &restored {
        let path = output_file(
            options,
            &prefix,
            &format!("{}_composable_questions", shape.name()),
        );
        let rows = write_jsonl(&path, records)?;
        info!(file = %file, shape = %shape, rows, "wrote composable questions");
        reports.push(ShapeReport {
            shape: *shape,
            rows,
            path,
        });
    }

    if options.debug {
        for shape in Shape::ALL {
            let path = output_file(options, &prefix, &format!("{}_debug", shape.name()));
            write_jsonl(&path, debug_shape(&shapes, shape, table))?;
        }
        write_jsonl(&output_file(options, &prefix, "facts_debug"), table.facts())?;
        write_jsonl(&output_file(options, &prefix, "corpus_debug"), corpus.records())?;
        debug!(file = %file, "wrote debug dumps");
    }

    Ok(FileReport {
        input: input.to_path_buf(),
        entries: corpus.len(),
        facts: table.len(),
        shapes: reports,
    })
}

async fn blocking<T, F>(task: F) -> PipelineResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> PipelineResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| PipelineError::Join(e.to_string()))?
}

async fn finish(
    input: PathBuf,
    corpus: Corpus,
    table: FactTable,
    options: WorkerOptions,
    cancel: CancellationToken,
) -> PipelineResult<FileReport> {
    blocking(move || compose_and_write(&input, &corpus, &table, &options, &cancel)).await
}

/// Process one corpus file: link, compose, restore, write.
pub async fn run_file(
    input: PathBuf,
    linker: Arc<dyn EntityLinker>,
    options: WorkerOptions,
    cancel: CancellationToken,
) -> PipelineResult<FileReport> {
    let path = input.clone();
    let corpus = blocking(move || Ok(Corpus::load(&path)?)).await?;
    info!(file = %input.display(), entries = corpus.len(), linker = linker.name(), "linking corpus");

    let table = build_fact_table(&corpus, linker.as_ref(), options.batch_size, &cancel).await?;
    info!(
        file = %input.display(),
        rows = table.len(),
        facts = table.distinct_fact_count(),
        "built fact table"
    );

    finish(input, corpus, table, options, cancel).await
}

/// Process a prebuilt fact file against its corpus, skipping the linker.
///
/// Outputs are named after the corpus file.
pub async fn run_fact_file(
    facts: PathBuf,
    corpus: PathBuf,
    options: WorkerOptions,
    cancel: CancellationToken,
) -> PipelineResult<FileReport> {
    let corpus_path = corpus.clone();
    let (loaded, table) = blocking(move || {
        let rows: Vec<Fact> = read_jsonl(&facts)?;
        let table = FactTable::new(rows)?;
        let loaded = Corpus::load(&corpus_path)?;
        Ok((loaded, table))
    })
    .await?;
    info!(
        file = %corpus.display(),
        rows = table.len(),
        facts = table.distinct_fact_count(),
        "loaded fact file"
    );

    finish(corpus, loaded, table, options, cancel).await
}

/// Process several corpus files, at most `jobs` at a time.
///
/// Outcomes come back in input order. One file failing does not stop the
/// others.
pub async fn run_files(
    inputs: Vec<PathBuf>,
    linker: Arc<dyn EntityLinker>,
    options: WorkerOptions,
    jobs: usize,
    cancel: CancellationToken,
) -> Vec<FileOutcome> {
    let permits = Arc::new(Semaphore::new(jobs.max(1)));
    let mut set: JoinSet<(usize, PipelineResult<FileReport>)> = JoinSet::new();

    for (index, input) in inputs.iter().enumerate() {
        let input = input.clone();
        let linker = Arc::clone(&linker);
        let options = options.clone();
        let cancel = cancel.clone();
        let permits = Arc::clone(&permits);

        set.spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => return (index, Err(PipelineError::Join(e.to_string()))),
            };
            if cancel.is_cancelled() {
                return (index, Err(PipelineError::Cancelled));
            }
            debug!(file = %input.display(), "starting worker");
            (index, run_file(input, linker, options, cancel).await)
        });
    }

    let mut results: Vec<Option<PipelineResult<FileReport>>> =
        inputs.iter().map(|_| None).collect();

    while let Some(res) = set.join_next().await {
        match res {
            Ok((index, result)) => {
                if let Err(e) = &result {
                    error!(file = %inputs[index].display(), "file failed: {e}");
                }
                results[index] = Some(result);
            }
            // Worker panicked; its slot is filled below.
            Err(e) => error!("worker panicked: {e}"),
        }
    }

    inputs
        .into_iter()
        .zip(results)
        .map(|(input, result)| FileOutcome {
            input,
            result: result
                .unwrap_or_else(|| Err(PipelineError::Join("worker panicked".to_string()))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linking::MockLinker;
    use serde_json::{json, Value};

    fn write_corpus(dir: &Path, name: &str, records: &[Value]) -> PathBuf {
        let path = dir.join(name);
        write_jsonl(&path, records).unwrap();
        path
    }

    fn records() -> Vec<Value> {
        vec![
            json!({"question": "Who directed Alien?", "answers": ["Ridley Scott"], "passage_id": "P0"}),
            json!({"question": "Where was Ridley Scott born?", "answers": ["South Shields"], "passage_id": "P1"}),
        ]
    }

    fn linker() -> Arc<dyn EntityLinker> {
        Arc::new(
            MockLinker::available()
                .with_links("Who directed Alien?", &["Q103569"])
                .with_links("Ridley Scott", &["Q56005"])
                .with_links("Where was Ridley Scott born?", &["Q56005"])
                .with_links("South Shields", &["Q215609"]),
        )
    }

    #[tokio::test]
    async fn test_writes_one_file_per_shape() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_corpus(dir.path(), "dev.jsonl", &records());
        let options = WorkerOptions {
            out_path: dir.path().join("out"),
            ..Default::default()
        };

        let report = run_file(input, linker(), options, CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.entries, 2);
        assert_eq!(report.facts, 2);
        assert_eq!(report.shapes.len(), 6);
        assert_eq!(report.rows(Shape::Linear2), 1);
        assert_eq!(report.rows(Shape::Linear4), 0);
        for shape in Shape::ALL {
            let path = dir
                .path()
                .join("out")
                .join(format!("dev_{}_composable_questions.jsonl", shape.name()));
            assert!(path.is_file(), "missing {}", path.display());
        }

        let rows: Vec<Value> = read_jsonl(&report.shapes[0].path).unwrap();
        assert_eq!(rows[0]["question_head"], records()[0]);
        assert_eq!(rows[0]["question_tail"], records()[1]);
    }

    #[tokio::test]
    async fn test_cancelled_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_corpus(dir.path(), "dev.jsonl", &records());
        let out = dir.path().join("out");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let options = WorkerOptions {
            out_path: out.clone(),
            ..Default::default()
        };
        let err = run_file(input, linker(), options, cancel).await.unwrap_err();

        assert!(matches!(err, PipelineError::Link(LinkError::Cancelled)));
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_fact_outside_corpus_fails_file() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = write_corpus(dir.path(), "dev.jsonl", &records()[..1]);
        let facts = dir.path().join("facts.jsonl");
        write_jsonl(
            &facts,
            vec![
                Fact::linked(0, "Q103569", "Q56005", "P0"),
                Fact::linked(1, "Q56005", "Q215609", "P1"),
            ],
        )
        .unwrap();
        let out = dir.path().join("out");

        let options = WorkerOptions {
            out_path: out.clone(),
            ..Default::default()
        };
        let err = run_fact_file(facts, corpus, options, CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Provenance(_)));
        assert!(!out.exists());
    }
}
