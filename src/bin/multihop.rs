//! Multihop CLI: compose multi-hop questions from single-hop QA corpora.
//!
//! Usage:
//!   multihop compose <corpus.jsonl>... [--lexicon path | --linker-command prog] [-o dir]
//!   multihop facts --facts facts.jsonl --corpus corpus.jsonl [-o dir]

use clap::{Args, Parser, Subcommand};
use multihop::pipeline::PipelineResult;
use multihop::{
    build_linker, run_fact_file, run_files, CancellationToken, Config, FileReport, LinkerConfig,
    Overrides, Shape, WorkerOptions,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "multihop",
    version,
    about = "Compose multi-hop questions from single-hop QA corpora"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log filter (overrides RUST_LOG), e.g. "debug" or "multihop=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Link corpus files and write their composable questions
    Compose {
        /// Corpus files (JSON lines); a comma-separated list is also accepted
        #[arg(required = true, value_delimiter = ',')]
        inputs: Vec<PathBuf>,
        /// Link with a surface-form lexicon (YAML or JSON lines)
        #[arg(long, conflicts_with = "linker_command")]
        lexicon: Option<PathBuf>,
        /// Link by piping JSON batches to this program
        #[arg(long)]
        linker_command: Option<String>,
        /// Argument for the linker program (repeatable)
        #[arg(long = "linker-arg", allow_hyphen_values = true)]
        linker_args: Vec<String>,
        /// Corpus entries per linker call
        #[arg(long)]
        batch_size: Option<usize>,
        /// Files processed concurrently
        #[arg(short, long)]
        jobs: Option<usize>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Compose from a prebuilt fact file, skipping entity linking
    Facts {
        /// Fact records (JSON lines)
        #[arg(long)]
        facts: PathBuf,
        /// Corpus the facts were built from; names the outputs
        #[arg(long)]
        corpus: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Directory for output files
    #[arg(short, long)]
    out_path: Option<PathBuf>,
    /// Also write pre-restoration relations, the fact table and the corpus
    #[arg(long)]
    debug: bool,
}

fn init_logging(level: &str, prefer_level: bool) -> Result<(), String> {
    let filter = if prefer_level {
        EnvFilter::try_new(level).map_err(|e| format!("invalid log level '{level}': {e}"))?
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .map_err(|e| format!("invalid log level '{level}': {e}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| format!("failed to set subscriber: {e}"))
}

fn load_config(path: Option<&PathBuf>, overrides: Overrides) -> Result<Config, String> {
    let config = Config::load(path.map(PathBuf::as_path))
        .map_err(|e| e.to_string())?
        .apply(overrides);
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn worker_options(config: &Config) -> WorkerOptions {
    WorkerOptions {
        out_path: config.out_path.clone(),
        batch_size: config.batch_size,
        debug: config.debug,
    }
}

fn print_report(report: &FileReport) {
    println!(
        "{}: {} entries, {} facts",
        report.input.display(),
        report.entries,
        report.facts
    );
    for shape in Shape::ALL {
        println!("  {:<28} {:>8}", shape.name(), report.rows(shape));
    }
}

/// Print one file's outcome, returning whether it succeeded
fn report_outcome(input: &std::path::Path, result: &PipelineResult<FileReport>) -> bool {
    match result {
        Ok(report) => {
            print_report(report);
            true
        }
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            false
        }
    }
}

async fn cmd_compose(config: Config, inputs: Vec<PathBuf>, cancel: CancellationToken) -> i32 {
    let Some(linker_config) = config.linker.as_ref() else {
        eprintln!("Error: no linker configured; pass --lexicon or --linker-command");
        return 1;
    };
    let linker = match build_linker(linker_config) {
        Ok(linker) => linker,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let outcomes = run_files(
        inputs,
        linker,
        worker_options(&config),
        config.jobs,
        cancel,
    )
    .await;

    let mut failed = 0;
    for outcome in &outcomes {
        if !report_outcome(&outcome.input, &outcome.result) {
            failed += 1;
        }
    }
    if failed > 0 {
        eprintln!("{} of {} files failed", failed, outcomes.len());
        return 1;
    }
    0
}

async fn cmd_facts(
    config: Config,
    facts: PathBuf,
    corpus: PathBuf,
    cancel: CancellationToken,
) -> i32 {
    let result = run_fact_file(facts, corpus.clone(), worker_options(&config), cancel).await;
    if report_outcome(&corpus, &result) {
        0
    } else {
        1
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let overrides = match &cli.command {
        Commands::Compose {
            lexicon,
            linker_command,
            linker_args,
            batch_size,
            jobs,
            output,
            ..
        } => Overrides {
            out_path: output.out_path.clone(),
            batch_size: *batch_size,
            jobs: *jobs,
            debug: output.debug,
            log_level: cli.log_level.clone(),
            linker: match (lexicon, linker_command) {
                (Some(path), _) => Some(LinkerConfig::Lexicon { path: path.clone() }),
                (None, Some(program)) => Some(LinkerConfig::Command {
                    program: program.clone(),
                    args: linker_args.clone(),
                }),
                (None, None) => None,
            },
        },
        Commands::Facts { output, .. } => Overrides {
            out_path: output.out_path.clone(),
            debug: output.debug,
            log_level: cli.log_level.clone(),
            ..Default::default()
        },
    };

    let config = match load_config(cli.config.as_ref(), overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.log_level, cli.log_level.is_some()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let cancel = CancellationToken::new();
    cancel.cancel_on_ctrl_c();

    let code = match cli.command {
        Commands::Compose { inputs, .. } => cmd_compose(config, inputs, cancel).await,
        Commands::Facts { facts, corpus, .. } => cmd_facts(config, facts, corpus, cancel).await,
    };
    std::process::exit(code);
}
