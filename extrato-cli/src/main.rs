use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use extrato_finance::{consolidate, render_text, write_csv};
use extrato_ingest::{
    BatchProcessor, BatchReport, DocumentOutcome, FsTextAcquirer, Pipeline, SkipReason,
    SourceDocument, TextAcquirer,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod config;
mod state;

use config::{Config, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "extrato", version, about = "Classify, extract and consolidate financial statements")]
struct Cli {
    /// Config file (default: ~/.extrato/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the statement family of each document
    Classify {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Extract balances and fee rates from each document
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,

        /// Documents processed at once (default: from config)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Extract every document and print portfolio-wide totals
    Consolidate {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format (default: from config)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Documents processed at once (default: from config)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Manage ~/.extrato/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;
    init_tracing(&cfg.log_level);

    match cli.command {
        Command::Classify { files } => classify(&cfg, &files)?,

        Command::Extract {
            files,
            json,
            concurrency,
        } => {
            let report = run_batch(&cfg, files, concurrency).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_outcomes(&report);
            }
        }

        Command::Consolidate {
            files,
            format,
            concurrency,
        } => {
            let report = run_batch(&cfg, files, concurrency).await?;
            let format = format.unwrap_or(cfg.output.format);
            print_consolidated(&report, format)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn init_acquirer(cfg: &Config) -> Result<FsTextAcquirer> {
    FsTextAcquirer::init(cfg.acquisition.clone()).context("initializing text acquisition")
}

fn classify(cfg: &Config, files: &[PathBuf]) -> Result<()> {
    let acquirer = init_acquirer(cfg)?;
    let pipeline = Pipeline::new().context("compiling statement rules")?;

    for path in files {
        let doc = SourceDocument::from_path(path);
        match acquirer.acquire(&doc) {
            Ok(text) => println!("{}\t{}", doc.name, pipeline.classify(&text).as_str()),
            Err(e) => warn!(name = %doc.name, error = %e, "cannot classify"),
        }
    }
    Ok(())
}

async fn run_batch(
    cfg: &Config,
    files: Vec<PathBuf>,
    concurrency: Option<usize>,
) -> Result<BatchReport> {
    let acquirer = init_acquirer(cfg)?;
    let processor = BatchProcessor::new(Arc::new(acquirer)).context("compiling statement rules")?;
    let docs: Vec<SourceDocument> = files.into_iter().map(|p| SourceDocument::from_path(p)).collect();

    let concurrency = concurrency.unwrap_or(cfg.batch.concurrency);
    let report = if concurrency <= 1 {
        processor.process(&docs)
    } else {
        Arc::new(processor).process_concurrent(docs, concurrency).await
    };

    Ok(report)
}

fn print_outcomes(report: &BatchReport) {
    for outcome in &report.outcomes {
        match outcome {
            DocumentOutcome::Included(stmt) => {
                println!(
                    "{} [{}]",
                    stmt.source().unwrap_or("(sem nome)"),
                    stmt.family()
                );
                for (label, amount) in stmt.balances() {
                    println!("  {}: {}", label, extrato_core::format_brl(*amount));
                }
                for (label, rate) in stmt.fee_rates() {
                    println!("  {}: {:.2}%", label, rate);
                }
            }
            DocumentOutcome::Skipped { name, reason } => {
                println!("{} skipped: {}", name, describe_skip(reason));
            }
            DocumentOutcome::Failed { name, error } => {
                println!("{} failed: {}", name, error);
            }
        }
    }
    print_counts(report);
}

fn print_consolidated(report: &BatchReport, format: OutputFormat) -> Result<()> {
    let statements: Vec<_> = report.statements().cloned().collect();
    let summary = consolidate(&statements);

    match format {
        OutputFormat::Text => {
            print!("{}", render_text(&summary, &statements));
            print_counts(report);
        }
        OutputFormat::Json => {
            let value = json!({
                "summary": summary,
                "statements": statements,
                "included": report.included_count(),
                "skipped": report.skipped_count(),
                "failed": report.failed_count(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Csv => {
            write_csv(&summary, std::io::stdout().lock())?;
        }
    }
    Ok(())
}

fn print_counts(report: &BatchReport) {
    println!(
        "\n{} included, {} skipped, {} failed",
        report.included_count(),
        report.skipped_count(),
        report.failed_count()
    );
}

fn describe_skip(reason: &SkipReason) -> String {
    match reason {
        SkipReason::UnsupportedKind(kind) if kind.is_empty() => "unsupported file type".to_string(),
        SkipReason::UnsupportedKind(kind) => format!("unsupported file type ({kind})"),
        SkipReason::EmptyExtraction => "no balances found".to_string(),
    }
}
