// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use doc_ingest::utils::logging::{format_error, format_step, format_success, format_warning};
use doc_ingest::{
    AutoDetectExtractor, Config, IngestPipeline, RunOptions, SearchIndex, SolrClient, Validator,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "doc_ingest")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Index filesystem documents and database rows into a search index", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the document tree, read the database rows and commit
    Run {
        /// Directory to walk instead of files.root_dir
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        #[arg(long)]
        skip_files: bool,

        #[arg(long)]
        skip_rows: bool,
    },

    /// Extract a single file and print its metadata and text
    Inspect {
        file: PathBuf,

        /// Truncate the printed text to this many characters
        #[arg(long, value_name = "NUM", default_value_t = 2000)]
        max_chars: usize,
    },

    /// Check that the search index is reachable
    Ping,

    /// Make all pending index writes visible
    Commit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    doc_ingest::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        let config = Config::default_config();
        config.validate().context("Invalid built-in configuration")?;
        config
    };

    match cli.command {
        Commands::Run {
            root,
            skip_files,
            skip_rows,
        } => {
            let options = RunOptions {
                root,
                skip_files,
                skip_rows,
            };
            cmd_run(config, &options, cli.color).await?;
        }
        Commands::Inspect { file, max_chars } => {
            cmd_inspect(&file, max_chars)?;
        }
        Commands::Ping => {
            cmd_ping(&config).await?;
        }
        Commands::Commit => {
            cmd_commit(&config).await?;
        }
    }

    Ok(())
}

async fn cmd_run(config: Config, options: &RunOptions, color: bool) -> Result<()> {
    let client = SolrClient::new(&config.index).context("Failed to create search index client")?;

    let pipeline = IngestPipeline::new(config, client).with_color(color);
    let stats = pipeline
        .run(options)
        .await
        .context("Ingestion failed")?;

    if stats.files_failed > 0 || stats.failed_flushes > 0 {
        println!(
            "{}",
            format_warning(&format!(
                "{} files failed extraction, {} batches were not accepted",
                stats.files_failed, stats.failed_flushes
            ))
        );
    }
    println!(
        "{}",
        format_success(&format!(
            "Ingestion complete: {} documents",
            stats.documents_indexed()
        ))
    );

    Ok(())
}

fn cmd_inspect(file: &Path, max_chars: usize) -> Result<()> {
    Validator::validate_file_path(file).context("Cannot inspect file")?;

    println!("{}", format_step(1, 2, "Extracting"));
    let extractor = AutoDetectExtractor::new();
    let content = extractor
        .extract_file(file)
        .with_context(|| format!("Failed to extract {}", file.display()))?;

    println!("{}", format_step(2, 2, "Metadata"));
    for (name, value) in content.metadata.iter() {
        println!("  {}: {}", name, value);
    }

    println!("\n{}", "=".repeat(80));
    println!("{}", Validator::truncate_text(&content.text, max_chars));
    println!("{}", "=".repeat(80));

    Ok(())
}

async fn cmd_ping(config: &Config) -> Result<()> {
    let client = SolrClient::new(&config.index).context("Failed to create search index client")?;

    let response = client.ping().await.context("Search index unreachable")?;
    if response.is_success() {
        println!(
            "{}",
            format_success(&format!(
                "Search index reachable ({} ms)",
                response.qtime_ms.unwrap_or_default()
            ))
        );
        Ok(())
    } else {
        println!(
            "{}",
            format_error(&format!("Ping returned status {}", response.status))
        );
        Err(anyhow::anyhow!("Search index ping failed"))
    }
}

async fn cmd_commit(config: &Config) -> Result<()> {
    let client = SolrClient::new(&config.index).context("Failed to create search index client")?;

    let response = client.commit().await.context("Commit request failed")?;
    if response.is_success() {
        println!("{}", format_success("Commit complete"));
        Ok(())
    } else {
        println!(
            "{}",
            format_error(&format!("Commit returned status {}", response.status))
        );
        Err(anyhow::anyhow!("Commit failed"))
    }
}
