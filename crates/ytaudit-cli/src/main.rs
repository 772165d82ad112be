mod audit;
mod classify;
mod sponsors;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use ytaudit_core::{MAX_VIDEO_LIMIT, MIN_VIDEO_LIMIT};

#[derive(Debug, Parser)]
#[command(name = "ytaudit")]
#[command(about = "Audit the sponsorships in a YouTube channel's recent uploads")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch recent uploads, detect sponsors, and write CSV and markdown reports
    Audit {
        /// Channel URL (`/channel/<id>` or `/@handle`)
        #[arg(long)]
        url: String,

        /// Number of most recent uploads to analyze
        #[arg(
            long,
            default_value_t = 50,
            value_parser = clap::value_parser!(u32).range(i64::from(MIN_VIDEO_LIMIT)..=i64::from(MAX_VIDEO_LIMIT))
        )]
        limit: u32,

        /// Directory the CSV exports are written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Concurrent classifications (overrides `YTAUDIT_CLASSIFY_CONCURRENCY`)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Leading description lines to classify (overrides `YTAUDIT_PREFIX_LINES`)
        #[arg(long)]
        prefix_lines: Option<usize>,

        /// Sponsor rules YAML file (overrides `YTAUDIT_SPONSOR_RULES_PATH`)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Print a JSON report instead of markdown
        #[arg(long)]
        json: bool,
    },
    /// Classify one description and print the detected sponsor
    Classify {
        /// Description text; read from stdin when omitted
        #[arg(long)]
        text: Option<String>,

        /// Leading description lines to classify (overrides `YTAUDIT_PREFIX_LINES`)
        #[arg(long)]
        prefix_lines: Option<usize>,

        /// Sponsor rules YAML file (overrides `YTAUDIT_SPONSOR_RULES_PATH`)
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ytaudit_core::load_app_config()?;
    init_tracing(&config.log_level);

    match cli.command {
        Some(Commands::Audit {
            url,
            limit,
            output_dir,
            concurrency,
            prefix_lines,
            rules,
            json,
        }) => {
            let options = audit::AuditOptions {
                url,
                limit,
                output_dir,
                concurrency: concurrency.unwrap_or(config.classify_concurrency),
                prefix_lines: prefix_lines.unwrap_or(config.prefix_lines),
                rules,
                json,
            };
            audit::run_audit(&config, &options).await
        }
        Some(Commands::Classify {
            text,
            prefix_lines,
            rules,
        }) => {
            classify::run_classify(
                &config,
                text,
                prefix_lines.unwrap_or(config.prefix_lines),
                rules.as_deref(),
            )
            .await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Logs go to stderr so reports on stdout stay pipeable. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
