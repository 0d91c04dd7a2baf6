//! CLI entry point for the engagement dashboard.
//!
//! Loads the two account CSVs, computes the dashboard views, and prints
//! them as text or JSON. Also writes processed exports and offers an
//! interactive session shell.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use engagement_dashboard::analyzers::hashtags::TopN;
use engagement_dashboard::filter::RangeSelection;
use engagement_dashboard::output::{ExportOptions, render_text, to_json, write_export};
use engagement_dashboard::parser::load_pair;
use engagement_dashboard::session::{SessionConfig, build_dashboard};
use engagement_dashboard::{filter, shell};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "engagement_dashboard")]
#[command(
    about = "Compare engagement metrics of @ppoohkt and @pavelphoom",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// CSV export for @ppoohkt
    #[arg(value_name = "PPOOHKT_CSV")]
    ppoohkt: PathBuf,

    /// CSV export for @pavelphoom
    #[arg(value_name = "PAVELPHOOM_CSV")]
    pavelphoom: PathBuf,
}

#[derive(Args)]
struct RangeArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
}

impl RangeArgs {
    fn selection(&self) -> RangeSelection {
        RangeSelection::from_endpoints(self.start, self.end)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every dashboard view for both accounts
    Report {
        #[command(flatten)]
        inputs: Inputs,

        #[command(flatten)]
        range: RangeArgs,

        /// Hashtags to list for @ppoohkt
        #[arg(long, default_value_t = TopN::DEFAULT as u64, value_parser = clap::value_parser!(u64).range(5..=20))]
        top_ppoohkt: u64,

        /// Hashtags to list for @pavelphoom
        #[arg(long, default_value_t = TopN::DEFAULT as u64, value_parser = clap::value_parser!(u64).range(5..=20))]
        top_pavelphoom: u64,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the selectable date span across both files
    Span {
        #[command(flatten)]
        inputs: Inputs,
    },
    /// Write processed CSVs for both accounts
    Export {
        #[command(flatten)]
        inputs: Inputs,

        #[command(flatten)]
        range: RangeArgs,

        /// Directory to write `<account>_procesado.csv` files into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Gzip compress the exported files
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Leave out the derived mention flag column
        #[arg(long, default_value_t = false)]
        no_mention_flag: bool,
    },
    /// Start an interactive session on stdin/stdout
    Interactive,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/engagement_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("engagement_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            inputs,
            range,
            top_ppoohkt,
            top_pavelphoom,
            format,
        } => {
            let (ppoohkt, pavelphoom) = load_pair(&inputs.ppoohkt, &inputs.pavelphoom)?;
            let config = SessionConfig {
                range: range.selection(),
                top_ppoohkt: TopN::new(top_ppoohkt as usize),
                top_pavelphoom: TopN::new(top_pavelphoom as usize),
            };

            let dashboard = build_dashboard(&ppoohkt, &pavelphoom, &config);
            match format {
                Format::Text => print!("{}", render_text(&dashboard)),
                Format::Json => println!("{}", to_json(&dashboard)?),
            }
        }
        Commands::Span { inputs } => {
            let (ppoohkt, pavelphoom) = load_pair(&inputs.ppoohkt, &inputs.pavelphoom)?;
            match filter::union_span(&ppoohkt, &pavelphoom) {
                Some(span) => println!("{} {}", span.start, span.end),
                None => info!("No parseable dates in either file"),
            }
        }
        Commands::Export {
            inputs,
            range,
            output_dir,
            gzip,
            no_mention_flag,
        } => {
            let (ppoohkt, pavelphoom) = load_pair(&inputs.ppoohkt, &inputs.pavelphoom)?;
            let (ppoohkt, pavelphoom, applied) =
                filter::apply_selection(&ppoohkt, &pavelphoom, range.selection());
            if let Some(applied) = applied {
                info!(start = %applied.start, end = %applied.end, "Exporting filtered rows");
            }

            for dataset in [&ppoohkt, &pavelphoom] {
                let options = ExportOptions {
                    mention_target: (!no_mention_flag).then(|| dataset.account.other()),
                    gzip,
                };
                let path = write_export(&output_dir, dataset, options)?;
                println!("{}", path.display());
            }
        }
        Commands::Interactive => {
            let stdin = std::io::stdin();
            shell::run(stdin.lock(), std::io::stdout())?;
        }
    }

    Ok(())
}
