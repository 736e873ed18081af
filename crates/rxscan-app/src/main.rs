// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rxscan — prescription reader
//
// Entry point. Initialises logging and backend services, then runs one
// command: analyse recognised text, read a photo, show stats or settings.

mod services;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rxscan_core::error::{Result, RxscanError};
use rxscan_core::human_errors::humanize_error;
use rxscan_core::{ConfidenceStrategy, ScanReport};

use services::scan_service::ScanService;

#[derive(Parser, Debug)]
#[command(
    name = "rxscan",
    version,
    about = "Turn OCR text from a photographed prescription into medicine guidance"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse recognised prescription text (from FILE, or stdin)
    Analyze {
        /// Text file holding the recognised text
        file: Option<PathBuf>,

        /// Number of lines the recognition engine reported
        #[arg(long = "lines")]
        lines: Option<usize>,

        /// Print the full report as JSON
        #[arg(long = "json")]
        json: bool,

        /// Do not update the scan counters
        #[arg(long = "no-record")]
        no_record: bool,
    },

    /// Read a prescription photo and analyse it (needs the `ocr` feature)
    Image {
        path: PathBuf,

        /// Print the full report as JSON
        #[arg(long = "json")]
        json: bool,

        /// Do not update the scan counters
        #[arg(long = "no-record")]
        no_record: bool,
    },

    /// Show scan counters and accuracy
    Stats {
        #[arg(long = "json")]
        json: bool,
    },

    /// Show or change settings
    Config {
        /// Confidence heuristic to use from now on
        #[arg(long = "strategy", value_enum)]
        strategy: Option<StrategyArg>,

        /// Turn scan counting on or off
        #[arg(long = "record-stats")]
        record_stats: Option<bool>,

        /// Directory holding the OCR model files
        #[arg(long = "ocr-model-dir")]
        ocr_model_dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    TextLength,
    LineCount,
}

impl From<StrategyArg> for ConfidenceStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::TextLength => ConfidenceStrategy::TextLength,
            StrategyArg::LineCount => ConfidenceStrategy::LineCount,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli, "rxscan starting");

    let service = match ScanService::init() {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "persistent storage failed, using in-memory fallback");
            ScanService::fallback()
        }
    };

    match run(&service, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let human = humanize_error(&e);
            println!("{}", service.process_failure(&e));
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(service: &ScanService, command: Command) -> Result<()> {
    match command {
        Command::Analyze {
            file,
            lines,
            json,
            no_record,
        } => {
            let raw = read_input(file)?;
            let report = service.process_text(raw.as_deref(), lines, !no_record);
            print_report(&report, json)
        }
        Command::Image {
            path,
            json,
            no_record,
        } => {
            let report = service.process_image(&path, !no_record)?;
            print_report(&report, json)
        }
        Command::Stats { json } => {
            let stats = service.stats()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Scans today:      {}", stats.scans_today);
                println!("Total scans:      {}", stats.total_scans);
                println!("Successful scans: {}", stats.successful_scans);
                println!("Accuracy:         {}", stats.accuracy_display());
            }
            Ok(())
        }
        Command::Config {
            strategy,
            record_stats,
            ocr_model_dir,
        } => {
            let mut config = service.config();
            let changed = strategy.is_some() || record_stats.is_some() || ocr_model_dir.is_some();
            if let Some(strategy) = strategy {
                config.confidence_strategy = strategy.into();
            }
            if let Some(record) = record_stats {
                config.record_stats = record;
            }
            if let Some(dir) = ocr_model_dir {
                config.ocr_model_dir = Some(dir);
            }
            if changed {
                service.save_config(&config)?;
                tracing::info!("settings saved");
            }

            if let Some(path) = service.config_path() {
                eprintln!("# {}", path.display());
            }
            #[cfg(feature = "ocr")]
            eprintln!(
                "# OCR models: {}",
                if service.ocr_models_ready() { "found" } else { "missing" }
            );
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// Recognised text from `file`, or from stdin when it is piped in.
///
/// `None` means the recognition step produced no text at all.
fn read_input(file: Option<PathBuf>) -> Result<Option<String>> {
    match file {
        Some(path) => Ok(Some(std::fs::read_to_string(&path)?)),
        None if io::stdin().is_terminal() => Err(RxscanError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no input: pass a text file or pipe the recognised text on stdin",
        ))),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok((!buffer.is_empty()).then_some(buffer))
        }
    }
}

fn print_report(report: &ScanReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("{}", report.instructions);
    println!();
    println!("{}", report.analysis.trim_end());
    println!();
    println!(
        "Confidence: {} ({})",
        report.confidence,
        if report.is_successful() { "good scan" } else { "low quality" }
    );
    Ok(())
}
