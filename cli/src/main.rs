//! Batch analyzer for EVTC combat logs.
//!
//! Analyzes each given file independently and prints a per-log summary,
//! either as a text report or as one JSON document per log. A log that
//! fails to parse is reported on stderr and never aborts the rest of
//! the batch.

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use memmap2::Mmap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use evtc_core::{EncounterResult, GameLanguage, LogAnalysis, LogAnalyzer};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Language {
    #[default]
    English,
    French,
    German,
    Spanish,
    Chinese,
}

impl From<Language> for GameLanguage {
    fn from(value: Language) -> Self {
        match value {
            Language::English => GameLanguage::English,
            Language::French => GameLanguage::French,
            Language::German => GameLanguage::German,
            Language::Spanish => GameLanguage::Spanish,
            Language::Chinese => GameLanguage::Chinese,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "evtc")]
#[command(about = "Analyze EVTC combat logs")]
#[command(version)]
struct Args {
    /// Log files to analyze (.evtc or .zevtc)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Emit one JSON document per log instead of the text report
    #[arg(long)]
    json: bool,

    /// Client language for encounter names
    #[arg(long, value_enum, default_value_t = Language::English)]
    lang: Language,

    /// Verbose logging (equivalent to RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,
}

/// JSON shape for one analyzed log.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    file: &'a Path,
    encounter: Option<&'a str>,
    result: EncounterResult,
    duration_ms: u64,
    statistics: &'a evtc_core::LogStatistics,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let analyzer = LogAnalyzer::new().with_language(args.lang.into());

    let timer = std::time::Instant::now();
    let results: Vec<(PathBuf, Result<LogAnalysis, String>)> = args
        .files
        .par_iter()
        .map(|path| (path.clone(), analyze_file(&analyzer, path)))
        .collect();
    debug!(
        files = results.len(),
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "batch complete"
    );

    let mut failures = 0;
    for (path, result) in &results {
        match result {
            Ok(analysis) => {
                if args.json {
                    print_json(path, analysis);
                } else {
                    print_report(path, analysis);
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!("{}: {}", path.display(), err);
            }
        }
    }

    if failures > 0 {
        eprintln!("{failures} of {} file(s) failed", results.len());
        std::process::exit(1);
    }
}

fn analyze_file(analyzer: &LogAnalyzer, path: &Path) -> Result<LogAnalysis, String> {
    let file = File::open(path).map_err(|e| format!("cannot open: {e}"))?;
    let mmap = unsafe { Mmap::map(&file).map_err(|e| format!("cannot map: {e}"))? };
    analyzer.analyze(&mmap).map_err(|e| e.to_string())
}

fn print_json(path: &Path, analysis: &LogAnalysis) {
    let report = JsonReport {
        file: path,
        encounter: analysis.encounter_name.as_deref(),
        result: analysis.result,
        duration_ms: analysis.statistics.duration_ms,
        statistics: &analysis.statistics,
    };
    match serde_json::to_string(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("{}: serialization failed: {err}", path.display()),
    }
}

fn print_report(path: &Path, analysis: &LogAnalysis) {
    let name = analysis.encounter_name.as_deref().unwrap_or("Unknown");
    println!();
    println!(
        "{} — {} [{}] {}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        name,
        analysis.result,
        format_duration(analysis.statistics.duration_ms),
    );

    println!(
        "  {:24} {:10} {:>10} {:>10} {:>8} {:>8}",
        "Player", "Profession", "Damage", "Taken", "Downed", "Dead"
    );
    for agent in &analysis.statistics.agents {
        if agent.account.is_none() {
            continue;
        }
        println!(
            "  {:24} {:10} {:>10} {:>10} {:>8} {:>8}",
            truncate(&agent.name, 24),
            agent.profession.unwrap_or("?"),
            format_number(agent.damage_dealt),
            format_number(agent.damage_received),
            format_duration(agent.time_downed_ms),
            format_duration(agent.time_dead_ms),
        );
        for uptime in &agent.buff_uptimes {
            if uptime.uptime > 0.0 {
                println!(
                    "      {:20} {:>5.1}%",
                    uptime.skill_name,
                    uptime.uptime * 100.0
                );
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.chars().count() <= max {
        return s;
    }
    let end = s
        .char_indices()
        .nth(max)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[..end]
}

fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}.{:03}", secs / 60, secs % 60, ms % 1000)
}

fn format_number(n: i64) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 10_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}
