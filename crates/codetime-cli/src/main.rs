//! Codetime CLI
//!
//! Command-line interface for viewing recorded focus sessions.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codetime_core::{default_log_dir, format_hms, SessionRecord};
use colored::Colorize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

#[derive(Parser)]
#[command(name = "codetime")]
#[command(about = "VS Code focus tracker - see how long you really spent in the editor!")]
#[command(version)]
struct Cli {
    /// Session log directory (defaults to the tracker's data dir)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recorded sessions
    Sessions,

    /// Show total active time across all recorded sessions
    Total,

    /// Export recorded sessions as JSON
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "Session")]
    id: String,
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Ended")]
    ended: String,
    #[tabled(rename = "Active")]
    active: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_dir = cli.log_dir.unwrap_or_else(default_log_dir);

    match cli.command {
        Commands::Sessions => cmd_sessions(&log_dir),
        Commands::Total => cmd_total(&log_dir),
        Commands::Export { output } => cmd_export(&log_dir, output),
    }
}

fn cmd_sessions(log_dir: &Path) -> Result<()> {
    let records = load_records(log_dir)?;
    if records.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    let rows: Vec<SessionRow> = records
        .iter()
        .map(|record| SessionRow {
            id: record.session.id.clone(),
            started: record
                .session
                .started_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            ended: record
                .session
                .ended_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
            active: format_hms(record.session.total_active_ms),
        })
        .collect();

    println!("{}", "Recorded sessions".bold());
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    Ok(())
}

fn cmd_total(log_dir: &Path) -> Result<()> {
    let records = load_records(log_dir)?;
    let total_ms: u64 = records.iter().map(|r| r.session.total_active_ms).sum();

    println!(
        "{} across {} sessions",
        format_hms(total_ms).green().bold(),
        records.len()
    );

    Ok(())
}

fn cmd_export(log_dir: &Path, output: Option<PathBuf>) -> Result<()> {
    let records = load_records(log_dir)?;
    let json = serde_json::to_string_pretty(&records)?;

    match output {
        Some(path) => {
            fs::write(&path, json)
                .with_context(|| format!("failed to write {:?}", path))?;
            println!("Exported {} sessions to {:?}", records.len(), path);
        }
        None => {
            io::stdout().write_all(json.as_bytes())?;
            println!();
        }
    }

    Ok(())
}

/// Loads every parseable session log, oldest first. Unreadable or
/// malformed files are skipped with a warning.
fn load_records(log_dir: &Path) -> Result<Vec<SessionRecord>> {
    let mut records = Vec::new();

    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(records),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read log dir {:?}", log_dir))
        }
    };

    for entry in entries {
        let path = entry?.path();
        if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
            match read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => {
                    eprintln!("{} skipping {:?}: {}", "warning:".yellow(), path, e);
                }
            }
        }
    }

    records.sort_by(|a, b| a.session.started_at.cmp(&b.session.started_at));
    Ok(records)
}

fn read_record(path: &Path) -> Result<SessionRecord> {
    let raw = fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}
