// WIT CLI - EVE combat log analysis

mod report;

use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::Path;
use wit_core::{parse_combat_log_report, CombatSummary, ParseStats};

use crate::report::print_summary;

const DEFAULT_API_URL: &str = "http://localhost:3000";

// same default limit the api enforces
const DEFAULT_MAX_LOG_BYTES: u64 = 8 * 1024 * 1024;

#[derive(Parser)]
#[command(name = "wit")]
#[command(author = "WIT Team")]
#[command(version = "0.1.0")]
#[command(about = "EVE combat log analysis CLI", long_about = None)]
struct Cli {
    /// API server URL
    #[arg(short, long, env = "WIT_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// API key for authentication (or set WIT_API_KEY env var)
    #[arg(short = 'k', long, env = "WIT_API_KEY")]
    api_key: Option<String>,

    /// Largest log file accepted, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_LOG_BYTES)]
    max_bytes: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a combat log locally and print the summary
    Parse {
        /// Path to the combat log file
        file: String,

        /// Print parsed events as JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Rows per breakdown table
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Upload a combat log to the API for storage
    Upload {
        /// Path to the combat log file
        file: String,

        /// Discord id of the uploader
        #[arg(short, long, env = "WIT_UPLOADER_ID")]
        uploader: String,

        /// Rows per breakdown table
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// List stored combat sessions
    Sessions {
        /// Only sessions uploaded by this discord id
        #[arg(short, long)]
        uploader: Option<String>,

        /// Number of sessions to show
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// Check API health
    Status,
}

// API Response types
#[derive(Deserialize)]
struct UploadResponse {
    session_id: String,
    events: usize,
    stats: ParseStats,
    summary: CombatSummary,
}

#[derive(Deserialize)]
struct SessionItem {
    session_id: String,
    uploader_id: String,
    events: u64,
    started_at: String,
    ended_at: String,
}

#[derive(Serialize)]
struct UploadRequest<'a> {
    uploader_id: &'a str,
    text: &'a str,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Build client with optional API key header
    let mut headers = reqwest::header::HeaderMap::new();
    if let Some(ref key) = cli.api_key {
        headers.insert("X-API-Key", reqwest::header::HeaderValue::from_str(key)?);
    }
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .build()?;

    match cli.command {
        Commands::Parse { file, json, top } => {
            parse_file(&file, cli.max_bytes, json, top)?;
        }
        Commands::Upload { file, uploader, top } => {
            upload_file(&client, &cli.api_url, &file, cli.max_bytes, &uploader, top).await?;
        }
        Commands::Sessions { uploader, limit } => {
            show_sessions(&client, &cli.api_url, uploader, limit).await?;
        }
        Commands::Status => {
            check_status(&client, &cli.api_url).await?;
        }
    }

    Ok(())
}

/// Read a log file, refusing anything over the size limit
fn read_log(file_path: &str, max_bytes: u64) -> Result<String, Box<dyn std::error::Error>> {
    let size = std::fs::metadata(Path::new(file_path))?.len();
    if size > max_bytes {
        return Err(format!("{} is {} bytes, the limit is {} bytes", file_path, size, max_bytes).into());
    }
    // game logs are not always valid utf-8
    let bytes = std::fs::read(file_path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn parse_file(
    file_path: &str,
    max_bytes: u64,
    json: bool,
    top: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_log(file_path, max_bytes)?;
    let report = parse_combat_log_report(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&report.events)?);
        return Ok(());
    }

    println!("\n{} {}", "⚔ Combat log:".cyan().bold(), file_path);
    println!("{}", "─".repeat(60).dimmed());

    if report.events.is_empty() {
        println!("{}", "No combat events found.".yellow());
        return Ok(());
    }

    let summary = CombatSummary::from_events(&report.events);
    print_summary(&summary, Some(&report.stats), top);
    println!();

    Ok(())
}

async fn upload_file(
    client: &reqwest::Client,
    api_url: &str,
    file_path: &str,
    max_bytes: u64,
    uploader: &str,
    top: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{} {}", "📤 Uploading:".cyan().bold(), file_path);
    println!("{} {}", "Uploader:".dimmed(), uploader);
    println!("{}", "─".repeat(60).dimmed());

    let text = read_log(file_path, max_bytes)?;

    let url = format!("{}/api/combat-logs", api_url);
    let response = client
        .post(&url)
        .json(&UploadRequest {
            uploader_id: uploader,
            text: &text,
        })
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error = response.text().await.unwrap_or_default();
        println!("{} {} - {}", "✗ Failed:".red().bold(), status, error);
        return Ok(());
    }

    let result: UploadResponse = response.json().await?;

    println!(
        "{} session {} ({} events)",
        "✓ Stored".green().bold(),
        result.session_id.yellow(),
        result.events
    );
    print_summary(&result.summary, Some(&result.stats), top);
    println!();

    Ok(())
}

async fn show_sessions(
    client: &reqwest::Client,
    api_url: &str,
    uploader: Option<String>,
    limit: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{}", "📋 Combat Sessions".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());

    let url = format!("{}/api/combat-logs/sessions", api_url);
    let mut request = client.get(&url).query(&[("limit", limit.to_string())]);
    if let Some(ref u) = uploader {
        request = request.query(&[("uploader_id", u)]);
    }
    let response = request.send().await?;

    if !response.status().is_success() {
        let error = response.text().await?;
        println!("{} {}", "Error:".red().bold(), error);
        return Ok(());
    }

    let sessions: Vec<SessionItem> = response.json().await?;

    if sessions.is_empty() {
        println!("{}", "No sessions found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Session", "Uploader", "Events", "Start", "End"]);

    for s in &sessions {
        table.add_row(vec![
            s.session_id.clone(),
            s.uploader_id.clone(),
            s.events.to_string(),
            s.started_at.clone(),
            s.ended_at.clone(),
        ]);
    }

    println!("{table}");
    println!("\n{} {}", "Found:".dimmed(), sessions.len().to_string().green());

    Ok(())
}

async fn check_status(
    client: &reqwest::Client,
    api_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{}", "🔧 System Status".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    print!("  API Server ({})... ", api_url);
    io::stdout().flush()?;

    match client.get(format!("{}/health", api_url)).send().await {
        Ok(resp) if resp.status().is_success() => {
            println!("{}", "✓ Running".green());
        }
        Ok(resp) => {
            println!("{} ({})", "✗ Error".red(), resp.status());
        }
        Err(e) => {
            println!("{} ({})", "✗ Down".red(), e);
        }
    }

    println!();
    Ok(())
}
