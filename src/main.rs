//! glucodash - glucose monitoring companion
//!
//! Displays simulated or remotely fetched blood-glucose readings,
//! keeps a log of related events and shows aggregate statistics.
//!
//! Usage:
//!   glucodash demo [hours]       - Show a synthetic session
//!   glucodash stats [hours]      - Summary from the configured source
//!   glucodash fetch [days]       - Raw readings from the remote source
//!   glucodash log ...            - Manage remote log entries
//!   glucodash --help             - Show help
//!   GLUCODASH_DBG=1 glucodash    - Enable debug output

mod api;
mod config;
mod data;
mod error;
mod logbook;
mod model;
mod stats;
mod synthetic;
mod units;

use std::env;

use chrono::{Duration, Utc};
use log::warn;

use crate::api::{ApiClient, ProfileUpdate};
use crate::config::{config_file_path, ensure_data_dir, token_file_path, AppConfig, TokenStore};
use crate::data::{DataAccess, DataSource};
use crate::error::DashError;
use crate::logbook::MemoryLogbook;
use crate::model::{EntryType, NewLogEntry, Reading, StatsSummary, TargetRange};

#[tokio::main]
async fn main() -> Result<(), DashError> {
    let args: Vec<String> = env::args().collect();

    // Check for debug mode
    let debug_mode = env::var("GLUCODASH_DBG").is_ok();

    // Initialize logger
    if debug_mode {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .format_timestamp(None)
            .init();
    }

    // Ensure data directory exists
    if let Err(e) = ensure_data_dir() {
        eprintln!("Warning: Could not create data directory: {}", e);
    }

    // Create default config if it doesn't exist
    let cfg_path = config_file_path();
    if !cfg_path.exists() {
        if let Err(e) = AppConfig::create_default(&cfg_path) {
            if debug_mode {
                warn!("Could not create default config: {}", e);
            }
        }
    }

    // Try loading config from data directory first, then current directory
    let config = AppConfig::load(config_file_path())
        .or_else(|_| AppConfig::load("config.txt"))
        .unwrap_or_else(|e| {
            if debug_mode {
                warn!("Could not load config: {}. Using defaults.", e);
            }
            AppConfig::default()
        });

    let tokens = TokenStore::new(token_file_path());

    // Parse command
    match args.get(1).map(|s| s.as_str()) {
        Some("demo") => {
            let hours = parse_number(args.get(2), 24)?;
            cmd_demo(&config, hours);
        }
        Some("stats") => {
            let hours = parse_number(args.get(2), 24)?;
            cmd_stats(&config, tokens, hours).await?;
        }
        Some("fetch") => {
            let days = parse_number(args.get(2), 1)?;
            cmd_fetch(&config, tokens, days).await?;
        }
        Some("profile") => {
            cmd_profile(&config, tokens, &args[2..]).await?;
        }
        Some("log") => {
            cmd_log(&config, tokens, &args[2..]).await?;
        }
        Some("login") => {
            let token = args
                .get(2)
                .ok_or_else(|| DashError::Validation("usage: glucodash login <token>".into()))?;
            tokens.save(token)?;
            println!("Token stored.");
        }
        Some("logout") => {
            tokens.clear()?;
            println!("Token removed.");
        }
        Some("paths") => {
            cmd_show_paths();
        }
        Some("--version") | Some("-V") => {
            println!("glucodash {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            print_help();
        }
    }

    Ok(())
}

fn parse_number(arg: Option<&String>, default: u32) -> Result<u32, DashError> {
    match arg {
        None => Ok(default),
        Some(s) => s
            .parse()
            .map_err(|_| DashError::Validation(format!("not a number: {}", s))),
    }
}

/// Show a synthetic session: readings summary plus a sample logbook
fn cmd_demo(config: &AppConfig, hours: u32) {
    let readings = synthetic::generate(hours, config.thresholds);
    println!(
        "Synthetic session: {} readings over the last {} hours",
        readings.len(),
        hours
    );
    print_recent_readings(&readings, 6);

    match stats::summarize(&readings) {
        Ok(summary) => print_summary(&summary, config),
        Err(e) => eprintln!("No statistics: {}", e),
    }

    // A few session log entries to show the logbook shape
    let mut logbook = MemoryLogbook::new();
    let now = Utc::now();
    logbook.add(NewLogEntry {
        timestamp: now - Duration::hours(2),
        entry_type: EntryType::Food,
        value: "Salad with grilled chicken".to_string(),
        glucose_reading: Some(110),
    });
    logbook.add(NewLogEntry {
        timestamp: now - Duration::hours(5),
        entry_type: EntryType::Medication,
        value: "10 units insulin".to_string(),
        glucose_reading: Some(145),
    });
    logbook.add(NewLogEntry {
        timestamp: now - Duration::hours(8),
        entry_type: EntryType::Exercise,
        value: "30 min walking".to_string(),
        glucose_reading: Some(100),
    });

    println!();
    println!("Log entries:");
    for entry in logbook.list().iter().rev() {
        print_log_entry(entry);
    }
}

/// Summary from the configured source. A remote failure is surfaced,
/// not silently replaced with synthetic data; switching source is the
/// user's call.
async fn cmd_stats(config: &AppConfig, tokens: TokenStore, hours: u32) -> Result<(), DashError> {
    let client = ApiClient::new(config, tokens)?;
    let access = DataAccess::new(config, client);

    let readings = match access.get_readings(config.data_source, hours).await {
        Ok(readings) => readings,
        Err(DashError::SourceUnavailable(msg)) => {
            eprintln!("Remote source unavailable: {}", msg);
            eprintln!("Run 'glucodash demo' for synthetic data, or set 'data_source synthetic'.");
            return Err(DashError::SourceUnavailable(msg));
        }
        Err(e) => return Err(e),
    };

    println!(
        "{} readings over the last {} hours ({:?} source)",
        readings.len(),
        hours,
        config.data_source
    );
    let summary = stats::summarize(&readings)?;
    print_summary(&summary, config);
    Ok(())
}

fn days_to_hours(days: u32) -> Result<u32, DashError> {
    days.checked_mul(24)
        .ok_or_else(|| DashError::Validation(format!("too many days: {}", days)))
}

/// Dump remote readings as JSON
async fn cmd_fetch(config: &AppConfig, tokens: TokenStore, days: u32) -> Result<(), DashError> {
    let client = ApiClient::new(config, tokens)?;
    let access = DataAccess::new(config, client);
    let readings = access.get_readings(DataSource::Remote, days_to_hours(days)?).await?;

    let json = serde_json::to_string_pretty(&readings)?;
    println!("{}", json);
    Ok(())
}

/// Show the user profile, or update the target range with
/// `profile set-range <min> <max>`
async fn cmd_profile(config: &AppConfig, tokens: TokenStore, args: &[String]) -> Result<(), DashError> {
    let client = ApiClient::new(config, tokens)?;

    let profile = match args.first().map(|s| s.as_str()) {
        Some("set-range") => {
            let min = args.get(1).and_then(|s| s.parse().ok());
            let max = args.get(2).and_then(|s| s.parse().ok());
            let (Some(min), Some(max)) = (min, max) else {
                return Err(DashError::Validation(
                    "usage: glucodash profile set-range <min> <max>".into(),
                ));
            };
            let update = ProfileUpdate {
                target_range: Some(TargetRange { min, max }),
                ..ProfileUpdate::default()
            };
            client.update_user_profile(&update).await?
        }
        Some(other) => {
            return Err(DashError::Validation(format!(
                "unknown profile command: {}",
                other
            )));
        }
        None => client.get_user_profile().await?,
    };

    println!("User:          {}", profile.name);
    println!("Last scanned:  {}", profile.last_scanned.format("%Y-%m-%d %H:%M"));
    println!(
        "Target range:  {}-{} mg/dL",
        profile.target_range.min, profile.target_range.max
    );
    println!("Device:        {}", profile.device.name);
    println!("  Battery:     {}%", profile.device.battery_level);
    println!("  Last sync:   {}", profile.device.last_sync.format("%Y-%m-%d %H:%M"));
    Ok(())
}

/// Remote log-entry management: list, add, delete
async fn cmd_log(config: &AppConfig, tokens: TokenStore, args: &[String]) -> Result<(), DashError> {
    let client = ApiClient::new(config, tokens)?;

    match args.first().map(|s| s.as_str()) {
        Some("list") | None => {
            let entries = client.get_log_entries().await?;
            if entries.is_empty() {
                println!("No log entries.");
            }
            for entry in &entries {
                print_log_entry(entry);
            }
        }
        Some("add") => {
            let entry_type = args
                .get(1)
                .and_then(|s| EntryType::parse(s))
                .ok_or_else(|| {
                    DashError::Validation(
                        "usage: glucodash log add <food|medication|exercise|note> <text> [glucose]"
                            .into(),
                    )
                })?;
            let text = args
                .get(2)
                .ok_or_else(|| DashError::Validation("log entry text is required".into()))?;
            let glucose_reading = match args.get(3) {
                Some(s) => Some(s.parse().map_err(|_| {
                    DashError::Validation(format!("not a glucose value: {}", s))
                })?),
                None => None,
            };

            let entry = NewLogEntry {
                timestamp: Utc::now(),
                entry_type,
                value: text.clone(),
                glucose_reading,
            };
            // Text validation happens here, before the store sees it
            entry.validate()?;

            let created = client.add_log_entry(&entry).await?;
            println!("Added entry {}", created.id);
        }
        Some("delete") => {
            let id = args
                .get(1)
                .ok_or_else(|| DashError::Validation("usage: glucodash log delete <id>".into()))?;
            client.delete_log_entry(id).await?;
            println!("Deleted entry {}", id);
        }
        Some(other) => {
            return Err(DashError::Validation(format!("unknown log command: {}", other)));
        }
    }
    Ok(())
}

fn print_recent_readings(readings: &[Reading], count: usize) {
    let start = readings.len().saturating_sub(count);
    for reading in &readings[start..] {
        println!(
            "  {}  {:>3} mg/dL  {}",
            reading.timestamp.format("%H:%M"),
            reading.value,
            reading.status.label()
        );
    }
}

fn print_summary(summary: &StatsSummary, config: &AppConfig) {
    println!();
    println!("Summary (target {}):", config.thresholds.format_range());
    println!("  Average:        {} mg/dL", summary.average);
    println!("  Time in range:  {}%", summary.time_in_range);
    println!("  Lowest:         {} mg/dL", summary.lowest);
    println!("  Highest:        {} mg/dL", summary.highest);
    println!("  Low events:     {}", summary.low_events);
    println!("  High events:    {}", summary.high_events);
}

fn print_log_entry(entry: &crate::model::LogEntry) {
    let glucose = entry
        .glucose_reading
        .map(|v| format!("  ({} mg/dL)", v))
        .unwrap_or_default();
    println!(
        "  [{}] {}  {} - {}{}",
        entry.id,
        entry.timestamp.format("%Y-%m-%d %H:%M"),
        entry.entry_type.label(),
        entry.value,
        glucose
    );
}

/// Show data paths
fn cmd_show_paths() {
    println!("glucodash data paths:");
    println!("  Data directory:  {}", config::get_data_dir().display());
    println!("  Config file:     {}", config_file_path().display());
    println!("  Token file:      {}", token_file_path().display());
}

fn print_help() {
    eprintln!("glucodash v{}", env!("CARGO_PKG_VERSION"));
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  glucodash demo [hours]                    Synthetic session (default 24h)");
    eprintln!("  glucodash stats [hours]                   Summary from the configured source");
    eprintln!("  glucodash fetch [days]                    Raw remote readings as JSON");
    eprintln!("  glucodash profile                         Show user and device profile");
    eprintln!("  glucodash profile set-range <min> <max>   Update the target range");
    eprintln!("  glucodash log list                        List remote log entries");
    eprintln!("  glucodash log add <type> <text> [mg/dL]   Add a log entry");
    eprintln!("  glucodash log delete <id>                 Delete a log entry");
    eprintln!("  glucodash login <token>                   Store the API bearer token");
    eprintln!("  glucodash logout                          Remove the stored token");
    eprintln!("  glucodash paths                           Show data file locations");
    eprintln!();
    eprintln!("ENVIRONMENT:");
    eprintln!("  GLUCODASH_DBG=1                           Enable debug output");
    eprintln!();
    eprintln!("CONFIG ({}):", config_file_path().display());
    eprintln!("  base_url, api_version, timeout_secs, threshold_low, threshold_high,");
    eprintln!("  data_source (synthetic or remote)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_to_hours_rejects_overflow() {
        assert_eq!(days_to_hours(7).unwrap(), 168);
        assert!(matches!(
            days_to_hours(200_000_000),
            Err(DashError::Validation(_))
        ));
    }
}
