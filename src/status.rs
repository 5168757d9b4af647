// Data directory status — session counts, cleaned exports, last combine.

use std::fs;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::config::Config;
use crate::pipeline::clean::session_files;

/// Display pipeline status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    if !config.data_dir.is_dir() {
        println!("Data directory: not found ({})", config.data_dir.display());
        println!("\nRun `semspace init` to create the directory layout.");
        return Ok(());
    }

    let sessions = session_files(&config.data_dir)?;
    println!(
        "Raw sessions: {} file(s) in {}",
        sessions.len(),
        config.data_dir.display()
    );
    if sessions.is_empty() {
        println!("  Drop session uploads (P<id>_<timestamp>.json) here first.");
    }

    let cleaned = count_matching(&config.cleaned_dir, "cleaned_", ".csv");
    match cleaned {
        Some(n) if n > 0 => println!(
            "Cleaned participants: {} file(s) in {}",
            n,
            config.cleaned_dir.display()
        ),
        _ => {
            println!("Cleaned participants: none");
            println!("  Run `semspace clean` to clean raw sessions.");
        }
    }

    let rdms_path = config.output_dir.join("all_rdms.json");
    if rdms_path.is_file() {
        let modified = fs::metadata(&rdms_path)
            .and_then(|m| m.modified())
            .map(|t| {
                DateTime::<Local>::from(t)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_else(|_| "unknown".to_string());
        println!("Combined RDMs: {} (written {})", rdms_path.display(), modified);
    } else {
        println!("Combined RDMs: not yet built");
        println!("  Run `semspace combine` after cleaning.");
    }

    Ok(())
}

fn count_matching(dir: &Path, prefix: &str, suffix: &str) -> Option<usize> {
    let entries = fs::read_dir(dir).ok()?;
    let count = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(prefix) && name.ends_with(suffix))
        })
        .count();
    Some(count)
}
