//! Cache management commands

use chrono::{DateTime, Local};
use serde_json::json;

use crate::cache::CacheStorage;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::output::json::print_json;

/// Show cache status/statistics
pub fn status(format: OutputFormat) -> Result<()> {
    let cache = CacheStorage::open()?;
    let stats = cache.stats()?;
    let path = cache.path().display().to_string();

    match format {
        OutputFormat::Json => print_json(&json!({
            "total_entries": stats.total_entries,
            "valid_entries": stats.valid_entries,
            "expired_entries": stats.expired_entries,
            "total_size_bytes": stats.total_size_bytes,
            "total_size_human": format_size(stats.total_size_bytes),
            "oldest_entry_timestamp": stats.oldest_entry,
            "newest_entry_timestamp": stats.newest_entry,
            "path": path,
        }))?,
        _ => {
            println!("Cache Status");
            println!("────────────────────────────────────────");
            println!("Database:       {}", path);
            println!("Valid entries:  {}", stats.valid_entries);
            println!("Expired:        {}", stats.expired_entries);
            println!("Total size:     {}", format_size(stats.total_size_bytes));
            if let Some(oldest) = stats.oldest_entry {
                println!("Oldest entry:   {}", format_local(oldest));
            }
            if let Some(newest) = stats.newest_entry {
                println!("Newest entry:   {}", format_local(newest));
            }
        }
    }

    Ok(())
}

/// Clear all cache entries
pub fn clear(format: OutputFormat) -> Result<()> {
    let stats = CacheStorage::open()?.clear_all()?;

    match format {
        OutputFormat::Json => print_json(&json!({
            "entries_removed": stats.entries_removed,
            "success": true,
        }))?,
        _ if stats.entries_removed > 0 => {
            println!("Cleared {} cache entries", stats.entries_removed)
        }
        _ => println!("Cache was already empty"),
    }

    Ok(())
}

/// Print the cache directory
pub fn path() -> Result<()> {
    println!("{}", CacheStorage::cache_dir()?.display());
    Ok(())
}

fn format_local(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|d| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Format bytes as human-readable size
fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
