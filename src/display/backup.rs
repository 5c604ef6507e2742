//! Backup display formatting

use chrono::{Local, NaiveDateTime};
use tabled::{settings::Style, Table, Tabled};

use crate::backup::BackupInfo;

#[derive(Tabled)]
struct BackupRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Shares")]
    shares: usize,
}

/// Format backups as a table, newest first
pub fn format_backup_list(backups: &[BackupInfo]) -> String {
    if backups.is_empty() {
        return "No backups found.".to_string();
    }

    let now = Local::now().naive_local();
    let rows = backups.iter().enumerate().map(|(i, backup)| BackupRow {
        index: i + 1,
        filename: backup.filename.clone(),
        created: backup.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        age: format_age(now, backup.created_at),
        size: format_size(backup.size_bytes),
        shares: backup.share_count,
    });

    Table::new(rows).with(Style::psql()).to_string()
}

/// Format the time between `then` and `now` in human-readable form
pub fn format_age(now: NaiveDateTime, then: NaiveDateTime) -> String {
    let total_seconds = now.signed_duration_since(then).num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
