//! Backup display formatting

use chrono::{DateTime, Utc};

use crate::backup::{BackupArtifact, ValidationResult};

use super::{format_duration, format_size};

/// Format backups newest first, one per line or with details when `verbose`
pub fn format_backup_list(backups: &[BackupArtifact], now: DateTime<Utc>, verbose: bool) -> String {
    if backups.is_empty() {
        return "No backups found.\nCreate one with: faqstore backup create <environment>\n"
            .to_string();
    }

    let mut output = String::new();
    output.push_str("Available Backups\n");
    output.push_str("=================\n\n");

    for (i, backup) in backups.iter().enumerate() {
        let age = format_duration(now.signed_duration_since(backup.created_at));

        if verbose {
            output.push_str(&format!(
                "{}. {}\n   Environment: {}\n   Created: {}\n   Size: {}\n   Age: {}\n   SHA-256: {}\n\n",
                i + 1,
                backup.filename,
                backup.environment,
                backup.created_at.format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                format_size(backup.size_bytes),
                age,
                backup.checksum,
            ));
        } else {
            output.push_str(&format!(
                "  {}. {} ({} ago, {})\n",
                i + 1,
                backup.filename,
                age,
                format_size(backup.size_bytes),
            ));
        }
    }

    output.push_str(&format!("\nTotal: {} backup(s)\n", backups.len()));
    output
}

/// Format a validated backup
pub fn format_backup_details(validation: &ValidationResult) -> String {
    let backup = &validation.artifact;
    let mut output = String::new();

    output.push_str("Backup Details\n");
    output.push_str("==============\n");
    output.push_str(&format!("File: {}\n", backup.path.display()));
    output.push_str(&format!("Environment: {}\n", backup.environment));
    output.push_str(&format!(
        "Created: {}\n",
        backup.created_at.format("%Y-%m-%d %H:%M:%S%.3f UTC")
    ));
    output.push_str(&format!("Size: {}\n", format_size(backup.size_bytes)));
    output.push_str(&format!("SHA-256: {}\n", backup.checksum));
    output.push('\n');
    output.push_str(&format!("Status: {}\n", validation.summary()));
    output
}
