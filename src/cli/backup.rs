//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use std::path::Path;

use clap::Subcommand;

use crate::backup::BackupArtifact;
use crate::config::Settings;
use crate::display::backup::{format_backup_details, format_backup_list};
use crate::error::{FaqStoreError, FaqStoreResult};
use crate::models::Environment;
use crate::store::FaqStore;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot an environment's current FAQ document
    Create {
        /// Environment name
        env: String,
    },

    /// List available backups, newest first
    List {
        /// Only backups of this environment
        #[arg(short, long)]
        env: Option<String>,
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore a backup into its environment
    Restore {
        /// Backup filename (use 'latest' for the most recent)
        backup: String,

        /// Target environment
        #[arg(short, long)]
        env: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show and validate a specific backup
    Info {
        /// Backup filename (use 'latest' for the most recent)
        backup: String,

        /// Environment used to resolve 'latest'
        #[arg(short, long)]
        env: Option<String>,
    },

    /// Delete backups older than the retention window
    Prune {
        /// Retention window in days (defaults to the configured value)
        #[arg(short, long)]
        days: Option<u32>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete one backup
    Delete {
        /// Backup filename
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    store: &FaqStore,
    settings: &Settings,
    cmd: BackupCommands,
) -> FaqStoreResult<()> {
    let manager = store.backups();

    match cmd {
        BackupCommands::Create { env } => {
            let env = store.environment(&env)?;
            println!("Creating backup of '{}'...", env);
            let artifact = manager.snapshot(&env)?;
            println!("Backup created: {}", artifact.filename);
            println!("Location: {}", artifact.path.display());
        }

        BackupCommands::List { env, verbose } => {
            let env = env.map(|e| store.environment(&e)).transpose()?;
            let backups = manager.list(env.as_ref())?;
            print!(
                "{}",
                format_backup_list(&backups, chrono::Utc::now(), verbose)
            );
        }

        BackupCommands::Restore { backup, env, force } => {
            let target = store.environment(&env)?;
            let artifact = resolve_backup(store, &backup, Some(&target))?;
            let validation = manager.validate(&artifact.filename)?;

            print!("{}", format_backup_details(&validation));
            println!();

            if !force {
                println!("WARNING: This will overwrite the current '{}' FAQ document!", target);
                println!("A snapshot of the current state is taken first.");
                println!("To proceed, run again with --force flag:");
                println!("  faqstore backup restore {} --env {} --force", backup, target);
                return Ok(());
            }

            println!("Restoring from backup...");
            let result = manager.restore(&artifact.filename, &target)?;
            println!("Restore complete!");
            println!("{}", result.summary());
        }

        BackupCommands::Info { backup, env } => {
            let env = env.map(|e| store.environment(&e)).transpose()?;
            let artifact = resolve_backup(store, &backup, env.as_ref())?;
            let validation = manager.validate(&artifact.filename)?;
            print!("{}", format_backup_details(&validation));
        }

        BackupCommands::Prune { days, force } => {
            let days = days.unwrap_or(settings.backup_retention.retention_days);
            let candidates = manager.prune_candidates(days)?;

            if candidates.is_empty() {
                println!("No backups to prune.");
                println!("Retention window: {} day(s)", days);
                return Ok(());
            }

            println!("Prune Summary");
            println!("=============");
            println!("Retention window: {} day(s)", days);
            println!("To be deleted: {} backup(s)", candidates.len());
            for artifact in &candidates {
                println!("  {}", artifact.filename);
            }
            println!();

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  faqstore backup prune --days {} --force", days);
                return Ok(());
            }

            let deleted = manager.prune(days)?;
            println!("Deleted {} backup(s).", deleted);
            if deleted < candidates.len() {
                println!(
                    "{} backup(s) could not be deleted; see the log for details.",
                    candidates.len() - deleted
                );
            }
        }

        BackupCommands::Delete { backup, force } => {
            let artifact = manager.get(&backup_filename(&backup))?;

            if !force {
                println!("This will permanently delete {}", artifact.filename);
                println!("To proceed, run again with --force flag.");
                return Ok(());
            }

            manager.delete(&artifact.filename)?;
            println!("Deleted backup: {}", artifact.filename);
        }
    }

    Ok(())
}

/// Resolve a backup identifier: 'latest', a filename, or a path into the backup directory
fn resolve_backup(
    store: &FaqStore,
    backup: &str,
    env: Option<&Environment>,
) -> FaqStoreResult<BackupArtifact> {
    let manager = store.backups();

    if backup.eq_ignore_ascii_case("latest") {
        let latest = match env {
            Some(env) => manager.latest(env)?,
            None => manager.list(None)?.into_iter().next(),
        };
        return latest.ok_or_else(|| FaqStoreError::backup_not_found("latest"));
    }

    let filename = backup_filename(backup);
    match manager.get(&filename) {
        Err(e) if e.is_not_found() && !filename.ends_with(".json") => {
            manager.get(&format!("{}.json", filename))
        }
        other => other,
    }
}

/// Accept either a bare filename or a path to one
fn backup_filename(backup: &str) -> String {
    Path::new(backup)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| backup.to_string())
}
