use anyhow::Result;
use clap::{Parser, Subcommand};

use faqstore::cli::{handle_backup_command, handle_faq_command};
use faqstore::config::{FaqPaths, Settings};
use faqstore::FaqStore;

#[derive(Parser)]
#[command(
    name = "faqstore",
    author = "Kaylee Beyene",
    version,
    about = "File-backed FAQ store with atomic writes and rotating backups",
    long_about = "faqstore manages the FAQ knowledge base of a two-environment chatbot. \
                  Each environment's FAQ entries live in one JSON document; every change \
                  is snapshotted first so it can be restored later."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// FAQ entry management commands
    Faq(faqstore::cli::FaqArgs),

    /// Backup management commands
    #[command(subcommand)]
    Backup(faqstore::cli::BackupCommands),

    /// Initialize the data directory and settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = FaqPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    faqstore::logging::init(&settings.log_level);

    match cli.command {
        Some(Commands::Faq(args)) => {
            let store = FaqStore::open(paths, &settings)?;
            handle_faq_command(&store, args)?;
        }
        Some(Commands::Backup(cmd)) => {
            let store = FaqStore::open(paths, &settings)?;
            handle_backup_command(&store, &settings, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing faqstore at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!(
                "Environments: {} and {}",
                settings.environments[0], settings.environments[1]
            );
            println!(
                "Run 'faqstore faq --env {} list' to see its entries.",
                settings.environments[0]
            );
        }
        Some(Commands::Config) => {
            println!("faqstore Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!(
                "  Environments:   {}, {}",
                settings.environments[0], settings.environments[1]
            );
            println!(
                "  Retention:      {} day(s)",
                settings.backup_retention.retention_days
            );
            println!("  Lock timeout:   {} ms", settings.lock_timeout_ms);
            println!("  Log level:      {}", settings.log_level);
        }
        None => {
            println!("faqstore - File-backed FAQ store");
            println!();
            println!("Run 'faqstore --help' for usage information.");
        }
    }

    Ok(())
}
