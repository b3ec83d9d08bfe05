use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finvault::cli::{
    handle_backup_command, handle_category_command, handle_export_command, handle_report_command,
    handle_transaction_command, BackupCommands, CategoryCommands, ExportCommands, ReportCommands,
    TransactionCommands,
};
use finvault::config::{FinvaultPaths, Settings};
use finvault::storage::{initialize_storage, Storage};

/// Environment variable holding the log filter
const LOG_ENV_VAR: &str = "FINVAULT_LOG";

#[derive(Parser)]
#[command(
    name = "finvault",
    version,
    about = "Personal finance ledger with encrypted backups",
    long_about = "finvault records income and expenses by category, reports monthly \
                  cash flow, category trends and spending patterns, and keeps \
                  password-encrypted backups of the whole ledger."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default categories
    Init,

    /// Show current configuration and paths
    Config,

    /// Category management commands
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Analytics reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Plain CSV exports
    #[command(subcommand)]
    Export(ExportCommands),

    /// Encrypted backup management
    #[command(subcommand)]
    Backup(BackupCommands),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = FinvaultPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("finvault - personal finance ledger");
        println!();
        println!("Run 'finvault --help' for usage information.");
        println!("Run 'finvault init' to get started.");
        return Ok(());
    };

    match command {
        Commands::Init => {
            println!("Initializing finvault at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.setup_completed = true;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Default categories have been created:");
            println!("  - Expenses: Food, Transport, Housing, Health, Leisure, Education, Other");
            println!("  - Income:   Salary, Investments, Yield");
            println!();
            println!("Run 'finvault category list' to see all categories.");
        }
        Commands::Config => {
            println!("finvault Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.preferences.currency_symbol);
            println!("  CSV delimiter:   {}", settings.preferences.csv_delimiter);
            println!("  Key derivation:  {}", settings.crypto.kdf);
            println!(
                "  Retention:       {} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
            println!("  Initialized:     {}", paths.is_initialized());
        }
        Commands::Category(cmd) => {
            handle_category_command(&Storage::open(paths)?, &settings, cmd)?;
        }
        Commands::Transaction(cmd) => {
            handle_transaction_command(&Storage::open(paths)?, &settings, cmd)?;
        }
        Commands::Report(cmd) => {
            handle_report_command(&Storage::open(paths)?, &settings, cmd)?;
        }
        Commands::Export(cmd) => {
            handle_export_command(&Storage::open(paths)?, &settings, cmd)?;
        }
        Commands::Backup(cmd) => {
            handle_backup_command(&Storage::open(paths)?, &settings, cmd)?;
        }
    }

    Ok(())
}
