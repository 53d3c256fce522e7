use anyhow::Result;
use clap::{Parser, Subcommand};

use walletbook::cli::{
    handle_ask_command, handle_category_command, handle_report_command,
    handle_transaction_command, handle_wallet_command,
};
use walletbook::config::WalletbookPaths;
use walletbook::storage::{initialize_storage, Storage};
use walletbook::Tracker;

#[derive(Parser)]
#[command(
    name = "walletbook",
    version,
    about = "Multi-wallet personal finance ledger",
    long_about = "Walletbook keeps balances for cash, card and foreign-currency \
                  wallets, records income and expenses against a category tree \
                  and reports where the money went."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and the default wallets and categories
    Init,

    /// Show current configuration and paths
    Config,

    /// Wallet management commands
    #[command(subcommand)]
    Wallet(walletbook::cli::WalletCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(walletbook::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(walletbook::cli::TransactionCommands),

    /// Reports
    #[command(subcommand)]
    Report(walletbook::cli::ReportCommands),

    /// Execute an assistant intent given as JSON
    Ask {
        /// Intent, e.g. '{"action":"search","query":"taxi"}'
        json: String,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    walletbook::init_tracing();
    let cli = Cli::parse();

    let paths = WalletbookPaths::new()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing Walletbook at: {}", paths.data_dir().display());
            if initialize_storage(&paths)? {
                println!("Initialization complete!");
                println!();
                println!("Default wallets: Cash, Card, Dollars (USD)");
                println!("Default categories: Food, Transport, Housing, Health, Entertainment,");
                println!("  Shopping, Salary, Freelance, Gifts");
                println!();
                println!("Run 'walletbook category list' to see the full tree.");
            } else {
                println!("Already initialized.");
            }
        }
        Some(Commands::Config) => {
            let tracker = Tracker::open(Storage::new(paths.clone())?)?;
            let settings = &tracker.data().settings;
            println!("Walletbook Configuration");
            println!("========================");
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Snapshot file:    {}", paths.snapshot_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("Settings:");
            println!("  Base currency:  {}", settings.base_currency);
            println!("  Date format:    {}", settings.date_format);
            println!("  Period window:  {} day(s)", settings.trailing_days);
        }
        Some(Commands::Wallet(cmd)) => {
            let mut tracker = Tracker::open(Storage::new(paths)?)?;
            handle_wallet_command(&mut tracker, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            let mut tracker = Tracker::open(Storage::new(paths)?)?;
            handle_category_command(&mut tracker, cmd)?;
        }
        Some(Commands::Txn(cmd)) => {
            let mut tracker = Tracker::open(Storage::new(paths)?)?;
            handle_transaction_command(&mut tracker, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            let tracker = Tracker::open(Storage::new(paths)?)?;
            handle_report_command(&tracker, cmd)?;
        }
        Some(Commands::Ask { json }) => {
            let mut tracker = Tracker::open(Storage::new(paths)?)?;
            handle_ask_command(&mut tracker, &json)?;
        }
        Some(Commands::Audit { limit }) => {
            let tracker = Tracker::open(Storage::new(paths)?)?;
            let entries = match tracker.audit_log() {
                Some(log) => log.read_recent(limit)?,
                None => Vec::new(),
            };
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        None => {
            println!("Walletbook - multi-wallet personal finance ledger");
            println!();
            println!("Run 'walletbook --help' for usage information.");
            println!("Run 'walletbook init' to create the default wallets and categories.");
        }
    }

    Ok(())
}
