use anyhow::Result;
use clap::{Parser, Subcommand};

use piggybank::cli::{
    handle_expense_command, handle_household_command, handle_report_command,
    handle_share_command, handle_user_command,
};
use piggybank::config::{paths::PiggyPaths, settings::Settings};
use piggybank::services::UserService;
use piggybank::storage::Storage;

#[derive(Parser)]
#[command(
    name = "piggybank",
    version,
    about = "Split household expenses, settle shares and report on them",
    long_about = "PiggyBank keeps track of a shared household's expenses. Each expense \
                  is split equally among the household's members; members mark their \
                  shares paid and can generate PDF reports of what they owed."
)]
struct Cli {
    /// Act as this user
    #[arg(long = "as", global = true, env = "PIGGYBANK_USER", value_name = "USERNAME")]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// User management commands
    #[command(subcommand)]
    User(piggybank::cli::UserCommands),

    /// Household management commands
    #[command(subcommand)]
    Household(piggybank::cli::HouseholdCommands),

    /// Expense commands
    #[command(subcommand)]
    Expense(piggybank::cli::ExpenseCommands),

    /// Share commands
    #[command(subcommand)]
    Share(piggybank::cli::ShareCommands),

    /// Report commands
    #[command(subcommand)]
    Report(piggybank::cli::ReportCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = PiggyPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    piggybank::observability::init(&settings.log_filter, settings.log_json);

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    // Resolved only for commands that act on behalf of a user
    let caller = || UserService::from_storage(&storage).resolve_caller(cli.user.as_deref());

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing PiggyBank at: {}", paths.base_dir().display());
            let created = piggybank::storage::init::initialize_storage(&paths)?;
            if !created {
                println!("Existing settings kept.");
            }
            println!("Initialization complete!");
            println!();
            println!("Next: 'piggybank user add <name>' and 'piggybank --as <name> household create <name>'.");
        }
        Some(Commands::Config) => {
            println!("PiggyBank Configuration");
            println!("=======================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Data directory:    {}", paths.data_dir().display());
            println!("Reports directory: {}", paths.reports_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Share fan-out:    {:?}", settings.share_fanout);
            println!("  Max name length:  {}", settings.expense_rules.max_name_length);
            println!("  Minimum amount:   {}", settings.expense_rules.minimum_amount);
            println!("  Maximum amount:   {}", settings.expense_rules.maximum_amount);
            println!("  Log filter:       {}", settings.log_filter);
        }
        Some(Commands::User(cmd)) => {
            handle_user_command(&storage, cmd)?;
        }
        Some(Commands::Household(cmd)) => {
            handle_household_command(&storage, &settings, &caller()?, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, &caller()?, cmd)?;
        }
        Some(Commands::Share(cmd)) => {
            handle_share_command(&storage, &settings, &caller()?, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, &caller()?, cmd)?;
        }
        None => {
            println!("PiggyBank - household expense splitting");
            println!();
            println!("Run 'piggybank --help' for usage information.");
        }
    }

    Ok(())
}
