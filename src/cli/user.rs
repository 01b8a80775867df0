//! User CLI commands

use clap::Subcommand;

use crate::error::PiggyResult;
use crate::services::UserService;
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Add {
        /// Unique username
        username: String,
        /// Email address
        #[arg(short, long, default_value = "")]
        email: String,
    },
    /// List all users
    List,
}

/// Handle a user command
pub fn handle_user_command(storage: &Storage, cmd: UserCommands) -> PiggyResult<()> {
    let service = UserService::from_storage(storage);

    match cmd {
        UserCommands::Add { username, email } => {
            let user = service.create(&username, &email)?;
            println!("Created user: {}", user.username);
            println!("  ID: {}", user.id);
        }

        UserCommands::List => {
            let users = service.list()?;
            if users.is_empty() {
                println!("No users found.");
            }
            for user in users {
                if user.email.is_empty() {
                    println!("  {}", user.username);
                } else {
                    println!("  {} <{}>", user.username, user.email);
                }
            }
        }
    }

    Ok(())
}
