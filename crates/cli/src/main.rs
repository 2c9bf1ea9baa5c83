//! Toko CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! toko migrate
//!
//! # Register a user (password may come from TOKO_NEW_USER_PASSWORD)
//! toko user create -u alice -e alice@example.com -p secret1
//!
//! # Load products from a YAML file
//! toko seed products data/products.yaml
//! ```
//!
//! Connection settings come from the same environment variables as the API
//! server (`TOKO_DATABASE_URL`, `TOKO_ARGON2_*`, ...).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "toko")]
#[command(author, version, about = "Toko CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a new user
    Create {
        /// Display name
        #[arg(short, long)]
        username: String,

        /// Email address (login key)
        #[arg(short, long)]
        email: String,

        /// Plaintext password
        #[arg(short, long, env = "TOKO_NEW_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Create products from a YAML list
    Products {
        /// Path to the YAML file
        file: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                email,
                password,
            } => {
                commands::user::create(username, email, password.into()).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => {
                commands::seed::products(&file).await?;
            }
        },
    }
    Ok(())
}
