//! Smart Recycle CLI - log in, sign up and manage reward points from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in with one of the seeded demo accounts
//! smart-recycle login --demo user
//!
//! # Create an account (prompts for the password)
//! smart-recycle register --name "Ada" --email ada@example.com --phone 555 --address "1 Loop"
//!
//! # Show the logged-in user, then set their points
//! smart-recycle whoami
//! smart-recycle points 1300
//! ```

mod commands;

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use smart_recycle_core::auth::FixedDelay;
use smart_recycle_core::{Config, FileStore, SessionManager};

#[derive(Parser)]
#[command(name = "smart-recycle")]
#[command(author, version, about = "Smart Recycle account tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,

        /// Use a seeded demo account (`admin` or `user`)
        #[arg(long, conflicts_with = "email")]
        demo: Option<String>,
    },
    /// Create a new account
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        phone: String,

        #[arg(short, long)]
        address: String,
    },
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Set the logged-in user's reward points
    Points {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// List registered accounts
    Users,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    let data_dir = config.data_dir()?;
    info!(?data_dir, "Using data directory");
    let mut manager = SessionManager::new(
        FileStore::new(data_dir),
        FixedDelay(config.login_delay()),
    );

    match cli.command {
        Commands::Login { email, demo } => {
            commands::login(&mut manager, &mut config, email, demo.as_deref()).await
        }
        Commands::Register {
            name,
            email,
            phone,
            address,
        } => commands::register(&mut manager, name, email, phone, address).await,
        Commands::Logout => {
            commands::logout(&mut manager);
            Ok(())
        }
        Commands::Whoami => commands::whoami(&manager),
        Commands::Points { value } => commands::points(&mut manager, value),
        Commands::Users => commands::users(&manager),
    }
}
