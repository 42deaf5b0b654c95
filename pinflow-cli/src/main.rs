use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

use pinflow_core::{ApiClient, ClientConfig, Session};

mod commands;
mod token_store;

#[derive(Parser, Debug)]
#[command(name = "pinflow")]
#[command(author, version, about = "pinflow - social automation console")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and keep the session token in the system keyring
    Login {
        #[arg(long)]
        email: String,
    },
    /// Create an account
    Register,
    /// Show the signed-in account
    Me,
    /// Drop the stored session
    Logout,
    /// Product catalog
    Products {
        #[command(subcommand)]
        command: commands::catalog::ProductsCommand,
    },
    /// Scheduled pins
    Pins {
        #[command(subcommand)]
        command: commands::catalog::PinsCommand,
    },
    /// Pinterest account connection
    Pinterest {
        #[command(subcommand)]
        command: commands::connect::PinterestCommand,
    },
    /// Etsy shop connection
    Etsy {
        #[command(subcommand)]
        command: commands::connect::EtsyCommand,
    },
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("pinflow_core=info".parse().unwrap_or_default())
        .add_directive("pinflow_cli=info".parse().unwrap_or_default());
    let sub = fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(sub).expect("Failed to set global subscriber");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    let session = match token_store::load() {
        Some(token) => Session::with_token(token),
        None => Session::new(),
    };
    let api = Arc::new(ApiClient::new(&config, session.clone())?);

    // A 401 anywhere invalidates the session; mirror that into the
    // keyring so the next invocation starts signed out.
    let mut session_rx = session.subscribe();
    let was_active = session.is_active();
    tokio::spawn(async move {
        while session_rx.changed().await.is_ok() {
            if was_active && session_rx.borrow_and_update().is_none() {
                token_store::clear();
                error!("session expired; run `pinflow login` to sign in again");
            }
        }
    });

    commands::run(cli.command, &api, &config).await
}
