use std::sync::Arc;

use clap::Subcommand;
use tracing::warn;

use pinflow_common::models::{PinDraft, PinterestCredentials};
use pinflow_core::api::PinterestConnect;
use pinflow_core::connect::{ConnectState, ConnectionPoller, PollerSettings};
use pinflow_core::oauth::{self, CallbackOutcome};
use pinflow_core::{ApiClient, ClientConfig};

use super::{catalog, prompt_line};

#[derive(Subcommand, Debug)]
pub enum PinterestCommand {
    /// Check the account connection
    Status,
    /// Connect the Pinterest account (submits credentials, then waits
    /// for the browser-side login to complete)
    Connect {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create one pin directly
    CreatePin {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        board: Option<String>,
        #[arg(long)]
        image_path: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum EtsyCommand {
    /// Connect the Etsy shop and import its listings
    Connect,
}

pub async fn run_pinterest(
    command: PinterestCommand,
    api: &Arc<ApiClient>,
    config: &ClientConfig,
) -> anyhow::Result<()> {
    match command {
        PinterestCommand::Status => {
            let status = api.status().await?;
            if status.authenticated {
                match status.authenticated_at {
                    Some(at) => println!("Connected since {at}."),
                    None => println!("Connected."),
                }
            } else {
                println!("Not connected.");
            }
            Ok(())
        }
        PinterestCommand::Connect { email } => connect(api, config, email).await,
        PinterestCommand::CreatePin {
            title,
            description,
            board,
            image_path,
        } => {
            let ack = api
                .create_pin(&PinDraft {
                    title,
                    description,
                    board,
                    image_path,
                })
                .await?;
            println!("{}", ack.message);
            Ok(())
        }
    }
}

async fn connect(
    api: &Arc<ApiClient>,
    config: &ClientConfig,
    email: Option<String>,
) -> anyhow::Result<()> {
    let poller = ConnectionPoller::new(
        Arc::clone(api) as Arc<dyn PinterestConnect>,
        PollerSettings::from(config),
    );

    // Mount-time check: already connected means nothing to do.
    match poller.check_now().await {
        Ok(status) if status.authenticated => {
            match status.authenticated_at {
                Some(at) => println!("Pinterest account already connected (since {at})."),
                None => println!("Pinterest account already connected."),
            }
            return Ok(());
        }
        Ok(_) => {}
        Err(e) => warn!("could not check current status: {e}"),
    }

    let email = match email {
        Some(e) => e,
        None => prompt_line("Pinterest email")?,
    };
    let password = prompt_line("Pinterest password")?;

    // Relay the poller's notices while the attempt runs.
    let mut notice_rx = poller.notice();
    let notices = tokio::spawn(async move {
        while notice_rx.changed().await.is_ok() {
            if let Some(notice) = notice_rx.borrow_and_update().clone() {
                println!("{notice}");
            }
        }
    });

    let mut state_rx = poller.state();
    poller
        .connect_with_credentials(PinterestCredentials { email, password })
        .await?;

    let terminal = state_rx.wait_for(|s| s.is_terminal()).await?.clone();
    notices.abort();
    match terminal {
        ConnectState::Authenticated { authenticated_at } => match authenticated_at {
            Some(at) => println!("Connected at {at}."),
            None => println!("Connected."),
        },
        ConnectState::TimedOut => println!("Connection timed out. Please try connecting again."),
        ConnectState::Failed { message } => println!("Connection failed: {message}"),
        ConnectState::Idle | ConnectState::Connecting => unreachable!("wait_for is_terminal"),
    }
    Ok(())
}

pub async fn run_etsy(
    command: EtsyCommand,
    api: &Arc<ApiClient>,
    config: &ClientConfig,
) -> anyhow::Result<()> {
    match command {
        EtsyCommand::Connect => {
            let outcome = oauth::connect_etsy(
                api,
                config.callback_port,
                config.connect_deadline,
                |url| {
                    println!("Opening your browser to authorize Etsy:\n  {url}");
                    if let Err(err) = open::that(url) {
                        println!(
                            "Could not open the browser automatically ({err}); open the URL above manually."
                        );
                    }
                    Ok(())
                },
            )
            .await?;

            match outcome {
                CallbackOutcome::Connected(import) => {
                    match import.message {
                        Some(message) => println!("Etsy shop connected. {message}"),
                        None => println!("Etsy shop connected."),
                    }
                    if let Some(count) = import.products_imported {
                        println!("{count} listing(s) imported.");
                    }
                    // The catalog is the natural landing spot after an
                    // import.
                    catalog::list_products(api).await?;
                }
                CallbackOutcome::Denied { error } => println!("Etsy connection failed: {error}"),
                CallbackOutcome::Failed { message } => println!("Etsy connection failed: {message}"),
                CallbackOutcome::Ignored => {
                    println!("The authorization redirect carried no code; nothing to do.")
                }
            }
            Ok(())
        }
    }
}
