pub mod account;
pub mod catalog;
pub mod connect;

use std::io::{self, Write};
use std::sync::Arc;

use pinflow_core::{ApiClient, ClientConfig};

use crate::Command;

pub async fn run(
    command: Command,
    api: &Arc<ApiClient>,
    config: &ClientConfig,
) -> anyhow::Result<()> {
    match command {
        Command::Login { email } => account::login(api, &email).await,
        Command::Register => account::register(api).await,
        Command::Me => account::me(api),
        Command::Logout => account::logout(api),
        Command::Products { command } => catalog::run_products(command, api).await,
        Command::Pins { command } => catalog::run_pins(command, api).await,
        Command::Pinterest { command } => connect::run_pinterest(command, api, config).await,
        Command::Etsy { command } => connect::run_etsy(command, api, config).await,
    }
}

pub(crate) fn prompt_line(label: &str) -> anyhow::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
