use std::sync::Arc;

use clap::Subcommand;

use pinflow_core::ApiClient;

#[derive(Subcommand, Debug)]
pub enum ProductsCommand {
    /// List the catalog
    List,
    /// Show one product in full
    Show { id: String },
    /// Delete a product
    Delete { id: String },
    /// Duplicate a product
    Duplicate { id: String },
    /// Ask the backend to generate one pin for a product
    GeneratePin { id: String },
}

#[derive(Subcommand, Debug)]
pub enum PinsCommand {
    /// List the pin schedule
    List,
    /// Release a pending pin into the posting schedule
    Approve { id: String },
    /// Delete a pin
    Delete { id: String },
}

pub async fn run_products(command: ProductsCommand, api: &Arc<ApiClient>) -> anyhow::Result<()> {
    match command {
        ProductsCommand::List => list_products(api).await,
        ProductsCommand::Show { id } => {
            let p = api.product(&id).await?;
            println!("{} ({}, {})", p.title, p.source, p.status);
            if let Some(description) = &p.description {
                println!("  {description}");
            }
            if let Some(url) = &p.product_url {
                println!("  url: {url}");
            }
            println!(
                "  {} image(s), {} variant(s), {} pins/day, automation {:?}",
                p.images.len(),
                p.variants.len(),
                p.pins_per_day,
                p.automation_mode
            );
            Ok(())
        }
        ProductsCommand::Delete { id } => {
            api.delete_product(&id).await?;
            println!("Deleted {id}.");
            Ok(())
        }
        ProductsCommand::Duplicate { id } => {
            let copy = api.duplicate_product(&id).await?;
            println!("Duplicated as {} ({}).", copy.id, copy.title);
            Ok(())
        }
        ProductsCommand::GeneratePin { id } => {
            let ack = api.generate_pin(&id).await?;
            println!("{}", ack.message);
            Ok(())
        }
    }
}

pub async fn list_products(api: &Arc<ApiClient>) -> anyhow::Result<()> {
    let products = api.products().await?;
    if products.is_empty() {
        println!("No products yet.");
        return Ok(());
    }
    println!("{} product(s):", products.len());
    for p in &products {
        println!(
            "  {}  {:<40}  {}/{}  {} pins/day",
            p.id, p.title, p.source, p.status, p.pins_per_day
        );
    }
    Ok(())
}

pub async fn run_pins(command: PinsCommand, api: &Arc<ApiClient>) -> anyhow::Result<()> {
    match command {
        PinsCommand::List => {
            let pins = api.pins().await?;
            if pins.is_empty() {
                println!("No scheduled pins.");
                return Ok(());
            }
            println!("{} pin(s):", pins.len());
            for pin in &pins {
                println!(
                    "  {}  {:<40}  {}  board={}  {}",
                    pin.id,
                    pin.title,
                    pin.scheduled_time.to_rfc3339(),
                    if pin.board.is_empty() { "-" } else { pin.board.as_str() },
                    pin.status
                );
                if let Some(error) = &pin.error {
                    println!("      error: {error}");
                }
            }
            Ok(())
        }
        PinsCommand::Approve { id } => {
            let ack = api.approve_pin(&id).await?;
            println!("{}", ack.message);
            Ok(())
        }
        PinsCommand::Delete { id } => {
            api.delete_pin(&id).await?;
            println!("Deleted {id}.");
            Ok(())
        }
    }
}
