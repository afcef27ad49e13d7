use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{CloudCommand, ConfigCommand, ProductCommand, ShopCommand};
use config::Config;

#[derive(Parser)]
#[command(name = "shopdraft")]
#[command(version)]
#[command(about = "Manage a product catalog draft and publish it to a storefront", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage products in the local draft
    Product(ProductCommand),

    /// Pull or push the product list
    Cloud(CloudCommand),

    /// Browse the storefront and check out
    Shop(ShopCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopdraft=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cli_config_path = cli.config.clone();
    let config = Config::load(cli.config)?;

    match &cli.command {
        Some(Commands::Product(cmd)) => {
            let mut draft = config.open_draft();
            cmd.run(&mut draft)?;
        }
        Some(Commands::Cloud(cmd)) => {
            cmd.run(config.open_draft(), &config)?;
        }
        Some(Commands::Shop(cmd)) => {
            cmd.run(&config)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
