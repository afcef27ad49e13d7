use clap::{Args, Subcommand};
use shopdraft_core::models::format_price;
use shopdraft_core::{fetch_catalog, Cart, Catalog, CatalogSource, Order};

use super::OutputFormat;
use crate::config::Config;

/// Browse the published catalog and place an order
#[derive(Args)]
pub struct ShopCommand {
    #[command(subcommand)]
    pub command: ShopSubcommand,
}

#[derive(Subcommand)]
pub enum ShopSubcommand {
    /// Show the published catalog
    Catalog {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Build an order message from cart items
    Checkout {
        /// Item as <id> or <id>:<quantity> (can be repeated)
        #[arg(long = "item", value_name = "ITEM", required = true)]
        items: Vec<String>,

        /// Phone number to send the order to (overrides whatsapp_number)
        #[arg(long)]
        phone: Option<String>,
    },
}

impl ShopCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let (catalog, source) = load_catalog(config)?;

        match &self.command {
            ShopSubcommand::Catalog { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(catalog.products())?);
                    }
                    OutputFormat::Text => {
                        if source == CatalogSource::Sample {
                            println!("(showing sample products)\n");
                        }
                        for product in catalog.products() {
                            println!("{}  ${}", product.name, format_price(product.price));
                            if !product.description.is_empty() {
                                println!("  {}", product.description);
                            }
                            println!("  #{}", product.id);
                        }
                    }
                }
                Ok(())
            }

            ShopSubcommand::Checkout { items, phone } => {
                let mut cart = Cart::new();
                for item in items {
                    let (id, quantity) = parse_item(item)?;
                    cart.add_quantity(&catalog, id, quantity)?;
                }

                let order = Order::from_cart(&cart, &catalog)?;
                println!("{}", order);

                let number = phone
                    .as_deref()
                    .or(config.whatsapp_number.value.as_deref());
                match number {
                    Some(number) => println!("\n{}", order.whatsapp_url(number)),
                    None => println!("\nSet whatsapp_number to get a link for sending this order."),
                }
                Ok(())
            }
        }
    }
}

fn load_catalog(config: &Config) -> Result<(Catalog, CatalogSource), Box<dyn std::error::Error>> {
    if config.remote_url.value.is_none() {
        tracing::warn!("No remote configured, using sample catalog");
        return Ok((Catalog::sample(), CatalogSource::Sample));
    }

    let remote = config.remote()?;
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(fetch_catalog(&remote)))
}

/// Parses `<id>` or `<id>:<quantity>`.
fn parse_item(item: &str) -> Result<(i64, u32), String> {
    let (id, quantity) = match item.split_once(':') {
        Some((id, quantity)) => (id, Some(quantity)),
        None => (item, None),
    };

    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("Invalid product ID in '{}'", item))?;
    let quantity = match quantity {
        Some(q) => q
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| format!("Invalid quantity in '{}'", item))?,
        None => 1,
    };

    Ok((id, quantity))
}
