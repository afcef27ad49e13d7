use clap::{Args, Subcommand};
use shopdraft_core::models::format_price;
use shopdraft_core::{DraftCache, DraftStore, ProductFields, ProductForm, UpsertOutcome};
use std::io::{self, Write};

use super::OutputFormat;

#[derive(Args)]
pub struct ProductCommand {
    #[command(subcommand)]
    pub command: ProductSubcommand,
}

#[derive(Subcommand)]
pub enum ProductSubcommand {
    /// List products in the local draft
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show product details
    Show {
        /// Product ID
        id: i64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a product to the draft
    Add {
        /// Product name
        #[arg(long, short)]
        name: String,

        /// Price
        #[arg(long, short, allow_hyphen_values = true)]
        price: String,

        /// Image URL
        #[arg(long, short)]
        image: String,

        /// Description
        #[arg(long, short)]
        description: Option<String>,
    },

    /// Edit a product in the draft
    Edit {
        /// Product ID
        id: i64,

        /// New name
        #[arg(long, short)]
        name: Option<String>,

        /// New price
        #[arg(long, short, allow_hyphen_values = true)]
        price: Option<String>,

        /// New image URL
        #[arg(long, short)]
        image: Option<String>,

        /// New description
        #[arg(long, short)]
        description: Option<String>,
    },

    /// Delete a product from the draft
    Delete {
        /// Product ID
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl ProductCommand {
    pub fn run<C: DraftCache>(
        &self,
        draft: &mut DraftStore<C>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ProductSubcommand::List { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(draft.products())?);
                    }
                    OutputFormat::Text => {
                        if draft.is_empty() {
                            println!("No products in the draft");
                            return Ok(());
                        }
                        for product in draft.products() {
                            println!(
                                "  {:>14}  {:30} ${}",
                                product.id,
                                product.name,
                                format_price(product.price)
                            );
                        }
                        println!("\nTotal: {} product(s)", draft.len());
                    }
                }
                Ok(())
            }

            ProductSubcommand::Show { id, format } => {
                let product = draft
                    .get(*id)
                    .ok_or_else(|| format!("Product not found: {}", id))?;

                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(product)?),
                    OutputFormat::Text => print!("{}", product),
                }
                Ok(())
            }

            ProductSubcommand::Add {
                name,
                price,
                image,
                description,
            } => {
                let mut form = ProductForm::new(name.as_str(), price.as_str(), image.as_str());
                form.description = description.clone();
                let fields = form.validate()?;

                match draft.upsert(None, fields)? {
                    UpsertOutcome::Created(id) | UpsertOutcome::Updated(id) => {
                        println!("Created product:");
                        if let Some(product) = draft.get(id) {
                            print!("{}", product);
                        }
                    }
                    UpsertOutcome::Ignored(_) => {}
                }
                Ok(())
            }

            ProductSubcommand::Edit {
                id,
                name,
                price,
                image,
                description,
            } => {
                let has_updates =
                    name.is_some() || price.is_some() || image.is_some() || description.is_some();
                if !has_updates {
                    return Err("Nothing to update. Provide at least one option.".into());
                }

                let fields = match draft.get(*id) {
                    Some(existing) => {
                        // Start from the stored values, then overlay the options given
                        let form = ProductForm {
                            name: name.clone().unwrap_or_else(|| existing.name.clone()),
                            price: price
                                .clone()
                                .unwrap_or_else(|| existing.price.to_string()),
                            image: image.clone().unwrap_or_else(|| existing.image.clone()),
                            description: description.clone(),
                        };
                        form.validate()?
                    }
                    // The store's unknown-id policy decides; these fields are never applied
                    None => ProductFields {
                        name: name.clone().unwrap_or_default(),
                        price: price
                            .as_deref()
                            .and_then(|p| p.trim().parse::<f64>().ok())
                            .unwrap_or(0.0),
                        image: image.clone().unwrap_or_default(),
                        description: description.clone(),
                    },
                };

                match draft.upsert(Some(*id), fields)? {
                    UpsertOutcome::Ignored(id) => {
                        println!("Product {} is no longer in the draft; nothing changed.", id);
                    }
                    UpsertOutcome::Updated(id) | UpsertOutcome::Created(id) => {
                        println!("Updated product:");
                        if let Some(product) = draft.get(id) {
                            print!("{}", product);
                        }
                    }
                }
                Ok(())
            }

            ProductSubcommand::Delete { id, force } => {
                let Some(product) = draft.get(*id) else {
                    println!("No product {} in the draft; nothing to delete.", id);
                    return Ok(());
                };
                let name = product.name.clone();

                if !force {
                    print!("Delete product '{}' ({})? [y/N] ", name, id);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                draft.remove(*id)?;
                println!("Deleted product: {}", name);
                Ok(())
            }
        }
    }
}
