use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::{Config, ConfigValue};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# shopdraft configuration

# Directory holding the local draft (default: platform data dir + /shopdraft)
# data_dir: ~/.local/share/shopdraft

# Cache key the draft is stored under
# cache_key: dbProductsDraft

# Published product document
# remote_url: http://localhost:8080/documents/products

# Image used when a product has none
# placeholder_image: https://placehold.co/400x300?text=Sin+imagen

# Id for the first product of an empty draft: timestamp or sequential
id_strategy: timestamp

# Editing a product that is not in the draft: ignore or reject
unknown_id_policy: ignore

# Phone number orders are sent to
# whatsapp_number: "+52 000 000 0000"
"#;

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            let path = cli_config_path.unwrap_or_else(Config::default_config_path);
                            println!("Config file: {} (not found)", path.display());
                        }
                        println!();

                        print_value("data_dir", &config.data_dir, |v| v.display().to_string());
                        print_value("cache_key", &config.cache_key, Clone::clone);
                        print_value("remote_url", &config.remote_url, optional);
                        print_value("placeholder_image", &config.placeholder_image, Clone::clone);
                        print_value("id_strategy", &config.id_strategy, |v| {
                            format!("{:?}", v).to_lowercase()
                        });
                        print_value("unknown_id_policy", &config.unknown_id_policy, |v| {
                            format!("{:?}", v).to_lowercase()
                        });
                        print_value("whatsapp_number", &config.whatsapp_number, optional);
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'shopdraft config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}

fn print_value<T>(name: &str, value: &ConfigValue<T>, render: impl Fn(&T) -> String) {
    println!("{}: {}", name, render(&value.value));
    println!("  source: {}", value.source);
    println!();
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "(not set)".to_string())
}
