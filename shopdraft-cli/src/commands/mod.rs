use clap::ValueEnum;

mod cloud;
mod config_cmd;
mod product;
mod shop;

pub use cloud::CloudCommand;
pub use config_cmd::ConfigCommand;
pub use product::ProductCommand;
pub use shop::ShopCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
