//! CLI command implementations.

pub mod cart;
pub mod config;
pub mod product;
pub mod shipping;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Reconcile with remote stock and show the cart.
    Show {
        /// Skip the stock check.
        #[arg(long)]
        offline: bool,
    },
    /// Add an item.
    Add {
        /// Variant ID.
        #[arg(long)]
        variant: u64,
        /// Product name.
        #[arg(long)]
        name: String,
        /// Unit price, e.g. 89.90.
        #[arg(long)]
        price: f64,
        /// Size label.
        #[arg(long)]
        size: String,
        /// Color label.
        #[arg(long)]
        color: Option<String>,
        /// Quantity.
        #[arg(short, long, default_value = "1")]
        qty: i64,
        /// Known stock for the variant.
        #[arg(long)]
        max: Option<i64>,
        /// Image file name.
        #[arg(long)]
        image: Option<String>,
        /// Product ID.
        #[arg(long)]
        product: Option<u64>,
    },
    /// Set an exact quantity.
    Set {
        /// Variant ID.
        variant: u64,
        /// New quantity.
        #[arg(allow_hyphen_values = true)]
        qty: i64,
    },
    /// Increase a quantity by one.
    Inc {
        /// Variant ID.
        variant: u64,
    },
    /// Decrease a quantity by one.
    Dec {
        /// Variant ID.
        variant: u64,
    },
    /// Remove a line.
    Remove {
        /// Variant ID.
        variant: u64,
    },
    /// Remove every line.
    Clear {
        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the shipping command.
#[derive(Args)]
pub struct ShippingArgs {
    #[command(subcommand)]
    pub command: ShippingCommand,
}

#[derive(Subcommand)]
pub enum ShippingCommand {
    /// Quote delivery for a postal code.
    Quote {
        /// Postal code (CEP), with or without the dash.
        cep: String,
    },
    /// Quote again for the last postal code used.
    Replay,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    #[command(subcommand)]
    pub command: ProductCommand,
}

#[derive(Subcommand)]
pub enum ProductCommand {
    /// Show sizes, colors and stock of a product.
    Show {
        /// Product JSON file.
        file: String,
        /// Show color availability for this size.
        #[arg(long)]
        size: Option<String>,
    },
    /// Select a size and color and add the variant to the cart.
    Add {
        /// Product JSON file.
        file: String,
        /// Size to select.
        #[arg(long)]
        size: String,
        /// Color to select.
        #[arg(long)]
        color: String,
        /// Quantity.
        #[arg(short, long, default_value = "1")]
        qty: i64,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
