//! CLI configuration

use std::{num::NonZeroU32, path::PathBuf, str::FromStr};

use clap::{Args, Parser};

use crate::ids::ProductId;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// A `product=quantity` basket entry given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketEntry {
    /// Product id
    pub product: ProductId,

    /// Quantity, at least 1
    pub quantity: NonZeroU32,
}

impl FromStr for BasketEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((product, quantity)) = s.split_once('=') else {
            return Ok(Self {
                product: ProductId::from(s.trim()),
                quantity: NonZeroU32::MIN,
            });
        };

        let product = product.trim();

        if product.is_empty() {
            return Err(format!("missing product id in {s:?}"));
        }

        let quantity = quantity
            .trim()
            .parse::<NonZeroU32>()
            .map_err(|err| format!("invalid quantity in {s:?}: {err}"))?;

        Ok(Self {
            product: ProductId::from(product),
            quantity,
        })
    }
}

/// Trellis basket pricing CLI
#[derive(Debug, Parser)]
#[command(name = "trellis", about = "Price a basket against a store's discount policy", long_about = None)]
pub struct CliConfig {
    /// Fixture file describing products, discounts and store policies
    #[arg(short, long, env = "TRELLIS_FIXTURE")]
    pub fixture: PathBuf,

    /// Store to price the basket for
    #[arg(short, long, env = "TRELLIS_STORE")]
    pub store: Option<String>,

    /// Basket entries as `product=quantity`; defaults to the fixture's basket
    #[arg(short, long = "item", value_name = "PRODUCT=QTY")]
    pub items: Vec<BasketEntry>,

    /// Print only the final price
    #[arg(long, default_value_t = false)]
    pub total_only: bool,

    /// Only validate the fixture's discount graph
    #[arg(long, default_value_t = false)]
    pub validate: bool,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Basket entries as `(product, quantity)` pairs.
    pub fn basket(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.items
            .iter()
            .map(|entry| (entry.product.clone(), entry.quantity.get()))
    }
}
