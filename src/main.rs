//! Trellis CLI
//!
//! Prices a basket against a store's discount policy loaded from a fixture.
//!
//! Use `-f` to choose the fixture file, `-s` the store and `-i product=qty`
//! (repeatable) for the basket. Without `-i`, the fixture's own basket is used.

use std::{
    io::{self, Write},
    time::Instant,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::info;
use trellis::{
    config::CliConfig,
    fixtures::Fixture,
    ids::{ProductId, StoreId},
    observability::init_subscriber,
    pricing::PricingEngine,
    receipt::Receipt,
};

fn main() -> Result<()> {
    let config = CliConfig::parse();

    init_subscriber(&config.logging)?;

    let fixture = Fixture::from_path(&config.fixture)
        .with_context(|| format!("loading fixture {}", config.fixture.display()))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if config.validate {
        writeln!(
            handle,
            "{}: {} products, {} discounts, policy graph ok",
            config.fixture.display(),
            fixture.catalog().product_count(),
            fixture.catalog().discount_count()
        )?;

        let mut policies: Vec<_> = fixture.catalog().policies().collect();
        policies.sort_unstable_by_key(|(store, _)| *store);

        for (store, discounts) in policies {
            writeln!(handle, "  {store}: {} top-level discounts", discounts.len())?;
        }

        return Ok(());
    }

    let Some(store) = config.store.as_deref().map(StoreId::from) else {
        bail!("--store is required unless --validate is given");
    };

    let basket: Vec<(ProductId, u32)> = if config.items.is_empty() {
        fixture.basket().to_vec()
    } else {
        config.basket().collect()
    };

    let engine = PricingEngine::new(fixture.catalog());

    let start = Instant::now();
    let quote = engine.quote(&store, basket)?;
    let elapsed = start.elapsed();

    info!(elapsed = %elapsed.human(Truncate::Nano), "pricing complete");

    if config.total_only {
        writeln!(handle, "{:.2}", quote.total())?;
    } else {
        Receipt::new(&quote).write_to(&mut handle)?;
        writeln!(handle, "\nPriced in {}", elapsed.human(Truncate::Nano))?;
    }

    Ok(())
}
