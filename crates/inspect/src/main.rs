use anyhow::Context;
use clap::Parser;

use racekit_inspect::{InspectConfig, inspect, load};

fn main() -> anyhow::Result<()> {
    racekit_observability::init();

    let config = InspectConfig::parse();
    tracing::info!(file = %config.product_file.display(), "inspecting product");

    let record = load(&config.product_file)?;
    let report = inspect(record, &config.selections)
        .with_context(|| format!("inspection of {} failed", config.product_file.display()))?;

    println!("{report}");
    Ok(())
}
