//! Classify command - look up the den for SKUs.

use clap::Args;
use console::style;

use loopsheet_core::{classify, Den};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// One or more six-digit SKUs
    #[arg(required = true)]
    skus: Vec<String>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

pub async fn run(args: ClassifyArgs) -> anyhow::Result<()> {
    let results: Vec<(&str, Den)> = args.skus.iter().map(|sku| (sku.as_str(), classify(sku))).collect();

    if args.json {
        let map: serde_json::Map<String, serde_json::Value> = results
            .iter()
            .map(|(sku, den)| (sku.to_string(), serde_json::Value::String(den.name().to_string())))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    for (sku, den) in results {
        if den == Den::CubScout {
            println!("{} {}", sku, style(den).dim());
        } else {
            println!("{} {}", sku, style(den).bold());
        }
    }

    Ok(())
}
