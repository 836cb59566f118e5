//! Parse command - extract an order from a purchase-order file.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::debug;

use loopsheet_core::{classify, ExtractionResult, Order};

use super::{extract_order, load_config, progress_bar};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pack number to use when the document names none
    #[arg(short, long)]
    pack: Option<String>,

    /// Show extraction confidence and timing
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per scout-adventure pairing
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let pack = args.pack.as_deref().unwrap_or(&config.pack.default_number);

    let pb = progress_bar()?;
    let result = extract_order(&args.input, pack, &config, &pb).await?;
    pb.finish_and_clear();

    for warning in &result.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    let output = format_order(&result, args.format)?;

    if let Some(output_path) = &args.output {
        tokio::fs::write(output_path, &output).await?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            result.confidence * 100.0
        );
        if let Some(strategy) = result.strategy {
            println!("{} Strategy: {:?}", style("ℹ").blue(), strategy);
        }
        println!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_order(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&result.order)?),
        OutputFormat::Csv => format_csv(&result.order),
        OutputFormat::Text => Ok(format_text(&result.order)),
    }
}

fn format_csv(order: &Order) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["pack", "scout", "sku", "adventure", "den"])?;

    for scout in &order.scouts {
        for adventure in &scout.adventures {
            wtr.write_record([
                order.pack_number.as_str(),
                scout.name.as_str(),
                adventure.sku.as_str(),
                adventure.name.as_str(),
                classify(&adventure.sku).name(),
            ])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(order: &Order) -> String {
    let mut output = String::new();

    output.push_str(&format!("Pack {}\n\n", order.pack_number));

    output.push_str("Scouts:\n");
    for scout in &order.scouts {
        output.push_str(&format!("  {}\n", scout.name));
        for adventure in &scout.adventures {
            output.push_str(&format!("    - {} ({})\n", adventure.name, adventure.sku));
        }
    }
    output.push('\n');

    output.push_str("Shopping list:\n");
    for (sku, entry) in &order.summary {
        output.push_str(&format!(
            "  {:>3} x {} {:<32} ${:.2}\n",
            entry.qty,
            sku,
            entry.name,
            entry.total()
        ));
    }
    output.push('\n');

    output.push_str(&format!("Total loops: {}\n", order.total_loops()));
    output.push_str(&format!("Total cost:  ${:.2}\n", order.total_cost()));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopsheet_core::PurchaseOrderParser;

    fn result() -> ExtractionResult {
        PurchaseOrderParser::new().parse(
            "Pack 361\n2 619938 Air of the Wolf Adventure Blaine R, Charlie R $3.98\n",
            "1",
        )
    }

    #[test]
    fn test_csv_has_row_per_pairing() {
        let csv = format_order(&result(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "pack,scout,sku,adventure,den");
        assert_eq!(lines[1], "361,Blaine R,619938,Air of the Wolf,Wolf");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_text_summary() {
        let text = format_order(&result(), OutputFormat::Text).unwrap();
        assert!(text.starts_with("Pack 361"));
        assert!(text.contains("Total loops: 2"));
        assert!(text.contains("$3.98"));
    }
}
