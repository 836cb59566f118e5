//! Generate command - render the shopping guide and label sheets.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::{debug, info, warn};

use loopsheet_core::models::config::LoopsheetConfig;
use loopsheet_core::{
    GuideLayout, ImageStore, LabelMode, LabelSheet, LabelTemplate, Order, PdfRenderer,
    ShoppingGuide,
};

use super::{extract_order, load_config, progress_bar};

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// What to generate
    #[arg(short, long, value_enum, default_value = "both")]
    what: Output,

    /// Directory to write PDFs into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Pack number to use when the document names none
    #[arg(short, long)]
    pack: Option<String>,

    /// Label stock code (5160, 8160, 5163, 8163, 8164)
    #[arg(short, long)]
    template: Option<String>,

    /// One label per adventure or one per scout
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Group the guide by den or print a flat table
    #[arg(short, long, value_enum)]
    layout: Option<LayoutArg>,

    /// Loop image directory
    #[arg(short, long)]
    images: Option<PathBuf>,

    /// Leave images out
    #[arg(long)]
    no_images: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Output {
    /// Shopping guide only
    Guide,
    /// Label sheet only
    Labels,
    /// Both documents
    Both,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ModeArg {
    PerAdventure,
    PerScout,
}

impl From<ModeArg> for LabelMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::PerAdventure => LabelMode::PerAdventure,
            ModeArg::PerScout => LabelMode::PerScout,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LayoutArg {
    ByDen,
    Flat,
}

impl From<LayoutArg> for GuideLayout {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::ByDen => GuideLayout::ByDen,
            LayoutArg::Flat => GuideLayout::Flat,
        }
    }
}

pub async fn run(args: GenerateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    apply_overrides(&args, &mut config);

    // Fail on a bad template before doing any work
    let template = LabelTemplate::lookup(&config.labels.template)?;
    let pack = args.pack.as_deref().unwrap_or(&config.pack.default_number);

    let pb = progress_bar()?;
    let result = extract_order(&args.input, pack, &config, &pb).await?;

    for warning in &result.warnings {
        pb.suspend(|| eprintln!("{} {}", style("!").yellow(), warning));
    }

    let order = result.order;
    if order.is_empty() {
        warn!("No line items found, documents will be empty");
    }

    pb.set_message("Loading images...");
    let images = if config.guide.include_images || config.labels.include_images {
        ImageStore::load_dir(order.summary.keys().map(String::as_str), &config.images)
    } else {
        ImageStore::new()
    };
    debug!("{} of {} SKUs have images", images.len(), order.summary.len());

    let stem = file_stem(&order.pack_number)?;
    tokio::fs::create_dir_all(&args.output_dir).await?;
    let mut written = Vec::new();

    if args.what != Output::Labels {
        pb.set_message("Rendering shopping guide...");
        let path = args
            .output_dir
            .join(format!("Pack_{}_Shopping_Guide.pdf", stem));
        let bytes = render_guide(&order, &images, &config)?;
        write(&path, bytes).await?;
        written.push(path);
    }

    if args.what != Output::Guide {
        pb.set_message("Rendering labels...");
        let path = args.output_dir.join(format!(
            "Pack_{}_Labels_{}.pdf",
            stem, template.code
        ));
        let bytes = render_labels(&order, template, &images, &config)?;
        write(&path, bytes).await?;
        written.push(path);
    }

    pb.finish_and_clear();

    println!(
        "{} Pack {}: {} scouts, {} loops",
        style("✓").green(),
        order.pack_number,
        order.scouts.len(),
        order.total_loops()
    );
    for path in &written {
        println!("  {}", path.display());
    }

    Ok(())
}

/// Pack number as it appears in output file names. Only ASCII letters and
/// digits are allowed so the name cannot leave the output directory.
fn file_stem(pack_number: &str) -> anyhow::Result<String> {
    if pack_number.is_empty() || !pack_number.chars().all(|c| c.is_ascii_alphanumeric()) {
        anyhow::bail!(
            "Pack number {:?} cannot be used in a file name (letters and digits only)",
            pack_number
        );
    }
    Ok(pack_number.to_string())
}

fn apply_overrides(args: &GenerateArgs, config: &mut LoopsheetConfig) {
    if let Some(template) = &args.template {
        config.labels.template = template.clone();
    }
    if let Some(mode) = args.mode {
        config.labels.mode = mode.into();
    }
    if let Some(layout) = args.layout {
        config.guide.layout = layout.into();
    }
    if let Some(dir) = &args.images {
        config.images.dir = dir.clone();
    }
    if args.no_images {
        config.guide.include_images = false;
        config.labels.include_images = false;
    }
}

fn render_guide(order: &Order, images: &ImageStore, config: &LoopsheetConfig) -> anyhow::Result<Vec<u8>> {
    let guide = ShoppingGuide::build(order, config.guide.layout);
    let mut renderer = PdfRenderer::new().with_thumbnail_size(config.images.thumbnail_size);
    guide.draw(&mut renderer, images, &config.guide);
    Ok(renderer.finish()?)
}

fn render_labels(
    order: &Order,
    template: LabelTemplate,
    images: &ImageStore,
    config: &LoopsheetConfig,
) -> anyhow::Result<Vec<u8>> {
    let sheet = LabelSheet::build(order, template, config.labels.mode);
    info!("{} labels on {} pages", sheet.labels.len(), sheet.page_count());

    let mut renderer = PdfRenderer::new().with_thumbnail_size(config.images.thumbnail_size);
    sheet.draw(&mut renderer, images, &config.labels);
    Ok(renderer.finish()?)
}

async fn write(path: &Path, bytes: Vec<u8>) -> anyhow::Result<()> {
    tokio::fs::write(path, bytes).await?;
    debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_accepts_pack_numbers() {
        assert_eq!(file_stem("361").unwrap(), "361");
        assert_eq!(file_stem("42B").unwrap(), "42B");
    }

    #[test]
    fn test_file_stem_rejects_paths() {
        for pack in ["../x", "a/b", "361 ", "", "..", "C:\\tmp"] {
            assert!(file_stem(pack).is_err(), "{:?} accepted", pack);
        }
    }
}
