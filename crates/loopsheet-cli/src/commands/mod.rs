//! CLI subcommands.

pub mod classify;
pub mod config;
pub mod generate;
pub mod parse;

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use loopsheet_core::models::config::LoopsheetConfig;
use loopsheet_core::pdf::{PdfExtractor, PdfTextSource, PdfType};
use loopsheet_core::{ExtractionResult, PurchaseOrderParser};

/// `~/.config/loopsheet/config.json` or the platform equivalent.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("loopsheet")
        .join("config.json")
}

/// Load the `--config` file if given, else the default file if it exists,
/// else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LoopsheetConfig> {
    if let Some(path) = config_path {
        return Ok(LoopsheetConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using config at {}", path.display());
        Ok(LoopsheetConfig::from_file(&path)?)
    } else {
        Ok(LoopsheetConfig::default())
    }
}

pub fn progress_bar() -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

/// Read a purchase order (`.pdf` or `.txt`) and extract it.
pub async fn extract_order(
    input: &Path,
    pack_number: &str,
    config: &LoopsheetConfig,
    pb: &ProgressBar,
) -> anyhow::Result<ExtractionResult> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    info!("Processing file: {}", input.display());

    let text = match extension.as_str() {
        "pdf" => read_pdf(input, config, pb).await?,
        "txt" => {
            pb.set_message("Reading text...");
            pb.set_position(20);
            tokio::fs::read_to_string(input).await?
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    pb.set_message("Extracting order...");
    pb.set_position(70);

    let parser = PurchaseOrderParser::new().with_name_normalization(config.extraction.scout_names);
    let result = parser.parse(&text, pack_number);

    pb.set_position(100);
    Ok(result)
}

async fn read_pdf(input: &Path, config: &LoopsheetConfig, pb: &ProgressBar) -> anyhow::Result<String> {
    pb.set_message("Loading PDF...");
    pb.set_position(10);

    let data = tokio::fs::read(input).await?;
    let mut extractor = PdfExtractor::new().with_max_pages(config.pdf.max_pages);
    extractor.load(&data)?;
    debug!("PDF has {} pages", extractor.page_count());

    pb.set_message("Extracting text...");
    pb.set_position(40);

    let content = extractor.extract_all()?;
    match content.pdf_type {
        PdfType::Text => {}
        PdfType::Image => anyhow::bail!("PDF has no text layer (scanned document?)"),
        PdfType::Empty => anyhow::bail!("PDF appears to be empty"),
    }

    if content.text.trim().len() < config.pdf.min_text_length {
        anyhow::bail!("No usable text could be extracted from the PDF");
    }

    Ok(content.text)
}
