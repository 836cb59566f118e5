//! Config command - inspect and edit the loopsheet settings file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use loopsheet_core::models::config::LoopsheetConfig;
use loopsheet_core::LabelTemplate;

use super::default_config_path;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the settings in effect
    Show,

    /// Write a settings file with the defaults
    Init(InitArgs),

    /// Print one setting by dotted key
    Get {
        /// Dotted key, e.g. "labels.template" or "guide.layout"
        key: String,
    },

    /// Change one setting by dotted key
    Set {
        /// Dotted key
        key: String,
        /// New value. Booleans and numbers are parsed, strings are kept as typed
        value: String,
    },

    /// Print where the settings file lives
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Where to write the file instead of the default location
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replace an existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path.map(PathBuf::from).unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show(&path),
        ConfigCommand::Init(init_args) => init(init_args, path),
        ConfigCommand::Get { key } => {
            let config = load_or_default(&path)?;
            println!("{}", serde_json::to_string_pretty(&get(&config, &key)?)?);
            Ok(())
        }
        ConfigCommand::Set { key, value } => {
            let config = load_or_default(&path)?;
            let (config, stored) = set(&config, &key, &value)?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            config.save(&path)?;
            println!(
                "{} {} = {}",
                style("✓").green(),
                key,
                serde_json::to_string(&stored)?
            );
            Ok(())
        }
        ConfigCommand::Path => show_path(&path),
    }
}

fn load_or_default(path: &Path) -> anyhow::Result<LoopsheetConfig> {
    if path.exists() {
        Ok(LoopsheetConfig::from_file(path)?)
    } else {
        Ok(LoopsheetConfig::default())
    }
}

fn show(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        println!("{} No config file, showing defaults.", style("ℹ").blue());
    }
    let config = load_or_default(path)?;
    println!("{}", serde_json::to_string_pretty(&config)?);

    if let Err(e) = validate(&config) {
        println!("{} {}", style("!").yellow(), e);
    }
    if (config.guide.include_images || config.labels.include_images) && !config.images.dir.is_dir() {
        println!(
            "{} Image directory {} does not exist, loops will print without pictures.",
            style("!").yellow(),
            config.images.dir.display()
        );
    }

    Ok(())
}

fn init(args: InitArgs, config_path: PathBuf) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or(config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    LoopsheetConfig::default().save(&output_path)?;

    println!(
        "{} Wrote default settings to {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

/// The value at a dotted key such as `labels.template`.
fn get(config: &LoopsheetConfig, key: &str) -> anyhow::Result<Value> {
    let json = serde_json::to_value(config)?;
    key.split('.')
        .try_fold(&json, |node, part| node.get(part))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
}

/// A copy of `config` with `key` set to `raw`, plus the value stored.
///
/// Settings that are strings stay strings, so `labels.template 8164` does not
/// turn into a number. Everything else is read as JSON when it parses.
fn set(config: &LoopsheetConfig, key: &str, raw: &str) -> anyhow::Result<(LoopsheetConfig, Value)> {
    let mut json = serde_json::to_value(config)?;

    let target = key
        .split('.')
        .try_fold(&mut json, |node, part| node.get_mut(part))
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    if target.is_object() {
        anyhow::bail!("{} is a section, set one of its keys instead", key);
    }

    let value = if target.is_string() {
        Value::String(raw.to_string())
    } else {
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    };
    *target = value.clone();

    let updated: LoopsheetConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;
    validate(&updated)?;

    Ok((updated, value))
}

/// Checks serde cannot express.
fn validate(config: &LoopsheetConfig) -> anyhow::Result<()> {
    LabelTemplate::lookup(&config.labels.template)?;

    let pack = &config.pack.default_number;
    if pack.is_empty() || !pack.chars().all(|c| c.is_ascii_alphanumeric()) {
        anyhow::bail!("pack.default_number must be letters and digits, got {:?}", pack);
    }
    if config.images.thumbnail_size == 0 {
        anyhow::bail!("images.thumbnail_size must be at least 1");
    }

    Ok(())
}

fn show_path(config_path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'loopsheet config init' to create it.");
    }

    Ok(())
}
