//! `rfeed config` subcommands

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::args::{ConfigArgs, ConfigCommands};
use crate::config::AppConfig;

pub async fn execute(args: ConfigArgs, config_path: Option<PathBuf>) -> Result<()> {
    match args.command {
        ConfigCommands::Init { path, force } => write_example(&path, force),
        ConfigCommands::Show => show(config_path.as_deref()),
    }
}

fn write_example(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists; pass --force to replace it",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, AppConfig::example_toml())
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    tracing::info!(path = %path.display(), "Wrote example configuration");
    println!("Created config file: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit the config file to list your feeds and wanted tags");
    println!("  2. Run 'rfeed run --dry-run --once' to see what would be delivered");
    println!("  3. Enable the webhook and run 'rfeed run' to start polling");

    Ok(())
}

fn show(config_path: Option<&Path>) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
    print!("{}", rendered);
    Ok(())
}
