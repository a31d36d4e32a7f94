//! `reconn config path|show|init`

use anyhow::{bail, Result};
use reconn_core::config::{self, ReconnConfig};
use std::path::Path;

use crate::cli::ConfigAction;

pub fn run_config(path: &Path, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => println!("{}", path.display()),
        ConfigAction::Show => {
            let cfg = if path.exists() {
                config::load_from(path)?
            } else {
                ReconnConfig::default()
            };
            print!("{}", config::to_toml(&cfg)?);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            config::save_at(path, &ReconnConfig::default())?;
            tracing::info!("wrote default config to {}", path.display());
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
