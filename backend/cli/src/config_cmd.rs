//! `clicktrack config`

use std::path::Path;

use anyhow::{Context, Result};
use clicktrack_config::{write_config, ClickTrackConfig};

/// Print the effective config, or with `write` save it to `path` so the
/// defaults become an editable file.
pub async fn run(config: &ClickTrackConfig, path: &Path, write: bool) -> Result<()> {
    if write {
        write_config(config, path).await?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    println!("# {}", path.display());
    print!("{yaml}");
    Ok(())
}
