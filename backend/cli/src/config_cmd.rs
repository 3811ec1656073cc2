//! `config show` and `config init`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use readaloud_config::{
    apply_all_defaults, collect_redacted_paths, load_config, redact, write_config,
    ReadAloudConfig,
};

use crate::terminal_output::{note_info, note_success};

/// Print the file as written (before env substitution), secrets masked.
pub async fn show(path: &Path) -> Result<()> {
    let config = load_config(path).await?;
    let value = serde_json::to_value(&config).context("Failed to serialize config")?;
    let masked = collect_redacted_paths(&value).len();
    print!("{}", serde_yaml::to_string(&redact(&value))?);
    if masked > 0 {
        note_info(&format!("{masked} secret value(s) masked"));
    }
    Ok(())
}

/// Write a config with every default spelled out.
pub async fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    let config = apply_all_defaults(ReadAloudConfig::default());
    write_config(&config, path).await?;
    note_success(&format!("Wrote {}", path.display()));
    Ok(())
}
