//! `pinmux clean`: remove generated artifacts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pinmux_emit::remove_artifacts;

use super::{output_layout, select_tables};
use crate::manifest::PinmuxManifest;

/// Remove the generated files of every selected table.
pub fn run(
    project_dir: &Path,
    manifest: Option<&PinmuxManifest>,
    tables: &[PathBuf],
    out_dir: Option<&Path>,
) -> Result<()> {
    let layout = output_layout(manifest);
    for table in select_tables(project_dir, manifest, tables)? {
        let removed = remove_artifacts(&table, &layout, out_dir)
            .with_context(|| format!("cleaning {}", table.display()))?;
        if removed.is_empty() {
            println!("Already clean: {} has no generated files", table.display());
        }
        for path in removed {
            println!("Removed {}", path.display());
        }
    }
    Ok(())
}
