//! `pinmux build`: compile tables and write their artifacts.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use pinmux_emit::{build_table, ArtifactSet};

use super::{compile_options, output_layout, select_tables};
use crate::manifest::PinmuxManifest;

/// Compile every selected table and write its artifacts.
pub fn run(
    project_dir: &Path,
    manifest: Option<&PinmuxManifest>,
    tables: &[PathBuf],
    out_dir: Option<&Path>,
) -> Result<()> {
    let tables = select_tables(project_dir, manifest, tables)?;
    if tables.is_empty() {
        bail!("no pin tables found in {}", project_dir.display());
    }
    for path in build_tables(manifest, &tables, out_dir)? {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Render all tables first, then write them. A table that fails to compile
/// leaves every output untouched.
pub(crate) fn build_tables(
    manifest: Option<&PinmuxManifest>,
    tables: &[PathBuf],
    out_dir: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let options = compile_options(manifest);
    let layout = output_layout(manifest);

    let sets = tables
        .iter()
        .map(|table| {
            build_table(table, &options, &layout, out_dir)
                .with_context(|| format!("compiling {}", table.display()))
        })
        .collect::<Result<Vec<ArtifactSet>>>()?;

    let mut written = Vec::new();
    for set in &sets {
        let paths = set
            .write()
            .with_context(|| format!("writing artifacts for {}", set.device().name()))?;
        written.extend(paths);
    }
    Ok(written)
}
