//! CLI command implementations.

pub mod build;
pub mod clean;
pub mod init;
pub mod inspect;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use pinmux_core::CompileOptions;
use pinmux_emit::OutputLayout;

use crate::manifest::PinmuxManifest;

/// Tables named on the command line, else those of the manifest.
pub(crate) fn select_tables(
    project_dir: &Path,
    manifest: Option<&PinmuxManifest>,
    explicit: &[PathBuf],
) -> Result<Vec<PathBuf>> {
    if !explicit.is_empty() {
        return Ok(explicit.to_vec());
    }
    match manifest {
        Some(manifest) => manifest.table_paths(project_dir),
        None => bail!("no tables given and no pinmux.toml found"),
    }
}

pub(crate) fn compile_options(manifest: Option<&PinmuxManifest>) -> CompileOptions {
    manifest
        .map(PinmuxManifest::compile_options)
        .unwrap_or_default()
}

pub(crate) fn output_layout(manifest: Option<&PinmuxManifest>) -> OutputLayout {
    manifest
        .map(PinmuxManifest::output_layout)
        .unwrap_or_default()
}
