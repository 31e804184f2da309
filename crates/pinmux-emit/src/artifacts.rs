//! Artifact sets: where generated files go, rendering them, writing them.
//!
//! Every artifact of a table is rendered into memory before any file is
//! touched, so a failed run leaves previously generated files intact.

use std::path::{Path, PathBuf};

use log::info;
use pinmux_core::{compile, CompileOptions, SymbolModel, Table};

use crate::device::Device;
use crate::error::{EmitError, Result};
use crate::gpio::{render_gpio_header, render_gpio_source};
use crate::pin_mapping::render_pin_mapping;

/// Default header directory, relative to the output root.
pub const DEFAULT_HEADER_DIR: &str = "Project_Headers";

/// Default source directory, relative to the output root.
pub const DEFAULT_SOURCE_DIR: &str = "Sources";

/// Directory names for headers and sources under an output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub header_dir: PathBuf,
    pub source_dir: PathBuf,
}

impl Default for OutputLayout {
    fn default() -> Self {
        OutputLayout {
            header_dir: PathBuf::from(DEFAULT_HEADER_DIR),
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
        }
    }
}

impl OutputLayout {
    /// Output root for a table: `out_dir` if given, otherwise the
    /// directory holding the table.
    pub fn root_for(table: &Path, out_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = out_dir {
            return Ok(dir.to_path_buf());
        }
        match table.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Ok(PathBuf::from(".")),
            Some(parent) => Ok(parent.to_path_buf()),
            None => Err(EmitError::MissingParent {
                path: table.display().to_string(),
            }),
        }
    }

    /// The three artifact paths for a device under `root`, in write order.
    pub fn paths(&self, root: &Path, device: &Device) -> [PathBuf; 3] {
        let headers = root.join(&self.header_dir);
        let sources = root.join(&self.source_dir);
        [
            headers.join(device.pin_mapping_header()),
            headers.join(device.gpio_header()),
            sources.join(device.gpio_source()),
        ]
    }
}

/// One rendered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

/// All rendered files for one device.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    device: Device,
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    /// Render every artifact of a compiled model.
    pub fn render(device: Device, model: &SymbolModel, layout: &OutputLayout, root: &Path) -> Self {
        let [pin_mapping, gpio_header, gpio_source] = layout.paths(root, &device);
        let artifacts = vec![
            Artifact {
                path: pin_mapping,
                contents: render_pin_mapping(&device, model),
            },
            Artifact {
                path: gpio_header,
                contents: render_gpio_header(&device, model),
            },
            Artifact {
                path: gpio_source,
                contents: render_gpio_source(&device, model),
            },
        ];
        ArtifactSet { device, artifacts }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Write every artifact, creating directories as needed.
    pub fn write(&self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.artifacts.len());
        for artifact in &self.artifacts {
            if let Some(dir) = artifact.path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(&artifact.path, &artifact.contents)?;
            info!("wrote {}", artifact.path.display());
            written.push(artifact.path.clone());
        }
        Ok(written)
    }
}

/// Load, compile and render one table without writing anything.
pub fn build_table(
    table_path: &Path,
    options: &CompileOptions,
    layout: &OutputLayout,
    out_dir: Option<&Path>,
) -> Result<ArtifactSet> {
    let device = Device::from_table_path(table_path)?;
    let root = OutputLayout::root_for(table_path, out_dir)?;
    info!("compiling {} for {}", table_path.display(), device.name());
    let table = Table::load(table_path)?;
    let model = compile(&table, options)?;
    Ok(ArtifactSet::render(device, &model, layout, &root))
}

/// Remove the artifacts of one table. Returns the paths actually removed.
pub fn remove_artifacts(
    table_path: &Path,
    layout: &OutputLayout,
    out_dir: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let device = Device::from_table_path(table_path)?;
    let root = OutputLayout::root_for(table_path, out_dir)?;
    let mut removed = Vec::new();
    for path in layout.paths(&root, &device) {
        if path.exists() {
            std::fs::remove_file(&path)?;
            info!("removed {}", path.display());
            removed.push(path);
        }
    }
    Ok(removed)
}
