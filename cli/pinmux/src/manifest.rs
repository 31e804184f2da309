//! `pinmux.toml` manifest parsing and project configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pinmux_core::{AliasPolicy, CompileOptions};
use pinmux_emit::OutputLayout;
use serde::{Deserialize, Serialize};

/// Manifest file name searched for from the working directory upwards.
pub const MANIFEST_FILE: &str = "pinmux.toml";

/// The top-level manifest structure for a pinmux project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinmuxManifest {
    /// Project metadata (required).
    pub project: ProjectConfig,
    /// Pin tables to compile.
    #[serde(default)]
    pub input: InputConfig,
    /// Where generated files go.
    #[serde(default)]
    pub output: OutputConfig,
    /// Resolver behaviour.
    #[serde(default)]
    pub resolve: ResolveConfig,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required).
    pub name: String,
}

/// Input section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Table paths relative to the manifest directory. Empty means every
    /// `*.csv` in the project directory.
    #[serde(default)]
    pub tables: Vec<String>,
}

/// Output section. Both directories are relative to the output root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_header_dir")]
    pub header_dir: String,
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            header_dir: default_header_dir(),
            source_dir: default_source_dir(),
        }
    }
}

fn default_header_dir() -> String {
    pinmux_emit::artifacts::DEFAULT_HEADER_DIR.to_string()
}

fn default_source_dir() -> String {
    pinmux_emit::artifacts::DEFAULT_SOURCE_DIR.to_string()
}

/// Resolve section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// What happens when an alias is bound twice.
    #[serde(default)]
    pub aliases: AliasPolicy,
}

impl PinmuxManifest {
    /// Search for `pinmux.toml` starting at `start_dir` and walking up.
    ///
    /// Returns `(manifest, project_dir)` if found.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: PinmuxManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing pinmux.toml")
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            alias_policy: self.resolve.aliases,
            ..CompileOptions::default()
        }
    }

    pub fn output_layout(&self) -> OutputLayout {
        OutputLayout {
            header_dir: PathBuf::from(&self.output.header_dir),
            source_dir: PathBuf::from(&self.output.source_dir),
        }
    }

    /// Table paths for the project, sorted when discovered by extension.
    pub fn table_paths(&self, project_dir: &Path) -> Result<Vec<PathBuf>> {
        if !self.input.tables.is_empty() {
            return Ok(self
                .input
                .tables
                .iter()
                .map(|table| project_dir.join(table))
                .collect());
        }

        let entries = fs::read_dir(project_dir)
            .with_context(|| format!("reading {}", project_dir.display()))?;
        let mut tables = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("reading {}", project_dir.display()))?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
                tables.push(path);
            }
        }
        tables.sort();
        Ok(tables)
    }

    /// Generate the default manifest for `pinmux init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[project]
name = "{name}"

[input]
tables = ["{name}.csv"]

[output]
header_dir = "Project_Headers"
source_dir = "Sources"

[resolve]
aliases = "last-write-wins"
"#
        )
    }
}
