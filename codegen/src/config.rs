//! Generator configuration.
//!
//! Defines the YAML-serializable configuration of one generation run. Every
//! field has a default, so a partial file only overrides what it names.
//!
//! # Example YAML
//!
//! ```yaml
//! registry: third_party/vk.xml
//! output:
//!   header_dir: gen/include
//!   source_dir: gen/src
//!   manifest_dir: gen
//!   stub_dir: src/default
//! enabled_extensions:
//!   - VK_KHR_surface
//!   - VK_KHR_swapchain
//! build:
//!   api: vulkan
//!   resolve_aliases: true
//! render:
//!   namespace: simulakrum
//! create_dirs: true
//! jobs: 4
//! report: gen/report.json
//! ```

use std::collections::BTreeSet;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vkmock_registry::BuildOptions;

use crate::artifact::OutputLayout;
use crate::error::Result;
use crate::render::RenderConfig;

/// Default registry path.
pub const DEFAULT_REGISTRY: &str = "vk.xml";

/// Complete configuration of a generation run.
///
/// # Examples
///
/// ```
/// use vkmock_codegen::GeneratorConfig;
///
/// let config: GeneratorConfig = serde_yaml::from_str("jobs: 4\n").unwrap();
/// assert_eq!(config.jobs, 4);
/// assert_eq!(config.registry.to_str(), Some("vk.xml"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Registry document to read.
    pub registry: PathBuf,
    /// Output directory per artifact kind.
    pub output: OutputLayout,
    /// Extensions whose commands are generated.
    pub enabled_extensions: Vec<String>,
    /// Model building options.
    pub build: BuildOptions,
    /// Template parameters.
    pub render: RenderConfig,
    /// Create missing output directories instead of failing.
    pub create_dirs: bool,
    /// Number of parallel emission workers.
    pub jobs: usize,
    /// Where to write the JSON run report, if anywhere.
    pub report: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            registry: PathBuf::from(DEFAULT_REGISTRY),
            output: OutputLayout::default(),
            enabled_extensions: Vec::new(),
            build: BuildOptions::default(),
            render: RenderConfig::default(),
            create_dirs: false,
            jobs: 1,
            report: None,
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::GenerateError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::GenerateError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::GenerateError::IoError) if the file cannot
    /// be written, or [`YamlError`](crate::GenerateError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Enabled extensions as a set (exact name match).
    pub fn enabled_set(&self) -> BTreeSet<String> {
        self.enabled_extensions.iter().cloned().collect()
    }

    /// Adds extensions to the enabled set, skipping ones already present.
    pub fn enable_extensions<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.enabled_extensions.contains(&name) {
                self.enabled_extensions.push(name);
            }
        }
    }

    /// Worker count, treating `0` as `1`.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.max(1)
    }
}
