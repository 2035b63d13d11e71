//! Artifact kinds and where they land on disk.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::emit::WritePolicy;

/// Kind of generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Per-function registration header (`<name>_info.hpp`).
    InfoHeader,
    /// Per-function trampoline source (`<name>.cpp`).
    FunctionImpl,
    /// Per-function default implementation (`<name>_default.cpp`).
    Stub,
    /// Header including every info-header.
    CombinedIndex,
    /// Build-system file listing every per-function artifact.
    BuildManifest,
}

impl ArtifactKind {
    /// Kinds emitted once per function, in emission order.
    pub const PER_FUNCTION: [ArtifactKind; 3] = [Self::InfoHeader, Self::FunctionImpl, Self::Stub];

    /// Stubs are write-once; everything else is regenerated.
    pub fn write_policy(self) -> WritePolicy {
        match self {
            Self::Stub => WritePolicy::WriteOnce,
            _ => WritePolicy::Overwrite,
        }
    }

    /// File name of a per-function artifact, `None` for aggregate kinds.
    pub fn file_name(self, function: &str) -> Option<String> {
        match self {
            Self::InfoHeader => Some(format!("{function}_info.hpp")),
            Self::FunctionImpl => Some(format!("{function}.cpp")),
            Self::Stub => Some(format!("{function}_default.cpp")),
            Self::CombinedIndex | Self::BuildManifest => None,
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InfoHeader => write!(f, "info_header"),
            Self::FunctionImpl => write!(f, "function_impl"),
            Self::Stub => write!(f, "stub"),
            Self::CombinedIndex => write!(f, "combined_index"),
            Self::BuildManifest => write!(f, "build_manifest"),
        }
    }
}

/// Output directories per artifact kind.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vkmock_codegen::{ArtifactKind, OutputLayout};
///
/// let layout = OutputLayout::under("out");
/// assert_eq!(
///     layout.function_artifact(ArtifactKind::InfoHeader, "vkFoo"),
///     Some(Path::new("out/include/vkFoo_info.hpp").to_path_buf())
/// );
/// assert_eq!(layout.stub_dir, Path::new("src/default"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputLayout {
    /// Info-headers and the combined index.
    pub header_dir: PathBuf,
    /// Trampoline sources.
    pub source_dir: PathBuf,
    /// Build manifest.
    pub manifest_dir: PathBuf,
    /// Write-once stubs.
    pub stub_dir: PathBuf,
}

impl OutputLayout {
    /// Default base directory for regenerated scaffolding.
    pub const DEFAULT_BASE: &'static str = "gen";
    /// Default stub directory.
    pub const DEFAULT_STUB_DIR: &'static str = "src/default";

    /// Layout with headers in `<base>/include`, sources in `<base>/src`, the
    /// manifest in `<base>` and stubs in the default stub directory.
    pub fn under(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        Self {
            header_dir: base.join("include"),
            source_dir: base.join("src"),
            manifest_dir: base.to_path_buf(),
            stub_dir: PathBuf::from(Self::DEFAULT_STUB_DIR),
        }
    }

    /// Directory an artifact kind is written to.
    pub fn dir(&self, kind: ArtifactKind) -> &Path {
        match kind {
            ArtifactKind::InfoHeader | ArtifactKind::CombinedIndex => &self.header_dir,
            ArtifactKind::FunctionImpl => &self.source_dir,
            ArtifactKind::Stub => &self.stub_dir,
            ArtifactKind::BuildManifest => &self.manifest_dir,
        }
    }

    /// Path of a per-function artifact, `None` for aggregate kinds.
    pub fn function_artifact(&self, kind: ArtifactKind, function: &str) -> Option<PathBuf> {
        kind.file_name(function)
            .map(|file_name| self.dir(kind).join(file_name))
    }

    /// Every configured directory, deduplicated, in a stable order.
    pub fn dirs(&self) -> Vec<&Path> {
        let mut dirs: Vec<&Path> = Vec::with_capacity(4);
        for dir in [
            &self.header_dir,
            &self.source_dir,
            &self.manifest_dir,
            &self.stub_dir,
        ] {
            if !dirs.contains(&dir.as_path()) {
                dirs.push(dir);
            }
        }
        dirs
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::under(Self::DEFAULT_BASE)
    }
}

/// Renders a path for build files: forward slashes on every platform.
pub fn portable_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
