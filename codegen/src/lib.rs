//! Scaffolding generation for registry-driven API mocking.
//!
//! Given the function model built by [`vkmock_registry`], this crate renders
//! and writes, per function `F`:
//!
//! - `F_info.hpp` — declares `F_default` and registers it in the lookup table
//! - `F.cpp` — the `extern "C"` trampoline forwarding to the dispatcher
//! - `F_default.cpp` — the hand-editable default body, written only once
//!
//! plus one combined index header and one CMake manifest for the whole run.
//!
//! Renderers are pure functions of a [`Function`](vkmock_core::Function) and a
//! [`RenderConfig`]. The [`Emitter`] applies [`WritePolicy::Overwrite`] to
//! regenerated artifacts and [`WritePolicy::WriteOnce`] to stubs.
//!
//! # Example
//!
//! ```
//! use vkmock_codegen::{GeneratorConfig, OutputLayout, generate_from_registry};
//! use vkmock_registry::Registry;
//!
//! let registry = Registry::parse_str(r#"
//! <registry><commands>
//!   <command><proto><type>void</type> <name>Foo</name></proto></command>
//! </commands></registry>"#).unwrap();
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut output = OutputLayout::under(dir.path().join("gen"));
//! output.stub_dir = dir.path().join("stubs");
//! let config = GeneratorConfig { output, create_dirs: true, ..GeneratorConfig::default() };
//!
//! let summary = generate_from_registry(&registry, &config).unwrap();
//! assert_eq!(summary.functions, vec!["Foo"]);
//! assert!(dir.path().join("stubs/Foo_default.cpp").exists());
//! ```

mod artifact;
mod config;
mod emit;
mod error;
mod pipeline;
mod render;
mod report;

pub use artifact::{ArtifactKind, OutputLayout, portable_path};
pub use config::{DEFAULT_REGISTRY, GeneratorConfig};
pub use emit::{EmitError, EmitOutcome, Emitter, WritePolicy};
pub use error::{GenerateError, Result};
pub use pipeline::{
    EmittedArtifact, GenerationSummary, content_checksum, generate, generate_from_registry,
};
pub use render::{
    DEFAULT_LICENSE, GENERATED_MARKER, RenderConfig, render_build_manifest, render_combined_index,
    render_function_impl, render_info_header, render_param, render_stub,
};
pub use report::GenerationReport;
