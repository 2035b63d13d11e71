//! Registry-to-artifact pipeline.
//!
//! The blacklist and the complete function list exist before the first file is
//! written, and the aggregate artifacts are written only after every
//! per-function artifact. Per-function emission in between is independent
//! per function and may run on a worker pool.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use vkmock_core::{Function, validate_functions};
use vkmock_registry::{Registry, SkippedCommand, build_functions, compile_blacklist};

use crate::artifact::ArtifactKind;
use crate::config::GeneratorConfig;
use crate::emit::{EmitError, EmitOutcome, Emitter, WritePolicy};
use crate::error::{GenerateError, Result};
use crate::render::{
    render_build_manifest, render_combined_index, render_function_impl, render_info_header,
    render_stub,
};
use crate::report::GenerationReport;

/// One file touched (or deliberately left alone) by a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    /// Owning function; `None` for aggregate artifacts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    pub outcome: EmitOutcome,
    /// SHA-256 of the content written; `None` when the file was preserved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Result of a successful run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Generated function names in registry order.
    pub functions: Vec<String>,
    /// Every artifact in emission order.
    pub artifacts: Vec<EmittedArtifact>,
    /// Commands dropped while building the model.
    pub skipped: Vec<SkippedCommand>,
    /// Size of the compiled blacklist.
    pub blacklisted: usize,
}

impl GenerationSummary {
    /// Artifacts of one kind.
    pub fn artifacts_of(&self, kind: ArtifactKind) -> impl Iterator<Item = &EmittedArtifact> {
        self.artifacts.iter().filter(move |a| a.kind == kind)
    }

    /// Artifacts belonging to `function`.
    pub fn artifacts_for<'a>(&'a self, function: &'a str) -> impl Iterator<Item = &'a EmittedArtifact> {
        self.artifacts
            .iter()
            .filter(move |a| a.function.as_deref() == Some(function))
    }

    pub fn stubs_created(&self) -> usize {
        self.artifacts_of(ArtifactKind::Stub)
            .filter(|a| a.outcome == EmitOutcome::Created)
            .count()
    }

    pub fn stubs_preserved(&self) -> usize {
        self.artifacts_of(ArtifactKind::Stub)
            .filter(|a| a.outcome == EmitOutcome::Preserved)
            .count()
    }
}

/// Runs the whole pipeline: load the registry, build the model, emit.
///
/// # Errors
///
/// Returns [`GenerateError::Registry`] if the registry cannot be loaded, and
/// any error of [`generate_from_registry`].
///
/// # Examples
///
/// ```no_run
/// use vkmock_codegen::{GeneratorConfig, generate};
///
/// let config = GeneratorConfig {
///     create_dirs: true,
///     ..GeneratorConfig::default()
/// };
/// let summary = generate(&config).unwrap();
/// println!("generated {} functions", summary.functions.len());
/// ```
pub fn generate(config: &GeneratorConfig) -> Result<GenerationSummary> {
    debug!(registry = %config.registry.display(), "Loading registry");
    let registry = Registry::load(&config.registry).map_err(|source| GenerateError::Registry {
        path: config.registry.clone(),
        source,
    })?;
    generate_from_registry(&registry, config)
}

/// Runs the pipeline over an already loaded registry.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidModel`] before any file is written if the
/// built model violates a model invariant, [`GenerateError::Emit`] on the
/// first filesystem failure (files already written stay in place), and
/// report serialization errors when a report path is configured.
pub fn generate_from_registry(
    registry: &Registry,
    config: &GeneratorConfig,
) -> Result<GenerationSummary> {
    let blacklist = compile_blacklist(registry, &config.enabled_set(), &config.build.api);
    let model = build_functions(registry, &blacklist, &config.build);

    let errors = validate_functions(&model.functions);
    if !errors.is_empty() {
        return Err(GenerateError::InvalidModel(errors));
    }

    let emitter = Emitter::new(config.create_dirs);
    emitter.prepare(config.output.dirs())?;

    let mut artifacts: Vec<EmittedArtifact> = emit_functions(&model.functions, config, emitter)?
        .into_iter()
        .flatten()
        .collect();

    let index = render_combined_index(&model.functions, &config.render);
    artifacts.push(emit_artifact(
        emitter,
        ArtifactKind::CombinedIndex,
        config.output.dir(ArtifactKind::CombinedIndex).join(&config.render.index_file),
        None,
        &index,
    )?);

    let manifest = render_build_manifest(&model.functions, &config.output, &config.render);
    artifacts.push(emit_artifact(
        emitter,
        ArtifactKind::BuildManifest,
        config.output.dir(ArtifactKind::BuildManifest).join(&config.render.manifest_file),
        None,
        &manifest,
    )?);

    let summary = GenerationSummary {
        functions: model.functions.iter().map(|f| f.name.clone()).collect(),
        artifacts,
        skipped: model.skipped,
        blacklisted: blacklist.len(),
    };

    info!(
        functions = summary.functions.len(),
        skipped = summary.skipped.len(),
        blacklisted = summary.blacklisted,
        stubs_created = summary.stubs_created(),
        stubs_preserved = summary.stubs_preserved(),
        "Generation complete"
    );

    if let Some(path) = &config.report {
        write_report(path, config, &summary, emitter)?;
    }

    Ok(summary)
}

/// Hex SHA-256 of `content`.
pub fn content_checksum(content: &str) -> String {
    let hash = Sha256::digest(content.as_bytes());
    format!("{:x}", hash)
}

fn emit_functions(
    functions: &[Function],
    config: &GeneratorConfig,
    emitter: Emitter,
) -> Result<Vec<Vec<EmittedArtifact>>> {
    let emit_one = |function: &Function| emit_function(function, config, emitter);

    let jobs = config.effective_jobs();
    if jobs == 1 {
        let results = functions
            .iter()
            .map(emit_one)
            .collect::<std::result::Result<Vec<_>, EmitError>>()?;
        return Ok(results);
    }

    use rayon::prelude::*;
    debug!(jobs, functions = functions.len(), "Emitting in parallel");
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    let results = pool.install(|| {
        functions
            .par_iter()
            .map(emit_one)
            .collect::<std::result::Result<Vec<_>, EmitError>>()
    })?;
    Ok(results)
}

fn emit_function(
    function: &Function,
    config: &GeneratorConfig,
    emitter: Emitter,
) -> std::result::Result<Vec<EmittedArtifact>, EmitError> {
    let mut artifacts = Vec::with_capacity(ArtifactKind::PER_FUNCTION.len());
    for kind in ArtifactKind::PER_FUNCTION {
        let Some(path) = config.output.function_artifact(kind, &function.name) else {
            continue;
        };
        let content = match kind {
            ArtifactKind::InfoHeader => render_info_header(function, &config.render),
            ArtifactKind::FunctionImpl => render_function_impl(function, &config.render),
            ArtifactKind::Stub => render_stub(function, &config.render),
            ArtifactKind::CombinedIndex | ArtifactKind::BuildManifest => continue,
        };
        artifacts.push(emit_artifact(
            emitter,
            kind,
            path,
            Some(function.name.as_str()),
            &content,
        )?);
    }
    Ok(artifacts)
}

fn emit_artifact(
    emitter: Emitter,
    kind: ArtifactKind,
    path: PathBuf,
    function: Option<&str>,
    content: &str,
) -> std::result::Result<EmittedArtifact, EmitError> {
    let outcome = emitter.emit(&path, content, kind.write_policy())?;
    let checksum = match outcome {
        EmitOutcome::Preserved => None,
        EmitOutcome::Written | EmitOutcome::Created => Some(content_checksum(content)),
    };
    Ok(EmittedArtifact {
        kind,
        path,
        function: function.map(String::from),
        outcome,
        checksum,
    })
}

fn write_report(
    path: &Path,
    config: &GeneratorConfig,
    summary: &GenerationSummary,
    emitter: Emitter,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        emitter.prepare([parent])?;
    }
    let report = GenerationReport::new(config, summary);
    let json = report.to_json()?;
    emitter.emit(path, &json, WritePolicy::Overwrite)?;
    info!(path = %path.display(), "Wrote run report");
    Ok(())
}
