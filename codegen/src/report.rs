//! JSON run report.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use vkmock_registry::SkippedCommand;

use crate::artifact::portable_path;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::pipeline::GenerationSummary;

/// Machine-readable record of one run.
///
/// This is the only output that carries a timestamp; generated artifacts
/// never do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generator_version: String,
    /// RFC 3339 time of the run.
    pub generated_at: String,
    pub registry: PathBuf,
    pub api: String,
    pub enabled_extensions: Vec<String>,
    /// Number of commands excluded by disabled extensions.
    pub blacklisted: usize,
    pub functions: Vec<String>,
    pub skipped: Vec<SkippedCommand>,
    pub stubs_created: usize,
    pub stubs_preserved: usize,
    /// SHA-256 of every regenerated artifact, keyed by path.
    pub checksums: BTreeMap<String, String>,
}

impl GenerationReport {
    pub fn new(config: &GeneratorConfig, summary: &GenerationSummary) -> Self {
        let checksums = summary
            .artifacts
            .iter()
            .filter(|a| a.kind.write_policy() == crate::WritePolicy::Overwrite)
            .filter_map(|a| {
                a.checksum
                    .as_ref()
                    .map(|sum| (portable_path(&a.path), sum.clone()))
            })
            .collect();

        Self {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now().to_rfc3339(),
            registry: config.registry.clone(),
            api: config.build.api.clone(),
            enabled_extensions: config.enabled_extensions.clone(),
            blacklisted: summary.blacklisted,
            functions: summary.functions.clone(),
            skipped: summary.skipped.clone(),
            stubs_created: summary.stubs_created(),
            stubs_preserved: summary.stubs_preserved(),
            checksums,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactKind;
    use crate::emit::EmitOutcome;
    use crate::pipeline::EmittedArtifact;
    use vkmock_registry::SkipReason;

    fn summary() -> GenerationSummary {
        GenerationSummary {
            functions: vec!["vkFoo".to_string()],
            artifacts: vec![
                EmittedArtifact {
                    kind: ArtifactKind::InfoHeader,
                    path: PathBuf::from("gen/include/vkFoo_info.hpp"),
                    function: Some("vkFoo".to_string()),
                    outcome: EmitOutcome::Written,
                    checksum: Some("aa".to_string()),
                },
                EmittedArtifact {
                    kind: ArtifactKind::Stub,
                    path: PathBuf::from("src/default/vkFoo_default.cpp"),
                    function: Some("vkFoo".to_string()),
                    outcome: EmitOutcome::Created,
                    checksum: Some("bb".to_string()),
                },
            ],
            skipped: vec![SkippedCommand::new(Some("vkBar"), SkipReason::Blacklisted)],
            blacklisted: 3,
        }
    }

    #[test]
    fn test_report_fields() {
        let config = GeneratorConfig {
            enabled_extensions: vec!["VK_KHR_surface".to_string()],
            ..GeneratorConfig::default()
        };
        let report = GenerationReport::new(&config, &summary());

        assert_eq!(report.generator_version, env!("CARGO_PKG_VERSION"));
        assert!(chrono::DateTime::parse_from_rfc3339(&report.generated_at).is_ok());
        assert_eq!(report.api, "vulkan");
        assert_eq!(report.enabled_extensions, vec!["VK_KHR_surface"]);
        assert_eq!(report.blacklisted, 3);
        assert_eq!(report.stubs_created, 1);
        assert_eq!(report.stubs_preserved, 0);
    }

    #[test]
    fn test_checksums_cover_regenerated_artifacts_only() {
        let report = GenerationReport::new(&GeneratorConfig::default(), &summary());
        assert_eq!(report.checksums.len(), 1);
        assert_eq!(
            report.checksums.get("gen/include/vkFoo_info.hpp").map(String::as_str),
            Some("aa")
        );
    }

    #[test]
    fn test_json_shape() {
        let report = GenerationReport::new(&GeneratorConfig::default(), &summary());
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["skipped"][0]["name"], "vkBar");
        assert_eq!(value["skipped"][0]["reason"], "blacklisted");
        assert_eq!(value["functions"][0], "vkFoo");
    }
}
