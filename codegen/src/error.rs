//! Error types for generation runs.
//!
//! Provides a unified error type covering every fatal failure of a run:
//! registry loading, configuration I/O, model validation and file emission.
//! Per-command problems never surface here; they are recorded as skipped
//! commands instead.

use std::path::PathBuf;

use thiserror::Error;
use vkmock_core::ValidationError;
use vkmock_registry::RegistryError;

use crate::emit::EmitError;

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Registry file is unreadable or malformed.
    #[error("failed to load registry '{}': {source}", .path.display())]
    Registry {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },

    /// An output file or directory could not be written.
    #[error(transparent)]
    Emit(#[from] EmitError),

    /// Configuration file I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Run report serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The function model violates an invariant the renderers rely on.
    #[error("invalid function model: {}", join_errors(.0))]
    InvalidModel(Vec<ValidationError>),

    /// Parallel emission worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`GenerateError`].
pub type Result<T> = std::result::Result<T, GenerateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_model_lists_every_error() {
        let err = GenerateError::InvalidModel(vec![
            ValidationError::DuplicateFunction("vkFoo".to_string()),
            ValidationError::EmptyFunctionName,
        ]);
        assert_eq!(
            err.to_string(),
            "invalid function model: duplicate function: vkFoo; function name cannot be empty"
        );
    }

    #[test]
    fn test_registry_error_mentions_path() {
        let err = GenerateError::Registry {
            path: PathBuf::from("vk.xml"),
            source: RegistryError::MissingElement("commands"),
        };
        assert_eq!(
            err.to_string(),
            "failed to load registry 'vk.xml': registry has no <commands> element"
        );
    }
}
