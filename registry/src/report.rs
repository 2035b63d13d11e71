//! Diagnostics for commands dropped while building the function model.

use serde::{Deserialize, Serialize};

/// Why a command entry produced no function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Entry has neither a `proto` element nor an alias.
    MissingPrototype,
    /// Prototype has no `name` element.
    MissingName,
    /// Command name is not a C identifier.
    InvalidName,
    /// Prototype has no `type` element.
    MissingReturnType,
    /// A parameter has no name or an unsupported declarator.
    MalformedParameter,
    /// Entry belongs to a different API variant of the registry.
    OtherApi,
    /// Command is required only by disabled extensions.
    Blacklisted,
    /// A function with the same name was already generated.
    Duplicate,
    /// Alias entry while alias resolution is disabled.
    Alias,
    /// Alias whose target has no usable definition.
    UnresolvedAlias,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPrototype => write!(f, "missing_prototype"),
            Self::MissingName => write!(f, "missing_name"),
            Self::InvalidName => write!(f, "invalid_name"),
            Self::MissingReturnType => write!(f, "missing_return_type"),
            Self::MalformedParameter => write!(f, "malformed_parameter"),
            Self::OtherApi => write!(f, "other_api"),
            Self::Blacklisted => write!(f, "blacklisted"),
            Self::Duplicate => write!(f, "duplicate"),
            Self::Alias => write!(f, "alias"),
            Self::UnresolvedAlias => write!(f, "unresolved_alias"),
        }
    }
}

/// One command entry that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCommand {
    /// Command name, when the entry carried one.
    pub name: Option<String>,
    pub reason: SkipReason,
    /// Extra context (alias target, offending declarator, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SkippedCommand {
    pub fn new(name: Option<&str>, reason: SkipReason) -> Self {
        Self {
            name: name.map(String::from),
            reason,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl std::fmt::Display for SkippedCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.name.as_deref().unwrap_or("<unnamed>"), self.reason)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}
