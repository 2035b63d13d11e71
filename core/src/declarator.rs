//! Parameter declarator parsing.
//!
//! Registry parameters spell fixed-size arrays C-style, with the extent
//! attached to the name (`blendConstants[4]`). [`parse_declarator`] turns the
//! declared name into a typed [`Declarator`] once, at model-building time, so
//! renderers never have to inspect name text again.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static FIXED_ARRAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*\[\s*([0-9]+)\s*\]$")
        .expect("static regex must compile")
});

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex must compile"));

/// Shape of a declared parameter name.
///
/// # Examples
///
/// ```
/// use vkmock_core::{Declarator, parse_declarator};
///
/// assert_eq!(
///     parse_declarator("pData[4]").unwrap(),
///     Declarator::FixedArray { name: "pData".into(), size: 4 }
/// );
/// assert_eq!(
///     parse_declarator("device").unwrap(),
///     Declarator::Scalar { name: "device".into() }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declarator {
    /// Plain identifier.
    Scalar { name: String },
    /// `ident[N]` with a literal decimal extent.
    FixedArray { name: String, size: usize },
}

impl Declarator {
    /// Identifier with any array extent stripped.
    pub fn name(&self) -> &str {
        match self {
            Self::Scalar { name } | Self::FixedArray { name, .. } => name,
        }
    }
}

/// Declared names that cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclaratorError {
    /// Name is empty or whitespace-only.
    #[error("parameter name is empty")]
    Empty,
    /// Name is neither an identifier nor `ident[digits]`.
    #[error("unsupported parameter declarator: {0}")]
    Unsupported(String),
    /// Array extent does not fit in `usize`.
    #[error("array extent out of range in declarator: {0}")]
    ExtentOutOfRange(String),
}

/// Returns `true` when `text` is a C identifier.
///
/// ```
/// assert!(vkmock_core::is_identifier("vkCreateInstance"));
/// assert!(!vkmock_core::is_identifier("../vkCreateInstance"));
/// ```
pub fn is_identifier(text: &str) -> bool {
    IDENTIFIER_RE.is_match(text)
}

/// Parses a declared parameter name.
///
/// Surrounding whitespace is ignored, as is whitespace around the brackets
/// and extent, so `x [ 4 ]` and `x[4]` are the same declarator. Whitespace
/// inside the identifier is not. Extents must be decimal literals; symbolic
/// extents (`x[VK_UUID_SIZE]`) are rejected.
pub fn parse_declarator(raw: &str) -> Result<Declarator, DeclaratorError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DeclaratorError::Empty);
    }

    if is_identifier(trimmed) {
        return Ok(Declarator::Scalar {
            name: trimmed.to_string(),
        });
    }

    let Some(caps) = FIXED_ARRAY_RE.captures(trimmed) else {
        return Err(DeclaratorError::Unsupported(trimmed.to_string()));
    };
    let size = caps[2]
        .parse::<usize>()
        .map_err(|_| DeclaratorError::ExtentOutOfRange(trimmed.to_string()))?;

    Ok(Declarator::FixedArray {
        name: caps[1].to_string(),
        size,
    })
}

/// Collapses runs of whitespace in C type text to single spaces.
///
/// ```
/// assert_eq!(
///     vkmock_core::normalize_type_text("  const  VkAllocationCallbacks*\n"),
///     "const VkAllocationCallbacks*"
/// );
/// ```
pub fn normalize_type_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
