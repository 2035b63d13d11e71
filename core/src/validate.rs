//! Function model validation.
//!
//! Checks the invariants renderers rely on: unique function names that are C
//! identifiers, and normalized parameter names. The registry crate upholds these while
//! building, so a non-empty result here means the model was assembled by hand
//! or a builder bug slipped through.
//!
//! # Examples
//!
//! ```
//! use vkmock_core::*;
//!
//! let functions = vec![
//!     Function::new("vkCreateDevice", ReturnType::classify("VkResult", DEFAULT_RESULT_TYPE), Vec::new()),
//!     Function::new("vkDestroyDevice", ReturnType::void(), Vec::new()),
//! ];
//! assert!(validate_functions(&functions).is_empty());
//!
//! let duplicated = vec![functions[0].clone(), functions[0].clone()];
//! assert!(!validate_functions(&duplicated).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{Function, ParamType, is_identifier};

/// Function model validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Function name is empty or whitespace-only.
    #[error("function name cannot be empty")]
    EmptyFunctionName,
    /// Function name is not a C identifier.
    #[error("function name is not a C identifier: '{0}'")]
    InvalidFunctionName(String),
    /// Two functions in the same run share a name.
    #[error("duplicate function: {0}")]
    DuplicateFunction(String),
    /// Parameter name is empty.
    #[error("empty parameter name in {0}")]
    EmptyParameterName(String),
    /// Parameter name still carries array bracket syntax.
    #[error("parameter '{param}' of {function} is not normalized")]
    UnnormalizedParameter { function: String, param: String },
    /// Two parameters of one function share a name.
    #[error("duplicate parameter '{param}' in {function}")]
    DuplicateParameter { function: String, param: String },
    /// Fixed-size array with an extent of zero.
    #[error("zero-sized array parameter '{param}' in {function}")]
    ZeroSizedArray { function: String, param: String },
}

/// Validates a complete function list.
///
/// Returns every violation found, in list order.
pub fn validate_functions(functions: &[Function]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for function in functions {
        if !seen.insert(function.name.as_str()) {
            errors.push(ValidationError::DuplicateFunction(function.name.clone()));
            continue;
        }
        errors.extend(validate_function(function));
    }

    errors
}

/// Validates a single function.
pub fn validate_function(function: &Function) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if function.name.trim().is_empty() {
        errors.push(ValidationError::EmptyFunctionName);
        return errors;
    }
    if !is_identifier(&function.name) {
        errors.push(ValidationError::InvalidFunctionName(function.name.clone()));
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for param in &function.params {
        let name = param.name();
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyParameterName(function.name.clone()));
            continue;
        }
        if name.contains('[') || name.contains(']') {
            errors.push(ValidationError::UnnormalizedParameter {
                function: function.name.clone(),
                param: name.to_string(),
            });
        }
        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateParameter {
                function: function.name.clone(),
                param: name.to_string(),
            });
        }
        if let ParamType::FixedArray { size: 0, .. } = param.ty() {
            errors.push(ValidationError::ZeroSizedArray {
                function: function.name.clone(),
                param: name.to_string(),
            });
        }
    }

    errors
}
