//! Function model definitions.
//!
//! These types are the in-memory projection of one registry command. They are
//! built once per run by the registry crate, never mutated afterwards, and
//! consumed read-only by the renderers.

use serde::{Deserialize, Serialize};

use crate::declarator::{Declarator, DeclaratorError, normalize_type_text, parse_declarator};

/// Result-code type of the Vulkan registry.
pub const DEFAULT_RESULT_TYPE: &str = "VkResult";

/// Declared type of a parameter.
///
/// # Examples
///
/// ```
/// use vkmock_core::ParamType;
///
/// let ty = ParamType::FixedArray { element: "float".into(), size: 4 };
/// assert!(ty.is_array());
/// assert_eq!(ty.element_type(), "float");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    /// Raw C type text, qualifiers and pointer declarators included
    /// (e.g. `const VkAllocationCallbacks*`).
    Scalar(String),
    /// Fixed-size array of `element`, rendered through an array wrapper type.
    FixedArray { element: String, size: usize },
}

impl ParamType {
    /// Returns `true` for [`ParamType::FixedArray`].
    pub fn is_array(&self) -> bool {
        matches!(self, Self::FixedArray { .. })
    }

    /// Scalar type text, or the element type of an array.
    pub fn element_type(&self) -> &str {
        match self {
            Self::Scalar(ty) => ty,
            Self::FixedArray { element, .. } => element,
        }
    }
}

/// One positional parameter of a [`Function`].
///
/// The array discriminant is decided once, from the declarator, when the
/// parameter is constructed.
///
/// # Examples
///
/// ```
/// use vkmock_core::{ParamType, Parameter};
///
/// let p = Parameter::from_declaration("float", "pData[4]").unwrap();
/// assert_eq!(p.name(), "pData");
/// assert!(p.is_array_type());
/// assert_eq!(p.ty(), &ParamType::FixedArray { element: "float".into(), size: 4 });
///
/// let q = Parameter::from_declaration("VkDevice", "device").unwrap();
/// assert!(!q.is_array_type());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    ty: ParamType,
    is_array_type: bool,
}

impl Parameter {
    /// Creates a scalar parameter.
    pub fn scalar(name: impl Into<String>, ty: impl AsRef<str>) -> Self {
        Self {
            name: name.into(),
            ty: ParamType::Scalar(normalize_type_text(ty.as_ref())),
            is_array_type: false,
        }
    }

    /// Creates a fixed-size array parameter.
    pub fn fixed_array(name: impl Into<String>, element: impl AsRef<str>, size: usize) -> Self {
        Self {
            name: name.into(),
            ty: ParamType::FixedArray {
                element: normalize_type_text(element.as_ref()),
                size,
            },
            is_array_type: true,
        }
    }

    /// Builds a parameter from registry declaration text.
    ///
    /// `declared_name` may carry a trailing `[N]` extent, which is moved into
    /// the type.
    ///
    /// # Errors
    ///
    /// Returns a [`DeclaratorError`] when the name is empty or uses an
    /// unsupported declarator shape.
    pub fn from_declaration(
        declared_type: &str,
        declared_name: &str,
    ) -> Result<Self, DeclaratorError> {
        Ok(match parse_declarator(declared_name)? {
            Declarator::Scalar { name } => Self::scalar(name, declared_type),
            Declarator::FixedArray { name, size } => Self::fixed_array(name, declared_type, size),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &ParamType {
        &self.ty
    }

    pub fn is_array_type(&self) -> bool {
        self.is_array_type
    }
}

/// Return-statement policy bucket of a return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    /// The registry's designated result-code type.
    ResultCode,
    /// `void`.
    Void,
    /// Any other scalar or opaque type.
    Value,
}

/// Return type of a [`Function`] with its policy classification.
///
/// # Examples
///
/// ```
/// use vkmock_core::{ReturnKind, ReturnType};
///
/// assert_eq!(ReturnType::classify("VkResult", "VkResult").kind(), ReturnKind::ResultCode);
/// assert_eq!(ReturnType::classify("void", "VkResult").kind(), ReturnKind::Void);
/// assert_eq!(ReturnType::classify("uint32_t", "VkResult").kind(), ReturnKind::Value);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnType {
    raw: String,
    kind: ReturnKind,
}

impl ReturnType {
    /// Classifies `raw` against the designated result-code type name.
    pub fn classify(raw: &str, result_code_type: &str) -> Self {
        let raw = normalize_type_text(raw);
        let kind = if raw == result_code_type {
            ReturnKind::ResultCode
        } else if raw == "void" {
            ReturnKind::Void
        } else {
            ReturnKind::Value
        };
        Self { raw, kind }
    }

    /// Shorthand for `void`.
    pub fn void() -> Self {
        Self {
            raw: "void".to_string(),
            kind: ReturnKind::Void,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> ReturnKind {
        self.kind
    }
}

/// One API entry point.
///
/// # Examples
///
/// ```
/// use vkmock_core::{Function, Parameter, ReturnType};
///
/// let f = Function::new(
///     "vkCmdSetBlendConstants",
///     ReturnType::void(),
///     vec![
///         Parameter::scalar("commandBuffer", "VkCommandBuffer"),
///         Parameter::fixed_array("blendConstants", "const float", 4),
///     ],
/// );
/// assert!(f.has_array_params());
/// assert_eq!(f.argument_names(), vec!["commandBuffer", "blendConstants"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    /// API symbol name.
    pub name: String,
    /// Declared return type.
    pub return_type: ReturnType,
    /// Parameters in registry order.
    pub params: Vec<Parameter>,
}

impl Function {
    pub fn new(name: impl Into<String>, return_type: ReturnType, params: Vec<Parameter>) -> Self {
        Self {
            name: name.into(),
            return_type,
            params,
        }
    }

    /// Returns `true` if any parameter is a fixed-size array.
    pub fn has_array_params(&self) -> bool {
        self.params.iter().any(Parameter::is_array_type)
    }

    /// Parameter names in forwarding order.
    pub fn argument_names(&self) -> Vec<&str> {
        self.params.iter().map(Parameter::name).collect()
    }

    /// Returns a copy of this function exported under another symbol name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: self.return_type.clone(),
            params: self.params.clone(),
        }
    }
}
