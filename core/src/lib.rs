//! Core function model for registry-driven mock generation.
//!
//! This crate defines the typed projection of one registry command:
//!
//! - [`Function`] — API symbol name, [`ReturnType`], ordered parameters.
//! - [`Parameter`] — name plus [`ParamType`], with the array discriminant
//!   fixed at construction.
//! - [`ReturnKind`] — the return-statement policy bucket (result code, void,
//!   other value).
//!
//! Declared parameter names are normalized through [`parse_declarator`]:
//! `pData[4]` becomes a parameter named `pData` whose type is a fixed-size
//! array of four elements.
//!
//! [`validate_functions`] checks the invariants every renderer relies on.
//!
//! # Example
//!
//! ```
//! use vkmock_core::*;
//!
//! let f = Function::new(
//!     "vkCmdSetBlendConstants",
//!     ReturnType::classify("void", DEFAULT_RESULT_TYPE),
//!     vec![
//!         Parameter::from_declaration("VkCommandBuffer", "commandBuffer").unwrap(),
//!         Parameter::from_declaration("const float", "blendConstants[4]").unwrap(),
//!     ],
//! );
//!
//! assert_eq!(f.return_type.kind(), ReturnKind::Void);
//! assert!(f.params[1].is_array_type());
//! assert!(validate_functions(&[f]).is_empty());
//! ```

mod declarator;
mod types;
mod validate;

pub use declarator::{
    Declarator, DeclaratorError, is_identifier, normalize_type_text, parse_declarator,
};
pub use types::*;
pub use validate::{ValidationError, validate_function, validate_functions};
