//! Registry loading and function model building.
//!
//! This crate turns a Vulkan-style API registry document into the ordered
//! [`Function`](vkmock_core::Function) list the code generator renders:
//!
//! 1. [`Registry::load`] parses the XML document.
//! 2. [`compile_blacklist`] computes the commands that belong only to
//!    extensions that are not enabled.
//! 3. [`build_functions`] walks the command entries in document order,
//!    drops blacklisted and unusable entries, and normalizes parameters.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use vkmock_registry::*;
//!
//! let registry = Registry::parse_str(r#"
//! <registry>
//!   <commands>
//!     <command><proto><type>void</type> <name>Foo</name></proto></command>
//!     <command><proto><type>void</type> <name>Baz</name></proto></command>
//!   </commands>
//!   <extensions>
//!     <extension name="EXT_x"><require><command name="Baz"/></require></extension>
//!   </extensions>
//! </registry>"#).unwrap();
//!
//! let blacklist = compile_blacklist(&registry, &BTreeSet::new(), DEFAULT_API);
//! let model = build_functions(&registry, &blacklist, &BuildOptions::default());
//!
//! assert_eq!(model.functions.len(), 1);
//! assert_eq!(model.functions[0].name, "Foo");
//! assert_eq!(model.skipped[0].reason, SkipReason::Blacklisted);
//! ```

mod blacklist;
mod builder;
mod error;
mod loader;
mod report;

pub use blacklist::{Blacklist, ExtensionRequirement, compile_blacklist, extension_requirements};
pub use builder::{BuildOptions, DEFAULT_API, FunctionModel, build_functions};
pub use error::{RegistryError, Result};
pub use loader::Registry;
pub use report::{SkipReason, SkippedCommand};
