//! Extension-aware command blacklisting.
//!
//! Every command required by an extension that is not enabled is excluded
//! from generation, unless something enabled also requires it. Core API
//! `feature` blocks count as always enabled.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;
use xmltree::{Element, XMLNode};

use crate::loader::{Registry, attr, supports_api};

/// Commands one extension requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRequirement {
    /// Extension name (e.g. `VK_KHR_surface`).
    pub extension: String,
    /// Command names referenced by any of the extension's `require` blocks.
    pub commands: BTreeSet<String>,
}

/// Set of command names excluded from a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blacklist {
    commands: BTreeSet<String>,
}

impl Blacklist {
    pub fn contains(&self, command: &str) -> bool {
        self.commands.contains(command)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Excluded names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(String::as_str)
    }
}

impl FromIterator<String> for Blacklist {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

/// Lists the command requirements of every extension, in document order.
pub fn extension_requirements(registry: &Registry) -> Vec<ExtensionRequirement> {
    registry
        .extensions()
        .filter_map(|extension| {
            let name = attr(extension, "name")?;
            Some(ExtensionRequirement {
                extension: name.to_string(),
                commands: required_commands(extension),
            })
        })
        .collect()
}

/// Computes the blacklist for a run.
///
/// A command is blacklisted when at least one disabled extension requires it
/// and no enabled extension or `feature` block for `api` does. Document order
/// does not matter.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use vkmock_registry::{Registry, compile_blacklist};
///
/// let registry = Registry::parse_str(r#"
/// <registry>
///   <commands/>
///   <extensions>
///     <extension name="EXT_a"><require><command name="Shared"/><command name="OnlyA"/></require></extension>
///     <extension name="EXT_b"><require><command name="Shared"/></require></extension>
///   </extensions>
/// </registry>"#).unwrap();
///
/// let enabled = BTreeSet::from(["EXT_b".to_string()]);
/// let blacklist = compile_blacklist(&registry, &enabled, "vulkan");
/// assert!(blacklist.contains("OnlyA"));
/// assert!(!blacklist.contains("Shared"));
/// ```
pub fn compile_blacklist(registry: &Registry, enabled: &BTreeSet<String>, api: &str) -> Blacklist {
    let mut disabled_requirements: BTreeSet<String> = BTreeSet::new();
    let mut enabled_requirements: BTreeSet<String> = BTreeSet::new();

    for requirement in extension_requirements(registry) {
        if enabled.contains(&requirement.extension) {
            enabled_requirements.extend(requirement.commands);
        } else {
            disabled_requirements.extend(requirement.commands);
        }
    }

    for feature in registry.features().filter(|f| supports_api(f, api)) {
        enabled_requirements.extend(required_commands(feature));
    }

    let blacklist: Blacklist = disabled_requirements
        .difference(&enabled_requirements)
        .cloned()
        .collect();

    debug!(
        disabled = disabled_requirements.len(),
        enabled = enabled_requirements.len(),
        blacklisted = blacklist.len(),
        "Compiled command blacklist"
    );

    blacklist
}

/// Command names referenced anywhere inside the `require` blocks of `parent`.
fn required_commands(parent: &Element) -> BTreeSet<String> {
    let mut commands = BTreeSet::new();
    for child in &parent.children {
        if let XMLNode::Element(require) = child {
            if require.name == "require" {
                collect_command_refs(require, &mut commands);
            }
        }
    }
    commands
}

fn collect_command_refs(element: &Element, out: &mut BTreeSet<String>) {
    for child in &element.children {
        if let XMLNode::Element(el) = child {
            if el.name == "command" {
                if let Some(name) = attr(el, "name") {
                    out.insert(name.to_string());
                }
            }
            collect_command_refs(el, out);
        }
    }
}
