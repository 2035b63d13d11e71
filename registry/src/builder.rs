//! Function model building.
//!
//! Walks `commands/command` in document order and turns every usable entry
//! into a [`Function`]. Entries that cannot be used are recorded as
//! [`SkippedCommand`]s; nothing here is fatal.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vkmock_core::{
    DEFAULT_RESULT_TYPE, Function, Parameter, ReturnType, is_identifier, normalize_type_text,
};
use xmltree::{Element, XMLNode};

use crate::blacklist::Blacklist;
use crate::loader::{Registry, attr, child_elements, element_text, join_piece, supports_api};
use crate::report::{SkipReason, SkippedCommand};

/// API variant selected by default.
pub const DEFAULT_API: &str = "vulkan";

/// Upper bound on alias chains (`a -> b -> c`) followed during resolution.
const MAX_ALIAS_DEPTH: usize = 8;

/// Options for [`build_functions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Only commands and parameters whose `api` attribute is absent or lists
    /// this name are considered.
    pub api: String,
    /// Return type that selects the result-code return policy.
    pub result_type: String,
    /// Generate alias commands with their target's signature instead of
    /// skipping them.
    pub resolve_aliases: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            api: DEFAULT_API.to_string(),
            result_type: DEFAULT_RESULT_TYPE.to_string(),
            resolve_aliases: false,
        }
    }
}

/// Output of [`build_functions`].
#[derive(Debug, Clone, Default)]
pub struct FunctionModel {
    /// Surviving functions in registry order.
    pub functions: Vec<Function>,
    /// Dropped command entries in registry order.
    pub skipped: Vec<SkippedCommand>,
}

impl FunctionModel {
    /// Skipped entries with the given reason.
    pub fn skipped_with(&self, reason: SkipReason) -> impl Iterator<Item = &SkippedCommand> {
        self.skipped.iter().filter(move |s| s.reason == reason)
    }

    fn skip(&mut self, skipped: SkippedCommand) {
        debug!(
            command = skipped.name.as_deref().unwrap_or("<unnamed>"),
            reason = %skipped.reason,
            detail = skipped.detail.as_deref().unwrap_or(""),
            "Skipping command"
        );
        self.skipped.push(skipped);
    }
}

/// First-pass view of one command entry.
enum Entry {
    Defined {
        name: String,
        parsed: Result<Function, SkippedCommand>,
    },
    Alias {
        name: String,
        target: String,
    },
    Dropped(SkippedCommand),
}

/// Builds the ordered function list for a run.
///
/// Per command, in order: entries for another API variant, entries without a
/// prototype and prototypes without a name are skipped; then names that are
/// not C identifiers and blacklisted names are skipped; then the signature is extracted. Names are unique in
/// the output: a repeated name is skipped as [`SkipReason::Duplicate`].
///
/// # Examples
///
/// ```
/// use vkmock_registry::{Blacklist, BuildOptions, Registry, build_functions};
///
/// let registry = Registry::parse_str(r#"
/// <registry><commands>
///   <command>
///     <proto><type>void</type> <name>vkCmdSetBlendConstants</name></proto>
///     <param><type>VkCommandBuffer</type> <name>commandBuffer</name></param>
///     <param>const <type>float</type> <name>blendConstants</name>[4]</param>
///   </command>
/// </commands></registry>"#).unwrap();
///
/// let model = build_functions(&registry, &Blacklist::default(), &BuildOptions::default());
/// let f = &model.functions[0];
/// assert_eq!(f.argument_names(), vec!["commandBuffer", "blendConstants"]);
/// assert!(f.params[1].is_array_type());
/// ```
pub fn build_functions(
    registry: &Registry,
    blacklist: &Blacklist,
    options: &BuildOptions,
) -> FunctionModel {
    let entries: Vec<Entry> = registry
        .commands()
        .map(|command| classify_command(command, options))
        .collect();

    let mut definitions: HashMap<&str, &Function> = HashMap::new();
    let mut aliases: HashMap<&str, &str> = HashMap::new();
    for entry in &entries {
        match entry {
            Entry::Defined {
                parsed: Ok(function),
                ..
            } => {
                definitions.entry(function.name.as_str()).or_insert(function);
            }
            Entry::Alias { name, target } => {
                aliases.entry(name.as_str()).or_insert(target.as_str());
            }
            _ => {}
        }
    }

    let mut model = FunctionModel::default();
    let mut seen: HashSet<String> = HashSet::new();

    for entry in &entries {
        let (name, resolved) = match entry {
            Entry::Dropped(skipped) => {
                model.skip(skipped.clone());
                continue;
            }
            Entry::Alias { name, target } if !options.resolve_aliases => {
                model.skip(
                    SkippedCommand::new(Some(name.as_str()), SkipReason::Alias).with_detail(target),
                );
                continue;
            }
            Entry::Alias { name, target } => {
                (name, resolve_alias(name, target, &definitions, &aliases))
            }
            Entry::Defined { name, parsed } => (name, parsed.clone()),
        };

        if !is_identifier(name) {
            model.skip(
                SkippedCommand::new(Some(name.as_str()), SkipReason::InvalidName)
                    .with_detail(name.as_str()),
            );
            continue;
        }

        if blacklist.contains(name) {
            model.skip(SkippedCommand::new(
                Some(name.as_str()),
                SkipReason::Blacklisted,
            ));
            continue;
        }

        let function = match resolved {
            Ok(function) => function,
            Err(skipped) => {
                model.skip(skipped);
                continue;
            }
        };

        if !seen.insert(function.name.clone()) {
            warn!(command = %function.name, "Duplicate command definition, keeping the first");
            model.skip(SkippedCommand::new(
                Some(function.name.as_str()),
                SkipReason::Duplicate,
            ));
            continue;
        }

        model.functions.push(function);
    }

    debug!(
        functions = model.functions.len(),
        skipped = model.skipped.len(),
        "Built function model"
    );

    model
}

fn classify_command(command: &Element, options: &BuildOptions) -> Entry {
    if !supports_api(command, &options.api) {
        let name = command_name(command);
        return Entry::Dropped(SkippedCommand::new(name.as_deref(), SkipReason::OtherApi));
    }

    let Some(proto) = command.get_child("proto") else {
        let name = attr(command, "name");
        return match (name, attr(command, "alias")) {
            (Some(name), Some(target)) => Entry::Alias {
                name: name.to_string(),
                target: target.to_string(),
            },
            _ => Entry::Dropped(SkippedCommand::new(name, SkipReason::MissingPrototype)),
        };
    };

    let name = proto
        .get_child("name")
        .map(|el| normalize_type_text(&element_text(el)))
        .filter(|name| !name.is_empty());
    let Some(name) = name else {
        return Entry::Dropped(SkippedCommand::new(None, SkipReason::MissingName));
    };

    let parsed = parse_definition(&name, proto, command, options);
    Entry::Defined { name, parsed }
}

fn command_name(command: &Element) -> Option<String> {
    attr(command, "name").map(String::from).or_else(|| {
        command
            .get_child("proto")
            .and_then(|proto| proto.get_child("name"))
            .map(|el| normalize_type_text(&element_text(el)))
    })
}

fn parse_definition(
    name: &str,
    proto: &Element,
    command: &Element,
    options: &BuildOptions,
) -> Result<Function, SkippedCommand> {
    if proto.get_child("type").is_none() {
        return Err(SkippedCommand::new(Some(name), SkipReason::MissingReturnType));
    }
    let (return_type, _) = split_declaration(proto);
    let return_type = ReturnType::classify(&return_type, &options.result_type);

    let mut params = Vec::new();
    for param in child_elements(command, "param") {
        if !supports_api(param, &options.api) {
            continue;
        }
        let (declared_type, declared_name) = split_declaration(param);
        let Some(declared_name) = declared_name else {
            return Err(SkippedCommand::new(Some(name), SkipReason::MalformedParameter)
                .with_detail(normalize_type_text(&element_text(param))));
        };
        let parameter = Parameter::from_declaration(&declared_type, &declared_name).map_err(|err| {
            SkippedCommand::new(Some(name), SkipReason::MalformedParameter).with_detail(err.to_string())
        })?;
        params.push(parameter);
    }

    Ok(Function::new(name, return_type, params))
}

/// Splits a `proto`/`param` element into the type text before its `name`
/// child and the declared name including any trailing extent (`x[4]`).
fn split_declaration(element: &Element) -> (String, Option<String>) {
    let mut ty = String::new();
    let mut name: Option<String> = None;

    for child in &element.children {
        let piece = match child {
            XMLNode::Text(text) | XMLNode::CData(text) => text.clone(),
            XMLNode::Element(el) if el.name == "name" && name.is_none() => {
                name = Some(element_text(el));
                continue;
            }
            XMLNode::Element(el) => element_text(el),
            _ => continue,
        };
        match name.as_mut() {
            Some(declared) => declared.push_str(&piece),
            None => join_piece(&mut ty, &piece),
        }
    }

    (normalize_type_text(&ty), name)
}

fn resolve_alias(
    name: &str,
    target: &str,
    definitions: &HashMap<&str, &Function>,
    aliases: &HashMap<&str, &str>,
) -> Result<Function, SkippedCommand> {
    let mut current = target;
    for _ in 0..MAX_ALIAS_DEPTH {
        if let Some(function) = definitions.get(current) {
            return Ok(function.renamed(name));
        }
        match aliases.get(current) {
            Some(next) => current = *next,
            None => break,
        }
    }
    Err(SkippedCommand::new(Some(name), SkipReason::UnresolvedAlias).with_detail(target))
}
