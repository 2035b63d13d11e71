//! Template rendering.
//!
//! Every renderer is a pure function of its inputs and a [`RenderConfig`].
//! Rendering the same function twice yields byte-identical text.

use serde::{Deserialize, Serialize};
use vkmock_core::{Function, ParamType, Parameter, ReturnKind};

use crate::artifact::{ArtifactKind, OutputLayout, portable_path};

/// Marker placed after the license block of every regenerated artifact.
pub const GENERATED_MARKER: &str = "This is a generated file. Do not edit!";

const STUB_PLACEHOLDER: &str = "// Not yet implemented.";

/// License placed at the top of every artifact unless configured otherwise.
pub const DEFAULT_LICENSE: &str = "\
MIT License

Copyright (c) 2023 Jan M\u{f6}ller

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the \"Software\"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.";

/// Template parameters shared by all renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// License text; each line becomes one comment line.
    pub license: String,
    /// Namespace holding default implementations and the dispatch entry point.
    pub namespace: String,
    /// Value returned by stubs of result-code functions.
    pub success_value: String,
    /// Includes of info-headers, delimiters included (`"x.hpp"`, `<y.h>`).
    pub scaffolding_includes: Vec<String>,
    /// Includes of stubs.
    pub stub_includes: Vec<String>,
    /// Attribute macro placed before the return type of trampolines.
    pub call_attribute: String,
    /// Calling-convention macro placed before the trampoline name.
    pub call_convention: String,
    /// Include required by the array wrapper.
    pub array_include: String,
    /// Template used for fixed-size array parameters.
    pub array_wrapper: String,
    /// File name of the combined index.
    pub index_file: String,
    /// File name of the build manifest.
    pub manifest_file: String,
    /// Prefix of the manifest's list variables.
    pub manifest_prefix: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            license: DEFAULT_LICENSE.to_string(),
            namespace: "simulakrum".to_string(),
            success_value: "VK_SUCCESS".to_string(),
            scaffolding_includes: vec![
                "\"simulakrum.hpp\"".to_string(),
                "<vulkan/vulkan.h>".to_string(),
            ],
            stub_includes: vec!["<vulkan/vulkan.h>".to_string()],
            call_attribute: "VKAPI_ATTR".to_string(),
            call_convention: "VKAPI_CALL".to_string(),
            array_include: "<array>".to_string(),
            array_wrapper: "std::array".to_string(),
            index_file: "vk_functions.hpp".to_string(),
            manifest_file: "vk_functions.cmake".to_string(),
            manifest_prefix: "VK_FUNCTIONS".to_string(),
        }
    }
}

/// Renders the per-function registration header.
///
/// # Examples
///
/// ```
/// use vkmock_codegen::{RenderConfig, render_info_header};
/// use vkmock_core::{Function, ReturnType};
///
/// let f = Function::new("vkFoo", ReturnType::void(), vec![]);
/// let text = render_info_header(&f, &RenderConfig::default());
/// assert!(text.contains("inline vk_fn_info<vkFoo> info<vkFoo>"));
/// ```
pub fn render_info_header(function: &Function, config: &RenderConfig) -> String {
    let name = &function.name;
    let params = param_list(function, config);
    let ret = function.return_type.as_str();

    let mut out = preamble(config, "//", true);
    out.push_str("#pragma once\n\n");
    push_includes(&mut out, &config.scaffolding_includes, function, config);

    out.push_str("extern \"C\" {\n");
    out.push_str(&format!(
        "{} {ret} {} {name}({params});\n",
        config.call_attribute, config.call_convention
    ));
    out.push_str("}\n\n");

    out.push_str(&format!("namespace {} {{\n", config.namespace));
    out.push_str(&format!("auto {name}_default({params}) -> {ret};\n\n"));
    out.push_str("template<>\n");
    out.push_str(&format!(
        "inline vk_fn_info<{name}> info<{name}> = {{.name = \"{name}\", .default_impl = {name}_default}};\n"
    ));
    out.push_str(&format!("}} // namespace {}\n", config.namespace));
    out
}

/// Renders the `extern "C"` trampoline forwarding to the dispatch entry point.
pub fn render_function_impl(function: &Function, config: &RenderConfig) -> String {
    let name = &function.name;
    let header = ArtifactKind::InfoHeader
        .file_name(name)
        .unwrap_or_default();

    let mut out = preamble(config, "//", true);
    let includes = [format!("\"{header}\"")];
    push_includes(&mut out, &includes, function, config);

    out.push_str(&format!(
        "extern \"C\" {} {} {} {name}({})\n",
        config.call_attribute,
        function.return_type.as_str(),
        config.call_convention,
        param_list(function, config)
    ));
    out.push_str("{\n");
    out.push_str(&format!(
        "    return ::{}::call<{name}>({});\n",
        config.namespace,
        function.argument_names().join(", ")
    ));
    out.push_str("}\n");
    out
}

/// Renders the hand-editable default implementation.
///
/// The return statement follows the function's [`ReturnKind`]: the success
/// value for result codes, nothing for `void`, a value-initialized object
/// otherwise.
pub fn render_stub(function: &Function, config: &RenderConfig) -> String {
    let name = &function.name;
    let ret = function.return_type.as_str();

    let mut out = preamble(config, "//", false);
    push_includes(&mut out, &config.stub_includes, function, config);

    out.push_str(&format!("namespace {}\n{{\n", config.namespace));
    out.push_str(&format!(
        "auto {name}_default({}) -> {ret}\n{{\n",
        param_list(function, config)
    ));
    out.push_str(&format!("    {STUB_PLACEHOLDER}\n"));
    match function.return_type.kind() {
        ReturnKind::ResultCode => {
            out.push_str(&format!("    return {};\n", config.success_value));
        }
        ReturnKind::Void => {}
        ReturnKind::Value if is_simple_type_name(ret) => {
            out.push_str(&format!("    return {ret}{{}};\n"));
        }
        ReturnKind::Value => out.push_str("    return {};\n"),
    }
    out.push_str("}\n");
    out.push_str(&format!("}} // namespace {}\n", config.namespace));
    out
}

/// Renders the header including every info-header in list order.
pub fn render_combined_index(functions: &[Function], config: &RenderConfig) -> String {
    let mut out = preamble(config, "//", true);
    out.push_str("#pragma once\n\n");
    for function in functions {
        if let Some(header) = ArtifactKind::InfoHeader.file_name(&function.name) {
            out.push_str(&format!("#include \"{header}\"\n"));
        }
    }
    out
}

/// Renders the CMake file listing every per-function artifact path.
///
/// # Examples
///
/// ```
/// use vkmock_codegen::{OutputLayout, RenderConfig, render_build_manifest};
/// use vkmock_core::{Function, ReturnType};
///
/// let f = Function::new("vkFoo", ReturnType::void(), vec![]);
/// let text = render_build_manifest(&[f], &OutputLayout::default(), &RenderConfig::default());
/// assert!(text.contains("set(VK_FUNCTIONS_STUBS\n    \"src/default/vkFoo_default.cpp\"\n)"));
/// ```
pub fn render_build_manifest(
    functions: &[Function],
    layout: &OutputLayout,
    config: &RenderConfig,
) -> String {
    let mut out = preamble(config, "#", true);
    let groups = [
        ("HEADERS", ArtifactKind::InfoHeader),
        ("SOURCES", ArtifactKind::FunctionImpl),
        ("STUBS", ArtifactKind::Stub),
    ];
    for (index, (suffix, kind)) in groups.into_iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&format!("set({}_{suffix}\n", config.manifest_prefix));
        for function in functions {
            if let Some(path) = layout.function_artifact(kind, &function.name) {
                out.push_str(&format!("    \"{}\"\n", portable_path(&path)));
            }
        }
        out.push_str(")\n");
    }
    out
}

/// Renders one parameter declaration, array wrapper applied.
pub fn render_param(param: &Parameter, config: &RenderConfig) -> String {
    match param.ty() {
        ParamType::Scalar(ty) => format!("{ty} {}", param.name()),
        ParamType::FixedArray { element, size } => {
            format!("{}<{element}, {size}> {}", config.array_wrapper, param.name())
        }
    }
}

fn param_list(function: &Function, config: &RenderConfig) -> String {
    function
        .params
        .iter()
        .map(|p| render_param(p, config))
        .collect::<Vec<_>>()
        .join(", ")
}

/// License block, optionally followed by the generated marker.
fn preamble(config: &RenderConfig, comment: &str, generated: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{comment}\n"));
    for line in config.license.lines() {
        if line.trim().is_empty() {
            out.push_str(&format!("{comment}\n"));
        } else {
            out.push_str(&format!("{comment} {line}\n"));
        }
    }
    out.push_str(&format!("{comment}\n\n"));
    if generated {
        out.push_str(&format!("{comment} {GENERATED_MARKER}\n\n"));
    }
    out
}

fn push_includes(out: &mut String, includes: &[String], function: &Function, config: &RenderConfig) {
    for include in includes {
        out.push_str(&format!("#include {include}\n"));
    }
    if function.has_array_params() && !includes.contains(&config.array_include) {
        out.push_str(&format!("#include {}\n", config.array_include));
    }
    out.push('\n');
}

/// `true` when `T{}` is valid syntax for the type text.
fn is_simple_type_name(ty: &str) -> bool {
    let mut chars = ty.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
        }
        _ => false,
    }
}
