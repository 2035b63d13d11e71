//! End-to-end generation runs against small registries on disk.

use std::fs;
use std::path::{Path, PathBuf};

use vkmock_codegen::{
    ArtifactKind, EmitOutcome, GenerateError, GenerationSummary, GeneratorConfig, OutputLayout,
    generate,
};

const FOO_BAR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<registry>
    <commands>
        <command>
            <proto><type>void</type> <name>Foo</name></proto>
        </command>
        <command>
            <proto><type>int32_t</type> <name>Bar</name></proto>
            <param><type>int32_t</type> <name>x</name></param>
        </command>
        <command>
            <proto><type>void</type> <name>Baz</name></proto>
        </command>
    </commands>
    <extensions>
        <extension name="EXT_x">
            <require>
                <command name="Baz"/>
            </require>
        </extension>
    </extensions>
</registry>
"#;

struct Workspace {
    _dir: tempfile::TempDir,
    root: PathBuf,
}

impl Workspace {
    fn new(registry: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();
        fs::write(root.join("vk.xml"), registry).unwrap();
        Self { _dir: dir, root }
    }

    fn config(&self) -> GeneratorConfig {
        let mut output = OutputLayout::under(self.root.join("gen"));
        output.stub_dir = self.root.join("src").join("default");
        GeneratorConfig {
            registry: self.root.join("vk.xml"),
            output,
            create_dirs: true,
            ..GeneratorConfig::default()
        }
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root.join(relative)).unwrap()
    }

    fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_two_functions_end_to_end() {
    let ws = Workspace::new(FOO_BAR);
    let summary = generate(&ws.config()).unwrap();

    assert_eq!(summary.functions, vec!["Foo", "Bar"]);
    assert_eq!(
        files_in(&ws.root.join("gen/include")),
        vec!["Bar_info.hpp", "Foo_info.hpp", "vk_functions.hpp"]
    );
    assert_eq!(files_in(&ws.root.join("gen/src")), vec!["Bar.cpp", "Foo.cpp"]);
    assert_eq!(
        files_in(&ws.root.join("src/default")),
        vec!["Bar_default.cpp", "Foo_default.cpp"]
    );

    let index = ws.read("gen/include/vk_functions.hpp");
    let foo = index.find("#include \"Foo_info.hpp\"").unwrap();
    let bar = index.find("#include \"Bar_info.hpp\"").unwrap();
    assert!(foo < bar);

    let manifest = ws.read("gen/vk_functions.cmake");
    let listed = manifest.lines().filter(|l| l.starts_with("    \"")).count();
    assert_eq!(listed, 6);
    for name in [
        "Foo_info.hpp",
        "Bar_info.hpp",
        "Foo.cpp",
        "Bar.cpp",
        "Foo_default.cpp",
        "Bar_default.cpp",
    ] {
        assert!(manifest.contains(name), "manifest should list {name}");
    }

    let stub = ws.read("src/default/Bar_default.cpp");
    assert!(stub.contains("auto Bar_default(int32_t x) -> int32_t"));
    assert!(stub.contains("return int32_t{};"));
}

#[test]
fn test_artifacts_share_function_identity() {
    let ws = Workspace::new(FOO_BAR);
    let summary = generate(&ws.config()).unwrap();

    for name in &summary.functions {
        let kinds: Vec<ArtifactKind> = summary.artifacts_for(name).map(|a| a.kind).collect();
        assert_eq!(kinds, ArtifactKind::PER_FUNCTION.to_vec());
    }
    assert!(ws.read("gen/include/Bar_info.hpp").contains("info<Bar> = {.name = \"Bar\""));
    assert!(ws.read("gen/src/Bar.cpp").contains("return ::simulakrum::call<Bar>(x);"));
}

#[test]
fn test_rerun_is_idempotent_and_preserves_stubs() {
    let ws = Workspace::new(FOO_BAR);
    let config = ws.config();
    generate(&config).unwrap();

    let regenerated = [
        "gen/include/Foo_info.hpp",
        "gen/include/Bar_info.hpp",
        "gen/include/vk_functions.hpp",
        "gen/src/Foo.cpp",
        "gen/src/Bar.cpp",
        "gen/vk_functions.cmake",
    ];
    let before: Vec<String> = regenerated.iter().map(|p| ws.read(p)).collect();

    let edited = "// hand written\nauto Bar_default(int32_t x) -> int32_t { return x; }\n";
    fs::write(ws.root.join("src/default/Bar_default.cpp"), edited).unwrap();
    let stub_mtime = fs::metadata(ws.root.join("src/default/Bar_default.cpp"))
        .unwrap()
        .modified()
        .unwrap();

    let summary = generate(&config).unwrap();

    let after: Vec<String> = regenerated.iter().map(|p| ws.read(p)).collect();
    assert_eq!(before, after);
    assert_eq!(ws.read("src/default/Bar_default.cpp"), edited);
    assert_eq!(
        fs::metadata(ws.root.join("src/default/Bar_default.cpp"))
            .unwrap()
            .modified()
            .unwrap(),
        stub_mtime
    );
    assert_eq!(summary.stubs_preserved(), 2);
    assert_eq!(summary.stubs_created(), 0);
}

#[test]
fn test_deleted_stub_is_recreated() {
    let ws = Workspace::new(FOO_BAR);
    let config = ws.config();
    generate(&config).unwrap();
    fs::remove_file(ws.root.join("src/default/Foo_default.cpp")).unwrap();

    let summary = generate(&config).unwrap();
    let outcomes: Vec<EmitOutcome> = summary
        .artifacts_of(ArtifactKind::Stub)
        .map(|a| a.outcome)
        .collect();
    assert_eq!(outcomes, vec![EmitOutcome::Created, EmitOutcome::Preserved]);
    assert!(ws.exists("src/default/Foo_default.cpp"));
}

#[test]
fn test_extension_gating() {
    let ws = Workspace::new(FOO_BAR);
    let mut config = ws.config();

    let summary = generate(&config).unwrap();
    assert!(!summary.functions.iter().any(|f| f == "Baz"));
    assert!(!ws.exists("gen/include/Baz_info.hpp"));
    assert!(!ws.exists("gen/src/Baz.cpp"));
    assert!(!ws.exists("src/default/Baz_default.cpp"));
    assert!(!ws.read("gen/include/vk_functions.hpp").contains("Baz"));
    assert!(!ws.read("gen/vk_functions.cmake").contains("Baz"));
    assert_eq!(summary.blacklisted, 1);

    config.enable_extensions(["EXT_x"]);
    let summary = generate(&config).unwrap();
    assert!(summary.functions.iter().any(|f| f == "Baz"));
    assert!(ws.exists("gen/include/Baz_info.hpp"));
    assert!(ws.exists("gen/src/Baz.cpp"));
    assert!(ws.exists("src/default/Baz_default.cpp"));
    assert!(ws.read("gen/include/vk_functions.hpp").contains("Baz_info.hpp"));
    assert!(ws.read("gen/vk_functions.cmake").contains("Baz_default.cpp"));
    assert_eq!(summary.blacklisted, 0);
}

fn files_under(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            files.extend(files_under(&path));
        } else {
            files.push(path);
        }
    }
    files
}

#[test]
fn test_command_names_cannot_escape_output_directories() {
    let ws = Workspace::new(
        r#"<registry><commands>
            <command><proto><type>void</type> <name>../../escaped</name></proto></command>
            <command><proto><type>void</type> <name>Foo</name></proto></command>
        </commands></registry>"#,
    );
    let mut config = ws.config();
    config.output = OutputLayout::under(ws.root.join("a/b/gen"));
    config.output.stub_dir = ws.root.join("a/b/stubs");

    let summary = generate(&config).unwrap();
    assert_eq!(summary.functions, vec!["Foo"]);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].name.as_deref(), Some("../../escaped"));

    let escaped: Vec<PathBuf> = files_under(&ws.root)
        .into_iter()
        .filter(|path| path.to_string_lossy().contains("escaped"))
        .collect();
    assert!(escaped.is_empty(), "{escaped:?}");
    assert!(ws.exists("a/b/gen/include/Foo_info.hpp"));
    assert!(ws.exists("a/b/stubs/Foo_default.cpp"));
}

#[test]
fn test_return_policies_in_stubs() {
    let ws = Workspace::new(
        r#"<registry><commands>
    <command>
        <proto><type>VkResult</type> <name>vkCreateThing</name></proto>
        <param>const <type>VkThingCreateInfo</type>* <name>pCreateInfo</name></param>
    </command>
    <command><proto><type>void</type> <name>vkDestroyThing</name></proto></command>
    <command><proto><type>uint64_t</type> <name>vkGetThingAddress</name></proto></command>
</commands></registry>"#,
    );
    generate(&ws.config()).unwrap();

    let create = ws.read("src/default/vkCreateThing_default.cpp");
    assert!(create.contains("auto vkCreateThing_default(const VkThingCreateInfo* pCreateInfo) -> VkResult"));
    assert!(create.contains("    return VK_SUCCESS;\n"));

    assert!(!ws.read("src/default/vkDestroyThing_default.cpp").contains("return"));
    assert!(ws.read("src/default/vkGetThingAddress_default.cpp").contains("    return uint64_t{};\n"));
}

#[test]
fn test_array_parameters_pull_in_array_header() {
    let ws = Workspace::new(
        r#"<registry><commands>
    <command>
        <proto><type>void</type> <name>vkCmdSetBlendConstants</name></proto>
        <param><type>VkCommandBuffer</type> <name>commandBuffer</name></param>
        <param>const <type>float</type> <name>blendConstants</name>[4]</param>
    </command>
    <command><proto><type>void</type> <name>vkPlain</name></proto></command>
</commands></registry>"#,
    );
    generate(&ws.config()).unwrap();

    for path in [
        "gen/include/vkCmdSetBlendConstants_info.hpp",
        "gen/src/vkCmdSetBlendConstants.cpp",
        "src/default/vkCmdSetBlendConstants_default.cpp",
    ] {
        let text = ws.read(path);
        assert!(text.contains("#include <array>"), "{path} should include <array>");
        assert!(text.contains("std::array<const float, 4> blendConstants"));
    }
    assert!(!ws.read("gen/include/vkPlain_info.hpp").contains("<array>"));
}

#[test]
fn test_missing_output_directory_is_fatal_without_create_dirs() {
    let ws = Workspace::new(FOO_BAR);
    let config = GeneratorConfig {
        create_dirs: false,
        ..ws.config()
    };

    let err = generate(&config).unwrap_err();
    assert!(matches!(err, GenerateError::Emit(_)));
    assert!(!ws.exists("gen"));
}

#[test]
fn test_existing_directories_need_no_create_dirs() {
    let ws = Workspace::new(FOO_BAR);
    for dir in ["gen/include", "gen/src", "src/default"] {
        fs::create_dir_all(ws.root.join(dir)).unwrap();
    }
    let config = GeneratorConfig {
        create_dirs: false,
        ..ws.config()
    };
    let summary = generate(&config).unwrap();
    assert_eq!(summary.functions.len(), 2);
}

#[test]
fn test_unreadable_registry_is_fatal_before_output() {
    let ws = Workspace::new("<registry><commands>");
    let err = generate(&ws.config()).unwrap_err();
    assert!(matches!(err, GenerateError::Registry { .. }));
    assert!(!ws.exists("gen"));

    let missing = GeneratorConfig {
        registry: ws.root.join("absent.xml"),
        ..ws.config()
    };
    assert!(matches!(
        generate(&missing).unwrap_err(),
        GenerateError::Registry { .. }
    ));
}

#[test]
fn test_parallel_emission_matches_sequential() {
    let commands: String = (0..40)
        .map(|i| {
            format!(
                "<command><proto><type>VkResult</type> <name>vkCmd{i}</name></proto>\
                 <param><type>uint32_t</type> <name>value</name></param></command>"
            )
        })
        .collect();
    let registry = format!("<registry><commands>{commands}</commands></registry>");

    let sequential = Workspace::new(&registry);
    let parallel = Workspace::new(&registry);
    let seq_summary = generate(&sequential.config()).unwrap();
    let par_summary = generate(&GeneratorConfig {
        jobs: 4,
        ..parallel.config()
    })
    .unwrap();

    assert_eq!(seq_summary.functions, par_summary.functions);
    assert_eq!(par_summary.stubs_created(), 40);
    let relative_manifest = |ws: &Workspace| {
        let root = vkmock_codegen::portable_path(&ws.root);
        ws.read("gen/vk_functions.cmake").replace(&root, "")
    };
    assert_eq!(relative_manifest(&sequential), relative_manifest(&parallel));
    assert_eq!(
        sequential.read("gen/include/vk_functions.hpp"),
        parallel.read("gen/include/vk_functions.hpp")
    );
    assert_eq!(
        sequential.read("src/default/vkCmd7_default.cpp"),
        parallel.read("src/default/vkCmd7_default.cpp")
    );
}

#[test]
fn test_report_written_after_run() {
    let ws = Workspace::new(FOO_BAR);
    let config = GeneratorConfig {
        report: Some(ws.root.join("out").join("report.json")),
        ..ws.config()
    };
    let summary: GenerationSummary = generate(&config).unwrap();

    let report: serde_json::Value = serde_json::from_str(&ws.read("out/report.json")).unwrap();
    assert_eq!(report["functions"], serde_json::json!(["Foo", "Bar"]));
    assert_eq!(report["blacklisted"], 1);
    assert_eq!(report["stubs_created"], 2);
    assert_eq!(report["skipped"][0]["name"], "Baz");
    assert_eq!(report["skipped"][0]["reason"], "blacklisted");
    assert_eq!(report["checksums"].as_object().unwrap().len(), 6);
    assert!(report["generated_at"].as_str().is_some());
    assert_eq!(summary.artifacts.len(), 8);

    // Artifacts carry no timestamp, so a rerun changes only the report.
    let index = ws.read("gen/include/vk_functions.hpp");
    generate(&config).unwrap();
    assert_eq!(ws.read("gen/include/vk_functions.hpp"), index);
}

#[test]
fn test_config_file_drives_run() {
    let ws = Workspace::new(FOO_BAR);
    let mut config = ws.config();
    config.enabled_extensions = vec!["EXT_x".to_string()];
    config.render.namespace = "mock".to_string();
    let path = ws.root.join("vkmock.yml");
    config.save(&path).unwrap();

    let loaded = GeneratorConfig::load(&path).unwrap();
    let summary = generate(&loaded).unwrap();
    assert_eq!(summary.functions, vec!["Foo", "Bar", "Baz"]);
    assert!(ws.read("gen/src/Baz.cpp").contains("return ::mock::call<Baz>();"));
}
