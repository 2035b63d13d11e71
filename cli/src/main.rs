use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use vkmock_codegen::{GeneratorConfig, OutputLayout, generate};

const VERBOSE_FILTER: &str =
    "info,vkmock_core=debug,vkmock_registry=debug,vkmock_codegen=debug,vkmock_gen=debug";

#[derive(Debug, Parser)]
#[command(name = "vkmock-gen", version)]
#[command(about = "Generate interception scaffolding and default stubs from a Vulkan registry")]
struct Cli {
    /// Registry XML file [default: vk.xml].
    #[arg(short = 'i', long, value_name = "PATH")]
    registry: Option<PathBuf>,
    /// Base directory for generated scaffolding [default: gen].
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,
    /// Directory for info-headers and the combined index [default: <output>/include].
    #[arg(long, value_name = "DIR")]
    header_dir: Option<PathBuf>,
    /// Directory for trampoline sources [default: <output>/src].
    #[arg(long, value_name = "DIR")]
    source_dir: Option<PathBuf>,
    /// Directory for the build manifest [default: <output>].
    #[arg(long, value_name = "DIR")]
    manifest_dir: Option<PathBuf>,
    /// Directory for write-once default stubs [default: src/default].
    #[arg(long, value_name = "DIR")]
    stub_dir: Option<PathBuf>,
    /// Generate the commands of an extension (repeatable).
    #[arg(long = "enable-extension", value_name = "NAME")]
    enabled_extensions: Vec<String>,
    /// API variant to generate [default: vulkan].
    #[arg(long, value_name = "NAME")]
    api: Option<String>,
    /// Generate alias commands with their target's signature.
    #[arg(long)]
    resolve_aliases: bool,
    /// Create missing output directories.
    #[arg(long)]
    create_dirs: bool,
    /// Number of parallel emission workers [default: 1].
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,
    /// YAML configuration file; flags override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Write a JSON run report to this path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default_level = if verbose { VERBOSE_FILTER } else { "info" };
        EnvFilter::new(default_level)
    });

    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(verbose)
        .try_init();

    if let Err(e) = result {
        eprintln!("warning: logging initialization failed: {e}");
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = resolve_config(cli)?;
    debug!(
        registry = %config.registry.display(),
        header_dir = %config.output.header_dir.display(),
        source_dir = %config.output.source_dir.display(),
        manifest_dir = %config.output.manifest_dir.display(),
        stub_dir = %config.output.stub_dir.display(),
        enabled_extensions = ?config.enabled_extensions,
        "Resolved configuration"
    );

    let summary = generate(&config).map_err(|e| e.to_string())?;

    println!(
        "Generated {} functions ({} stubs created, {} preserved, {} commands skipped)",
        summary.functions.len(),
        summary.stubs_created(),
        summary.stubs_preserved(),
        summary.skipped.len()
    );
    Ok(())
}

/// Starts from `--config` (or defaults) and applies every flag on top.
fn resolve_config(cli: &Cli) -> Result<GeneratorConfig, String> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)
            .map_err(|e| format!("failed to load config '{}': {e}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    if let Some(registry) = &cli.registry {
        config.registry = registry.clone();
    }
    if let Some(output) = &cli.output {
        // The stub directory lives outside the scaffolding base.
        config.output = OutputLayout {
            stub_dir: config.output.stub_dir.clone(),
            ..OutputLayout::under(output)
        };
    }
    if let Some(dir) = &cli.header_dir {
        config.output.header_dir = dir.clone();
    }
    if let Some(dir) = &cli.source_dir {
        config.output.source_dir = dir.clone();
    }
    if let Some(dir) = &cli.manifest_dir {
        config.output.manifest_dir = dir.clone();
    }
    if let Some(dir) = &cli.stub_dir {
        config.output.stub_dir = dir.clone();
    }
    config.enable_extensions(cli.enabled_extensions.iter().cloned());
    if let Some(api) = &cli.api {
        config.build.api = api.clone();
    }
    if cli.resolve_aliases {
        config.build.resolve_aliases = true;
    }
    if cli.create_dirs {
        config.create_dirs = true;
    }
    if let Some(jobs) = cli.jobs {
        if jobs == 0 {
            return Err("--jobs must be at least 1".to_string());
        }
        config.jobs = jobs;
    }
    if let Some(report) = &cli.report {
        config.report = Some(report.clone());
    }

    Ok(config)
}
