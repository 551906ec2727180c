use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use opcat_core::catalog::{self, Catalog, CatalogOptions, KeyMatching};
use opcat_core::config::{self, CONFIG_FILE_NAME, CatalogConfig};
use opcat_core::paging::PagingRegistry;
use opcat_core::parse::{self, spec::SwaggerDoc};
use opcat_core::GeneratedFile;

#[derive(Parser)]
#[command(
    name = "opcat",
    about = "Swagger 2.0 operation catalog and pagination map generator",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate operations.json and pagination-map.json from a Swagger document
    Generate {
        /// Path to the Swagger 2.0 document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML file with operation-level pagination overrides
        #[arg(long)]
        paging_registry: Option<PathBuf>,

        /// Compare catalog keys case-insensitively when detecting collisions
        #[arg(long)]
        case_insensitive_keys: bool,
    },

    /// Summarize the catalog derived from a Swagger document
    Inspect {
        /// Path to the Swagger 2.0 document
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// YAML file with operation-level pagination overrides
        #[arg(long)]
        paging_registry: Option<PathBuf>,

        /// Compare catalog keys case-insensitively when detecting collisions
        #[arg(long)]
        case_insensitive_keys: bool,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new opcat configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            paging_registry,
            case_insensitive_keys,
        } => {
            let cfg = Overrides {
                input,
                output,
                paging_registry,
                case_insensitive_keys,
            }
            .apply(try_load_config()?.unwrap_or_default());
            cmd_generate(&cfg)
        }

        Commands::Inspect {
            input,
            paging_registry,
            case_insensitive_keys,
            format,
        } => {
            let cfg = Overrides {
                input,
                output: None,
                paging_registry,
                case_insensitive_keys,
            }
            .apply(try_load_config()?.unwrap_or_default());
            cmd_inspect(&cfg, format)
        }

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "opcat", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Command-line flags layered over the project config.
#[derive(Default)]
struct Overrides {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    paging_registry: Option<PathBuf>,
    case_insensitive_keys: bool,
}

impl Overrides {
    fn apply(self, mut cfg: CatalogConfig) -> CatalogConfig {
        if let Some(input) = self.input {
            cfg.input = input.display().to_string();
        }
        if let Some(output) = self.output {
            cfg.output = output.display().to_string();
        }
        if let Some(registry) = self.paging_registry {
            cfg.paging_registry = Some(registry.display().to_string());
        }
        if self.case_insensitive_keys {
            cfg.key_matching = KeyMatching::CaseInsensitive;
        }
        cfg
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<CatalogConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    Ok(config::load_config(&config_path)?)
}

fn load_document(path: &Path) -> Result<SwaggerDoc> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let doc = match ext {
        "json" => parse::from_json(&content),
        _ => parse::from_yaml(&content),
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(doc)
}

fn load_registry(path: Option<&Path>) -> Result<PagingRegistry> {
    let Some(path) = path else {
        return Ok(PagingRegistry::new());
    };
    if !path.exists() {
        anyhow::bail!("paging registry {} does not exist", path.display());
    }
    let registry = PagingRegistry::from_file(path)?;
    log::debug!(
        "loaded {} paging overrides from {}",
        registry.len(),
        path.display()
    );
    Ok(registry)
}

/// Load every input and derive the catalog. Nothing is written here.
fn build(cfg: &CatalogConfig) -> Result<(SwaggerDoc, Catalog)> {
    let doc = load_document(Path::new(&cfg.input))?;
    let registry = load_registry(cfg.paging_registry.as_deref().map(Path::new))?;
    let options = CatalogOptions::from(cfg);
    let catalog = catalog::build_catalog(&doc, &registry, &options);
    Ok((doc, catalog))
}

/// Write generated files under the given base directory.
///
/// Every file is staged as `.<name>.tmp` next to its target and renamed into
/// place only once all of them were written. Names in `stale` are outputs of
/// an earlier run that this run does not produce; they are removed last.
fn write_files(base: &Path, files: &[GeneratedFile], stale: &[&str]) -> Result<()> {
    fs::create_dir_all(base)
        .with_context(|| format!("failed to create output directory {}", base.display()))?;

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
    for file in files {
        let tmp = base.join(format!(".{}.tmp", file.path));
        if let Err(err) = fs::write(&tmp, &file.content) {
            discard_staged(&staged);
            let _ = fs::remove_file(&tmp);
            return Err(err).with_context(|| format!("failed to write {}", tmp.display()));
        }
        staged.push((tmp, base.join(&file.path)));
    }

    for (tmp, path) in &staged {
        fs::rename(tmp, path).with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }

    for name in stale {
        let path = base.join(name);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
            eprintln!("  removed {}", path.display());
        }
    }
    Ok(())
}

fn discard_staged(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        if let Err(err) = fs::remove_file(tmp) {
            log::warn!("could not remove {}: {err}", tmp.display());
        }
    }
}

fn generated_at() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn cmd_generate(cfg: &CatalogConfig) -> Result<()> {
    eprintln!("Generating catalog {} → {}", cfg.input, cfg.output);
    let (_, catalog) = build(cfg)?;
    let files = catalog::emit_files(&catalog, &generated_at())?;
    let stale: &[&str] = if catalog.collisions.is_empty() {
        &[catalog::emit::COLLISIONS_FILE]
    } else {
        &[]
    };
    write_files(Path::new(&cfg.output), &files, stale)?;

    eprintln!(
        "Cataloged {} operations ({} paging overrides applied)",
        catalog.len(),
        catalog.override_count()
    );
    if !catalog.collisions.is_empty() {
        eprintln!(
            "  note: {} catalog keys were disambiguated ({} comparison), see {}",
            catalog.collisions.len(),
            cfg.key_matching,
            catalog::emit::COLLISIONS_FILE
        );
    }
    Ok(())
}

fn cmd_inspect(cfg: &CatalogConfig, format: InspectFormat) -> Result<()> {
    let (doc, catalog) = build(cfg)?;

    let summary = build_inspect_summary(&doc, &catalog);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(doc: &SwaggerDoc, catalog: &Catalog) -> serde_json::Value {
    let paging: indexmap::IndexMap<&str, usize> = catalog
        .paging_histogram()
        .into_iter()
        .map(|(t, count)| (t.as_str(), count))
        .collect();

    let operations: Vec<serde_json::Value> = catalog
        .operations
        .values()
        .map(|op| {
            serde_json::json!({
                "key": op.catalog_key,
                "method": op.method.as_str(),
                "path": op.path,
                "paging": op.paging_type.as_str(),
                "items_path": op.response_items_path,
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "swagger": doc.swagger,
            "title": doc.title,
            "version": doc.version,
        },
        "operation_count": catalog.len(),
        "paging": paging,
        "overrides_applied": catalog.override_count(),
        "collisions": catalog.collisions,
        "operations": operations,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
