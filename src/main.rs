//! vex-tools: merge, filter and attest OpenVEX documents

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vex_tools::{
    cli,
    config::{AppConfig, Validatable},
    pipeline::exit_codes,
};

#[derive(Parser)]
#[command(name = "vex-tools")]
#[command(version)]
#[command(about = "Merge, filter and attest OpenVEX documents", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  Attestation does not cover every image in the document
    3  Error occurred

EXAMPLES:
    # Merge two documents, keeping only statements about one CVE
    vex-tools merge a.openvex.json b.openvex.json --vuln CVE-2023-1234

    # Drop findings the VEX data resolves from a scanner report
    vex-tools filter scan.sarif.json vex/*.openvex.json -O filtered.sarif.json

    # Build an attestation ready for signing
    vex-tools attest app.openvex.json --envelope > app.intoto.json")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Write single-line JSON
    #[arg(long, global = true)]
    compact: bool,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long, global = true)]
    output_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Arguments for the `merge` subcommand
#[derive(Parser)]
struct MergeArgs {
    /// VEX documents to merge
    #[arg(required = true)]
    documents: Vec<PathBuf>,

    /// ID for the merged document (derived from the inputs by default)
    #[arg(long)]
    id: Option<String>,

    /// Author of the merged document
    #[arg(long)]
    author: Option<String>,

    /// Role of the author
    #[arg(long)]
    author_role: Option<String>,

    /// Only merge statements about this product (repeatable)
    #[arg(long = "product")]
    products: Vec<String>,

    /// Only merge statements about this vulnerability (repeatable)
    #[arg(long = "vuln")]
    vulnerabilities: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge several VEX documents into one
    Merge(MergeArgs),

    /// Remove the findings VEX documents resolve from a SARIF report
    Filter {
        /// SARIF report to filter
        report: PathBuf,

        /// VEX documents to apply
        #[arg(required = true)]
        documents: Vec<PathBuf>,
    },

    /// List the products a VEX document talks about
    Products {
        /// VEX document
        document: PathBuf,

        /// Group products into image, other and unattestable references
        #[arg(long)]
        normalize: bool,
    },

    /// Wrap a VEX document in an in-toto attestation
    Attest {
        /// VEX document
        document: PathBuf,

        /// Image to attach the attestation to (repeatable; defaults to the
        /// subjects that are image references)
        #[arg(long = "ref")]
        refs: Vec<String>,

        /// Known digest for an image, as REFERENCE=ALGORITHM:HEX (repeatable)
        #[arg(long = "digest", value_parser = parse_digest_arg)]
        digests: Vec<(String, String)>,

        /// Emit an unsigned DSSE envelope instead of the bare statement
        #[arg(long)]
        envelope: bool,
    },

    /// Check that an attestation covers every image its document names
    Verify {
        /// Attestation, bare or in a DSSE envelope
        attestation: PathBuf,

        /// VEX document to check against (defaults to the attestation's predicate)
        #[arg(long)]
        document: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print config file search paths and discovered config file
    Path,
    /// Generate an example .vex-tools.yaml in the current directory
    Init,
    /// Print the JSON Schema of the config file format
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn parse_digest_arg(s: &str) -> Result<(String, String), String> {
    s.rsplit_once('=')
        .map(|(reference, digest)| (reference.to_string(), digest.to_string()))
        .ok_or_else(|| format!("expected REFERENCE=ALGORITHM:HEX, got '{s}'"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = cli_overrides(&cli);
    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(cli.config.as_deref(), &overrides);

    let log_level = if config.behavior.verbose {
        "debug"
    } else if config.behavior.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }
    let errors = config.validate();
    if !errors.is_empty() {
        for error in &errors {
            tracing::error!("{error}");
        }
        std::process::exit(exit_codes::ERROR);
    }

    let result = match cli.command {
        Commands::Merge(args) => cli::run_merge(
            cli::MergeArgs {
                paths: args.documents,
                id: args.id,
                products: args.products,
                vulnerabilities: args.vulnerabilities,
            },
            &config,
        ),

        Commands::Filter { report, documents } => cli::run_filter(&report, &documents, &config),

        Commands::Products {
            document,
            normalize,
        } => cli::run_products(&document, normalize, &config),

        Commands::Attest {
            document,
            refs,
            envelope,
            ..
        } => cli::run_attest(&document, &refs, envelope, &config),

        Commands::Verify {
            attestation,
            document,
        } => cli::run_verify(&attestation, document.as_deref(), &config),

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "vex-tools", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => run_config(action, cli.config.as_deref(), &config, loaded_from),
    };

    match result {
        Ok(exit_codes::SUCCESS) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Config values given on the command line, layered over the config file.
fn cli_overrides(cli: &Cli) -> AppConfig {
    let mut builder = AppConfig::builder()
        .output_file(cli.output_file.clone())
        .compact(cli.compact)
        .quiet(cli.quiet)
        .verbose(cli.verbose);

    match &cli.command {
        Commands::Merge(args) => {
            builder = builder
                .author(args.author.clone())
                .author_role(args.author_role.clone());
        }
        Commands::Attest { digests, .. } => {
            for (reference, digest) in digests {
                builder = builder.image_digest(reference.clone(), digest.clone());
            }
        }
        _ => {}
    }

    builder.build()
}

fn run_config(
    action: ConfigAction,
    explicit: Option<&Path>,
    config: &AppConfig,
    loaded_from: Option<PathBuf>,
) -> Result<i32> {
    match action {
        ConfigAction::Show => {
            match &loaded_from {
                Some(path) => eprintln!("# Loaded from: {}", path.display()),
                None => eprintln!("# No config file found; showing defaults"),
            }
            let yaml = serde_yaml_ng::to_string(config).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let search_paths: [Option<String>; 3] = [
                std::env::current_dir()
                    .ok()
                    .map(|p| p.display().to_string()),
                dirs::config_dir().map(|p| p.join("vex-tools").display().to_string()),
                dirs::home_dir().map(|p| p.display().to_string()),
            ];
            eprintln!("Config file search paths (in order):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {path}");
            }
            eprintln!();
            match vex_tools::config::discover_config_file(explicit) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
        ConfigAction::Init => {
            let target = std::env::current_dir()
                .context("cannot determine current directory")?
                .join(".vex-tools.yaml");
            if target.exists() {
                anyhow::bail!(
                    "{} already exists. Remove it first to re-initialize.",
                    target.display()
                );
            }
            std::fs::write(&target, vex_tools::config::generate_example_config())
                .with_context(|| format!("failed to write {}", target.display()))?;
            eprintln!("Created {}", target.display());
        }
        ConfigAction::Schema { output } => {
            let schema = vex_tools::config::generate_json_schema()
                .context("failed to serialize config schema")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
        }
    }
    Ok(exit_codes::SUCCESS)
}
