use anyhow::Context;
use clap::{Parser, Subcommand};
use listforge::prelude::*;
use listforge::{Classification, ComplianceValidator};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

/// Turn extracted post features into a compliant marketplace listing
#[derive(Parser, Debug)]
#[command(name = "listforge")]
#[command(about = "Social-post to marketplace listing engine", long_about = None)]
struct Args {
    /// Category catalog JSON
    #[arg(long, global = true, default_value = "data/categories.json")]
    catalog: PathBuf,

    /// Engine configuration JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Category used when classification is inconclusive
    #[arg(long, global = true)]
    fallback: Option<String>,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a post and write its listing
    Generate {
        /// Post features JSON
        input: PathBuf,

        /// Skip classification and use this category id
        #[arg(long)]
        category: Option<String>,

        /// Seed for reproducible bullets; derived from the request id when absent
        #[arg(long)]
        seed: Option<u64>,

        /// Keep the listing as generated, without auto-fix
        #[arg(long)]
        no_auto_fix: bool,
    },
    /// Score a post against every category
    Classify {
        /// Post features JSON
        input: PathBuf,
    },
    /// Validate a listing
    Validate {
        /// Listing JSON
        input: PathBuf,

        /// Auto-fix the listing and report on the fixed copy
        #[arg(long)]
        auto_fix: bool,
    },
}

#[derive(Serialize)]
struct ValidateOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    listing: Option<Listing>,
    validation: ValidationResult,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting ListForge v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(fallback) = &args.fallback {
        config = config.with_fallback(fallback.clone());
    }

    match &args.command {
        Command::Generate {
            input,
            category,
            seed,
            no_auto_fix,
        } => {
            let engine = build_engine(&args.catalog, config)?;
            let post = read_post(input)?;

            let request_id = Uuid::new_v4();
            let seed = seed.unwrap_or(request_id.as_u128() as u64);
            info!(request_id = %request_id, seed, "Generating listing");

            let mut options = GenerateOptions::default().with_seed(seed);
            if let Some(category) = category {
                options = options.with_category(category.clone());
            }
            if *no_auto_fix {
                options = options.without_auto_fix();
            }

            let generated = engine
                .process(&post, &options)
                .context("listing generation failed")?;
            print_json(&generated)
        }
        Command::Classify { input } => {
            let engine = build_engine(&args.catalog, config)?;
            let post = read_post(input)?;
            let classification: Classification = engine.classify(&post);
            print_json(&classification)
        }
        Command::Validate { input, auto_fix } => {
            let validator = ComplianceValidator::new(config.rules).context("invalid rule set")?;
            let listing: Listing = load_json(input)
                .with_context(|| format!("failed to read listing {}", input.display()))?;

            let output = if *auto_fix {
                let fixed = validator.auto_fix(&listing);
                ValidateOutput {
                    validation: validator.validate(&fixed),
                    listing: Some(fixed),
                }
            } else {
                ValidateOutput {
                    validation: validator.validate(&listing),
                    listing: None,
                }
            };
            print_json(&output)
        }
    }
}

fn build_engine(catalog: &Path, config: EngineConfig) -> anyhow::Result<ListingEngine> {
    let store = CategorySchemaStore::from_path(catalog, &HashingEmbedder::default())
        .with_context(|| format!("failed to load catalog {}", catalog.display()))?;
    ListingEngine::new(store, config).context("failed to build listing engine")
}

/// Read post features, embedding the text locally when no embedding was supplied
fn read_post(path: &Path) -> anyhow::Result<PostFeatures> {
    let mut post: PostFeatures =
        load_json(path).with_context(|| format!("failed to read post features {}", path.display()))?;

    if post.text.embedding.is_empty() {
        post.text.embedding = HashingEmbedder::default().embed(post.text.text());
    }
    Ok(post)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
