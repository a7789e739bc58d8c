//! llmcost CLI
//!
//! Command-line interface for the llmcost pricing engine.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{debug, info};

use llmcost::config::LogFormat;
use llmcost::models::{ModelPrice, Span, UsageMap};
use llmcost::{Config, CostEngine};

/// llmcost - Cost estimation for LLM calls
#[derive(Parser)]
#[command(name = "llmcost")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "LLMCOST_CONFIG")]
    config: Option<PathBuf>,

    /// Model price definitions (overrides pricing.prices_file)
    #[arg(long, global = true, env = "LLMCOST_PRICES")]
    prices: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the cost of a single LLM call
    Calculate {
        /// Model name (e.g., "gpt-4o", "vertex_ai/gemini-1.5-pro")
        #[arg(long)]
        model: Option<String>,

        /// Provider (e.g., "openai", "anthropic", "google_vertexai")
        #[arg(long)]
        provider: Option<String>,

        /// Usage counter as key=value, repeatable (e.g., input_tokens=1200)
        #[arg(long = "usage", value_parser = parse_usage_entry)]
        usage: Vec<(String, u64)>,

        /// Metadata JSON document
        #[arg(long)]
        metadata: Option<String>,
    },

    /// Estimate costs for a JSON array of spans
    Annotate {
        /// Input file ("-" for stdin)
        #[arg(default_value = "-")]
        input: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect the price catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Build the price catalog and report whether it is usable
    Validate,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// List catalog entries
    List {
        /// Canonical provider filter (e.g., "google_ai")
        #[arg(long)]
        provider: Option<String>,
    },

    /// Show the prices for one model
    Show {
        /// Model name
        model: String,

        /// Canonical provider
        provider: String,
    },
}

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return ExitCode::SUCCESS;
    }

    let _ = dotenvy::dotenv();

    // Load configuration
    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(prices) = cli.prices {
        config.pricing.prices_file = prices;
    }

    init_logging(&config, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Calculate {
            model,
            provider,
            usage,
            metadata,
        } => run_calculate(&config, model, provider, usage, metadata.as_deref(), cli.format),
        Commands::Annotate { input, output } => run_annotate(&config, &input, output, cli.format),
        Commands::Catalog { command } => run_catalog(&config, command, cli.format),
        Commands::Validate => run_validate(&config, cli.format),
        Commands::Completions { .. } => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &Config, verbose: bool) {
    let log_level = if verbose { "debug" } else { config.logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    match config.logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn parse_usage_entry(entry: &str) -> Result<(String, u64), String> {
    let (key, value) = entry
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{entry}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing usage key in '{entry}'"));
    }
    let value = value
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid count for '{key}': {e}"))?;
    Ok((key.to_string(), value))
}

fn load_engine(config: &Config) -> anyhow::Result<CostEngine> {
    let path = &config.pricing.prices_file;
    info!("Loading model prices from {}", path.display());
    CostEngine::from_price_file(path)
        .with_context(|| format!("cannot build price catalog from {}", path.display()))
}

fn run_calculate(
    config: &Config,
    model: Option<String>,
    provider: Option<String>,
    usage: Vec<(String, u64)>,
    metadata: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let engine = load_engine(config)?;

    let metadata = metadata
        .map(serde_json::from_str::<serde_json::Value>)
        .transpose()
        .context("metadata is not valid JSON")?;
    let usage: UsageMap = usage.into_iter().collect();

    let cost = engine.calculate_cost(
        model.as_deref(),
        provider.as_deref(),
        Some(&usage),
        metadata.as_ref(),
    );
    debug!(cost = %cost, "Calculated cost");

    match format {
        OutputFormat::Text => println!("{cost}"),
        OutputFormat::Json => println!(
            "{}",
            json!({
                "model": model,
                "provider": provider,
                "usage": usage,
                "total_estimated_cost": cost,
            })
        ),
    }
    Ok(())
}

fn run_annotate(
    config: &Config,
    input: &str,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let engine = load_engine(config)?;

    let reader: Box<dyn Read> = if input == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(input).with_context(|| format!("cannot open {input}"))?,
        ))
    };
    let mut spans: Vec<Span> =
        serde_json::from_reader(reader).context("input is not a JSON array of spans")?;

    let costed = engine.annotate_batch(&mut spans);
    info!("Estimated cost for {costed} of {} spans", spans.len());

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(&path).with_context(|| format!("cannot create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    match format {
        OutputFormat::Json => serde_json::to_writer_pretty(&mut writer, &spans)?,
        OutputFormat::Text => {
            for span in &spans {
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}",
                    span.span_id,
                    span.model_name.as_deref().unwrap_or("-"),
                    span.provider.as_deref().unwrap_or("-"),
                    span.total_estimated_cost.unwrap_or(Decimal::ZERO)
                )?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

fn run_catalog(config: &Config, command: CatalogCommands, format: OutputFormat) -> anyhow::Result<()> {
    let engine = load_engine(config)?;

    match command {
        CatalogCommands::List { provider } => {
            let suffix = provider.map(|p| format!("/{p}"));
            let mut entries: Vec<(&str, &ModelPrice)> = engine
                .catalog()
                .iter()
                .filter(|(key, _)| suffix.as_deref().map_or(true, |s| key.ends_with(s)))
                .collect();
            entries.sort_unstable_by_key(|(key, _)| *key);

            match format {
                OutputFormat::Json => {
                    let map: serde_json::Map<String, serde_json::Value> = entries
                        .iter()
                        .map(|(key, price)| Ok(((*key).to_string(), serde_json::to_value(price)?)))
                        .collect::<serde_json::Result<_>>()?;
                    println!("{}", serde_json::to_string_pretty(&map)?);
                }
                OutputFormat::Text => {
                    for (key, price) in &entries {
                        println!(
                            "{key}\t{:?}\tin={}\tout={}",
                            price.calculator, price.input_text, price.output_text
                        );
                    }
                    println!("{} entries", entries.len());
                }
            }
        }
        CatalogCommands::Show { model, provider } => {
            let price = engine
                .catalog()
                .find(&model, &provider)
                .with_context(|| format!("no price for {model} with provider {provider}"))?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(price)?),
                OutputFormat::Text => print_price(price),
            }
        }
    }
    Ok(())
}

fn print_price(price: &ModelPrice) {
    println!("Calculator:   {:?}", price.calculator);
    println!("Input text:   {} / token", price.input_text);
    println!("Output text:  {} / token", price.output_text);
    println!("Input image:  {} / image", price.input_image);
    println!("Input audio:  {} / second", price.input_audio);
    println!("Input video:  {} / second", price.input_video);
    println!("Cache write:  {} / token", price.cache_write);
    println!("Cache read:   {} / token", price.cache_read);
}

fn run_validate(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let engine = load_engine(config)?;
    let entries = engine.catalog().len();

    match format {
        OutputFormat::Text => println!(
            "Price catalog OK: {entries} entries from {}",
            config.pricing.prices_file.display()
        ),
        OutputFormat::Json => println!(
            "{}",
            json!({
                "prices_file": config.pricing.prices_file,
                "entries": entries,
            })
        ),
    }
    Ok(())
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "llmcost", &mut io::stdout());
}
