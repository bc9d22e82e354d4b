//! search-that CLI - look up a catalog code and fetch its cover.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use search_that::{Config, Resolver, Response, SearchMode, SourceKind};

/// search-that - catalog code lookup CLI
#[derive(Parser)]
#[command(name = "search-that")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a code, or free text containing one
    Resolve(ResolveArgs),

    /// List sites with a dedicated listing parser
    Sources,
}

#[derive(Parser)]
struct ResolveArgs {
    /// Code or free text
    text: String,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pools to query: all, pool_a, pool_b
    #[arg(short, long)]
    mode: Option<SearchMode>,

    /// Proxy URL (e.g., http://127.0.0.1:8080 or socks5://127.0.0.1:1080)
    #[arg(short, long)]
    proxy: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    timeout: Option<f64>,

    /// Mosaic strength, 0 disables it
    #[arg(long)]
    mosaic_level: Option<u32>,

    /// Write the cover image to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    match cli.command {
        Commands::Resolve(args) => run_resolve(args).await,
        Commands::Sources => list_sources(),
    }
}

fn list_sources() -> Result<()> {
    println!("Sites with a dedicated listing parser:\n");
    for (kind, host) in SourceKind::KNOWN {
        println!("    {:<12} - {:?}", host, kind);
    }
    println!();
    println!("Any other host falls back to generic link matching.");
    println!("Usage: search-that resolve \"ABC-123\" -c config.json");
    Ok(())
}

fn load_config(args: &ResolveArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(mode) = args.mode {
        config.search_mode = mode;
    }
    if let Some(proxy) = &args.proxy {
        config.proxy = Some(proxy.clone());
    }
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if let Some(level) = args.mosaic_level {
        config.cover_mosaic_level = level;
    }

    config.validate()?;
    Ok(config)
}

async fn run_resolve(args: ResolveArgs) -> Result<()> {
    let config = load_config(&args)?;
    if config.registry()?.is_empty() {
        anyhow::bail!("No sources configured, pass a config file with -c");
    }

    if let (Some(proxy), OutputFormat::Text) = (config.proxy_config()?, args.format) {
        eprintln!("Using proxy: {}", proxy);
    }

    let resolver = Resolver::new(config)?;
    let response = resolver.resolve_text(&args.text).await;

    if let (Some(path), Some(image)) = (&args.output, &response.image) {
        std::fs::write(path, &image.bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    match args.format {
        OutputFormat::Text => print_text(&response, args.output.as_ref()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
    }

    Ok(())
}

fn print_text(response: &Response, output: Option<&PathBuf>) {
    println!("\nStatus: {:?}\n", response.status);
    if let Some(title) = &response.title {
        println!("   Title: {}", title);
    }
    if let Some(link) = &response.link {
        println!("   URL: {}", link);
    }
    if let Some(image) = &response.image {
        match output {
            Some(path) => println!("   Cover: {} ({} bytes)", path.display(), image.bytes.len()),
            None => println!("   Cover: {} bytes of {}", image.bytes.len(), image.mime),
        }
    }
    if response.title.is_none() && !response.message.is_empty() {
        println!("   {}", response.message);
    }
    println!();
}
