//! pmovies - OMDb movie search CLI.

/// Application configuration (TOML).
mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use pmovies_api::omdb::OmdbClient;
use pmovies_api::search::{SearchError, SearchService};
use serde::Serialize;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, resolve_config_path};

/// Environment variable overriding `omdb.api_key`.
const API_KEY_ENV: &str = "OMDB_API_KEY";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search OMDb by free text.
    Search(SearchArgs),
    /// Look up a single record by exact title.
    Title(TitleArgs),
    /// Look up a single record by IMDb identifier.
    Imdb(ImdbArgs),
    /// Write a default config file if none exists.
    Init,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search phrase (e.g. "matrix").
    #[arg(long, required = true)]
    filter: String,
    /// Result type: movie, series, or episode.
    #[arg(long = "type")]
    kind: Option<String>,
    /// Release year.
    #[arg(long)]
    year: Option<String>,
    /// Result page, starting at 1.
    #[arg(long)]
    page: Option<String>,
}

/// Arguments for the `title` subcommand.
#[derive(clap::Args)]
struct TitleArgs {
    /// Exact title (e.g. "Alien").
    #[arg(long, required = true)]
    title: String,
}

/// Arguments for the `imdb` subcommand.
#[derive(clap::Args)]
struct ImdbArgs {
    /// IMDb identifier (e.g. "tt0078748").
    #[arg(long, required = true)]
    id: String,
}

/// Builds a `SearchService` from the config file and `OMDB_API_KEY`.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded, `base_url` is not a
/// valid URL, or the client fails to build.
#[instrument(skip_all)]
fn build_service(dir: Option<&Path>) -> Result<SearchService<OmdbClient>> {
    let config_path = resolve_config_path(dir)?;
    let config = AppConfig::load(&config_path)?.omdb;
    let timeout = config.timeout();

    let mut builder = OmdbClient::builder()
        .host(&config.host)
        .data_sub_host(&config.data_sub_host)
        .timeout(timeout)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
    if let Some(raw) = config.base_url.as_deref() {
        let url = Url::parse(raw).with_context(|| format!("invalid omdb.base_url: {raw}"))?;
        builder = builder.base_url(url);
    }
    let client = builder.build().context("failed to build OMDb client")?;

    let api_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .or(config.api_key);
    if api_key.is_none() {
        tracing::warn!(
            "No OMDb API key configured (set {API_KEY_ENV} or omdb.api_key in {})",
            config_path.display()
        );
    }

    Ok(SearchService::new(client, api_key).timeout(timeout))
}

/// Converts a `SearchError` into the CLI error, prefixed with its HTTP status.
fn search_failure(err: &SearchError) -> anyhow::Error {
    anyhow!("HTTP {}: {}", err.status_code(), err.to_body())
}

/// Logs `value` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
fn emit_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize result")?;
    tracing::info!("{json}");
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the service fails to build or the search fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&Path>) -> Result<()> {
    let service = build_service(dir)?;

    let payload = service
        .search(
            &args.filter,
            args.kind.as_deref(),
            args.year.as_deref(),
            args.page.as_deref(),
        )
        .await
        .map_err(|e| search_failure(&e))?;

    emit_json(&payload)?;
    tracing::info!("Total: {} results on this page", payload.search.len());

    Ok(())
}

/// Runs the `title` subcommand.
///
/// # Errors
///
/// Returns an error if the service fails to build or the lookup fails.
#[instrument(skip_all)]
async fn run_title(args: &TitleArgs, dir: Option<&Path>) -> Result<()> {
    let service = build_service(dir)?;
    let record = service
        .lookup_title(&args.title)
        .await
        .map_err(|e| search_failure(&e))?;
    emit_json(&record)
}

/// Runs the `imdb` subcommand.
///
/// # Errors
///
/// Returns an error if the service fails to build or the lookup fails.
#[instrument(skip_all)]
async fn run_imdb(args: &ImdbArgs, dir: Option<&Path>) -> Result<()> {
    let service = build_service(dir)?;
    let record = service
        .lookup_imdb_id(&args.id)
        .await
        .map_err(|e| search_failure(&e))?;
    emit_json(&record)
}

/// Runs the `init` subcommand.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved or the file
/// cannot be written.
fn run_init(dir: Option<&Path>) -> Result<()> {
    let config_path = resolve_config_path(dir)?;
    if config_path.exists() {
        tracing::info!("Config already exists: {}", config_path.display());
        return Ok(());
    }

    AppConfig::default().save(&config_path)?;
    tracing::info!("Wrote default config: {}", config_path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_deref();
    match cli.command {
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Title(args) => run_title(&args, dir).await,
        Commands::Imdb(args) => run_imdb(&args, dir).await,
        Commands::Init => run_init(dir),
    }
}
