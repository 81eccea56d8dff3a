//! cinefav - movie search and favorites CLI.

/// Application configuration (TOML).
mod config;
/// Key-value backend selection.
mod storage;
/// Terminal UI components.
mod tui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, OmdbConfig, parse_media_type, resolve_config_path};
use crate::storage::Storage;
use crate::tui::run_browser;
use cinefav_api::omdb::OmdbClient;
use cinefav_core::{
    FavoriteMovie, FavoritesStore, FetchError, MovieDetails, SearchController, SearchResultItem,
    fetch_details,
};

/// Binary name used in completions and hints.
const BIN_NAME: &str = "cinefav";

/// Environment variable holding the OMDb API key.
const API_KEY_ENV: &str = "OMDB_API_KEY";

/// CLI argument parser.
#[derive(Parser)]
#[command(name = BIN_NAME, about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Keep favorites in memory only; nothing is written to disk.
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search OMDb by title.
    Search(SearchArgs),
    /// Show full metadata for one title.
    Details(DetailsArgs),
    /// Manage favorites.
    Favorites(FavoritesCommand),
    /// Browse, search and pick favorites interactively.
    Browse,
    /// Manage the config file.
    Config(ConfigCommand),
    /// Print a shell completion script.
    Completions(CompletionsArgs),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Title query (e.g. "batman").
    #[arg(long, required = true)]
    query: String,

    /// Number of pages to load (10 results per page).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=100))]
    pages: u32,

    /// Media type filter: movie, series, episode or all. Defaults to the config value.
    #[arg(long = "type")]
    media_type: Option<String>,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// IMDb id (e.g. "tt0372784").
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `favorites` subcommand.
#[derive(clap::Args)]
struct FavoritesCommand {
    /// Favorites subcommand to run.
    #[command(subcommand)]
    command: FavoritesSubcommands,
}

/// Available favorites subcommands.
#[derive(Subcommand)]
enum FavoritesSubcommands {
    /// List favorites in the order they were added.
    List,
    /// Look up a title and add it to favorites.
    Add(FavoriteIdArgs),
    /// Remove a title from favorites.
    Remove(FavoriteIdArgs),
}

/// Arguments for `favorites add` / `favorites remove`.
#[derive(clap::Args)]
struct FavoriteIdArgs {
    /// IMDb id (e.g. "tt0372784").
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config file with default settings.
    Init(ConfigInitArgs),
    /// Print the config file path.
    Path,
}

/// Arguments for the `config init` subcommand.
#[derive(clap::Args)]
struct ConfigInitArgs {
    /// OMDb API key to store in the file.
    #[arg(long)]
    api_key: Option<String>,

    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: Shell,
}

/// Loads the config for `dir`.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Builds an OMDb API client.
///
/// # Errors
///
/// Returns an error if no API key is configured or the client fails to build.
#[instrument(skip_all)]
fn build_omdb_client(config: &OmdbConfig) -> Result<OmdbClient> {
    let api_key = config
        .api_key(std::env::var(API_KEY_ENV).ok())
        .with_context(|| {
            format!("{API_KEY_ENV} environment variable or [omdb] api_key in config.toml is required")
        })?;

    let mut builder = OmdbClient::builder()
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .timeout(config.timeout())
        .min_interval(config.min_interval());
    if let Some(base_url) = &config.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid [omdb] base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build OMDb client")
}

/// Opens the favorites store on the configured backend.
async fn open_favorites(dir: Option<&PathBuf>, ephemeral: bool) -> Result<FavoritesStore<Storage>> {
    let storage = Storage::open(dir, ephemeral)?;
    FavoritesStore::open(Arc::new(storage))
        .await
        .context("failed to load favorites")
}

/// Turns a fetch failure into a CLI error, keeping the transport detail.
fn fetch_failure(err: &FetchError) -> anyhow::Error {
    match err {
        FetchError::Transport { detail } => anyhow!("{err}: {detail}"),
        FetchError::NotFound { .. } | FetchError::InvalidId { .. } => anyhow!("{err}"),
    }
}

/// Logs search rows, marking favorites.
fn log_results(items: &[SearchResultItem], favorites: &FavoritesStore<Storage>) {
    tracing::info!("Fav\tIMDb ID\t\tYear\tType\tTitle");
    for item in items {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}",
            if favorites.is_favorite(&item.id) { "\u{2605}" } else { "" },
            item.id,
            item.year,
            item.kind.as_deref().unwrap_or("-"),
            item.title,
        );
    }
}

/// Logs the favorites collection.
fn log_favorites(favorites: &[FavoriteMovie]) {
    if favorites.is_empty() {
        tracing::info!("No favorites yet. Add one with `{BIN_NAME} favorites add --id <IMDB_ID>`.");
        return;
    }
    for favorite in favorites {
        tracing::info!("{}\t{}\t{}", favorite.id, favorite.year, favorite.title);
    }
    tracing::info!("Total: {} favorites", favorites.len());
}

/// Logs one detail record.
fn log_details(details: &MovieDetails) {
    tracing::info!("{} ({})", details.title, details.year);
    let fields = [
        ("IMDb ID", Some(&details.id)),
        ("Type", details.kind.as_ref()),
        ("Rated", details.rated.as_ref()),
        ("Released", details.released.as_ref()),
        ("Runtime", details.runtime.as_ref()),
        ("Genre", details.genre.as_ref()),
        ("Director", details.director.as_ref()),
        ("Writer", details.writer.as_ref()),
        ("Actors", details.actors.as_ref()),
        ("Rating", details.imdb_rating.as_ref()),
        ("Box office", details.box_office.as_ref()),
        ("Poster", details.poster_url.as_ref()),
        ("Plot", details.plot.as_ref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            tracing::info!("  {label:<11}{value}");
        }
    }
}

/// Runs the `search` subcommand.
///
/// Loads the first page, then follows `load_more` up to `--pages`.
///
/// # Errors
///
/// Returns an error if the client fails to build or the first page fails
/// with a transport error.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>, ephemeral: bool) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_omdb_client(&config.omdb)?;
    let mut search_config = config.search.to_search_config()?;
    if let Some(media_type) = &args.media_type {
        search_config.media_type = parse_media_type(media_type).context("invalid --type")?;
    }
    let favorites = open_favorites(dir, ephemeral).await?;

    let controller = SearchController::new(Arc::new(client), search_config);
    controller.submit_search(&args.query, 1, false).await;
    let mut loaded: u32 = 1;
    while loaded < args.pages {
        if controller.load_more().await.is_none() {
            break;
        }
        loaded = loaded.saturating_add(1);
    }

    let snapshot = controller.snapshot();
    if snapshot.items.is_empty() {
        return match &snapshot.error {
            Some(FetchError::NotFound { message }) => {
                tracing::info!("{message}");
                Ok(())
            }
            Some(err) => Err(fetch_failure(err)).context("search failed"),
            None => {
                tracing::info!("No results");
                Ok(())
            }
        };
    }

    log_results(&snapshot.items, &favorites);
    if let Some(err) = &snapshot.error {
        tracing::warn!("Stopped early: {}", fetch_failure(err));
    }
    tracing::info!(
        "Showing {} of {} results (page {})",
        snapshot.items.len(),
        snapshot.total_available,
        snapshot.page
    );
    favorites.close().await;

    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build, the id is malformed, or
/// the lookup fails with a transport error.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_omdb_client(&config.omdb)?;

    match fetch_details(&client, &args.id).await {
        Ok(details) => {
            log_details(&details);
            Ok(())
        }
        Err(FetchError::NotFound { message }) => {
            tracing::info!("{message}");
            Ok(())
        }
        Err(err) => Err(fetch_failure(&err)).context("detail lookup failed"),
    }
}

/// Runs the `favorites list` subcommand.
///
/// # Errors
///
/// Returns an error if the favorites cannot be loaded.
#[instrument(skip_all)]
async fn run_favorites_list(dir: Option<&PathBuf>, ephemeral: bool) -> Result<()> {
    let favorites = open_favorites(dir, ephemeral).await?;
    log_favorites(&favorites.favorites());
    favorites.close().await;
    Ok(())
}

/// Runs the `favorites add` subcommand.
///
/// # Errors
///
/// Returns an error if the lookup or the write fails.
#[instrument(skip_all)]
async fn run_favorites_add(
    args: &FavoriteIdArgs,
    dir: Option<&PathBuf>,
    ephemeral: bool,
) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_omdb_client(&config.omdb)?;
    let favorites = open_favorites(dir, ephemeral).await?;

    let details = fetch_details(&client, &args.id)
        .await
        .map_err(|err| fetch_failure(&err))
        .context("detail lookup failed")?;

    let added = favorites
        .add(details.to_favorite())
        .await
        .context("failed to save favorite")?;
    if added {
        tracing::info!("Added {} ({}) to favorites", details.title, details.year);
    } else {
        tracing::info!("{} is already a favorite", details.title);
    }
    favorites.close().await;

    Ok(())
}

/// Runs the `favorites remove` subcommand.
///
/// # Errors
///
/// Returns an error if the favorites cannot be loaded or written.
#[instrument(skip_all)]
async fn run_favorites_remove(
    args: &FavoriteIdArgs,
    dir: Option<&PathBuf>,
    ephemeral: bool,
) -> Result<()> {
    let favorites = open_favorites(dir, ephemeral).await?;
    let removed = favorites
        .remove(args.id.trim())
        .await
        .context("failed to save favorites")?;
    if removed {
        tracing::info!("Removed {} from favorites", args.id.trim());
    } else {
        tracing::info!("{} is not a favorite", args.id.trim());
    }
    favorites.close().await;

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if setup or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>, ephemeral: bool) -> Result<()> {
    let config = load_config(dir)?;
    let api = Arc::new(build_omdb_client(&config.omdb)?);
    let search_config = config.search.to_search_config()?;
    let favorites = Arc::new(open_favorites(dir, ephemeral).await?);

    let controller = SearchController::new(Arc::clone(&api), search_config);
    run_browser(controller, Arc::clone(&favorites), api)
        .await
        .context("browser TUI failed")?;

    favorites.close().await;
    tracing::info!("{} favorites saved", favorites.len());
    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists (without `--force`) or cannot be written.
#[instrument(skip_all)]
fn run_config_init(args: &ConfigInitArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    if config_path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    let config = AppConfig {
        omdb: OmdbConfig {
            api_key: args.api_key.clone(),
            ..OmdbConfig::default()
        },
        ..AppConfig::default()
    };
    config.save(&config_path).context("failed to save config")?;
    tracing::info!("Wrote {}", config_path.display());
    Ok(())
}

/// Runs the `config path` subcommand.
///
/// # Errors
///
/// Returns an error if the config path cannot be resolved.
fn run_config_path(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    tracing::info!("{}", config_path.display());
    Ok(())
}

/// Writes the completion script for `shell` to stdout.
fn run_completions(args: &CompletionsArgs) {
    clap_complete::generate(args.shell, &mut Cli::command(), BIN_NAME, &mut io::stdout());
}

/// Installs the tracing subscriber.
///
/// With the `otel` feature, spans are also exported over OTLP/HTTP when
/// `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
fn init_tracing() {
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
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    let ephemeral = cli.ephemeral;
    match cli.command {
        Commands::Search(args) => run_search(&args, dir, ephemeral).await,
        Commands::Details(args) => run_details(&args, dir).await,
        Commands::Favorites(cmd) => match cmd.command {
            FavoritesSubcommands::List => run_favorites_list(dir, ephemeral).await,
            FavoritesSubcommands::Add(args) => run_favorites_add(&args, dir, ephemeral).await,
            FavoritesSubcommands::Remove(args) => {
                run_favorites_remove(&args, dir, ephemeral).await
            }
        },
        Commands::Browse => run_browse(dir, ephemeral).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Init(args) => run_config_init(&args, dir),
            ConfigSubcommands::Path => run_config_path(dir),
        },
        Commands::Completions(args) => {
            run_completions(&args);
            Ok(())
        }
    }
}
