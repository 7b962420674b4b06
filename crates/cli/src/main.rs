use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use reelgrid_catalog::genres::SessionGenres;
use reelgrid_catalog::picks::{PickGenre, fetch_picks};
use reelgrid_catalog::{
    Aggregator, AggregatorConfig, CatalogScope, LoadMoreResult, ProviderView, detail, providers,
    search,
};
use reelgrid_core::{MediaKind, MediaRef, ViewError, error::ErrorEnvelope};
use reelgrid_metadata::{CatalogConfig, MetadataSource, TmdbClient};
use reelgrid_playback::{SERVERS, WatchContext, servers, watch};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reelgrid", about = "Browse streaming catalogs and resolve player links")]
struct Cli {
    /// Metadata API base URL, or a proxy that adds credentials
    #[arg(long, env = "REELGRID_API_BASE", default_value = "https://api.themoviedb.org/3")]
    api_base: String,
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    #[arg(long, env = "REELGRID_IMAGE_BASE", default_value = "https://image.tmdb.org/t/p")]
    image_base: String,
    /// Request timeout in seconds
    #[arg(long, env = "REELGRID_TIMEOUT", default_value_t = 10)]
    timeout: u64,
    /// Pages fetched per kind when a catalog first loads
    #[arg(long, env = "REELGRID_PAGES", default_value_t = 5)]
    pages: u32,
    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the streaming providers and their regions
    Providers,
    /// Load a provider's catalog, optionally paging further
    Browse {
        /// Provider slug or id, e.g. `netflix` or `8`
        provider: String,
        /// Number of "load more" rounds after the initial batch
        #[arg(long, default_value_t = 0)]
        more: u32,
        /// Only page further in this kind; both kinds when unset
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        #[arg(long)]
        movie_genre: Option<u32>,
        #[arg(long)]
        tv_genre: Option<u32>,
    },
    /// One page per kind filtered by a named genre, interleaved
    Picks {
        provider: String,
        #[arg(long, value_enum)]
        genre: Option<GenreArg>,
    },
    Search {
        query: String,
    },
    /// Detail overlay data: genre names, top cast and trailer
    Details {
        #[arg(long = "type", value_enum)]
        kind: KindArg,
        #[arg(long)]
        id: u64,
    },
    /// Watch page: context plus the resolved player URL
    Watch {
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        id: Option<String>,
        #[arg(long, default_value_t = 0)]
        server: usize,
        #[arg(long)]
        season: Option<u32>,
        #[arg(long)]
        episode: Option<u32>,
        /// Override the server's default sandbox setting
        #[arg(long)]
        sandbox: Option<bool>,
    },
    /// Every server's URL for one title
    Servers {
        #[arg(long = "type", value_enum)]
        kind: KindArg,
        #[arg(long)]
        id: u64,
        #[arg(long, default_value_t = 1)]
        season: u32,
        #[arg(long, default_value_t = 1)]
        episode: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Movie,
    Tv,
}

impl From<KindArg> for MediaKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Movie => MediaKind::Movie,
            KindArg::Tv => MediaKind::Tv,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum GenreArg {
    Action,
    Romance,
    Comedy,
    Horror,
}

impl From<GenreArg> for PickGenre {
    fn from(g: GenreArg) -> Self {
        match g {
            GenreArg::Action => PickGenre::Action,
            GenreArg::Romance => PickGenre::Romance,
            GenreArg::Comedy => PickGenre::Comedy,
            GenreArg::Horror => PickGenre::Horror,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries JSON output only.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = CatalogConfig {
        api_base: cli.api_base.trim_end_matches('/').to_string(),
        api_key: cli.api_key.clone(),
        image_base: cli.image_base.trim_end_matches('/').to_string(),
        request_timeout: Duration::from_secs(cli.timeout),
    };
    let aggregator_config = AggregatorConfig {
        pages_per_kind: cli.pages.max(1),
        ..Default::default()
    };
    info!(api_base = %config.api_base, pages = aggregator_config.pages_per_kind, "reelgrid starting");

    let client = Arc::new(TmdbClient::new(config).context("failed to build metadata client")?);

    match cli.command {
        Command::Providers => print_json(&providers::PROVIDERS)?,

        Command::Browse {
            provider,
            more,
            kind,
            movie_genre,
            tv_genre,
        } => {
            let provider = providers::require(&provider)?;
            let mut scope = CatalogScope::for_provider(provider);
            if let Some(g) = movie_genre {
                scope = scope.with_genre(MediaKind::Movie, g);
            }
            if let Some(g) = tv_genre {
                scope = scope.with_genre(MediaKind::Tv, g);
            }

            let aggregator = Arc::new(Aggregator::new(client.clone(), aggregator_config));
            let view = ProviderView::mount(aggregator, scope);
            if let Err(e) = view.load_initial().await {
                return report(&e);
            }

            let kinds: Vec<MediaKind> = match kind {
                Some(k) => vec![k.into()],
                None => MediaKind::ALL.to_vec(),
            };
            let results = view.load_more_rounds(&kinds, more).await;
            if results.contains(&LoadMoreResult::Failed) {
                info!(completed = results.len(), "paging stopped after a failed load more");
            }
            print_json(&view.snapshot().await)?;
            view.teardown();
        }

        Command::Picks { provider, genre } => {
            let provider = providers::require(&provider)?;
            let picks = fetch_picks(
                client.as_ref(),
                provider,
                genre.map(Into::into),
                aggregator_config.picks_limit,
            )
            .await;
            print_json(&picks)?;
        }

        Command::Search { query } => {
            print_json(&search::search_titles(client.as_ref(), &query).await)?;
        }

        Command::Details { kind, id } => {
            let media = MediaRef::new(kind.into(), id);
            let item = match client.details(media).await {
                Ok(d) => d.item,
                Err(e) => return report(&ViewError::ContentNotFound(e.to_string())),
            };
            let genres = SessionGenres::new();
            let directory = genres.get_or_load(client.as_ref()).await;
            let details = detail::load_item_details(
                client.as_ref(),
                directory,
                &item,
                aggregator_config.detail_cast_limit,
            )
            .await;

            let images = client.config();
            print_json(&DetailsOutput {
                poster_url: item.poster_path.as_deref().map(|p| images.poster_url(p)),
                backdrop_url: item.backdrop_path.as_deref().map(|p| images.backdrop_url(p)),
                trailer_url: details.trailer.as_ref().map(|t| t.embed_url()),
                cast_profile_urls: details
                    .cast
                    .iter()
                    .map(|c| c.profile_path.as_deref().map(|p| images.profile_url(p)))
                    .collect(),
                details,
            })?;
        }

        Command::Watch {
            kind,
            id,
            server,
            season,
            episode,
            sandbox,
        } => {
            let media = match watch::parse_reference(kind.as_deref(), id.as_deref()) {
                Ok(media) => media,
                Err(e) => return report(&e.into()),
            };
            if server >= SERVERS.len() {
                bail!("server must be between 0 and {}", SERVERS.len() - 1);
            }

            let mut ctx = WatchContext::load(client.as_ref(), media).await;
            ctx.selection.select_server(server);
            if let Some(s) = season {
                ctx.change_season(client.as_ref(), s).await;
            }
            if let Some(e) = episode {
                ctx.selection.select_episode(e);
            }
            if let Some(enabled) = sandbox {
                ctx.selection.set_sandbox(enabled);
            }
            print_json(&WatchOutput {
                url: ctx.current_url(),
                context: ctx,
            })?;
        }

        Command::Servers {
            kind,
            id,
            season,
            episode,
        } => {
            let media = MediaRef::new(kind.into(), id);
            print_json(&servers::resolve_all(media, season, episode))?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[derive(Serialize)]
struct DetailsOutput {
    #[serde(flatten)]
    details: detail::ItemDetails,
    poster_url: Option<String>,
    backdrop_url: Option<String>,
    trailer_url: Option<String>,
    /// Parallel to `cast`.
    cast_profile_urls: Vec<Option<String>>,
}

#[derive(Serialize)]
struct WatchOutput {
    url: String,
    #[serde(flatten)]
    context: WatchContext,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{out}");
    Ok(())
}

/// Print a view-level failure as an error envelope and exit non-zero.
fn report(e: &ViewError) -> anyhow::Result<ExitCode> {
    print_json(&ErrorEnvelope::from(e))?;
    Ok(ExitCode::FAILURE)
}
