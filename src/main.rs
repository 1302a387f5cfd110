mod cli;

use cinescope::{
    config::{self, Config},
    fetcher::ResultPageFetcher,
    filter::{FilterState, KeywordDebouncer, UrlFilterCodec},
    images::ImageUrlBuilder,
    pagination::{Browser, PaginationSnapshot, Phase},
    server,
    tmdb::TmdbGateway,
};
use cinescope_common::{ImageSize, ResultPage};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

async fn serve(host: Option<String>, port: Option<u16>, config_path: Option<&Path>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting Cinescope server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );
    tracing::info!("TMDB endpoint: {}", config.tmdb.base_url);

    server::start_server(config).await
}

struct BrowseArgs {
    search: Option<String>,
    year: Option<i32>,
    url: Option<String>,
    pages: u32,
    initial_page: Option<PathBuf>,
    interactive: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Pick up TMDB_* variables from a local .env, if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "cinescope=debug,cinescope_common=debug,tower_http=debug".to_string()
        } else {
            "cinescope=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(serve(host, port, cli.config.as_deref()))
        }
        Commands::Browse {
            search,
            year,
            url,
            pages,
            initial_page,
            interactive,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let args = BrowseArgs {
                search,
                year,
                url,
                pages,
                initial_page,
                interactive,
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(browse(config, args))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("cinescope {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn browse(config: Config, args: BrowseArgs) -> Result<()> {
    let gateway = TmdbGateway::new(&config.tmdb).context("Failed to initialize TMDB gateway")?;
    let fetcher = Arc::new(
        ResultPageFetcher::new(Arc::new(gateway))
            .with_unfiltered_listing(config.browse.unfiltered_listing),
    );

    let browser = match args.initial_page {
        Some(ref path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read initial page: {:?}", path))?;
            let page: ResultPage = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse initial page: {:?}", path))?;
            tracing::info!("Loaded {} prefetched movies from {:?}", page.items.len(), path);
            Browser::with_initial_page(fetcher, page)
        }
        None => Browser::new(fetcher),
    };
    let images = ImageUrlBuilder::new(&config.images);
    let codec = UrlFilterCodec::new(config.browse.available_years.clone());

    // A shared link seeds the filters; explicit flags win over it
    let filters = FilterState::default();
    let mut pages = args.pages;
    if let Some(ref url) = args.url {
        pages = pages.max(codec.restore(&filters, url));
    }
    if args.search.is_some() {
        filters.set_keyword(args.search);
    }
    if let Some(year) = args.year {
        if !codec.accepts_year(year) {
            anyhow::bail!("Year {} is not available", year);
        }
        filters.set_release_year(Some(year));
    }

    if args.interactive {
        return browse_interactive(browser, &config, images, codec, filters).await;
    }

    let current = filters.get();
    if let Some(fetch) = browser.set_query(current.keyword, current.release_year) {
        fetch.await?;
    }
    for _ in 1..pages {
        match browser.load_next_page() {
            Some(fetch) => {
                fetch.await?;
            }
            None => break,
        }
    }

    let snapshot = browser.snapshot();
    let link = codec.share(&filters, snapshot.pages_loaded as u32);
    print_snapshot(&snapshot, &images, &link);
    match snapshot.error {
        Some(e) if snapshot.pages_loaded == 0 => Err(e.into()),
        _ => Ok(()),
    }
}

enum ConsoleCommand {
    Keyword(String),
    Year(Option<i32>),
    More,
    Clear,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> ConsoleCommand {
    let Some(rest) = line.strip_prefix(':') else {
        return ConsoleCommand::Keyword(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("q" | "quit"), _) => ConsoleCommand::Quit,
        (Some("m" | "more"), _) => ConsoleCommand::More,
        (Some("clear"), _) => ConsoleCommand::Clear,
        (Some("year"), None) => ConsoleCommand::Year(None),
        (Some("year"), Some(y)) => match y.parse() {
            Ok(year) => ConsoleCommand::Year(Some(year)),
            Err(_) => ConsoleCommand::Unknown(line.to_string()),
        },
        _ => ConsoleCommand::Unknown(line.to_string()),
    }
}

async fn browse_interactive(
    browser: Browser<ResultPageFetcher>,
    config: &Config,
    images: ImageUrlBuilder,
    codec: UrlFilterCodec,
    filters: FilterState,
) -> Result<()> {
    let debouncer = KeywordDebouncer::spawn(
        filters.clone(),
        Duration::from_millis(config.browse.debounce_ms),
    );

    let mut snapshots = browser.subscribe();
    let printer = {
        let codec = codec.clone();
        let filters = filters.clone();
        tokio::spawn(async move {
            while snapshots.changed().await.is_ok() {
                let snapshot = snapshots.borrow_and_update().clone();
                if matches!(snapshot.phase, Phase::Ready | Phase::Error) {
                    let link = codec.share(&filters, snapshot.pages_loaded as u32);
                    print_snapshot(&snapshot, &images, &link);
                }
            }
        })
    };
    let follower = browser.follow_filters(&filters);

    println!("Type a title to search, or :year <YYYY>, :year, :more, :clear, :quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(line.trim_end()) {
            ConsoleCommand::Quit => break,
            ConsoleCommand::More => {
                if browser.load_next_page().is_none() {
                    println!("Nothing more to load.");
                }
            }
            ConsoleCommand::Year(Some(y)) if !codec.accepts_year(y) => {
                println!("Year {} is not available.", y);
            }
            ConsoleCommand::Year(y) => {
                filters.set_release_year(y);
            }
            ConsoleCommand::Clear => {
                filters.clear();
            }
            ConsoleCommand::Keyword(text) => {
                debouncer.input(text);
                debouncer.commit();
            }
            ConsoleCommand::Unknown(cmd) => println!("Unknown command: {}", cmd),
        }
    }

    follower.abort();
    printer.abort();
    Ok(())
}

fn print_snapshot(snapshot: &PaginationSnapshot, images: &ImageUrlBuilder, link: &str) {
    if let (Some(e), 0) = (&snapshot.error, snapshot.pages_loaded) {
        println!("Error: {}", e);
        return;
    }

    let heading = match snapshot.query.as_ref() {
        Some(q) if q.keyword.is_some() => format!("Search results for {:?}", q.keyword().unwrap_or_default()),
        Some(q) if !q.is_default() => "Filtered movies".to_string(),
        _ => "Popular movies".to_string(),
    };
    println!("\n{} (found {} movies)", heading, snapshot.total_results);

    for movie in &snapshot.movies {
        let year = movie
            .release_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "----".to_string());
        let genres: Vec<_> = movie.genres().map(|g| g.label()).collect();
        println!(
            "  {:>8}  {} ({})  {:.1}/10  [{}]",
            movie.id,
            movie.title,
            year,
            movie.vote_average,
            genres.join(", ")
        );
        println!(
            "            {}",
            images.url(movie.poster_path.as_deref(), ImageSize::W200)
        );
    }

    println!(
        "Loaded page {} of {}{}",
        snapshot.pages_loaded,
        snapshot.total_pages,
        if snapshot.has_more_pages { " (:more for next)" } else { "" }
    );

    println!("Share: ?{}", link);

    if let Some(ref e) = snapshot.error {
        println!("Could not load more: {}", e);
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults and environment");
            config::load_config_or_default(None)?
        }
    };

    println!("✓ Configuration is valid");
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  TMDB: {}", config.tmdb.base_url);
    println!(
        "  Access token: {}",
        if config.tmdb.access_token.is_empty() { "missing" } else { "set" }
    );
    println!("  Images: {}", config.images.base_url);
    println!("  Debounce: {} ms", config.browse.debounce_ms);
    println!("  Unfiltered listing: {:?}", config.browse.unfiltered_listing);

    TmdbGateway::new(&config.tmdb).context("TMDB gateway cannot be constructed")?;
    println!("✓ TMDB gateway configuration is complete");

    Ok(())
}
