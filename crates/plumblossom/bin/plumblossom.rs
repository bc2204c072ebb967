#[macro_use]
extern crate log;

use std::sync::Arc;

use clap::Parser;
use plumblossom::{
    domain::services::{chapter::ChapterService, content::ContentService},
    infrastructure::{
        config::{Config, GLOBAL_CONFIG},
        domain::repositories::{
            cache::InMemoryListingCache, snapshot::SnapshotRepositoryImpl,
            source::SourceRepositoryImpl,
        },
    },
    presentation::ServerBuilder,
};
use plumblossom_scraper::prelude::{FlareSolverr, HttpFetcher, build_sources};

#[derive(Parser)]
struct Opts {
    /// Path to config file
    #[clap(long)]
    config: Option<String>,
}

fn init_logger() {
    let mut builder = env_logger::Builder::from_default_env();

    if std::env::var("RUST_LOG").is_err() {
        if let Ok(level) = std::env::var("PLUMBLOSSOM_LOG") {
            builder.parse_filters(&format!("plumblossom={level},plumblossom_scraper={level}"));
        }
    }

    builder.init();
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_logger();

    let opts: Opts = Opts::parse();
    let config = GLOBAL_CONFIG.get_or_try_init(|| Config::open(opts.config.as_ref()))?;

    debug!("config: {:?}", config);

    let solver = Arc::new(FlareSolverr::new(&config.flaresolverr_url));
    let endpoint = solver.endpoint().to_string();
    let fetcher = Arc::new(HttpFetcher::new(solver)?);
    let bus = build_sources(fetcher, &config.source_settings())?;
    for source in bus.list().iter().filter(|s| s.id.requires_bypass()) {
        info!("{} is fetched through the challenge resolver at {endpoint}", source.id);
    }

    let source_repo = SourceRepositoryImpl::new(bus);
    let cache = InMemoryListingCache::new(config.cache_ttl());
    let snapshot = config.snapshot_path.as_ref().map(SnapshotRepositoryImpl::new);
    if let Some(snapshot) = &snapshot {
        info!("serving snapshot from {:?} when present", snapshot.path());
    }

    let chapter_svc = ChapterService::new(cache, source_repo.clone(), snapshot);
    let content_svc = ContentService::new(source_repo);

    let server_fut = ServerBuilder::new()
        .with_chapter_svc(chapter_svc)
        .with_content_svc(content_svc)
        .build()?
        .serve(([0, 0, 0, 0], config.port));

    tokio::select! {
        res = server_fut => {
            if let Err(e) = res {
                error!("server error: {e}");
            }
            info!("server shutdown");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("ctrl+c signal");
        }
    }

    Ok(())
}
