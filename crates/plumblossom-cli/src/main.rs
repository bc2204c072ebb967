#[macro_use]
extern crate log;

mod run;
mod scrape;

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use plumblossom::infrastructure::config::Config;
use plumblossom_lib::models::SourceId;
use plumblossom_scraper::prelude::{FlareSolverr, HttpFetcher, build_sources};

#[derive(Parser)]
#[clap(version, about = "Scrape chapter listings without running the server")]
struct Opts {
    /// Path to config file
    #[clap(long)]
    config: Option<String>,
    #[clap(subcommand)]
    subcmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape every source and write a snapshot the server can serve
    Scrape {
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the chapters one source lists
    Run { source: SourceId },
    /// Print the text of one chapter
    Content { source: SourceId, url: String },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let opts: Opts = Opts::parse();
    let config = Config::open(opts.config.as_ref())?;

    let solver = Arc::new(FlareSolverr::new(&config.flaresolverr_url));
    let endpoint = solver.endpoint().to_string();
    let fetcher = Arc::new(HttpFetcher::new(solver)?);
    let bus = build_sources(fetcher, &config.source_settings())?;
    for source in bus.list().iter().filter(|s| s.id.requires_bypass()) {
        info!("{} is fetched through the challenge resolver at {endpoint}", source.id);
    }

    match opts.subcmd {
        Command::Scrape { output } => {
            let output = output
                .or_else(|| config.snapshot_path.as_ref().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("data/chapters.json"));
            scrape::scrape(&bus, &output).await?
        }
        Command::Run { source } => run::run(&bus, source).await?,
        Command::Content { source, url } => run::content(&bus, source, &url).await?,
    }

    Ok(())
}
