pub use crate::bus::SourceBus;
pub use crate::fetch::{ChallengeSolver, FetchOptions, Fetcher, FlareSolverr, HttpFetcher};
pub use crate::sources::{SourceSettings, build_sources};
pub use plumblossom_lib::prelude::*;
