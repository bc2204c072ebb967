pub mod error;
pub mod models;
pub mod prelude;
pub mod traits;
pub mod unify;

/// Version written into snapshots and reported by health checks
pub static LIB_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Chapter numbers at or above this bound are treated as false positives (post ids, years)
pub const MAX_CHAPTER_NUMBER: u32 = 10000;
