pub mod chapter;
pub use chapter::*;

pub mod language;
pub use language::*;

pub mod listing;
pub use listing::*;

pub mod snapshot;
pub use snapshot::*;

pub mod source_info;
pub use source_info::*;
