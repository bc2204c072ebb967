pub mod chapter;
pub mod content;
