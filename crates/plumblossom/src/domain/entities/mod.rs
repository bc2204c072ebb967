pub mod cache;
pub mod failure;
