#[macro_use]
extern crate log;

pub mod bus;
pub mod content;
pub mod extract;
pub mod fetch;
pub mod prelude;
pub mod sources;
