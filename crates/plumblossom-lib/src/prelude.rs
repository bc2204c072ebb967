pub use crate::error::{Error, Result};
pub use crate::models::*;
pub use crate::traits::Source;
pub use crate::unify::unify;
