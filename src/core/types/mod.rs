pub mod config;
mod error;
mod plan;
mod tally;
mod version;

pub use error::*;
pub use plan::*;
pub use tally::*;
pub use version::*;
