pub mod config;
pub mod waterfall;

pub use config::execute_config;
pub use waterfall::execute_waterfall;
