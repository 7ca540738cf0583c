pub mod core;

// Re-export key items for easy importing in this crate
pub use self::core::client::EvergreenClient;
pub use self::core::types;

// Re-export key items for easy importing in other crates
pub use self::core::engine::aggregate::aggregate;
pub use self::core::engine::build_id::parse_build_date;
pub use self::core::engine::inspect::{InspectOptions, attach_reports, classify, inspect};
pub use self::core::engine::policy::{should_show_commit_summary, should_show_variant};
pub use self::core::engine::traits::CiSource;
pub use self::core::main_shared::run_main;
pub use self::core::render::Renderer;
