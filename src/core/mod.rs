pub mod cli;
pub mod client;
pub mod cmds;
pub mod engine;
pub mod logging;
pub mod main_shared;
pub mod render;
pub mod types;
