use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// All relative paths will be interpreted relative to this directory.
    #[arg(long, global = true)]
    pub cwd: Option<String>,

    /// Logging level (overrides env/config). One of: trace, debug, info, warn, error
    #[arg(long = "log.level", global = true)]
    pub log_level: Option<String>,

    /// Logging color control: "on" to force colors, "off" to disable; omit for auto
    #[arg(long = "log.color", global = true)]
    pub log_color: Option<String>,

    /// Evergreen server to query. Replaces api_server_host from .evergreen.yml.
    #[arg(long = "api-server", global = true)]
    pub api_server: Option<String>,

    #[command(flatten)]
    pub waterfall: WaterfallArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the effective configuration
    Config(PrintConfigArgs),
}

/// Arguments for printing the waterfall (the default command)
#[derive(Parser, Debug, Default)]
pub struct WaterfallArgs {
    /// Show all build variants
    #[arg(short = 'a', long = "all-variants")]
    pub all_variants: bool,

    /// Show failed tests
    #[arg(short = 'd', long)]
    pub details: bool,

    /// Show log links
    #[arg(short = 'l', long)]
    pub links: bool,

    /// How many revisions to review (0 for all).
    /// Replaces config count if provided.
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub count: Option<i64>,

    /// Project name, default is from .evergreen.yml or waterfall.toml
    #[arg(short = 'p', long)]
    pub project: Option<String>,

    /// Build variant regex. Overridden by -a
    #[arg(short = 'r', long)]
    pub regex: Option<String>,

    /// Summarize all variants for the commit
    #[arg(short = 's', long)]
    pub summary: bool,

    /// Maximum number of concurrent task detail requests.
    /// Replaces config [drill_down].jobs if provided.
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}

/// Arguments for the config subcommand
#[derive(Parser, Debug)]
pub struct PrintConfigArgs {
    /// Output format: "table" (default) or "json"
    #[arg(long, default_value = "table")]
    pub format: String,
}
