use std::io;
use std::str::FromStr;

use console::style;
use log::{Level, LevelFilter};

use crate::types::config::{colors_enabled, config};

/// Route `log` output through fern.
///
/// `info` records are the tool's regular output and go to stdout unadorned. Warnings
/// and errors go to stderr with a level prefix; debug and trace go to stderr too so
/// they never interleave with the waterfall itself.
pub fn init_logging() {
    let colors = colors_enabled();
    console::set_colors_enabled(colors);
    console::set_colors_enabled_stderr(colors);

    let level = LevelFilter::from_str(config().log().level()).unwrap_or(LevelFilter::Info);

    let result = fern::Dispatch::new()
        .level(level)
        // Keep dependency chatter (reqwest, hyper) out of the output
        .level_for("hyper", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn)
        .chain(
            fern::Dispatch::new()
                .filter(|meta| meta.level() == Level::Info)
                .format(|out, message, _record| out.finish(format_args!("{message}")))
                .chain(io::stdout()),
        )
        .chain(
            fern::Dispatch::new()
                .filter(|meta| meta.level() != Level::Info)
                .format(|out, message, record| {
                    out.finish(format_args!("{} {}", level_prefix(record.level()), message))
                })
                .chain(io::stderr()),
        )
        .apply();

    // A logger may already be installed (tests, embedding)
    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}

fn level_prefix(level: Level) -> String {
    let label = format!("[{}]", level.as_str().to_lowercase());
    match level {
        Level::Error => style(label).red().bold().for_stderr().to_string(),
        Level::Warn => style(label).yellow().for_stderr().to_string(),
        Level::Info => label,
        Level::Debug | Level::Trace => style(label).dim().for_stderr().to_string(),
    }
}
