use std::process::ExitCode;

use console::style;
use waterfall::run_main;

#[tokio::main]
async fn main() -> ExitCode {
    match run_main().await {
        // Reported failures are still a successful run
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", style("[error]").red().bold().for_stderr());
            ExitCode::FAILURE
        }
    }
}
