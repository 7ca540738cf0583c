use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use regex::Regex;
use serde::Serialize;

use crate::CiSource;
use crate::core::cli::WaterfallArgs;
use crate::core::engine::aggregate::aggregate;
use crate::core::engine::inspect::{InspectOptions, attach_reports, inspect};
use crate::core::render::Renderer;
use crate::types::config::{colors_enabled, config};
use crate::types::{
    AppResult, CommitPlan, DisplayOptions, FailedTask, FailureReport, WaterfallError,
    WaterfallResult,
};

/// Waterfall options after merging CLI flags with configuration.
#[derive(Debug, Clone)]
pub struct WaterfallRequest {
    pub project: String,
    pub count: i64,
    pub display: DisplayOptions,
    pub inspect: InspectOptions,
}

impl WaterfallRequest {
    pub fn resolve(args: &WaterfallArgs) -> AppResult<Self> {
        let cfg = config();
        let project = cfg.resolve_project(args.project.as_deref())?;
        let variant_filter = args.regex.as_deref().map(Regex::new).transpose()?;

        Ok(Self {
            project,
            count: args.count.unwrap_or_else(|| cfg.count()),
            display: DisplayOptions {
                all_variants: args.all_variants,
                summary: args.summary,
                details: args.details,
                links: args.links,
                variant_filter,
            },
            inspect: InspectOptions {
                links: args.links,
                ui_server: cfg.server().ui().to_string(),
                jobs: args
                    .jobs
                    .filter(|j| *j > 0)
                    .unwrap_or_else(|| cfg.drill_down().jobs()),
            },
        })
    }
}

/// Plans for one project, with drill-down reports attached to their failed tasks.
#[derive(Debug, Serialize)]
pub struct WaterfallReport {
    pub project: String,
    pub commits: Vec<CommitPlan>,
}

impl WaterfallReport {
    /// Every attached report, in commit, variant and task order.
    pub fn failures(&self) -> impl Iterator<Item = &FailureReport> {
        self.commits
            .iter()
            .flat_map(|c| c.failed_tasks())
            .flat_map(|t| t.reports.iter())
    }
}

/// Fetch, aggregate and inspect without printing anything.
pub async fn build_report<S: CiSource>(
    source: &S,
    request: &WaterfallRequest,
) -> WaterfallResult<WaterfallReport> {
    let versions = with_spinner(
        format!("Fetching versions of {}", request.project),
        source.fetch_version_history(&request.project),
    )
    .await
    .map_err(|e| WaterfallError::Fetch {
        what: format!("version history of project '{}'", request.project),
        source: Box::new(e),
    })?;
    debug!("Fetched {} version(s)", versions.len());

    let mut commits = aggregate(&versions, request.count, &request.display)?;

    if request.display.details {
        let failed: Vec<FailedTask> = commits
            .iter()
            .flat_map(|c| c.failed_tasks())
            .cloned()
            .collect();
        debug!("Inspecting {} failed task(s)", failed.len());
        let reports = inspect(&failed, source, &request.inspect).await?;
        attach_reports(&mut commits, reports);
    }

    Ok(WaterfallReport {
        project: request.project.clone(),
        commits,
    })
}

pub async fn execute_waterfall<S: CiSource>(
    args: WaterfallArgs,
    source: &S,
) -> AppResult<()> {
    let request = WaterfallRequest::resolve(&args)?;
    let is_json_format = args.format == "json";

    if !is_json_format {
        info!("Gathering data for project: {}", request.project);
    }
    let report = build_report(source, &request).await?;

    if is_json_format {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let renderer = Renderer::new(colors_enabled());
        for line in renderer.render(&report.commits) {
            info!("{line}");
        }
    }

    Ok(())
}

/// Show a spinner on stderr while `fut` runs, when stderr is a terminal.
async fn with_spinner<F: Future>(message: String, fut: F) -> F::Output {
    if !std::io::stderr().is_terminal() {
        return fut.await;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(spinner) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    let output = fut.await;
    pb.finish_and_clear();
    output
}
