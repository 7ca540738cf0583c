use log::debug;

use crate::core::engine::build_id::parse_build_date;
use crate::core::engine::policy::{should_show_commit_summary, should_show_variant};
use crate::types::{
    Build, CommitPlan, DisplayOptions, FailedTask, StatusTally, TaskStatus, VariantRow, Version,
    WaterfallError, WaterfallResult,
};

/// Turn fetched version history into a rendering plan, one entry per commit.
///
/// `count` limits the walk to the first `count` versions in the order given; zero or a
/// count beyond the available history means every version. Versions are not re-sorted.
pub fn aggregate(
    versions: &[Version],
    count: i64,
    options: &DisplayOptions,
) -> WaterfallResult<Vec<CommitPlan>> {
    if count < 0 {
        return Err(WaterfallError::InvalidCount(count));
    }
    let count = match usize::try_from(count) {
        Ok(0) => versions.len(),
        Ok(n) => n.min(versions.len()),
        Err(_) => versions.len(),
    };

    versions[..count]
        .iter()
        .map(|version| plan_commit(version, options))
        .collect()
}

fn plan_commit(version: &Version, options: &DisplayOptions) -> WaterfallResult<CommitPlan> {
    let formatted_date = version
        .build_id_sample
        .as_deref()
        .map(parse_build_date)
        .transpose()
        .map_err(|e| e.in_commit(&version.revision))?;

    let mut commit_tally = StatusTally::zero();
    let mut variant_rows = Vec::new();

    // BTreeMap iteration keeps rows in lexical variant order
    for (variant, build) in &version.builds {
        let (tally, failed) = tally_build(&version.revision, variant, build)?;
        commit_tally = commit_tally.merge(tally);

        if should_show_variant(variant, &tally, options) {
            variant_rows.push(VariantRow {
                variant_name: build.name.clone(),
                tally,
                failed_tasks: if options.details { failed } else { Vec::new() },
            });
        }
    }

    debug!(
        "Commit {}: {} variant(s), {} shown, {} task(s)",
        version.revision,
        version.builds.len(),
        variant_rows.len(),
        commit_tally.total()
    );

    Ok(CommitPlan {
        author: version.author.clone(),
        message_first_line: version.message_first_line().to_string(),
        revision: version.revision.clone(),
        formatted_date,
        show_summary: should_show_commit_summary(options),
        commit_tally,
        variant_rows,
    })
}

/// Tally one variant's tasks and collect the failed ones.
fn tally_build(
    revision: &str,
    variant: &str,
    build: &Build,
) -> WaterfallResult<(StatusTally, Vec<FailedTask>)> {
    let mut tally = StatusTally::zero();
    let mut failed = Vec::new();

    for (task_name, task) in &build.tasks {
        let status = tally
            .record(&task.status)
            .map_err(|e| WaterfallError::UnknownStatus {
                status: e.0,
                revision: revision.to_string(),
                variant: variant.to_string(),
                task: task_name.clone(),
            })?;
        if status == TaskStatus::Failed {
            failed.push(FailedTask::new(
                revision,
                variant,
                task_name.as_str(),
                task.task_id.as_str(),
            ));
        }
    }

    Ok((tally, failed))
}
