use std::collections::HashMap;

use futures::{StreamExt, TryStreamExt, stream};
use log::debug;

use crate::CiSource;
use crate::types::{
    CommitPlan, FailedTask, FailureKind, FailureReport, TaskDetail, TestStatus, WaterfallError,
    WaterfallResult,
};

#[derive(Debug, Clone)]
pub struct InspectOptions {
    /// Attach log URLs to every report
    pub links: bool,
    /// Host serving raw task logs
    pub ui_server: String,
    /// Maximum number of detail requests in flight
    pub jobs: usize,
}

/// Fetch the detail of every failed task and classify why it failed.
///
/// Requests run concurrently, at most `options.jobs` at a time, but reports come back
/// in the order of `failed_tasks`. The first fetch error aborts the whole inspection.
pub async fn inspect<S: CiSource>(
    failed_tasks: &[FailedTask],
    source: &S,
    options: &InspectOptions,
) -> WaterfallResult<Vec<FailureReport>> {
    let details: Vec<TaskDetail> = stream::iter(failed_tasks)
        .map(|task| async move {
            debug!("Fetching detail for task {}", task.task_id);
            source
                .fetch_task_detail(&task.task_id)
                .await
                .map_err(|e| WaterfallError::Fetch {
                    what: task.describe(),
                    source: Box::new(e),
                })
        })
        .buffered(options.jobs.max(1))
        .try_collect()
        .await?;

    Ok(failed_tasks
        .iter()
        .zip(&details)
        .flat_map(|(task, detail)| classify(&task.task_id, detail, options))
        .collect())
}

/// Hand each report to the failed task it was classified from.
pub fn attach_reports(plans: &mut [CommitPlan], reports: Vec<FailureReport>) {
    let mut by_task: HashMap<String, Vec<FailureReport>> = HashMap::new();
    for report in reports {
        by_task.entry(report.task_id.clone()).or_default().push(report);
    }
    for task in plans.iter_mut().flat_map(|p| p.failed_tasks_mut()) {
        if let Some(reports) = by_task.remove(&task.task_id) {
            task.reports = reports;
        }
    }
}

/// Classify one task's failure. A timeout takes precedence over everything else, a
/// task without test results is a system error, and otherwise each failing test
/// yields its own report.
pub fn classify(task_id: &str, detail: &TaskDetail, options: &InspectOptions) -> Vec<FailureReport> {
    let task_report = |kind| FailureReport {
        kind,
        task_id: task_id.to_string(),
        name: detail.display_name.clone(),
        log_url: options
            .links
            .then(|| detail.task_log_url(&options.ui_server)),
    };

    if detail.timed_out {
        return vec![task_report(FailureKind::Timeout)];
    }
    if detail.test_results.is_empty() {
        return vec![task_report(FailureKind::SystemError)];
    }

    detail
        .test_results
        .iter()
        .filter(|(_, result)| result.status == TestStatus::Fail)
        .map(|(test_name, result)| FailureReport {
            kind: FailureKind::TestFailure,
            task_id: task_id.to_string(),
            name: test_name.clone(),
            log_url: if options.links {
                result.log_url.clone()
            } else {
                None
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StatusTally, TestResult, VariantRow};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn options(links: bool) -> InspectOptions {
        InspectOptions {
            links,
            ui_server: "https://evg.example.com".to_string(),
            jobs: 2,
        }
    }

    fn detail(timed_out: bool, tests: &[(&str, &str)]) -> TaskDetail {
        TaskDetail {
            display_name: "jsCore".to_string(),
            id: "task_b".to_string(),
            execution: 1,
            timed_out,
            test_results: tests
                .iter()
                .map(|(name, status)| {
                    (
                        name.to_string(),
                        TestResult {
                            status: TestStatus::from(*status),
                            log_url: Some(format!("https://logs.example.com/{name}")),
                        },
                    )
                })
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn timeout_takes_priority_over_test_results() {
        let reports = classify("task_b", &detail(true, &[("t1", "fail")]), &options(false));
        assert_eq!(
            reports,
            vec![FailureReport {
                kind: FailureKind::Timeout,
                task_id: "task_b".to_string(),
                name: "jsCore".to_string(),
                log_url: None,
            }]
        );
    }

    #[test]
    fn no_test_results_is_a_system_error() {
        let reports = classify("task_b", &detail(false, &[]), &options(true));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].kind, FailureKind::SystemError);
        assert_eq!(
            reports[0].log_url.as_deref(),
            Some("https://evg.example.com/task_log_raw/task_b/1?type=T&text=true")
        );
    }

    #[test]
    fn one_report_per_failing_test() {
        let d = detail(
            false,
            &[("t1", "fail"), ("t2", "pass"), ("t3", "fail"), ("t4", "skip")],
        );
        let reports = classify("task_b", &d, &options(false));
        let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["t1", "t3"]);
        assert!(reports.iter().all(|r| r.kind == FailureKind::TestFailure));
        assert!(reports.iter().all(|r| r.log_url.is_none()));
    }

    #[test]
    fn links_carry_test_log_urls() {
        let reports = classify("task_b", &detail(false, &[("t1", "fail")]), &options(true));
        assert_eq!(
            reports[0].log_url.as_deref(),
            Some("https://logs.example.com/t1")
        );
    }

    #[test]
    fn all_passing_tests_yield_nothing() {
        let reports = classify("task_b", &detail(false, &[("t1", "pass")]), &options(true));
        assert!(reports.is_empty());
    }

    #[test]
    fn reports_land_on_their_task() {
        let mut plans = vec![CommitPlan {
            author: "jane".to_string(),
            message_first_line: "fix".to_string(),
            revision: "r".to_string(),
            formatted_date: None,
            show_summary: false,
            commit_tally: StatusTally::zero(),
            variant_rows: vec![VariantRow {
                variant_name: "linux".to_string(),
                tally: StatusTally::zero(),
                failed_tasks: vec![
                    FailedTask::new("r", "linux", "a", "task_a"),
                    FailedTask::new("r", "linux", "b", "task_b"),
                ],
            }],
        }];
        let failing = detail(false, &[("t1", "fail"), ("t2", "fail")]);
        let mut reports = classify("task_b", &failing, &options(false));
        reports.extend(classify("task_a", &detail(true, &[]), &options(false)));

        attach_reports(&mut plans, reports);

        let tasks = &plans[0].variant_rows[0].failed_tasks;
        assert_eq!(tasks[0].reports.len(), 1);
        assert_eq!(tasks[0].reports[0].kind, FailureKind::Timeout);
        let names: Vec<&str> = tasks[1].reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["t1", "t2"]);
    }
}
