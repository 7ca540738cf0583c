use regex::Regex;
use serde::Serialize;

use crate::types::StatusTally;

/// Flags controlling which rows of the waterfall are shown.
#[derive(Debug, Clone, Default)]
pub struct DisplayOptions {
    pub all_variants: bool,
    pub summary: bool,
    pub details: bool,
    pub links: bool,
    /// Only consider variants whose name matches. Ignored with `all_variants`.
    pub variant_filter: Option<Regex>,
}

/// Everything needed to render one commit of the waterfall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitPlan {
    pub author: String,
    pub message_first_line: String,
    pub revision: String,
    pub formatted_date: Option<String>,
    pub show_summary: bool,
    pub commit_tally: StatusTally,
    pub variant_rows: Vec<VariantRow>,
}

impl CommitPlan {
    pub fn has_visible_content(&self) -> bool {
        self.show_summary || !self.variant_rows.is_empty()
    }

    pub fn failed_tasks(&self) -> impl Iterator<Item = &FailedTask> {
        self.variant_rows.iter().flat_map(|row| row.failed_tasks.iter())
    }

    pub fn failed_tasks_mut(&mut self) -> impl Iterator<Item = &mut FailedTask> {
        self.variant_rows
            .iter_mut()
            .flat_map(|row| row.failed_tasks.iter_mut())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantRow {
    pub variant_name: String,
    pub tally: StatusTally,
    /// Failed tasks selected for drill-down; empty unless details were requested.
    pub failed_tasks: Vec<FailedTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTask {
    pub revision: String,
    pub variant: String,
    pub name: String,
    pub task_id: String,
    /// Filled in by the drill-down.
    pub reports: Vec<FailureReport>,
}

impl FailedTask {
    pub fn new(
        revision: impl Into<String>,
        variant: impl Into<String>,
        name: impl Into<String>,
        task_id: impl Into<String>,
    ) -> Self {
        Self {
            revision: revision.into(),
            variant: variant.into(),
            name: name.into(),
            task_id: task_id.into(),
            reports: Vec::new(),
        }
    }

    /// Commit, variant and task, for error messages.
    pub fn describe(&self) -> String {
        format!(
            "task '{}' ({}) of variant '{}' in commit {}",
            self.name, self.task_id, self.variant, self.revision
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    SystemError,
    TestFailure,
}

/// Classified cause of a failed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub kind: FailureKind,
    pub task_id: String,
    /// Task display name for timeouts and system errors, test name otherwise.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_url: Option<String>,
}
