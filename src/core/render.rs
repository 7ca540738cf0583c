use console::style;

use crate::types::{CommitPlan, FailureKind, FailureReport, StatusTally, VariantRow};

/// Formats commit plans as terminal lines.
pub struct Renderer {
    colors: bool,
}

impl Renderer {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Lines for every commit with visible content, with each failed task's reports
    /// under its variant.
    pub fn render(&self, plans: &[CommitPlan]) -> Vec<String> {
        let mut lines = Vec::new();
        for plan in plans.iter().filter(|p| p.has_visible_content()) {
            lines.extend(self.commit_header(plan));
            for row in &plan.variant_rows {
                lines.extend(self.variant_row(row));
            }
            if plan.show_summary {
                lines.push(String::new());
                lines.push(self.tally(&plan.commit_tally));
            }
        }
        lines
    }

    fn commit_header(&self, plan: &CommitPlan) -> Vec<String> {
        let date = plan.formatted_date.as_deref().unwrap_or("(no builds)");
        vec![
            String::new(),
            format!(
                "{} {}",
                style(&plan.author).force_styling(self.colors).white().bold(),
                style(&plan.message_first_line)
                    .force_styling(self.colors)
                    .blue()
                    .bright()
                    .bold()
            ),
            format!(
                "{} {}",
                style(date).force_styling(self.colors).yellow().bright().bold(),
                plan.revision
            ),
        ]
    }

    fn variant_row(&self, row: &VariantRow) -> Vec<String> {
        let mut lines = vec![
            String::new(),
            style(&row.variant_name)
                .force_styling(self.colors)
                .yellow()
                .to_string(),
            self.tally(&row.tally),
        ];
        for task in &row.failed_tasks {
            for report in &task.reports {
                lines.extend(self.report(report));
            }
        }
        lines
    }

    /// Success, failed, dispatched and undispatched counters as colored boxes.
    pub fn tally(&self, tally: &StatusTally) -> String {
        let cell = |n: u32| format!("  {n}  ");
        [
            style(cell(tally.success))
                .force_styling(self.colors)
                .on_green()
                .white()
                .bold(),
            style(cell(tally.failed))
                .force_styling(self.colors)
                .on_red()
                .white()
                .bold(),
            style(cell(tally.dispatched))
                .force_styling(self.colors)
                .on_yellow()
                .black(),
            style(cell(tally.undispatched))
                .force_styling(self.colors)
                .on_white()
                .black(),
        ]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ")
    }

    fn report(&self, report: &FailureReport) -> Vec<String> {
        let name = style(&report.name).force_styling(self.colors);
        let (headline, link_label) = match report.kind {
            FailureKind::Timeout => (format!("{} timed out.", name.red()), "Task Logs:"),
            FailureKind::SystemError => (format!("{} system error.", name.magenta()), "Task Logs:"),
            FailureKind::TestFailure => (format!("{} failed.", name.red()), "Test log:"),
        };
        let mut lines = vec![headline];
        if let Some(url) = &report.log_url {
            lines.push(format!("{link_label} {url}"));
        }
        lines
    }
}
