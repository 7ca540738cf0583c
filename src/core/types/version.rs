use std::collections::BTreeMap;

/// A commit under test, with one build per variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Version {
    pub revision: String,
    pub author: String,
    pub message: String,
    /// Build id of the lexically first variant, used to date the commit.
    /// `None` when the version has no builds.
    pub build_id_sample: Option<String>,
    pub builds: BTreeMap<String, Build>,
}

impl Version {
    pub fn new(
        revision: impl Into<String>,
        author: impl Into<String>,
        message: impl Into<String>,
        builds: BTreeMap<String, Build>,
    ) -> Self {
        let build_id_sample = builds.values().next().map(|b| b.build_id.clone());
        Self {
            revision: revision.into(),
            author: author.into(),
            message: message.into(),
            build_id_sample,
            builds,
        }
    }

    pub fn message_first_line(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// One variant's run of a commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Build {
    pub name: String,
    pub build_id: String,
    pub tasks: BTreeMap<String, Task>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Raw status string as reported by the server.
    pub status: String,
    pub task_id: String,
}

impl Task {
    pub fn new(status: impl Into<String>, task_id: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            task_id: task_id.into(),
        }
    }
}

/// Test outcome within a task's detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestStatus {
    Pass,
    Fail,
    /// Any other state the server reports (skip, silentfail, ...).
    Other(String),
}

impl From<&str> for TestStatus {
    fn from(value: &str) -> Self {
        match value {
            "pass" => TestStatus::Pass,
            "fail" => TestStatus::Fail,
            other => TestStatus::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub status: TestStatus,
    pub log_url: Option<String>,
}

/// Detail of a single task execution, fetched only for drill-down.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDetail {
    pub display_name: String,
    pub id: String,
    pub execution: u32,
    pub timed_out: bool,
    pub test_results: BTreeMap<String, TestResult>,
}

impl TaskDetail {
    /// Raw task log location on the UI server.
    pub fn task_log_url(&self, ui_server: &str) -> String {
        format!(
            "{}/task_log_raw/{}/{}?type=T&text=true",
            ui_server.trim_end_matches('/'),
            self.id,
            self.execution
        )
    }
}
