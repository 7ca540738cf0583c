use std::future::Future;

use crate::types::{TaskDetail, Version};

/// Read access to a CI server's build history.
///
/// The waterfall engine only needs to know whether a call succeeded, so the error
/// type is left to the implementation.
pub trait CiSource: Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Recent versions of a project, most recent first.
    fn fetch_version_history(
        &self,
        project: &str,
    ) -> impl Future<Output = Result<Vec<Version>, Self::Error>> + Send;

    /// Execution detail of a single task.
    fn fetch_task_detail(
        &self,
        task_id: &str,
    ) -> impl Future<Output = Result<TaskDetail, Self::Error>> + Send;
}
