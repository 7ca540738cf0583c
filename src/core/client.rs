//! HTTP client for the Evergreen REST v1 API

use std::collections::BTreeMap;
use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::CiSource;
use crate::types::config::ServerConfig;
use crate::types::{
    Build, ClientError, ClientResult, Task, TaskDetail, TestResult, TestStatus, Version,
};

const REST_PREFIX: &str = "/rest/v1";

/// Read-only client bound to one Evergreen server and its credentials.
#[derive(Debug, Clone)]
pub struct EvergreenClient {
    client: Client,
    api_prefix: String,
}

impl EvergreenClient {
    pub fn new(server: &ServerConfig) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some((user, key)) = server.credentials() {
            headers.insert("auth-username", HeaderValue::from_str(user)?);
            let mut key = HeaderValue::from_str(key)?;
            key.set_sensitive(true);
            headers.insert("api-key", key);
        } else {
            debug!("No Evergreen credentials configured; sending anonymous requests");
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(server.timeout()))
            .build()?;

        Ok(Self {
            client,
            api_prefix: format!("{}{}", server.api().trim_end_matches('/'), REST_PREFIX),
        })
    }

    pub async fn versions(&self, project: &str) -> ClientResult<Vec<Version>> {
        let body: VersionsResponse = self
            .get(&format!("/projects/{project}/versions/"))
            .await?;
        Ok(body.versions.into_iter().map(Version::from).collect())
    }

    pub async fn task(&self, task_id: &str) -> ClientResult<TaskDetail> {
        let body: TaskResponse = self.get(&format!("/tasks/{task_id}")).await?;
        Ok(body.into())
    }

    // ========== Internal HTTP helpers ==========

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = format!("{}{}", self.api_prefix, path);
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        self.handle_response(response, &url).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        url: &str,
    ) -> ClientResult<T> {
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else if status == StatusCode::NOT_FOUND {
            Err(ClientError::NotFound(url.to_string()))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

impl CiSource for EvergreenClient {
    type Error = ClientError;

    async fn fetch_version_history(&self, project: &str) -> ClientResult<Vec<Version>> {
        self.versions(project).await
    }

    async fn fetch_task_detail(&self, task_id: &str) -> ClientResult<TaskDetail> {
        self.task(task_id).await
    }
}

// ========== Wire format ==========

#[derive(Debug, Deserialize)]
struct VersionsResponse {
    #[serde(default)]
    versions: Vec<VersionBody>,
}

#[derive(Debug, Deserialize)]
struct VersionBody {
    revision: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    builds: BTreeMap<String, BuildBody>,
}

#[derive(Debug, Deserialize)]
struct BuildBody {
    build_id: String,
    name: String,
    #[serde(default)]
    tasks: BTreeMap<String, TaskBody>,
}

#[derive(Debug, Deserialize)]
struct TaskBody {
    task_id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct TaskResponse {
    id: String,
    display_name: String,
    #[serde(default)]
    execution: u32,
    #[serde(default)]
    status_details: StatusDetails,
    #[serde(default)]
    test_results: Option<BTreeMap<String, TestBody>>,
}

#[derive(Debug, Default, Deserialize)]
struct StatusDetails {
    #[serde(default)]
    timed_out: bool,
}

#[derive(Debug, Deserialize)]
struct TestBody {
    status: String,
    #[serde(default)]
    logs: Option<TestLogs>,
}

#[derive(Debug, Deserialize)]
struct TestLogs {
    #[serde(default)]
    url: Option<String>,
}

impl From<VersionBody> for Version {
    fn from(body: VersionBody) -> Self {
        let builds = body
            .builds
            .into_iter()
            .map(|(variant, build)| {
                let tasks = build
                    .tasks
                    .into_iter()
                    .map(|(name, task)| (name, Task::new(task.status, task.task_id)))
                    .collect();
                (
                    variant,
                    Build {
                        name: build.name,
                        build_id: build.build_id,
                        tasks,
                    },
                )
            })
            .collect();
        Version::new(body.revision, body.author, body.message, builds)
    }
}

impl From<TaskResponse> for TaskDetail {
    fn from(body: TaskResponse) -> Self {
        TaskDetail {
            display_name: body.display_name,
            id: body.id,
            execution: body.execution,
            timed_out: body.status_details.timed_out,
            test_results: body
                .test_results
                .unwrap_or_default()
                .into_iter()
                .map(|(name, test)| {
                    (
                        name,
                        TestResult {
                            status: TestStatus::from(test.status.as_str()),
                            log_url: test.logs.and_then(|l| l.url).filter(|u| !u.is_empty()),
                        },
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VERSIONS_JSON: &str = r#"{
        "project": "mongodb-mongo-master",
        "versions": [
            {
                "version_id": "mongodb_mongo_master_4a5a1e0e",
                "author": "Jane Doe",
                "revision": "4a5a1e0e5c9b",
                "message": "SERVER-22000 Fix the thing\n\nDetails",
                "builds": {
                    "linux-64": {
                        "build_id": "mongodb_mongo_master_linux_64_4a5a1e0e_16_03_15_14_05_09",
                        "name": "Linux 64",
                        "tasks": {
                            "compile": {"task_id": "t_compile", "status": "success", "time_taken": 10},
                            "jsCore": {"task_id": "t_jscore", "status": "failed", "time_taken": 20}
                        }
                    }
                }
            }
        ]
    }"#;

    const TASK_JSON: &str = r#"{
        "id": "t_jscore",
        "display_name": "jsCore",
        "execution": 1,
        "status": "failed",
        "status_details": {"timed_out": false, "timeout_stage": ""},
        "test_results": {
            "jstests/core/a.js": {"status": "fail", "time_taken": 1, "logs": {"url": "https://logs/a", "line_num": 4}},
            "jstests/core/b.js": {"status": "pass", "time_taken": 1, "logs": {"url": "", "line_num": 0}}
        }
    }"#;

    #[test]
    fn decodes_versions() {
        let body: VersionsResponse = serde_json::from_str(VERSIONS_JSON).unwrap();
        let versions: Vec<Version> = body.versions.into_iter().map(Version::from).collect();
        assert_eq!(versions.len(), 1);
        let v = &versions[0];
        assert_eq!(v.revision, "4a5a1e0e5c9b");
        assert_eq!(v.message_first_line(), "SERVER-22000 Fix the thing");
        assert_eq!(
            v.build_id_sample.as_deref(),
            Some("mongodb_mongo_master_linux_64_4a5a1e0e_16_03_15_14_05_09")
        );
        let build = &v.builds["linux-64"];
        assert_eq!(build.name, "Linux 64");
        assert_eq!(build.tasks["jsCore"], Task::new("failed", "t_jscore"));
    }

    #[test]
    fn decodes_task_detail() {
        let body: TaskResponse = serde_json::from_str(TASK_JSON).unwrap();
        let detail = TaskDetail::from(body);
        assert_eq!(detail.display_name, "jsCore");
        assert_eq!(detail.execution, 1);
        assert!(!detail.timed_out);
        assert_eq!(
            detail.test_results["jstests/core/a.js"],
            TestResult {
                status: TestStatus::Fail,
                log_url: Some("https://logs/a".to_string()),
            }
        );
        assert_eq!(detail.test_results["jstests/core/b.js"].log_url, None);
    }

    #[test]
    fn null_test_results_decode_as_empty() {
        let body: TaskResponse = serde_json::from_str(
            r#"{"id": "t", "display_name": "compile", "execution": 0,
                "status_details": {"timed_out": true}, "test_results": null}"#,
        )
        .unwrap();
        let detail = TaskDetail::from(body);
        assert!(detail.timed_out);
        assert!(detail.test_results.is_empty());
    }

    #[test]
    fn api_prefix_includes_rest_path() {
        let server = ServerConfig {
            api: Some("https://evergreen.example.com/".to_string()),
            ..Default::default()
        };
        let client = EvergreenClient::new(&server).unwrap();
        assert_eq!(client.api_prefix, "https://evergreen.example.com/rest/v1");
    }
}
