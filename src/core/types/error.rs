use thiserror::Error;

/// Boxed error returned by a [`crate::CiSource`] implementation.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while building or inspecting the waterfall.
#[derive(Debug, Error)]
pub enum WaterfallError {
    #[error("Revision count must not be negative, got {0}")]
    InvalidCount(i64),

    #[error("Unknown status '{status}' for task '{task}' of variant '{variant}' in commit {revision}")]
    UnknownStatus {
        status: String,
        revision: String,
        variant: String,
        task: String,
    },

    #[error("Cannot read a date from build id '{build_id}'{}", commit_suffix(.revision))]
    MalformedBuildId {
        build_id: String,
        revision: Option<String>,
    },

    #[error("Failed to fetch {what}: {source}")]
    Fetch {
        what: String,
        #[source]
        source: SourceError,
    },

    #[error("Need to have a default project in .evergreen.yml or waterfall.toml, or use -p <project>")]
    NoDefaultProject,
}

impl WaterfallError {
    /// Attach the commit that was being processed to a build id error.
    pub(crate) fn in_commit(self, commit: &str) -> Self {
        match self {
            WaterfallError::MalformedBuildId { build_id, .. } => {
                WaterfallError::MalformedBuildId {
                    build_id,
                    revision: Some(commit.to_string()),
                }
            }
            other => other,
        }
    }
}

fn commit_suffix(revision: &Option<String>) -> String {
    match revision {
        Some(revision) => format!(" in commit {revision}"),
        None => String::new(),
    }
}

pub type WaterfallResult<T> = Result<T, WaterfallError>;

/// Errors from the Evergreen REST client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid variant regex: {0}")]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Waterfall(#[from] WaterfallError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    Custom(String),
}

pub type AppResult<T> = Result<T, AppError>;
