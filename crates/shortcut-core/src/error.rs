use crate::template::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShortcutError {
    #[error("no API token set: run 'shortcut token'")]
    NoToken,

    #[error("unknown setting '{0}': expected one of token, username, branchFormat, workspaceSlug, defaultBranchName")]
    UnknownSetting(String),

    #[error("story not found: {0}")]
    StoryNotFound(u64),

    #[error("API request failed with HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid branch template: {0}")]
    Template(#[from] TemplateError),

    #[error("cannot determine repository path from remote '{0}'")]
    UnknownRemote(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShortcutError>;
