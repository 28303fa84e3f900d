use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// StoryType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryType {
    Feature,
    Bug,
    Chore,
}

impl StoryType {
    pub fn all() -> &'static [StoryType] {
        &[StoryType::Feature, StoryType::Bug, StoryType::Chore]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StoryType::Feature => "feature",
            StoryType::Bug => "bug",
            StoryType::Chore => "chore",
        }
    }
}

impl fmt::Display for StoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feature" => Ok(StoryType::Feature),
            "bug" => Ok(StoryType::Bug),
            "chore" => Ok(StoryType::Chore),
            other => Err(format!("unknown story type: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Story
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: u64,
    pub name: String,
    pub story_type: StoryType,
    #[serde(default)]
    pub estimate: Option<u32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner_ids: Vec<String>,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub workflow_state_id: Option<u64>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields sent when creating a story.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateStory {
    pub name: String,
    pub story_type: StoryType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_state_id: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub owner_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<u32>,
}

/// One page of `GET /search/stories`.
#[derive(Debug, Clone, Deserialize)]
pub struct StorySearchResults {
    #[serde(default)]
    pub data: Vec<Story>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    pub mention_name: String,
    #[serde(default)]
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub disabled: bool,
    pub profile: Profile,
}

/// The member owning the API token (`GET /member`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentMember {
    pub id: String,
    pub mention_name: String,
    #[serde(default)]
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Projects and workflows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub states: Vec<WorkflowState>,
}
