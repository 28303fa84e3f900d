//! Shortcut REST API (v3) client.
//!
//! Workflows only see the [`ShortcutApi`] trait. [`HttpApi`] is the blocking
//! reqwest implementation; a [`Connector`] builds one from a stored token so
//! the session can connect lazily once preflight has obtained a token.

use crate::error::{Result, ShortcutError};
use crate::types::{
    CreateStory, CurrentMember, Member, Project, Story, StorySearchResults, Workflow,
};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

pub const SEARCH_PAGE_SIZE: u32 = 25;
const TOKEN_HEADER: &str = "Shortcut-Token";

pub trait ShortcutApi {
    fn search_stories(&self, query: &str, page_size: u32) -> Result<Vec<Story>>;
    fn get_story(&self, id: u64) -> Result<Story>;
    fn create_story(&self, story: &CreateStory) -> Result<Story>;
    fn list_members(&self) -> Result<Vec<Member>>;
    fn list_projects(&self) -> Result<Vec<Project>>;
    fn list_workflows(&self) -> Result<Vec<Workflow>>;
    fn current_member(&self) -> Result<CurrentMember>;
}

/// Builds an authenticated API handle from a token.
pub trait Connector {
    fn connect(&self, token: &str) -> Result<Box<dyn ShortcutApi>>;
}

// ---------------------------------------------------------------------------
// HttpApi
// ---------------------------------------------------------------------------

pub struct HttpApi {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("shortcut/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!(method = "GET", path, "api request");
        self.send(self.client.get(self.url(path)))
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.header(TOKEN_HEADER, &self.token).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "api request failed");
            return Err(ShortcutError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json()?)
    }
}

impl ShortcutApi for HttpApi {
    fn search_stories(&self, query: &str, page_size: u32) -> Result<Vec<Story>> {
        tracing::debug!(query, page_size, "searching stories");
        let request = self
            .client
            .get(self.url("search/stories"))
            .query(&[("query", query.to_string()), ("page_size", page_size.to_string())]);
        let results: StorySearchResults = self.send(request)?;
        Ok(results.data)
    }

    fn get_story(&self, id: u64) -> Result<Story> {
        match self.get(&format!("stories/{id}")) {
            Err(ShortcutError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(ShortcutError::StoryNotFound(id))
            }
            other => other,
        }
    }

    fn create_story(&self, story: &CreateStory) -> Result<Story> {
        tracing::debug!(method = "POST", name = %story.name, "creating story");
        self.send(self.client.post(self.url("stories")).json(story))
    }

    fn list_members(&self) -> Result<Vec<Member>> {
        self.get("members")
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        self.get("projects")
    }

    fn list_workflows(&self) -> Result<Vec<Workflow>> {
        self.get("workflows")
    }

    fn current_member(&self) -> Result<CurrentMember> {
        self.get("member")
    }
}

// ---------------------------------------------------------------------------
// HttpConnector
// ---------------------------------------------------------------------------

pub struct HttpConnector {
    base_url: String,
}

impl HttpConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Connector for HttpConnector {
    fn connect(&self, token: &str) -> Result<Box<dyn ShortcutApi>> {
        Ok(Box::new(HttpApi::new(self.base_url.clone(), token)?))
    }
}
