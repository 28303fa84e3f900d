//! Interactive command workflows.
//!
//! Every workflow is a straight line of prompts, API calls and git steps that
//! stops at the first missing input. Dismissed prompts end the workflow
//! silently; empty results end it with a message.

pub mod preflight;
pub mod search;
pub mod setup;
pub mod story;
pub mod vcs;


pub use preflight::{preflight, Preflight};
pub use search::{get_stories, search};
pub use setup::{set_base_branch, set_token};
pub use story::{create_story, fetch_story, view_story};
pub use vcs::{create_branch, create_commit, create_pull_request, redo_commit};

use crate::paths;
use crate::session::Session;
use crate::settings::SettingKey;
use crate::shell::Report;
use crate::ui::Ui;

pub const NO_STORIES_FOUND_MESSAGE: &str = "No stories found";
pub const NO_ASSOCIATED_STORY_MESSAGE: &str = "No story is associated with the current branch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// The user dismissed a prompt.
    Cancelled,
    /// A search or lookup came back empty.
    NothingFound,
    /// A precondition was not met.
    Aborted,
    /// A git step failed.
    Failed,
}

/// Browser URL for a story, preferring the configured workspace.
pub fn story_link(session: &Session<'_>, id: u64, app_url: Option<&str>) -> String {
    match (session.settings.get(SettingKey::WorkspaceSlug), app_url) {
        (None, Some(url)) if !url.is_empty() => url.to_string(),
        (slug, _) => paths::story_url(slug, id),
    }
}

pub(crate) fn open_or_print(ui: &mut dyn Ui, url: &str) {
    if !ui.open_url(url) {
        ui.info(url);
    }
}

pub(crate) fn report_failure(ui: &mut dyn Ui, report: &Report) {
    if let Some(failed) = report.first_failure() {
        ui.error(&format!("`{}` failed: {}", failed.step, failed.output));
    }
}
