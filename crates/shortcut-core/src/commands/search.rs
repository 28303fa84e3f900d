use super::preflight::{preflight, Preflight};
use super::{story, Outcome, NO_STORIES_FOUND_MESSAGE};
use crate::api::SEARCH_PAGE_SIZE;
use crate::error::Result;
use crate::pick::{to_pick_items, PickItem};
use crate::session::Session;
use crate::settings::SettingKey;
use crate::types::{Story, WorkflowState};
use crate::ui::{ask, choose, with_progress, Input};

/// Search stories by free text, then view one or cut a branch for it.
///
/// `query` skips the prompt when given.
pub fn search(session: &mut Session<'_>, query: Option<&str>) -> Result<Outcome> {
    if let Preflight::Abort(_) = preflight(session) {
        return Ok(Outcome::Aborted);
    }

    let query = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => q.to_string(),
        None => {
            let input = Input {
                prompt: "Please enter a search query",
                ..Default::default()
            };
            match ask(&mut *session.ui, &input) {
                Some(q) => q,
                None => return Ok(Outcome::Cancelled),
            }
        }
    };

    let stories = run_search(session, &query)?;
    query_stories(session, stories)
}

/// Stories owned by the current user in a chosen workflow state.
pub fn get_stories(session: &mut Session<'_>) -> Result<Outcome> {
    if let Preflight::Abort(_) = preflight(session) {
        return Ok(Outcome::Aborted);
    }

    let states = workflow_states(session)?;
    let Some(state) = choose(&mut *session.ui, "Select a workflow state", to_pick_items(&states))
    else {
        return Ok(Outcome::Cancelled);
    };

    let username = session
        .settings
        .get(SettingKey::Username)
        .unwrap_or_default()
        .to_string();
    let query = owner_state_query(&username, &state.payload.name);

    let stories = run_search(session, &query)?;
    query_stories(session, stories)
}

pub(crate) fn owner_state_query(username: &str, state: &str) -> String {
    format!("owner:{username} state:\"{}\"", state.to_lowercase())
}

fn run_search(session: &mut Session<'_>, query: &str) -> Result<Vec<Story>> {
    let api = session.api()?;
    with_progress(&mut *session.ui, "Searching stories", || {
        api.search_stories(query, SEARCH_PAGE_SIZE)
    })
}

/// Let the user pick one of `stories` and act on it.
pub(crate) fn query_stories(session: &mut Session<'_>, stories: Vec<Story>) -> Result<Outcome> {
    let items = to_pick_items(&stories);
    if items.is_empty() {
        session.ui.info(NO_STORIES_FOUND_MESSAGE);
        return Ok(Outcome::NothingFound);
    }

    let Some(PickItem { payload, .. }) = choose(&mut *session.ui, "Select a story", items) else {
        return Ok(Outcome::Cancelled);
    };

    story::act_on_story(session, payload.id)
}

/// States of every workflow, first occurrence of each name kept.
///
/// The workflow list comes from the settings cache when it is fresh and is
/// refetched otherwise.
pub(crate) fn workflow_states(session: &mut Session<'_>) -> Result<Vec<WorkflowState>> {
    let workflows = match session.settings.take_fresh_workflows()? {
        Some(w) => w,
        None => {
            let api = session.api()?;
            let fetched =
                with_progress(&mut *session.ui, "Loading workflows", || api.list_workflows())?;
            session.settings.store_workflows(fetched.clone())?;
            fetched
        }
    };

    let mut states: Vec<WorkflowState> = Vec::new();
    for state in workflows.into_iter().flat_map(|w| w.states) {
        if !states.iter().any(|s| s.name == state.name) {
            states.push(state);
        }
    }
    Ok(states)
}
