use super::preflight::{preflight, Preflight};
use super::search::workflow_states;
use super::{open_or_print, story_link, vcs, Outcome};
use crate::error::{Result, ShortcutError};
use crate::pick::{order_members, to_pick_items, PickItem};
use crate::session::Session;
use crate::settings::SettingKey;
use crate::types::{CreateStory, Story, StoryType};
use crate::ui::{ask, choose, with_progress, Input};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    OpenInBrowser,
    CreateBranch,
}

fn actions() -> Vec<PickItem<Action>> {
    vec![
        PickItem::new(
            "View Story",
            "Open the story on shortcut.com",
            Action::OpenInBrowser,
        ),
        PickItem::new(
            "Create Branch",
            "Create a new branch based on the story name",
            Action::CreateBranch,
        ),
    ]
}

/// Ask what to do with story `id`, then fetch it and do it.
pub(crate) fn act_on_story(session: &mut Session<'_>, id: u64) -> Result<Outcome> {
    let Some(action) = choose(&mut *session.ui, "What do you want to do?", actions()) else {
        return Ok(Outcome::Cancelled);
    };

    let story = match fetch_story(session, id) {
        Ok(story) => story,
        Err(ShortcutError::StoryNotFound(_)) => {
            session.ui.warn(&format!("Story {id} was not found"));
            return Ok(Outcome::NothingFound);
        }
        Err(e) => return Err(e),
    };

    match action.payload {
        Action::OpenInBrowser => {
            open_story(session, &story);
            Ok(Outcome::Done)
        }
        Action::CreateBranch => vcs::branch_for_story(session, &story),
    }
}

pub fn fetch_story(session: &mut Session<'_>, id: u64) -> Result<Story> {
    let api = session.api()?;
    with_progress(&mut *session.ui, "Loading story", || api.get_story(id))
}

fn open_story(session: &mut Session<'_>, story: &Story) {
    let url = story_link(session, story.id, story.app_url.as_deref());
    open_or_print(&mut *session.ui, &url);
}

/// Open story `id` in the browser without touching the API.
pub fn view_story(session: &mut Session<'_>, id: u64) -> Outcome {
    let url = story_link(session, id, None);
    open_or_print(&mut *session.ui, &url);
    Outcome::Done
}

/// Collect the fields of a new story through prompts and create it.
pub fn create_story(session: &mut Session<'_>) -> Result<Outcome> {
    if let Preflight::Abort(_) = preflight(session) {
        return Ok(Outcome::Aborted);
    }

    let name_input = Input {
        prompt: "Story name",
        ..Default::default()
    };
    let Some(name) = ask(&mut *session.ui, &name_input) else {
        return Ok(Outcome::Cancelled);
    };

    let types = to_pick_items(StoryType::all());
    let Some(story_type) = choose(&mut *session.ui, "Story type", types) else {
        return Ok(Outcome::Cancelled);
    };

    let api = session.api()?;

    let projects = with_progress(&mut *session.ui, "Loading projects", || api.list_projects())?;
    let projects = to_pick_items(&projects);
    let project_id = if projects.is_empty() {
        None
    } else {
        match choose(&mut *session.ui, "Project", projects) {
            Some(p) => Some(p.payload.id),
            None => return Ok(Outcome::Cancelled),
        }
    };

    let states = workflow_states(session)?;
    let Some(state) = choose(&mut *session.ui, "Workflow state", to_pick_items(&states)) else {
        return Ok(Outcome::Cancelled);
    };

    let members = with_progress(&mut *session.ui, "Loading members", || api.list_members())?;
    let members = order_members(members, session.settings.get(SettingKey::Username));
    let Some(owner) = choose(&mut *session.ui, "Owner", to_pick_items(&members)) else {
        return Ok(Outcome::Cancelled);
    };

    let description_input = Input {
        prompt: "Description (optional)",
        ..Default::default()
    };
    let Some(description) = session.ui.input(&description_input) else {
        return Ok(Outcome::Cancelled);
    };

    let estimate_input = Input {
        prompt: "Estimate (optional)",
        ..Default::default()
    };
    let Some(estimate) = session.ui.input(&estimate_input) else {
        return Ok(Outcome::Cancelled);
    };
    let estimate = match parse_estimate(&estimate) {
        Ok(e) => e,
        Err(()) => {
            session.ui.warn("The estimate must be a whole number");
            return Ok(Outcome::Aborted);
        }
    };

    let request = CreateStory {
        name,
        story_type: story_type.payload,
        description: description.trim().to_string(),
        project_id,
        workflow_state_id: Some(state.payload.id),
        owner_ids: vec![owner.payload.id],
        estimate,
    };
    let created = with_progress(&mut *session.ui, "Creating story", || {
        api.create_story(&request)
    })?;
    tracing::info!(id = created.id, "story created");
    session
        .ui
        .info(&format!("Created story {}: {}", created.id, created.name));

    act_on_story(session, created.id)
}

fn parse_estimate(raw: &str) -> std::result::Result<Option<u32>, ()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse().map(Some).map_err(|_| ())
}
