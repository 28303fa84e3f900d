use super::preflight::{preflight, Preflight};
use super::story::fetch_story;
use super::{open_or_print, report_failure, story_link, Outcome, NO_ASSOCIATED_STORY_MESSAGE};
use crate::branch;
use crate::error::{Result, ShortcutError};
use crate::git;
use crate::session::Session;
use crate::settings::SettingKey;
use crate::shell::{execute, FailurePolicy, Step};
use crate::types::Story;
use crate::ui::{ask, with_progress, Input};

/// Cut a branch for story `id` from the base branch.
pub fn create_branch(session: &mut Session<'_>, id: u64) -> Result<Outcome> {
    if let Preflight::Abort(_) = preflight(session) {
        return Ok(Outcome::Aborted);
    }
    let story = fetch_story(session, id)?;
    branch_for_story(session, &story)
}

pub(crate) fn branch_for_story(session: &mut Session<'_>, story: &Story) -> Result<Outcome> {
    let Some(base) = session
        .settings
        .get(SettingKey::DefaultBranchName)
        .map(str::to_string)
    else {
        session
            .ui
            .warn("A base branch must be set before running this command");
        return Ok(Outcome::Aborted);
    };

    let name = match branch::name_from_format(
        story,
        session.settings.branch_format(),
        session.settings.get(SettingKey::Username),
    ) {
        Ok(n) => n,
        Err(e) => {
            session
                .ui
                .warn(&format!("Cannot build a branch name from \"branchFormat\": {e}"));
            return Ok(Outcome::Aborted);
        }
    };

    let steps = git::create_branch_steps(&base, &name);
    if !run_steps(session, "Creating branch", &steps) {
        return Ok(Outcome::Failed);
    }

    session
        .ui
        .info(&format!("You are on a new branch {name}"));
    Ok(Outcome::Done)
}

/// Commit everything with a message derived from the branch's story, then push.
pub fn create_commit(session: &mut Session<'_>) -> Result<Outcome> {
    if let Preflight::Abort(_) = preflight(session) {
        return Ok(Outcome::Aborted);
    }

    let Some((branch, story)) = branch_story(session)? else {
        return Ok(Outcome::NothingFound);
    };

    let default = git::commit_message(&story);
    let input = Input {
        prompt: "Please enter a commit message",
        value: Some(&default),
        secret: false,
    };
    let Some(message) = ask(&mut *session.ui, &input) else {
        return Ok(Outcome::Cancelled);
    };

    if !run_steps(session, "Committing", &git::commit_steps(&message)) {
        return Ok(Outcome::Failed);
    }
    session
        .ui
        .info(&format!("Committed and pushed to {branch}"));
    Ok(Outcome::Done)
}

/// Fold uncommitted changes into the last commit and force-push.
pub fn redo_commit(session: &mut Session<'_>) -> Result<Outcome> {
    if !run_steps(session, "Amending last commit", &git::redo_commit_steps()) {
        return Ok(Outcome::Failed);
    }
    session.ui.info("Amended the last commit and pushed");
    Ok(Outcome::Done)
}

/// Open GitHub's compare page for the current branch, titled after its story.
pub fn create_pull_request(session: &mut Session<'_>) -> Result<Outcome> {
    if let Preflight::Abort(_) = preflight(session) {
        return Ok(Outcome::Aborted);
    }

    let Some((branch, story)) = branch_story(session)? else {
        return Ok(Outcome::NothingFound);
    };

    let Some(remote) = git::remote_url(session.shell) else {
        session.ui.warn("No \"origin\" remote is configured");
        return Ok(Outcome::Aborted);
    };
    let repository = match git::repository_path(&remote) {
        Ok(r) => r,
        Err(e) => {
            session.ui.warn(&e.to_string());
            return Ok(Outcome::Aborted);
        }
    };

    let story_url = story_link(session, story.id, story.app_url.as_deref());
    let url = git::pull_request_url(&repository, &branch, &story, &story_url)?;
    tracing::debug!(%url, "opening pull request page");
    open_or_print(&mut *session.ui, &url);
    Ok(Outcome::Done)
}

/// The current branch and the story its name points at.
///
/// Warns and returns `None` when the branch carries no story id or the story
/// does not exist.
fn branch_story(session: &mut Session<'_>) -> Result<Option<(String, Story)>> {
    let id = git::current_branch(session.shell)
        .and_then(|b| branch::id_from_branch_name(&b).map(|id| (b, id)));
    let Some((branch, id)) = id else {
        session.ui.warn(NO_ASSOCIATED_STORY_MESSAGE);
        return Ok(None);
    };

    match fetch_story(session, id) {
        Ok(story) => Ok(Some((branch, story))),
        Err(ShortcutError::StoryNotFound(_)) => {
            session.ui.warn(NO_ASSOCIATED_STORY_MESSAGE);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Run `steps`, stopping at the first failure; reports the failed step.
fn run_steps(session: &mut Session<'_>, message: &str, steps: &[Step]) -> bool {
    let shell = session.shell;
    let report = with_progress(&mut *session.ui, message, || {
        execute(shell, steps, FailurePolicy::StopOnFailure)
    });
    if !report.succeeded() {
        report_failure(&mut *session.ui, &report);
        return false;
    }
    true
}
