use super::setup;
use crate::error::Result;
use crate::session::Session;
use crate::settings::SettingKey;
use crate::ui::with_progress;

/// Settings every guarded command needs.
pub const REQUIRED: [SettingKey; 3] = [
    SettingKey::Token,
    SettingKey::Username,
    SettingKey::DefaultBranchName,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preflight {
    Proceed,
    Abort(String),
}

/// Make sure token, username and base branch are set, prompting for missing ones.
///
/// Never fails: errors while filling a setting are shown as a warning and turn
/// into [`Preflight::Abort`].
pub fn preflight(session: &mut Session<'_>) -> Preflight {
    let reason = match fill_missing(session) {
        Ok(None) => return Preflight::Proceed,
        Ok(Some(key)) => format!("Please set the \"{key}\" option before running this command"),
        Err(e) => e.to_string(),
    };
    tracing::debug!(%reason, "preflight aborted");
    session.ui.warn(&reason);
    Preflight::Abort(reason)
}

fn fill_missing(session: &mut Session<'_>) -> Result<Option<SettingKey>> {
    if REQUIRED.iter().all(|k| session.settings.is_set(*k)) {
        return Ok(None);
    }

    if !session.settings.is_set(SettingKey::Token) {
        setup::set_token(session)?;
    }

    if !session.settings.is_set(SettingKey::Username) && session.settings.is_set(SettingKey::Token)
    {
        fetch_username(session)?;
    }

    if !session.settings.is_set(SettingKey::DefaultBranchName) {
        setup::set_base_branch(session, None)?;
    }

    Ok(REQUIRED
        .iter()
        .copied()
        .find(|k| !session.settings.is_set(*k)))
}

/// Store the token owner's mention name as the username.
fn fetch_username(session: &mut Session<'_>) -> Result<()> {
    let api = session.api()?;
    let member = with_progress(&mut *session.ui, "Looking up your Shortcut user", || {
        api.current_member()
    })?;
    session
        .settings
        .set(SettingKey::Username, &member.mention_name)
}
