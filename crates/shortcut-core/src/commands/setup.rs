use super::Outcome;
use crate::error::Result;
use crate::session::Session;
use crate::settings::SettingKey;
use crate::ui::{ask, Input};

pub fn set_token(session: &mut Session<'_>) -> Result<Outcome> {
    let input = Input {
        prompt: "Please enter your Shortcut API token",
        secret: true,
        ..Default::default()
    };
    let Some(token) = ask(&mut *session.ui, &input) else {
        return Ok(Outcome::Cancelled);
    };

    session.settings.set(SettingKey::Token, &token)?;
    session.ui.info("The Shortcut API token has been set");
    Ok(Outcome::Done)
}

/// Store the branch new story branches are cut from, for this project only.
///
/// Prompts (pre-filled with the current value) when `name` is not given.
pub fn set_base_branch(session: &mut Session<'_>, name: Option<&str>) -> Result<Outcome> {
    let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => n.to_string(),
        None => {
            let current = session
                .settings
                .get(SettingKey::DefaultBranchName)
                .map(str::to_string);
            let input = Input {
                prompt: "Please enter the name of the base branch (eg. develop)",
                value: current.as_deref(),
                secret: false,
            };
            match ask(&mut *session.ui, &input) {
                Some(n) => n,
                None => return Ok(Outcome::Cancelled),
            }
        }
    };

    session.settings.set(SettingKey::DefaultBranchName, &name)?;
    session
        .ui
        .info(&format!("The base branch is now set to \"{name}\""));
    Ok(Outcome::Done)
}
