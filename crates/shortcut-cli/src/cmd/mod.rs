pub mod git;
pub mod settings;
pub mod story;

use crate::terminal::TerminalUi;
use anyhow::Context as _;
use shortcut_core::api::HttpConnector;
use shortcut_core::commands::Outcome;
use shortcut_core::session::Session;
use shortcut_core::settings::Settings;
use shortcut_core::shell::SystemShell;
use std::path::PathBuf;

/// Global options every subcommand runs with.
pub struct Context {
    pub root: PathBuf,
    pub settings_path: Option<PathBuf>,
    pub api_url: String,
    pub json: bool,
    pub no_browser: bool,
}

impl Context {
    pub fn load_settings(&self) -> anyhow::Result<Settings> {
        let settings = match &self.settings_path {
            Some(path) => Settings::load(path, &self.root),
            None => Settings::load_default(&self.root),
        };
        settings.context("failed to load settings")
    }

    /// Build a terminal session and hand it to `f`.
    pub fn with_session<R>(
        &self,
        f: impl FnOnce(&mut Session<'_>) -> shortcut_core::Result<R>,
    ) -> anyhow::Result<R> {
        let settings = self.load_settings()?;
        let mut ui = TerminalUi::new(self.no_browser);
        let shell = SystemShell::new(&self.root);
        let connector = HttpConnector::new(self.api_url.clone());
        let mut session = Session::new(settings, &mut ui, &shell, &connector);
        Ok(f(&mut session)?)
    }

    /// Run an interactive workflow to completion.
    pub fn run(
        &self,
        f: impl FnOnce(&mut Session<'_>) -> shortcut_core::Result<Outcome>,
    ) -> anyhow::Result<()> {
        let outcome = self.with_session(f)?;
        tracing::debug!(?outcome, "workflow finished");
        finish(outcome)
    }
}

/// Dismissed prompts and empty results are a normal exit; the workflow has
/// already told the user about everything else.
fn finish(outcome: Outcome) -> anyhow::Result<()> {
    match outcome {
        Outcome::Done | Outcome::Cancelled | Outcome::NothingFound => Ok(()),
        Outcome::Aborted => anyhow::bail!("command aborted"),
        Outcome::Failed => anyhow::bail!("a git step failed"),
    }
}
