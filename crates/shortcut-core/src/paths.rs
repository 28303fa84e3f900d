use crate::error::{Result, ShortcutError};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const USER_DIR: &str = ".shortcut";
pub const SETTINGS_FILE: &str = "settings.yaml";

pub const DEFAULT_API_URL: &str = "https://api.app.shortcut.com/api/v3";
pub const APP_URL: &str = "https://app.shortcut.com";
pub const GITHUB_URL: &str = "https://github.com/";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `~/.shortcut`
pub fn user_dir() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(ShortcutError::HomeNotFound)?;
    Ok(home.join(USER_DIR))
}

/// `~/.shortcut/settings.yaml`
pub fn user_settings_path() -> Result<PathBuf> {
    Ok(user_dir()?.join(SETTINGS_FILE))
}

/// Key under which per-project settings are stored.
///
/// Uses the root as given; callers pass an already-resolved root so the same
/// checkout always maps to the same key.
pub fn project_key(root: &Path) -> String {
    root.to_string_lossy().into_owned()
}

/// Browser URL for a story.
pub fn story_url(workspace_slug: Option<&str>, id: u64) -> String {
    match workspace_slug {
        Some(slug) if !slug.is_empty() => format!("{APP_URL}/{slug}/story/{id}"),
        _ => format!("{APP_URL}/story/{id}"),
    }
}
