use crate::error::{Result, ShortcutError};
use crate::io::{atomic_write, read_if_exists};
use crate::paths;
use crate::template::DEFAULT_BRANCH_FORMAT;
use crate::types::Workflow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// SettingKey
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Project,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Token,
    Username,
    BranchFormat,
    WorkspaceSlug,
    DefaultBranchName,
}

impl SettingKey {
    pub fn all() -> &'static [SettingKey] {
        &[
            SettingKey::Token,
            SettingKey::Username,
            SettingKey::BranchFormat,
            SettingKey::WorkspaceSlug,
            SettingKey::DefaultBranchName,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::Token => "token",
            SettingKey::Username => "username",
            SettingKey::BranchFormat => "branchFormat",
            SettingKey::WorkspaceSlug => "workspaceSlug",
            SettingKey::DefaultBranchName => "defaultBranchName",
        }
    }

    pub fn scope(self) -> Scope {
        match self {
            SettingKey::DefaultBranchName => Scope::Project,
            _ => Scope::Global,
        }
    }

    /// Keys whose values are redacted when displayed.
    pub fn is_secret(self) -> bool {
        matches!(self, SettingKey::Token)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SettingKey {
    type Err = ShortcutError;

    fn from_str(s: &str) -> Result<Self> {
        SettingKey::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ShortcutError::UnknownSetting(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// On-disk layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_branch_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct WorkflowCache {
    #[serde(default)]
    stale: bool,
    #[serde(default)]
    workflows: Vec<Workflow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    branch_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    workspace_slug: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    projects: BTreeMap<String, ProjectSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    workflows: Option<WorkflowCache>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Persisted key/value settings, bound to one project root.
///
/// Global keys are shared by every project; [`Scope::Project`] keys are stored
/// under the project root path. Every write is flushed to disk immediately.
#[derive(Debug, Clone)]
pub struct Settings {
    path: PathBuf,
    project: String,
    data: SettingsFile,
}

impl Settings {
    pub fn load(path: &Path, root: &Path) -> Result<Self> {
        let data = match read_if_exists(path)? {
            Some(text) if !text.trim().is_empty() => serde_yaml::from_str(&text)?,
            _ => SettingsFile::default(),
        };
        Ok(Self {
            path: path.to_path_buf(),
            project: paths::project_key(root),
            data,
        })
    }

    /// Load from `~/.shortcut/settings.yaml`.
    pub fn load_default(root: &Path) -> Result<Self> {
        Self::load(&paths::user_settings_path()?, root)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn get(&self, key: SettingKey) -> Option<&str> {
        let value = match key {
            SettingKey::Token => self.data.token.as_deref(),
            SettingKey::Username => self.data.username.as_deref(),
            SettingKey::BranchFormat => self.data.branch_format.as_deref(),
            SettingKey::WorkspaceSlug => self.data.workspace_slug.as_deref(),
            SettingKey::DefaultBranchName => self
                .data
                .projects
                .get(&self.project)
                .and_then(|p| p.default_branch_name.as_deref()),
        };
        value.filter(|v| !v.is_empty())
    }

    pub fn is_set(&self, key: SettingKey) -> bool {
        self.get(key).is_some()
    }

    /// Store `value` under `key` and save. An empty value clears the key.
    pub fn set(&mut self, key: SettingKey, value: &str) -> Result<()> {
        let value = (!value.is_empty()).then(|| value.to_string());
        match key {
            SettingKey::Token => self.data.token = value,
            SettingKey::Username => self.data.username = value,
            SettingKey::BranchFormat => self.data.branch_format = value,
            SettingKey::WorkspaceSlug => self.data.workspace_slug = value,
            SettingKey::DefaultBranchName => {
                let project = self.data.projects.entry(self.project.clone()).or_default();
                project.default_branch_name = value;
                if *project == ProjectSettings::default() {
                    self.data.projects.remove(&self.project);
                }
            }
        }
        tracing::info!(key = key.as_str(), path = %self.path.display(), "setting saved");
        self.save()
    }

    /// The configured branch template, or the default one when unset.
    pub fn branch_format(&self) -> &str {
        self.get(SettingKey::BranchFormat)
            .unwrap_or(DEFAULT_BRANCH_FORMAT)
    }

    /// Return the cached workflow list if it is fresh, marking it stale.
    ///
    /// A stale or missing cache returns `None` so the caller refetches; the
    /// list is therefore refreshed on every second request.
    pub fn take_fresh_workflows(&mut self) -> Result<Option<Vec<Workflow>>> {
        let Some(cache) = self.data.workflows.as_mut() else {
            return Ok(None);
        };
        if cache.stale {
            return Ok(None);
        }
        cache.stale = true;
        let workflows = cache.workflows.clone();
        self.save()?;
        Ok(Some(workflows))
    }

    /// Return whatever workflow list is cached, fresh or stale.
    pub fn cached_workflows(&self) -> Option<&[Workflow]> {
        self.data.workflows.as_ref().map(|c| c.workflows.as_slice())
    }

    pub fn store_workflows(&mut self, workflows: Vec<Workflow>) -> Result<()> {
        self.data.workflows = Some(WorkflowCache {
            stale: false,
            workflows,
        });
        self.save()
    }

    fn save(&self) -> Result<()> {
        let data = serde_yaml::to_string(&self.data)?;
        atomic_write(&self.path, data.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WorkflowState;
    use tempfile::TempDir;

    fn settings(dir: &TempDir, root: &str) -> Settings {
        Settings::load(&dir.path().join("settings.yaml"), Path::new(root)).unwrap()
    }

    fn workflow(name: &str) -> Workflow {
        Workflow {
            id: 1,
            name: name.into(),
            states: vec![WorkflowState {
                id: 10,
                name: "In Progress".into(),
                description: String::new(),
            }],
        }
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let s = settings(&dir, "/work/app");
        for key in SettingKey::all() {
            assert!(s.get(*key).is_none(), "{key} should be unset");
        }
    }

    #[test]
    fn global_values_persist() {
        let dir = TempDir::new().unwrap();
        let mut s = settings(&dir, "/work/app");
        s.set(SettingKey::Token, "secret").unwrap();
        s.set(SettingKey::Username, "dana").unwrap();

        let reloaded = settings(&dir, "/work/other");
        assert_eq!(reloaded.get(SettingKey::Token), Some("secret"));
        assert_eq!(reloaded.get(SettingKey::Username), Some("dana"));
    }

    #[test]
    fn default_branch_is_per_project() {
        let dir = TempDir::new().unwrap();
        let mut a = settings(&dir, "/work/a");
        a.set(SettingKey::DefaultBranchName, "develop").unwrap();

        let b = settings(&dir, "/work/b");
        assert_eq!(b.get(SettingKey::DefaultBranchName), None);

        let a = settings(&dir, "/work/a");
        assert_eq!(a.get(SettingKey::DefaultBranchName), Some("develop"));
    }

    #[test]
    fn keys_use_camel_case_on_disk() {
        let dir = TempDir::new().unwrap();
        let mut s = settings(&dir, "/work/a");
        s.set(SettingKey::BranchFormat, "[story_id]").unwrap();
        s.set(SettingKey::DefaultBranchName, "main").unwrap();
        let text = std::fs::read_to_string(s.path()).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(value["branchFormat"].as_str(), Some("[story_id]"));
        assert_eq!(
            value["projects"]["/work/a"]["defaultBranchName"].as_str(),
            Some("main")
        );
    }

    #[test]
    fn empty_value_clears() {
        let dir = TempDir::new().unwrap();
        let mut s = settings(&dir, "/work/a");
        s.set(SettingKey::DefaultBranchName, "main").unwrap();
        s.set(SettingKey::DefaultBranchName, "").unwrap();
        assert!(!s.is_set(SettingKey::DefaultBranchName));
        let text = std::fs::read_to_string(s.path()).unwrap();
        assert!(!text.contains("/work/a"), "{text}");
    }

    #[test]
    fn branch_format_defaults() {
        let dir = TempDir::new().unwrap();
        let mut s = settings(&dir, "/work/a");
        assert_eq!(s.branch_format(), DEFAULT_BRANCH_FORMAT);
        s.set(SettingKey::BranchFormat, "[owner_username]/[story_id]")
            .unwrap();
        assert_eq!(s.branch_format(), "[owner_username]/[story_id]");
    }

    #[test]
    fn parse_keys() {
        assert_eq!(
            "defaultBranchName".parse::<SettingKey>().unwrap(),
            SettingKey::DefaultBranchName
        );
        assert!(matches!(
            "bogus".parse::<SettingKey>(),
            Err(ShortcutError::UnknownSetting(_))
        ));
    }

    #[test]
    fn workflow_cache_refreshes_every_second_read() {
        let dir = TempDir::new().unwrap();
        let mut s = settings(&dir, "/work/a");
        assert!(s.take_fresh_workflows().unwrap().is_none());

        s.store_workflows(vec![workflow("Engineering")]).unwrap();
        let first = s.take_fresh_workflows().unwrap().unwrap();
        assert_eq!(first[0].name, "Engineering");

        // Served once, now stale until the next store.
        let reloaded = &mut settings(&dir, "/work/a");
        assert!(reloaded.take_fresh_workflows().unwrap().is_none());
        assert_eq!(reloaded.cached_workflows().unwrap().len(), 1);
    }
}
