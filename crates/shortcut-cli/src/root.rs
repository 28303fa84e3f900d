use std::path::{Path, PathBuf};

/// Resolve the project root git commands run in.
///
/// Priority:
/// 1. `--root` flag / `SHORTCUT_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.git`
/// 3. Fall back to `cwd`
///
/// The result is always absolute since it is also the per-project settings key.
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if let Some(p) = explicit {
        return std::fs::canonicalize(p).unwrap_or_else(|_| cwd.join(p));
    }

    find_repo_root(&cwd).unwrap_or(cwd)
}

/// First ancestor of `start` (inclusive) containing `.git`.
///
/// `.git` may be a file in worktrees and submodules, so any entry counts.
fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn relative_root_is_made_absolute() {
        let result = resolve_root(Some(Path::new(".")));
        assert!(result.is_absolute(), "{}", result.display());
        assert_eq!(result, std::env::current_dir().unwrap().canonicalize().unwrap());
    }

    #[test]
    fn missing_relative_root_is_joined_to_cwd() {
        let result = resolve_root(Some(Path::new("no-such-dir-for-root")));
        assert!(result.is_absolute());
        assert!(result.ends_with("no-such-dir-for-root"));
    }

    #[test]
    fn finds_git_dir_above() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        let subdir = dir.path().join("src/deep");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(find_repo_root(&subdir).as_deref(), Some(dir.path()));
    }

    #[test]
    fn git_file_counts() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".git"), "gitdir: ../main/.git/worktrees/x").unwrap();
        assert_eq!(find_repo_root(dir.path()).as_deref(), Some(dir.path()));
    }
}
