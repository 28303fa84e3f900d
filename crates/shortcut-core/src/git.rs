use crate::branch::story_code;
use crate::error::{Result, ShortcutError};
use crate::paths::GITHUB_URL;
use crate::shell::{run_step, Shell, Step};
use crate::types::Story;
use regex::Regex;
use reqwest::Url;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Step builders
// ---------------------------------------------------------------------------

pub fn current_branch_step() -> Step {
    Step::git(["rev-parse", "--abbrev-ref", "HEAD"])
}

pub fn remote_url_step() -> Step {
    Step::git(["remote", "get-url", "origin"])
}

/// Update `base` and switch to `branch`, creating and publishing it if needed.
pub fn create_branch_steps(base: &str, branch: &str) -> Vec<Step> {
    vec![
        Step::git(["checkout", base]),
        Step::git(["pull"]),
        Step::git(["checkout", branch]).or_else(Step::git(["checkout", "-b", branch])),
        Step::git(["push", "--set-upstream", "origin", branch]),
    ]
}

pub fn commit_steps(message: &str) -> Vec<Step> {
    vec![
        Step::git(["add", "."]),
        Step::git(["commit", "-m", message]),
        Step::git(["push"]),
    ]
}

/// Fold the working tree into the previous commit and force-push it.
pub fn redo_commit_steps() -> Vec<Step> {
    vec![
        Step::git(["add", "."]),
        Step::git(["commit", "--amend", "-C", "HEAD"]),
        Step::git(["push", "--force-with-lease"]),
    ]
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Name of the checked-out branch, `None` when detached or outside a repo.
pub fn current_branch(shell: &dyn Shell) -> Option<String> {
    let result = run_step(shell, &current_branch_step());
    let name = result.output.trim();
    if !result.succeeded || name.is_empty() || name == "HEAD" {
        return None;
    }
    Some(name.to_string())
}

pub fn remote_url(shell: &dyn Shell) -> Option<String> {
    let result = run_step(shell, &remote_url_step());
    let url = result.output.trim();
    (result.succeeded && !url.is_empty()).then(|| url.to_string())
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

static PUNCT_RE: OnceLock<Regex> = OnceLock::new();

fn punct_re() -> &'static Regex {
    PUNCT_RE.get_or_init(|| Regex::new(r"[^\w\s]").unwrap())
}

/// `<story name without punctuation> [sc-<id>]`
pub fn commit_message(story: &Story) -> String {
    let name = punct_re().replace_all(&story.name, "");
    format!("{} [{}]", name.trim(), story_code(story.id))
}

/// `owner/repo` from an HTTPS GitHub URL, an `ssh://` URL or an scp-style
/// `git@host:owner/repo.git` remote.
pub fn repository_path(remote_url: &str) -> Result<String> {
    let remote = remote_url.trim();
    let path = if let Some(rest) = remote.strip_prefix(GITHUB_URL) {
        rest.to_string()
    } else if remote.contains("://") {
        let url = Url::parse(remote).map_err(|_| ShortcutError::UnknownRemote(remote.into()))?;
        url.path().to_string()
    } else {
        remote
            .split_once(':')
            .map(|(_, p)| p.to_string())
            .ok_or_else(|| ShortcutError::UnknownRemote(remote.into()))?
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    if path.is_empty() {
        return Err(ShortcutError::UnknownRemote(remote.into()));
    }
    Ok(path.to_string())
}

/// GitHub compare page prefilled with the story's title and a link back to it.
pub fn pull_request_url(
    repository: &str,
    branch: &str,
    story: &Story,
    story_url: &str,
) -> Result<String> {
    let mut url = Url::parse(GITHUB_URL)
        .map_err(|e| ShortcutError::InvalidUrl(format!("{GITHUB_URL}: {e}")))?;
    // Segments are escaped one by one; a `#` or `?` in the branch stays in the path.
    url.path_segments_mut()
        .map_err(|_| ShortcutError::InvalidUrl(GITHUB_URL.to_string()))?
        .pop_if_empty()
        .extend(repository.split('/'))
        .push("compare")
        .extend(branch.split('/'));
    url.query_pairs_mut()
        .append_pair("expand", "1")
        .append_pair("title", &story.name)
        .append_pair("body", &format!("Story details: {story_url}"));
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::CommandOutput;
    use crate::types::StoryType;

    fn story(name: &str) -> Story {
        Story {
            id: 42,
            name: name.into(),
            story_type: StoryType::Feature,
            estimate: None,
            description: String::new(),
            owner_ids: vec![],
            project_id: None,
            workflow_state_id: None,
            archived: false,
            app_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    struct Fixed(CommandOutput);

    impl Shell for Fixed {
        fn command(&self, _program: &str, _args: &[String]) -> CommandOutput {
            self.0.clone()
        }
    }

    fn fixed(success: bool, output: &str) -> Fixed {
        Fixed(CommandOutput {
            success,
            output: output.into(),
        })
    }

    #[test]
    fn branch_steps_in_order() {
        let steps = create_branch_steps("develop", "bug/sc-1/x");
        let rendered: Vec<String> = steps.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "git checkout develop",
                "git pull",
                "git checkout bug/sc-1/x || git checkout -b bug/sc-1/x",
                "git push --set-upstream origin bug/sc-1/x",
            ]
        );
    }

    #[test]
    fn commit_message_strips_punctuation() {
        assert_eq!(
            commit_message(&story("Fix: the (login) bug!")),
            "Fix the login bug [sc-42]"
        );
    }

    #[test]
    fn commit_message_is_one_argument() {
        let steps = commit_steps("Fix it; rm -rf / [sc-1]");
        assert_eq!(steps[1].args, vec!["commit", "-m", "Fix it; rm -rf / [sc-1]"]);
    }

    #[test]
    fn repository_path_from_https() {
        assert_eq!(
            repository_path("https://github.com/acme/web.git").unwrap(),
            "acme/web"
        );
        assert_eq!(
            repository_path("https://github.com/acme/web").unwrap(),
            "acme/web"
        );
    }

    #[test]
    fn repository_path_from_ssh() {
        assert_eq!(
            repository_path("git@github.com:acme/web.git\n").unwrap(),
            "acme/web"
        );
        assert_eq!(
            repository_path("ssh://git@github.com/acme/web.git").unwrap(),
            "acme/web"
        );
    }

    #[test]
    fn repository_path_rejects_garbage() {
        assert!(matches!(
            repository_path("not a remote"),
            Err(ShortcutError::UnknownRemote(_))
        ));
        assert!(repository_path("git@github.com:").is_err());
    }

    #[test]
    fn pull_request_url_encodes_query() {
        let url = pull_request_url(
            "acme/web",
            "feature/sc-42/add-login",
            &story("Add login & signup"),
            "https://app.shortcut.com/story/42",
        )
        .unwrap();
        assert!(url.starts_with(
            "https://github.com/acme/web/compare/feature/sc-42/add-login?expand=1&title="
        ));
        assert!(url.contains("title=Add+login+%26+signup"), "{url}");
        assert!(
            url.contains("body=Story+details%3A+https%3A%2F%2Fapp.shortcut.com%2Fstory%2F42"),
            "{url}"
        );
    }

    #[test]
    fn pull_request_url_escapes_branch_segments() {
        let url = pull_request_url(
            "acme/web",
            "dana/#sc-42/add-login?x",
            &story("Add login"),
            "https://app.shortcut.com/story/42",
        )
        .unwrap();
        assert!(
            url.starts_with(
                "https://github.com/acme/web/compare/dana/%23sc-42/add-login%3Fx?expand=1&title="
            ),
            "{url}"
        );
        let parsed = Url::parse(&url).unwrap();
        assert_eq!(parsed.fragment(), None);
        assert_eq!(
            parsed.path(),
            "/acme/web/compare/dana/%23sc-42/add-login%3Fx"
        );
    }

    #[test]
    fn current_branch_reads_output() {
        assert_eq!(
            current_branch(&fixed(true, "feature/sc-1/x")).as_deref(),
            Some("feature/sc-1/x")
        );
        assert_eq!(current_branch(&fixed(true, "HEAD")), None);
        assert_eq!(current_branch(&fixed(false, "fatal: not a git repository")), None);
    }

    #[test]
    fn remote_url_requires_success() {
        assert_eq!(remote_url(&fixed(false, "error: No such remote")), None);
        assert_eq!(
            remote_url(&fixed(true, "git@github.com:a/b.git")).as_deref(),
            Some("git@github.com:a/b.git")
        );
    }
}
