//! Branch-name templates.
//!
//! A template such as `[story_type]/[story_id]/[story_name]` is parsed once
//! into literal and placeholder segments and rendered by substitution.
//!
//! Each placeholder is substituted at its first occurrence only; a repeated
//! token is kept as literal text. Any other `[lower_snake]` token is rejected
//! at parse time, and rendering a placeholder with no value is an error
//! rather than a silent no-op.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

pub const DEFAULT_BRANCH_FORMAT: &str = "[story_type]/[story_id]/[story_name]";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,

    #[error("unknown placeholder '[{0}]'")]
    UnknownPlaceholder(String),

    #[error("no value for placeholder '{0}'")]
    MissingValue(Placeholder),
}

// ---------------------------------------------------------------------------
// Placeholder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    StoryId,
    StoryType,
    StoryName,
    OwnerUsername,
}

impl Placeholder {
    pub fn all() -> &'static [Placeholder] {
        &[
            Placeholder::StoryId,
            Placeholder::StoryType,
            Placeholder::StoryName,
            Placeholder::OwnerUsername,
        ]
    }

    /// Name between the brackets.
    pub fn as_str(self) -> &'static str {
        match self {
            Placeholder::StoryId => "story_id",
            Placeholder::StoryType => "story_type",
            Placeholder::StoryName => "story_name",
            Placeholder::OwnerUsername => "owner_username",
        }
    }

    fn from_name(name: &str) -> Option<Placeholder> {
        Placeholder::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == name)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BranchTemplate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchTemplate {
    segments: Vec<Segment>,
}

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn token_re() -> &'static Regex {
    TOKEN_RE.get_or_init(|| Regex::new(r"\[([a-z_]+)\]").unwrap())
}

impl BranchTemplate {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        if source.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut segments = Vec::new();
        let mut seen: Vec<Placeholder> = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for caps in token_re().captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            literal.push_str(&source[last..whole.start()]);
            last = whole.end();

            let placeholder = Placeholder::from_name(name.as_str())
                .ok_or_else(|| TemplateError::UnknownPlaceholder(name.as_str().to_string()))?;

            if seen.contains(&placeholder) {
                literal.push_str(whole.as_str());
                continue;
            }
            seen.push(placeholder);

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(placeholder));
        }

        literal.push_str(&source[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|s| *s == Segment::Placeholder(placeholder))
    }

    /// Substitute every placeholder segment with the value returned by `lookup`.
    pub fn render<'a, F>(&self, lookup: F) -> Result<String, TemplateError>
    where
        F: Fn(Placeholder) -> Option<&'a str>,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(p) => {
                    let value = lookup(*p).ok_or(TemplateError::MissingValue(*p))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

impl Default for BranchTemplate {
    fn default() -> Self {
        Self {
            segments: vec![
                Segment::Placeholder(Placeholder::StoryType),
                Segment::Literal("/".into()),
                Segment::Placeholder(Placeholder::StoryId),
                Segment::Literal("/".into()),
                Segment::Placeholder(Placeholder::StoryName),
            ],
        }
    }
}
