//! Scripted fakes for workflow tests.

use crate::api::{Connector, ShortcutApi};
use crate::error::{Result, ShortcutError};
use crate::session::Session;
use crate::settings::{SettingKey, Settings};
use crate::shell::{CommandOutput, Shell};
use crate::types::{
    CreateStory, CurrentMember, Member, Profile, Project, Story, StoryType, Workflow,
    WorkflowState,
};
use crate::ui::{Choice, Input, Level, Ui};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

pub const ROOT: &str = "/work/app";

// ---------------------------------------------------------------------------
// FakeUi
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input { prompt: String, value: Option<String> },
    Pick { title: String, labels: Vec<String> },
    Notify(Level, String),
    Progress(String),
    Open(String),
}

/// Answers prompts from queues; an empty queue dismisses the prompt.
#[derive(Default)]
pub struct FakeUi {
    pub inputs: VecDeque<Option<String>>,
    pub picks: VecDeque<Option<usize>>,
    pub events: Vec<Event>,
    pub browser_fails: bool,
}

impl FakeUi {
    pub fn answer(&mut self, text: &str) -> &mut Self {
        self.inputs.push_back(Some(text.to_string()));
        self
    }

    pub fn dismiss_input(&mut self) -> &mut Self {
        self.inputs.push_back(None);
        self
    }

    pub fn select(&mut self, index: usize) -> &mut Self {
        self.picks.push_back(Some(index));
        self
    }

    pub fn dismiss_select(&mut self) -> &mut Self {
        self.picks.push_back(None);
        self
    }

    pub fn notifications(&self) -> Vec<(Level, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Notify(level, msg) => Some((*level, msg.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn prompts(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Input { .. } | Event::Pick { .. }))
            .count()
    }

    pub fn opened(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Open(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Ui for FakeUi {
    fn input(&mut self, input: &Input<'_>) -> Option<String> {
        self.events.push(Event::Input {
            prompt: input.prompt.to_string(),
            value: input.value.map(str::to_string),
        });
        self.inputs.pop_front().flatten()
    }

    fn pick(&mut self, title: &str, choices: &[Choice<'_>]) -> Option<usize> {
        self.events.push(Event::Pick {
            title: title.to_string(),
            labels: choices.iter().map(|c| c.label.to_string()).collect(),
        });
        self.picks.pop_front().flatten()
    }

    fn notify(&mut self, level: Level, message: &str) {
        self.events.push(Event::Notify(level, message.to_string()));
    }

    fn begin_progress(&mut self, message: &str) {
        self.events.push(Event::Progress(message.to_string()));
    }

    fn end_progress(&mut self) {}

    fn open_url(&mut self, url: &str) -> bool {
        self.events.push(Event::Open(url.to_string()));
        !self.browser_fails
    }
}

// ---------------------------------------------------------------------------
// FakeApi
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ApiState {
    pub stories: Vec<Story>,
    pub search_results: Vec<Story>,
    pub members: Vec<Member>,
    pub projects: Vec<Project>,
    pub workflows: Vec<Workflow>,
    pub current: Option<CurrentMember>,
    pub calls: Vec<String>,
    pub created: Vec<CreateStory>,
    pub connects: usize,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    pub state: Rc<RefCell<ApiState>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl ShortcutApi for FakeApi {
    fn search_stories(&self, query: &str, page_size: u32) -> Result<Vec<Story>> {
        self.record(format!("search {query} {page_size}"));
        Ok(self.state.borrow().search_results.clone())
    }

    fn get_story(&self, id: u64) -> Result<Story> {
        self.record(format!("get {id}"));
        self.state
            .borrow()
            .stories
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(ShortcutError::StoryNotFound(id))
    }

    fn create_story(&self, story: &CreateStory) -> Result<Story> {
        self.record(format!("create {}", story.name));
        let mut state = self.state.borrow_mut();
        state.created.push(story.clone());
        let created = Story {
            id: 1000 + state.created.len() as u64,
            ..sample_story(0, story.story_type, &story.name)
        };
        state.stories.push(created.clone());
        Ok(created)
    }

    fn list_members(&self) -> Result<Vec<Member>> {
        self.record("members".into());
        Ok(self.state.borrow().members.clone())
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        self.record("projects".into());
        Ok(self.state.borrow().projects.clone())
    }

    fn list_workflows(&self) -> Result<Vec<Workflow>> {
        self.record("workflows".into());
        Ok(self.state.borrow().workflows.clone())
    }

    fn current_member(&self) -> Result<CurrentMember> {
        self.record("member".into());
        self.state.borrow().current.clone().ok_or(ShortcutError::Api {
            status: 401,
            body: "Unauthorized".into(),
        })
    }
}

impl Connector for FakeApi {
    fn connect(&self, _token: &str) -> Result<Box<dyn ShortcutApi>> {
        self.state.borrow_mut().connects += 1;
        Ok(Box::new(self.clone()))
    }
}

// ---------------------------------------------------------------------------
// FakeShell
// ---------------------------------------------------------------------------

/// Succeeds with empty output unless a response is scripted for the command.
#[derive(Default)]
pub struct FakeShell {
    pub responses: HashMap<String, CommandOutput>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeShell {
    pub fn respond(&mut self, command: &str, success: bool, output: &str) -> &mut Self {
        self.responses.insert(
            command.to_string(),
            CommandOutput {
                success,
                output: output.to_string(),
            },
        );
        self
    }

    pub fn on_branch(&mut self, branch: &str) -> &mut Self {
        self.respond("git rev-parse --abbrev-ref HEAD", true, branch)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Shell for FakeShell {
    fn command(&self, program: &str, args: &[String]) -> CommandOutput {
        let line = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(line.clone());
        self.responses.get(&line).cloned().unwrap_or(CommandOutput {
            success: true,
            output: String::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub dir: TempDir,
    pub ui: FakeUi,
    pub api: FakeApi,
    pub shell: FakeShell,
}

impl Harness {
    /// No settings at all.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            ui: FakeUi::default(),
            api: FakeApi::default(),
            shell: FakeShell::default(),
        }
    }

    /// Token, username and base branch already set.
    pub fn configured() -> Self {
        let h = Self::new();
        let mut settings = h.settings();
        settings.set(SettingKey::Token, "tok").unwrap();
        settings.set(SettingKey::Username, "dana").unwrap();
        settings
            .set(SettingKey::DefaultBranchName, "develop")
            .unwrap();
        h
    }

    pub fn settings(&self) -> Settings {
        Settings::load(&self.dir.path().join("settings.yaml"), Path::new(ROOT)).unwrap()
    }

    pub fn run<R>(&mut self, f: impl FnOnce(&mut Session<'_>) -> R) -> R {
        let settings = self.settings();
        let mut session = Session::new(settings, &mut self.ui, &self.shell, &self.api);
        f(&mut session)
    }
}

pub fn sample_story(id: u64, story_type: StoryType, name: &str) -> Story {
    Story {
        id,
        name: name.to_string(),
        story_type,
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

pub fn sample_member(mention: &str) -> Member {
    Member {
        id: format!("id-{mention}"),
        role: "member".into(),
        disabled: false,
        profile: Profile {
            name: Some(mention.to_string()),
            mention_name: mention.to_string(),
            email_address: None,
        },
    }
}

pub fn sample_workflow() -> Workflow {
    Workflow {
        id: 1,
        name: "Engineering".into(),
        states: vec![
            WorkflowState {
                id: 10,
                name: "Unstarted".into(),
                description: String::new(),
            },
            WorkflowState {
                id: 20,
                name: "In Progress".into(),
                description: "Being worked on".into(),
            },
        ],
    }
}
