//! Records → pick-list items.

use crate::types::{Member, Project, Story, StoryType, WorkflowState};

#[derive(Debug, Clone, PartialEq)]
pub struct PickItem<T> {
    pub label: String,
    pub description: String,
    pub payload: T,
}

impl<T> PickItem<T> {
    pub fn new(label: impl Into<String>, description: impl Into<String>, payload: T) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            payload,
        }
    }
}

/// A record that can be offered in a pick list.
pub trait Pickable {
    fn label(&self) -> String;
    fn description(&self) -> String;

    /// Archived or disabled records are never offered.
    fn hidden(&self) -> bool {
        false
    }
}

/// Map `records` to pick items, dropping hidden ones and keeping order.
pub fn to_pick_items<T: Pickable + Clone>(records: &[T]) -> Vec<PickItem<T>> {
    records
        .iter()
        .filter(|r| !r.hidden())
        .map(|r| PickItem::new(r.label(), r.description(), r.clone()))
        .collect()
}

impl Pickable for Story {
    fn label(&self) -> String {
        self.id.to_string()
    }

    fn description(&self) -> String {
        self.name.clone()
    }

    fn hidden(&self) -> bool {
        self.archived
    }
}

impl Pickable for Member {
    fn label(&self) -> String {
        self.profile
            .name
            .clone()
            .unwrap_or_else(|| self.profile.mention_name.clone())
    }

    fn description(&self) -> String {
        self.profile.email_address.clone().unwrap_or_default()
    }

    fn hidden(&self) -> bool {
        self.disabled
    }
}

impl Pickable for Project {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        self.description.clone().unwrap_or_default()
    }

    fn hidden(&self) -> bool {
        self.archived
    }
}

impl Pickable for WorkflowState {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

impl Pickable for StoryType {
    fn label(&self) -> String {
        self.as_str().to_string()
    }

    fn description(&self) -> String {
        String::new()
    }
}

/// Active members with `current_username` moved to the front.
pub fn order_members(members: Vec<Member>, current_username: Option<&str>) -> Vec<Member> {
    let (mut mine, others): (Vec<Member>, Vec<Member>) = members
        .into_iter()
        .filter(|m| !m.disabled)
        .partition(|m| Some(m.profile.mention_name.as_str()) == current_username);
    mine.extend(others);
    mine
}
