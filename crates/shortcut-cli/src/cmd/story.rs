use super::Context;
use crate::output::{print_fields, print_json};
use shortcut_core::commands;
use shortcut_core::types::Story;

pub fn search(ctx: &Context, query: Option<&str>) -> anyhow::Result<()> {
    ctx.run(|s| commands::search(s, query))
}

pub fn stories(ctx: &Context) -> anyhow::Result<()> {
    ctx.run(commands::get_stories)
}

pub fn create(ctx: &Context) -> anyhow::Result<()> {
    ctx.run(commands::create_story)
}

pub fn branch(ctx: &Context, id: u64) -> anyhow::Result<()> {
    ctx.run(|s| commands::create_branch(s, id))
}

pub fn open(ctx: &Context, id: u64) -> anyhow::Result<()> {
    ctx.run(|s| Ok(commands::view_story(s, id)))
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

pub fn show(ctx: &Context, id: u64) -> anyhow::Result<()> {
    let (story, url) = ctx.with_session(|s| {
        let story = commands::fetch_story(s, id)?;
        let url = commands::story_link(s, story.id, story.app_url.as_deref());
        Ok((story, url))
    })?;

    if ctx.json {
        return print_json(&story);
    }
    print_story(&story, &url);
    Ok(())
}

fn print_story(story: &Story, url: &str) {
    let dash = || "-".to_string();
    let mut fields = vec![
        ("id", story.id.to_string()),
        ("name", story.name.clone()),
        ("type", story.story_type.to_string()),
        ("estimate", story.estimate.map(|e| e.to_string()).unwrap_or_else(dash)),
        (
            "state",
            story
                .workflow_state_id
                .map(|s| s.to_string())
                .unwrap_or_else(dash),
        ),
        (
            "owners",
            if story.owner_ids.is_empty() {
                dash()
            } else {
                story.owner_ids.join(", ")
            },
        ),
        ("url", url.to_string()),
    ];
    if story.archived {
        fields.push(("archived", "yes".to_string()));
    }
    print_fields(&fields);

    let description = story.description.trim();
    if !description.is_empty() {
        println!();
        println!("{description}");
    }
}
