use super::Context;
use shortcut_core::commands;

pub fn commit(ctx: &Context) -> anyhow::Result<()> {
    ctx.run(commands::create_commit)
}

pub fn redo_commit(ctx: &Context) -> anyhow::Result<()> {
    ctx.run(commands::redo_commit)
}

pub fn pull_request(ctx: &Context) -> anyhow::Result<()> {
    ctx.run(commands::create_pull_request)
}
