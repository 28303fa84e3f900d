use super::Context;
use crate::output::{print_json, print_table};
use anyhow::Context as _;
use clap::Subcommand;
use shortcut_core::commands;
use shortcut_core::settings::{Scope, SettingKey, Settings};
use shortcut_core::template::BranchTemplate;
use std::collections::BTreeMap;

const REDACTED: &str = "********";

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum SettingsSubcommand {
    /// Show every setting (the token is redacted)
    Show,

    /// Print one setting
    Get {
        /// token, username, branchFormat, workspaceSlug or defaultBranchName
        key: String,
    },

    /// Store one setting (an empty value clears it)
    Set {
        /// token, username, branchFormat, workspaceSlug or defaultBranchName
        key: String,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub fn run(ctx: &Context, subcmd: SettingsSubcommand) -> anyhow::Result<()> {
    match subcmd {
        SettingsSubcommand::Show => show(ctx),
        SettingsSubcommand::Get { key } => get(ctx, &key),
        SettingsSubcommand::Set { key, value } => set(ctx, &key, &value),
    }
}

/// Set the project's base branch, prompting when `name` is absent.
pub fn base_branch(ctx: &Context, name: Option<&str>) -> anyhow::Result<()> {
    ctx.run(|s| commands::set_base_branch(s, name))
}

/// Store the API token, prompting when `value` is absent.
pub fn token(ctx: &Context, value: Option<&str>) -> anyhow::Result<()> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => {
            let mut settings = ctx.load_settings()?;
            settings
                .set(SettingKey::Token, v)
                .context("failed to save token")?;
            println!("The Shortcut API token has been set");
            Ok(())
        }
        None => ctx.run(commands::set_token),
    }
}

// ---------------------------------------------------------------------------
// show / get / set
// ---------------------------------------------------------------------------

fn display_value(settings: &Settings, key: SettingKey) -> Option<String> {
    let value = settings.get(key)?;
    Some(if key.is_secret() {
        REDACTED.to_string()
    } else {
        value.to_string()
    })
}

fn show(ctx: &Context) -> anyhow::Result<()> {
    let settings = ctx.load_settings()?;

    if ctx.json {
        let values: BTreeMap<&str, Option<String>> = SettingKey::all()
            .iter()
            .map(|k| (k.as_str(), display_value(&settings, *k)))
            .collect();
        return print_json(&values);
    }

    println!("Settings: {}", settings.path().display());
    println!("Project:  {}", settings.project());
    println!();
    let rows = SettingKey::all()
        .iter()
        .map(|k| {
            let scope = match k.scope() {
                Scope::Global => "global",
                Scope::Project => "project",
            };
            let value = match (*k, display_value(&settings, *k)) {
                (SettingKey::BranchFormat, None) => {
                    format!("{} (default)", settings.branch_format())
                }
                (_, v) => v.unwrap_or_else(|| "-".to_string()),
            };
            vec![k.as_str().to_string(), value, scope.to_string()]
        })
        .collect();
    print_table(&["KEY", "VALUE", "SCOPE"], rows);
    Ok(())
}

fn get(ctx: &Context, key: &str) -> anyhow::Result<()> {
    let key: SettingKey = key.parse()?;
    let settings = ctx.load_settings()?;
    let Some(value) = settings.get(key) else {
        anyhow::bail!("'{key}' is not set");
    };
    println!("{value}");
    Ok(())
}

fn set(ctx: &Context, key: &str, value: &str) -> anyhow::Result<()> {
    let key: SettingKey = key.parse()?;
    if key == SettingKey::BranchFormat && !value.is_empty() {
        BranchTemplate::parse(value).context("invalid branchFormat")?;
    }

    let mut settings = ctx.load_settings()?;
    settings
        .set(key, value)
        .with_context(|| format!("failed to save '{key}'"))?;

    if value.is_empty() {
        println!("Cleared '{key}'");
    } else {
        println!("Set '{key}'");
    }
    Ok(())
}
