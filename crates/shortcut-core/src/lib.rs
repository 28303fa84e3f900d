pub mod api;
pub mod branch;
pub mod commands;
pub mod error;
pub mod git;
pub mod io;
pub mod paths;
pub mod pick;
pub mod session;
pub mod settings;
pub mod shell;
pub mod template;
pub mod types;
pub mod ui;

#[cfg(test)]
mod testing;

pub use error::{Result, ShortcutError};
