//! Interactive surface used by command workflows.
//!
//! The CLI implements [`Ui`] on the terminal; tests script it. A `None` from
//! [`Ui::input`] or [`Ui::pick`] means the user dismissed the prompt.

use crate::pick::PickItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Input<'a> {
    pub prompt: &'a str,
    /// Pre-filled value, returned when the user submits nothing.
    pub value: Option<&'a str>,
    /// Do not echo what is typed.
    pub secret: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Choice<'a> {
    pub label: &'a str,
    pub description: &'a str,
}

pub trait Ui {
    fn input(&mut self, input: &Input<'_>) -> Option<String>;

    /// Index into `choices` of the selected entry.
    fn pick(&mut self, title: &str, choices: &[Choice<'_>]) -> Option<usize>;

    fn notify(&mut self, level: Level, message: &str);

    fn begin_progress(&mut self, message: &str);

    fn end_progress(&mut self);

    /// Open `url` in the browser; `false` when nothing could be launched.
    fn open_url(&mut self, url: &str) -> bool;

    fn info(&mut self, message: &str) {
        self.notify(Level::Info, message);
    }

    fn warn(&mut self, message: &str) {
        self.notify(Level::Warning, message);
    }

    fn error(&mut self, message: &str) {
        self.notify(Level::Error, message);
    }
}

/// Present `items` and hand back the chosen one.
pub fn choose<T>(ui: &mut dyn Ui, title: &str, mut items: Vec<PickItem<T>>) -> Option<PickItem<T>> {
    let index = {
        let choices: Vec<Choice<'_>> = items
            .iter()
            .map(|i| Choice {
                label: &i.label,
                description: &i.description,
            })
            .collect();
        ui.pick(title, &choices)?
    };
    (index < items.len()).then(|| items.swap_remove(index))
}

/// Show a progress indicator while `f` runs.
pub fn with_progress<R>(ui: &mut dyn Ui, message: &str, f: impl FnOnce() -> R) -> R {
    ui.begin_progress(message);
    let result = f();
    ui.end_progress();
    result
}

/// Prompt for a value; an empty answer counts as dismissed.
pub fn ask(ui: &mut dyn Ui, input: &Input<'_>) -> Option<String> {
    ui.input(input)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
