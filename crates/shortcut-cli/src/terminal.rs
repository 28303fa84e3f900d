use shortcut_core::ui::{Choice, Input, Level, Ui};
use std::io::{BufRead, IsTerminal, Write};

/// Line-oriented prompts on stderr, answers from stdin.
///
/// End of input dismisses a prompt. Info messages go to stdout so they can be
/// piped; warnings, errors and prompts go to stderr.
pub struct TerminalUi {
    no_browser: bool,
    progress: bool,
}

impl TerminalUi {
    pub fn new(no_browser: bool) -> Self {
        Self {
            no_browser,
            progress: false,
        }
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read from stdin");
                None
            }
        }
    }
}

/// Prompt line for `input`, showing the default unless the value is secret.
fn prompt_text(input: &Input<'_>) -> String {
    match input.value {
        Some(v) if !v.is_empty() && !input.secret => format!("{} [{v}]: ", input.prompt),
        _ => format!("{}: ", input.prompt),
    }
}

/// Echo is only suppressed on an interactive terminal; piped input is read as-is.
fn hides_echo(secret: bool, stdin_is_terminal: bool) -> bool {
    secret && stdin_is_terminal
}

impl Ui for TerminalUi {
    fn input(&mut self, input: &Input<'_>) -> Option<String> {
        let prompt = prompt_text(input);
        let answer = if hides_echo(input.secret, std::io::stdin().is_terminal()) {
            match rpassword::prompt_password(&prompt) {
                Ok(answer) => answer,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read hidden input");
                    return None;
                }
            }
        } else {
            eprint!("{prompt}");
            let _ = std::io::stderr().flush();
            self.read_line()?
        };

        if answer.trim().is_empty() {
            return Some(input.value.unwrap_or_default().to_string());
        }
        Some(answer)
    }

    fn pick(&mut self, title: &str, choices: &[Choice<'_>]) -> Option<usize> {
        if choices.is_empty() {
            return None;
        }
        eprintln!("{title}");
        let width = choices.iter().map(|c| c.label.len()).max().unwrap_or(0);
        for (i, choice) in choices.iter().enumerate() {
            if choice.description.is_empty() {
                eprintln!("  {:>2}) {}", i + 1, choice.label);
            } else {
                eprintln!(
                    "  {:>2}) {:width$}  {}",
                    i + 1,
                    choice.label,
                    choice.description
                );
            }
        }

        loop {
            eprint!("Select 1-{} (empty to cancel): ", choices.len());
            let _ = std::io::stderr().flush();
            let answer = self.read_line()?;
            let answer = answer.trim();
            if answer.is_empty() {
                return None;
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Some(n - 1),
                _ => eprintln!("'{answer}' is not one of the listed numbers"),
            }
        }
    }

    fn notify(&mut self, level: Level, message: &str) {
        match level {
            Level::Info => println!("{message}"),
            Level::Warning => eprintln!("warning: {message}"),
            Level::Error => eprintln!("error: {message}"),
        }
    }

    fn begin_progress(&mut self, message: &str) {
        self.progress = std::io::stderr().is_terminal();
        if self.progress {
            eprint!("{message}...");
            let _ = std::io::stderr().flush();
        }
    }

    fn end_progress(&mut self) {
        if self.progress {
            eprintln!(" done");
            self.progress = false;
        }
    }

    fn open_url(&mut self, url: &str) -> bool {
        if self.no_browser {
            return false;
        }
        match open::that(url) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, url, "could not launch browser");
                false
            }
        }
    }
}
