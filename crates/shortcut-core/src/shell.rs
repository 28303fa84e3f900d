//! Ordered command steps run in the project root.
//!
//! Each step yields its own [`StepResult`]; [`execute`] never returns an error,
//! failures are captured in the [`Report`] and logged. The caller picks a
//! [`FailurePolicy`] to decide whether a failed step stops the rest.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub program: String,
    pub args: Vec<String>,
    /// Run when this step fails; the step then takes the fallback's result.
    pub fallback: Option<Box<Step>>,
}

impl Step {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            fallback: None,
        }
    }

    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new("git", args)
    }

    pub fn or_else(mut self, fallback: Step) -> Self {
        self.fallback = Some(Box::new(fallback));
        self
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('"') {
                write!(f, " \"{}\"", arg.replace('"', "\\\""))?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        if let Some(fallback) = &self.fallback {
            write!(f, " || {fallback}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of a single process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Trimmed stdout, or stderr when stdout is empty.
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub step: Step,
    pub succeeded: bool,
    pub output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    StopOnFailure,
    RunAll,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub results: Vec<StepResult>,
}

impl Report {
    pub fn succeeded(&self) -> bool {
        self.results.iter().all(|r| r.succeeded)
    }

    pub fn first_failure(&self) -> Option<&StepResult> {
        self.results.iter().find(|r| !r.succeeded)
    }

    /// Output of the last step that ran.
    pub fn output(&self) -> &str {
        self.results.last().map(|r| r.output.as_str()).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Shell
// ---------------------------------------------------------------------------

pub trait Shell {
    /// Run one program to completion. Must not panic or return early on
    /// spawn errors; report them as a failed [`CommandOutput`] instead.
    fn command(&self, program: &str, args: &[String]) -> CommandOutput;
}

/// Run `step`, falling back to `step.fallback` when it fails.
pub fn run_step(shell: &dyn Shell, step: &Step) -> StepResult {
    tracing::debug!(step = %step, "running step");
    let out = shell.command(&step.program, &step.args);
    if !out.success {
        if let Some(fallback) = &step.fallback {
            tracing::debug!(fallback = %fallback, "step failed, trying fallback");
            let result = run_step(shell, fallback);
            return StepResult {
                step: step.clone(),
                succeeded: result.succeeded,
                output: result.output,
            };
        }
        tracing::warn!(step = %step, output = %out.output, "step failed");
    }
    StepResult {
        step: step.clone(),
        succeeded: out.success,
        output: out.output,
    }
}

/// Run `steps` in order.
pub fn execute(shell: &dyn Shell, steps: &[Step], policy: FailurePolicy) -> Report {
    let mut report = Report::default();
    for step in steps {
        let result = run_step(shell, step);
        let failed = !result.succeeded;
        report.results.push(result);
        if failed && policy == FailurePolicy::StopOnFailure {
            break;
        }
    }
    report
}

// ---------------------------------------------------------------------------
// SystemShell
// ---------------------------------------------------------------------------

/// Spawns real processes with the project root as working directory.
pub struct SystemShell {
    root: PathBuf,
}

impl SystemShell {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl Shell for SystemShell {
    fn command(&self, program: &str, args: &[String]) -> CommandOutput {
        let path = match which::which(program) {
            Ok(p) => p,
            Err(_) => {
                return CommandOutput {
                    success: false,
                    output: format!("{program} not found on PATH"),
                }
            }
        };

        match Command::new(path).args(args).current_dir(&self.root).output() {
            Ok(out) => {
                let stdout = String::from_utf8_lossy(&out.stdout).trim().to_string();
                let output = if stdout.is_empty() {
                    String::from_utf8_lossy(&out.stderr).trim().to_string()
                } else {
                    stdout
                };
                CommandOutput {
                    success: out.status.success(),
                    output,
                }
            }
            Err(e) => CommandOutput {
                success: false,
                output: format!("failed to run {program}: {e}"),
            },
        }
    }
}
