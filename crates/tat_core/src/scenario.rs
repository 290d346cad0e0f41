use crate::assertions::Assertion;
use crate::browser::Browser;
use crate::config::Config;
use crate::error::Result;
use crate::fixtures::FileSource;
use crate::http::ResponseExpectation;
use crate::poll::RetryPolicy;
use crate::runner::{RunContext, ScenarioRunner};
use crate::steps::{Invocation, OptionRef, Step, Target, UploadAction};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Fluent DSL for building scenarios
pub struct Scenario {
    name: String,
    steps: Vec<Step>,
    retry: Option<RetryPolicy>,
    requires_network: bool,
}

impl Scenario {
    /// Create a new scenario with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            steps: Vec::new(),
            retry: None,
            requires_network: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether the scenario talks to the network.
    pub fn needs_network(&self) -> bool {
        self.requires_network
    }

    // ===== Setup =====

    /// Override the assertion retry budget for this scenario
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Mark the scenario as needing network access
    pub fn requires_network(mut self) -> Self {
        self.requires_network = true;
        self
    }

    /// Append an already built step
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    // ===== Navigation =====

    pub fn visit(self, path: &str) -> Self {
        self.step(Step::Visit {
            path: path.to_string(),
        })
    }

    // ===== User actions =====

    pub fn type_text(self, target: Target, text: &str) -> Self {
        self.step(Step::Type {
            target,
            text: text.to_string(),
        })
    }

    pub fn clear(self, target: Target) -> Self {
        self.step(Step::Clear { target })
    }

    pub fn click(self, target: Target) -> Self {
        self.step(Step::Click { target })
    }

    pub fn check(self, target: Target) -> Self {
        self.step(Step::Check { target })
    }

    pub fn uncheck(self, target: Target) -> Self {
        self.step(Step::Uncheck { target })
    }

    /// Select by value or visible text (`&str`) or by index (`usize`)
    pub fn select(self, target: Target, option: impl Into<OptionRef>) -> Self {
        self.step(Step::Select {
            target,
            option: option.into(),
        })
    }

    /// Choose a file; `source` is a fixture path or `@alias`
    pub fn select_file(self, target: Target, source: &str) -> Self {
        self.step(Step::SelectFile {
            target,
            source: FileSource::from(source),
            action: UploadAction::Select,
        })
    }

    /// Drop a file onto the input
    pub fn drag_file(self, target: Target, source: &str) -> Self {
        self.step(Step::SelectFile {
            target,
            source: FileSource::from(source),
            action: UploadAction::DragDrop,
        })
    }

    pub fn invoke(self, target: Target, call: Invocation) -> Self {
        self.step(Step::Invoke { target, call })
    }

    pub fn show(self, target: Target) -> Self {
        self.invoke(target, Invocation::Show)
    }

    pub fn hide(self, target: Target) -> Self {
        self.invoke(target, Invocation::Hide)
    }

    pub fn set_value(self, target: Target, value: &str) -> Self {
        self.invoke(target, Invocation::SetValue(value.to_string()))
    }

    pub fn set_text(self, target: Target, text: &str) -> Self {
        self.invoke(target, Invocation::SetText(text.to_string()))
    }

    pub fn remove_attr(self, target: Target, name: &str) -> Self {
        self.invoke(target, Invocation::RemoveAttr(name.to_string()))
    }

    // ===== Time control =====

    /// Switch timers to virtual time starting at 0
    pub fn install_clock(self) -> Self {
        self.step(Step::InstallClock)
    }

    /// Advance virtual time, firing due timers
    pub fn tick(self, ms: u64) -> Self {
        self.step(Step::Tick { ms })
    }

    // ===== Fixtures, commands, network =====

    /// Make `@name` refer to a fixture file
    pub fn fixture_alias(self, fixture: &str, name: &str) -> Self {
        self.step(Step::Alias {
            name: name.to_string(),
            fixture: fixture.to_string(),
        })
    }

    /// Reference a registered command macro
    pub fn command(self, name: &str) -> Self {
        self.step(Step::Command {
            name: name.to_string(),
        })
    }

    pub fn request(self, url: &str, expect: ResponseExpectation) -> Self {
        self.step(Step::Request {
            url: url.to_string(),
            expect,
        })
    }

    // ===== Assertions =====

    pub fn assert(self, assertion: Assertion) -> Self {
        self.step(Step::Assert { assertion })
    }

    pub fn assert_exists(self, target: Target) -> Self {
        self.assert(Assertion::Exists(target))
    }

    pub fn assert_not_exists(self, target: Target) -> Self {
        self.assert(Assertion::NotExists(target))
    }

    pub fn assert_visible(self, target: Target) -> Self {
        self.assert(Assertion::Visible(target))
    }

    pub fn assert_not_visible(self, target: Target) -> Self {
        self.assert(Assertion::NotVisible(target))
    }

    pub fn assert_value(self, target: Target, expected: &str) -> Self {
        self.assert(Assertion::Value {
            target,
            expected: expected.to_string(),
        })
    }

    pub fn assert_no_value(self, target: Target) -> Self {
        self.assert(Assertion::NoValue(target))
    }

    pub fn assert_checked(self, target: Target) -> Self {
        self.assert(Assertion::Checked(target))
    }

    pub fn assert_not_checked(self, target: Target) -> Self {
        self.assert(Assertion::NotChecked(target))
    }

    pub fn assert_length(self, target: Target, expected: usize) -> Self {
        self.assert(Assertion::Length { target, expected })
    }

    pub fn assert_attr(self, target: Target, name: &str, expected: &str) -> Self {
        self.assert(Assertion::Attr {
            target,
            name: name.to_string(),
            expected: expected.to_string(),
        })
    }

    pub fn assert_contains_text(self, target: Target, text: &str) -> Self {
        self.assert(Assertion::ContainsText {
            target,
            text: text.to_string(),
        })
    }

    pub fn assert_title(self, expected: &str) -> Self {
        self.assert(Assertion::Title(expected.to_string()))
    }

    pub fn assert_file_name(self, target: Target, expected: &str) -> Self {
        self.assert(Assertion::FileName {
            target,
            expected: expected.to_string(),
        })
    }

    /// Custom check against the session
    pub fn assert_that<F>(self, check: F) -> Self
    where
        F: Fn(&Browser) -> Result<()> + Send + Sync + 'static,
    {
        self.assert(Assertion::Custom(Box::new(check)))
    }

    // ===== Execution =====

    /// Run with the default configuration
    pub fn run(self) -> ScenarioResult {
        match RunContext::new(Config::default()) {
            Ok(ctx) => self.run_with(&ctx),
            Err(e) => ScenarioResult::setup_failure(self.name, e.to_string()),
        }
    }

    /// Run against a prepared context
    pub fn run_with(self, ctx: &RunContext) -> ScenarioResult {
        let started = Instant::now();
        let retry = self.retry.unwrap_or_else(|| ctx.retry_policy());

        let mut runner = match ScenarioRunner::new(ctx, retry) {
            Ok(r) => r,
            Err(e) => {
                return ScenarioResult::setup_failure(
                    self.name,
                    format!("Failed to open page: {}", e),
                )
            }
        };

        let result = match runner.execute(self.steps) {
            Ok(executed) => ScenarioResult {
                name: self.name,
                success: true,
                skipped: false,
                steps_executed: executed,
                failure_step: None,
                declared_step: None,
                command: None,
                failed_step: None,
                error: None,
                hint: None,
                elapsed_ms: elapsed_ms(started),
            },
            Err(e) => {
                let failure_step = runner.current_step();
                ScenarioResult {
                    name: self.name,
                    success: false,
                    skipped: false,
                    steps_executed: failure_step,
                    failure_step: Some(failure_step),
                    declared_step: runner.declared_step(),
                    command: runner.current_command().map(str::to_string),
                    failed_step: runner.current_description().map(str::to_string),
                    error: Some(e.to_string()),
                    hint: e.hint().map(str::to_string),
                    elapsed_ms: elapsed_ms(started),
                }
            }
        };

        if result.success {
            info!(scenario = %result.name, steps = result.steps_executed, "scenario passed");
        } else {
            warn!(
                scenario = %result.name,
                step = result.failure_step.unwrap_or(0),
                error = result.error.as_deref().unwrap_or_default(),
                "scenario failed"
            );
        }
        result
    }

    /// Result for a scenario that was not run
    pub fn skip(self) -> ScenarioResult {
        info!(scenario = %self.name, "scenario skipped");
        ScenarioResult {
            name: self.name,
            success: true,
            skipped: true,
            steps_executed: 0,
            failure_step: None,
            declared_step: None,
            command: None,
            failed_step: None,
            error: None,
            hint: None,
            elapsed_ms: 0,
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Result of running a scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub skipped: bool,
    pub steps_executed: usize,
    /// Index into the expanded step list
    pub failure_step: Option<usize>,
    /// Index of the failing step as written in the scenario
    pub declared_step: Option<usize>,
    /// Command the failing step was expanded from
    pub command: Option<String>,
    /// Description of the step that failed
    pub failed_step: Option<String>,
    pub error: Option<String>,
    pub hint: Option<String>,
    pub elapsed_ms: u64,
}

impl ScenarioResult {
    fn setup_failure(name: String, error: String) -> Self {
        Self {
            name,
            success: false,
            skipped: false,
            steps_executed: 0,
            failure_step: Some(0),
            declared_step: None,
            command: None,
            failed_step: None,
            error: Some(error),
            hint: None,
            elapsed_ms: 0,
        }
    }

    /// Where the failure happened, in terms of the declared steps.
    pub fn location(&self) -> String {
        let step = self.failure_step.unwrap_or(0);
        match (self.declared_step, &self.command) {
            (Some(declared), Some(command)) => {
                format!("step {} (declared step {} via {})", step, declared, command)
            }
            (Some(declared), None) if declared != step => {
                format!("step {} (declared step {})", step, declared)
            }
            _ => format!("step {}", step),
        }
    }

    fn failure_message(&self) -> String {
        format!(
            "Scenario '{}' failed at {}{}: {}",
            self.name,
            self.location(),
            self.failed_step
                .as_deref()
                .map(|d| format!(" ({})", d))
                .unwrap_or_default(),
            self.error.as_deref().unwrap_or("unknown error")
        )
    }

    /// Unwrap the result, panicking if it failed
    pub fn unwrap(self) {
        if !self.success {
            panic!("{}", self.failure_message());
        }
    }

    /// Expect the result to be successful
    pub fn expect(self, msg: &str) {
        if !self.success {
            panic!("{}: {}", msg, self.failure_message());
        }
    }

    /// Unwrap the failure, panicking if the scenario passed
    pub fn unwrap_err(self) -> ScenarioResult {
        if self.success {
            panic!("Scenario '{}' was expected to fail but passed", self.name);
        }
        self
    }
}
