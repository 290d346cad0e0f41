//! Executes scenario steps against a fresh browsing session.

use crate::browser::Browser;
use crate::commands::CommandRegistry;
use crate::config::Config;
use crate::error::{Result, TatError};
use crate::fixtures::FixtureStore;
use crate::http::{HttpClient, ReqwestClient};
use crate::poll::{poll_until, RetryPolicy, Settle};
use crate::site::Site;
use crate::steps::Step;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Immutable inputs shared by every scenario of a run.
#[derive(Clone)]
pub struct RunContext {
    pub config: Config,
    pub registry: CommandRegistry,
    pub site: Arc<Site>,
    pub http: Arc<dyn HttpClient>,
    pub fixture_root: PathBuf,
}

impl RunContext {
    /// Context described by `config`: the configured site (or the embedded
    /// CAC TAT site), the configured fixture root (or the bundled one), the
    /// built-in commands and a `reqwest` client.
    pub fn new(config: Config) -> Result<Self> {
        let site = match &config.fixtures.site {
            Some(path) => Site::load(path)?,
            None => Site::cac_tat()?,
        };
        let fixture_root = config
            .fixtures
            .root
            .clone()
            .unwrap_or_else(|| FixtureStore::bundled().root().to_path_buf());
        let http = Arc::new(ReqwestClient::new(config.http.clone()));

        Ok(Self {
            config,
            registry: CommandRegistry::builtin(),
            site: Arc::new(site),
            http,
            fixture_root,
        })
    }

    pub fn with_http(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = http;
        self
    }

    pub fn with_registry(mut self, registry: CommandRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_site(mut self, site: Site) -> Self {
        self.site = Arc::new(site);
        self
    }

    pub fn with_fixture_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.fixture_root = root.into();
        self
    }

    /// Assertion retry budget from the config.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from(&self.config.retry)
    }
}

/// Executes one scenario's steps in order
pub struct ScenarioRunner<'a> {
    ctx: &'a RunContext,
    browser: Browser,
    fixtures: FixtureStore,
    retry: RetryPolicy,
    current_step: usize,
    current_description: Option<String>,
    declared_step: Option<usize>,
    current_command: Option<String>,
}

impl<'a> ScenarioRunner<'a> {
    /// Open a session on the site's entry page.
    pub fn new(ctx: &'a RunContext, retry: RetryPolicy) -> Result<Self> {
        let browser = Browser::open(Arc::clone(&ctx.site), ctx.config.clock.timer_step_limit)?;
        Ok(Self {
            ctx,
            browser,
            fixtures: FixtureStore::new(&ctx.fixture_root),
            retry,
            current_step: 0,
            current_description: None,
            declared_step: None,
            current_command: None,
        })
    }

    /// Index of the step being (or last) executed.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Description of the step being (or last) executed, if any started.
    pub fn current_description(&self) -> Option<&str> {
        self.current_description.as_deref()
    }

    /// Index of the step as written, before command expansion.
    pub fn declared_step(&self) -> Option<usize> {
        self.declared_step
    }

    /// Command the current step was expanded from, if any.
    pub fn current_command(&self) -> Option<&str> {
        self.current_command.as_deref()
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Expand commands, then execute all steps in sequence. Stops at the
    /// first failure.
    pub fn execute(&mut self, steps: Vec<Step>) -> Result<usize> {
        let declared = steps.len();
        let plan = self.plan(steps)?;
        for (i, (origin, command, step)) in plan.iter().enumerate() {
            self.current_step = i;
            self.current_description = Some(step.to_string());
            self.declared_step = Some(*origin);
            self.current_command = command.clone();
            debug!(step = i, declared = origin, %step, "executing");
            if let Err(err) = self.execute_step(step) {
                warn!(step = i, declared = origin, %step, error = %err, "step failed");
                return Err(err);
            }
        }
        self.current_step = plan.len();
        self.declared_step = Some(declared);
        self.current_command = None;
        Ok(plan.len())
    }

    /// Expanded steps tagged with the declared index and command they came from.
    fn plan(&self, steps: Vec<Step>) -> Result<Vec<(usize, Option<String>, Step)>> {
        let mut plan = Vec::with_capacity(steps.len());
        for (origin, step) in steps.into_iter().enumerate() {
            let command = match &step {
                Step::Command { name } => Some(name.clone()),
                _ => None,
            };
            for expanded in self.ctx.registry.expand(vec![step])? {
                plan.push((origin, command.clone(), expanded));
            }
        }
        Ok(plan)
    }

    fn execute_step(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Visit { path } => self.browser.visit(path),
            Step::Type { target, text } => {
                self.browser.type_text(target, text)?;
                self.settle()
            }
            Step::Clear { target } => {
                self.browser.clear(target)?;
                self.settle()
            }
            Step::Click { target } => {
                self.browser.click(target)?;
                self.settle()
            }
            Step::Check { target } => {
                self.browser.check(target)?;
                self.settle()
            }
            Step::Uncheck { target } => {
                self.browser.uncheck(target)?;
                self.settle()
            }
            Step::Select { target, option } => {
                self.browser.select(target, option)?;
                self.settle()
            }
            Step::SelectFile {
                target,
                source,
                action,
            } => {
                let file = self.fixtures.load(source)?;
                self.browser.select_file(target, file, *action)?;
                self.settle()
            }
            Step::Invoke { target, call } => {
                self.browser.invoke(target, call)?;
                self.settle()
            }
            Step::InstallClock => {
                self.browser.install_clock();
                Ok(())
            }
            Step::Tick { ms } => {
                let fired = self.browser.tick(*ms)?;
                debug!(ms, fired, "clock advanced");
                Ok(())
            }
            Step::Alias { name, fixture } => self.fixtures.alias(name, fixture),
            Step::Command { name } => Err(TatError::UndefinedCommand(name.clone())),
            Step::Request { url, expect } => {
                let response = self.ctx.http.get(url)?;
                expect.check(url, &response)
            }
            Step::Assert { assertion } => {
                let attempts =
                    poll_until(&self.retry, &mut self.browser, |b| assertion.evaluate(b))?;
                if attempts > 1 {
                    debug!(attempts, %assertion, "assertion settled");
                }
                Ok(())
            }
        }
    }

    fn settle(&mut self) -> Result<()> {
        self.browser.settle().map(|_| ())
    }
}
