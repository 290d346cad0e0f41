//! Named step macros.
//!
//! A `command(name)` step is replaced by the steps its factory produces.
//! Expansion runs once over the whole scenario before the first step
//! executes, so an unknown name fails the scenario before anything happens
//! on the page.

use crate::error::{Result, TatError};
use crate::steps::{Step, Target};
use std::collections::HashMap;

/// Produces a fresh copy of a macro's steps.
pub type CommandFactory = fn() -> Vec<Step>;

/// Name of the built-in form macro.
pub const FILL_MANDATORY_FIELDS_AND_SUBMIT: &str = "fillMandatoryFieldsAndSubmit";

/// Static name → factory table.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandFactory>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the CAC TAT commands.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(FILL_MANDATORY_FIELDS_AND_SUBMIT, fill_mandatory_fields_and_submit);
        registry
    }

    /// Register a command, returning the factory it replaced.
    pub fn register(&mut self, name: &str, factory: CommandFactory) -> Option<CommandFactory> {
        self.commands.insert(name.to_string(), factory)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Replace every command step with its expansion, recursively.
    pub fn expand(&self, steps: Vec<Step>) -> Result<Vec<Step>> {
        let mut out = Vec::with_capacity(steps.len());
        let mut stack = Vec::new();
        self.expand_into(steps, &mut stack, &mut out)?;
        Ok(out)
    }

    fn expand_into(&self, steps: Vec<Step>, stack: &mut Vec<String>, out: &mut Vec<Step>) -> Result<()> {
        for step in steps {
            let Step::Command { name } = step else {
                out.push(step);
                continue;
            };

            if stack.contains(&name) {
                let mut chain = stack.join(" -> ");
                chain.push_str(" -> ");
                chain.push_str(&name);
                return Err(TatError::CommandCycle(chain));
            }
            let factory = self
                .commands
                .get(&name)
                .ok_or_else(|| TatError::UndefinedCommand(name.clone()))?;

            stack.push(name);
            self.expand_into(factory(), stack, out)?;
            stack.pop();
        }
        Ok(())
    }
}

fn fill_mandatory_fields_and_submit() -> Vec<Step> {
    let typed = |selector: &str, text: &str| Step::Type {
        target: Target::css(selector),
        text: text.to_string(),
    };
    vec![
        typed("#firstName", "Andressa"),
        typed("#lastName", "Roberts"),
        typed("#email", "teste@teste.com"),
        typed("#open-text-area", "Houston, we have a problem"),
        Step::Click {
            target: Target::contains("button", "Enviar"),
        },
    ]
}
