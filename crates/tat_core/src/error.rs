//! Error types for tat_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for scenario execution and page simulation.
#[derive(Error, Debug)]
pub enum TatError {
    /// No element matched the target.
    #[error("element not found: {0}")]
    SelectorNotFound(String),

    /// The target matched more than one element where exactly one is required.
    #[error("{target} matched {count} elements, expected exactly one")]
    AmbiguousTarget {
        /// Rendered target description
        target: String,
        /// Number of matches
        count: usize,
    },

    /// The selector string uses syntax outside the supported subset.
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// The raw selector
        selector: String,
        /// What could not be parsed
        reason: String,
    },

    /// The element exists but cannot receive the requested action.
    #[error("cannot {action} {target}: {reason}")]
    NotInteractable {
        /// Action name (type, click, check, ...)
        action: &'static str,
        /// Rendered target description
        target: String,
        /// Why the element refused the action
        reason: String,
    },

    /// An assertion did not hold before the retry budget ran out.
    #[error("assertion failed on {target}: expected {expected}, got {actual}")]
    AssertionFailed {
        /// Rendered target description
        target: String,
        /// Expected state
        expected: String,
        /// Observed state
        actual: String,
    },

    /// A step referenced a command that was never registered.
    #[error("undefined command: {0}")]
    UndefinedCommand(String),

    /// Command expansion re-entered a command already being expanded.
    #[error("command cycle detected: {0}")]
    CommandCycle(String),

    /// An upload referenced an alias that no earlier step defined.
    #[error("unknown fixture alias: @{0}")]
    UnknownAlias(String),

    /// A fixture file could not be read.
    #[error("fixture not found at {}", path.display())]
    FixtureNotFound {
        /// Resolved fixture path
        path: PathBuf,
    },

    /// The site description is malformed.
    #[error("invalid site fixture: {0}")]
    InvalidSite(String),

    /// Navigation to a path the site does not contain.
    #[error("page not found in site: {0}")]
    PageNotFound(String),

    /// The HTTP request could not be completed.
    #[error("request to {url} failed: {reason}")]
    HttpTransport {
        /// Requested URL
        url: String,
        /// Transport error description
        reason: String,
    },

    /// The HTTP response did not meet the expectation.
    #[error("response from {url}: expected {expected}, got {actual}")]
    HttpExpectation {
        /// Requested URL
        url: String,
        /// Expected property
        expected: String,
        /// Observed property
        actual: String,
    },

    /// Timer firing exceeded the configured step limit during one advance.
    #[error("timer queue exceeded {limit} steps while advancing to {target_ms}ms")]
    TimerStepLimit {
        /// Configured limit
        limit: usize,
        /// Virtual time the advance was heading to
        target_ms: u64,
    },

    /// Clock control used in an invalid way.
    #[error("clock error: {0}")]
    Clock(String),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A custom assertion closure reported a failure.
    #[error("custom assertion failed: {0}")]
    Custom(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TatError {
    /// Returns a short recovery hint for the error, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::SelectorNotFound(_) => {
                Some("Check the selector against the site fixture, or the page the scenario is on.")
            }
            Self::UndefinedCommand(_) => {
                Some("Register the command in the CommandRegistry passed to the runner.")
            }
            Self::UnknownAlias(_) => {
                Some("Add an alias step (Scenario::fixture_alias) before the upload.")
            }
            Self::FixtureNotFound { .. } => {
                Some("Point [fixtures] root in tat.toml (or --fixtures) at the fixture directory.")
            }
            Self::HttpTransport { .. } => Some("Run with --offline to skip network scenarios."),
            Self::TimerStepLimit { .. } => {
                Some("A timer keeps rescheduling itself; raise [clock] timer_step_limit if intended.")
            }
            _ => None,
        }
    }
}

/// Convenience Result type for tat_core operations.
pub type Result<T> = std::result::Result<T, TatError>;
