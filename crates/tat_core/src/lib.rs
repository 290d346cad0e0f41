//! TAT Core Library
//!
//! A declarative UI-scenario runner over a simulated contact-form page:
//! - Site fixtures loaded into selector-addressable documents
//! - Form behavior (validation, transient messages, uploads, links)
//! - Virtual time control for timer-driven UI
//! - Command macros expanded before a scenario runs
//! - One HTTP collaborator for request steps
//!
//! # Quick Start
//!
//! ```
//! use tat_core::{Scenario, Target};
//!
//! Scenario::new("phone stays empty")
//!     .type_text(Target::css("#phone"), "testing")
//!     .assert_value(Target::css("#phone"), "")
//!     .run()
//!     .unwrap();
//! ```
//!
//! # Virtual Time
//!
//! Installing the clock freezes timers until a tick moves time forward:
//!
//! ```
//! use tat_core::{Scenario, Target};
//!
//! Scenario::new("success message hides after three seconds")
//!     .install_clock()
//!     .command("fillMandatoryFieldsAndSubmit")
//!     .assert_visible(Target::css(".success"))
//!     .tick(2999)
//!     .assert_visible(Target::css(".success"))
//!     .tick(1)
//!     .assert_not_visible(Target::css(".success"))
//!     .run()
//!     .unwrap();
//! ```
//!
//! # Suites
//!
//! [`run_suite`] runs scenarios one after another, each on a fresh page,
//! and collects a serializable [`SuiteReport`].

mod assertions;
mod browser;
mod clock;
mod commands;
mod config;
mod dom;
mod error;
mod fixtures;
mod http;
mod poll;
mod runner;
mod scenario;
mod selector;
mod site;
mod steps;
mod suite;

pub use assertions::Assertion;
pub use browser::{is_valid_email, Browser, Submission, TimerTask};
pub use clock::{TimeSource, Timer, TimerId, VirtualClock};
pub use commands::{CommandFactory, CommandRegistry, FILL_MANDATORY_FIELDS_AND_SUBMIT};
pub use config::{
    ClockConfig, Config, FixturesConfig, HttpConfig, RetryConfig, CONFIG_FILE_NAME,
};
pub use dom::{ControlKind, Document, Element, ElementId, FileMeta, SelectOption};
pub use error::{Result, TatError};
pub use fixtures::{FileSource, FixtureStore};
pub use http::{HttpClient, HttpResponse, ReqwestClient, ResponseExpectation};
pub use poll::{poll_until, RetryPolicy, Settle};
pub use runner::{RunContext, ScenarioRunner};
pub use scenario::{Scenario, ScenarioResult};
pub use selector::Selector;
pub use site::{FormRules, Page, Site};
pub use steps::{Invocation, OptionRef, Pick, Query, Step, Target, UploadAction};
pub use suite::{
    cac_tat_suite, run_suite, SuiteOptions, SuiteReport, CAC_TAT_URL, THREE_SECONDS_IN_MS,
};
