//! E2E test harness for TAT.
//!
//! Shared contexts, temporary fixture directories and a loopback HTTP stub.

#![allow(dead_code)]

pub mod context;
pub mod http_stub;
pub mod workspace;

pub use context::{fast_context, fast_retry, newsletter_site, test_fixtures_dir};
pub use http_stub::{closed_port_url, StubServer};
pub use workspace::FixtureDir;
