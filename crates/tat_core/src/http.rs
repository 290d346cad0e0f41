//! HTTP collaborator for request steps.

use crate::config::HttpConfig;
use crate::error::{Result, TatError};
use hyper::ext::ReasonPhrase;
use reqwest::StatusCode;
use tracing::debug;

/// The parts of a response scenarios assert on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

/// Performs GET requests on behalf of the runner.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// Blocking `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    config: HttpConfig,
}

impl ReqwestClient {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let transport = |e: reqwest::Error| TatError::HttpTransport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout())
            .user_agent(self.config.user_agent.as_str())
            .build()
            .map_err(transport)?;

        debug!(url, "GET");
        let response = client.get(url).send().map_err(transport)?;
        let status = response.status();
        let status_text = status_text(status, response.extensions().get::<ReasonPhrase>());
        let body = response.text().map_err(transport)?;
        debug!(url, status = status.as_u16(), bytes = body.len(), "response received");

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

/// Reason phrase as sent by the server. hyper only records one that
/// differs from the canonical phrase.
fn status_text(status: StatusCode, sent: Option<&ReasonPhrase>) -> String {
    match sent {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => status.canonical_reason().unwrap_or_default().to_string(),
    }
}

/// Expected properties of a response; unset fields are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseExpectation {
    pub status: Option<u16>,
    pub status_text: Option<String>,
    pub body_contains: Option<String>,
}

impl ResponseExpectation {
    /// 200 / "OK" with `text` somewhere in the body.
    pub fn ok_containing(text: &str) -> Self {
        Self {
            status: Some(200),
            status_text: Some("OK".to_string()),
            body_contains: Some(text.to_string()),
        }
    }

    /// Check a response, reporting the first mismatch.
    pub fn check(&self, url: &str, response: &HttpResponse) -> Result<()> {
        let mismatch = |expected: String, actual: String| TatError::HttpExpectation {
            url: url.to_string(),
            expected,
            actual,
        };

        if let Some(status) = self.status {
            if response.status != status {
                return Err(mismatch(
                    format!("status {}", status),
                    format!("status {}", response.status),
                ));
            }
        }
        if let Some(text) = &self.status_text {
            if &response.status_text != text {
                return Err(mismatch(
                    format!("status text {:?}", text),
                    format!("status text {:?}", response.status_text),
                ));
            }
        }
        if let Some(needle) = &self.body_contains {
            if !response.body.contains(needle.as_str()) {
                return Err(mismatch(
                    format!("body containing {:?}", needle),
                    format!("{} byte body without it", response.body.len()),
                ));
            }
        }
        Ok(())
    }
}
