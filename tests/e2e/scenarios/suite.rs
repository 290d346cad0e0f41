use crate::harness::{fast_context, StubServer};
use std::sync::Arc;
use tat_core::{
    cac_tat_suite, run_suite, HttpClient, HttpResponse, ReqwestClient, Result, SuiteOptions,
};

#[test]
fn test_builtin_suite_passes_offline() {
    let ctx = fast_context().unwrap();
    let options = SuiteOptions {
        filter: None,
        offline: true,
    };
    let report = run_suite(cac_tat_suite(), &ctx, &options, |_| {});

    let failures: Vec<String> = report
        .failures()
        .map(|r| format!("{}: {}", r.name, r.error.as_deref().unwrap_or("")))
        .collect();
    assert!(failures.is_empty(), "failures: {:#?}", failures);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.passed, cac_tat_suite().len() - 1);
}

/// Sends every request to the stub regardless of the URL asked for.
struct Redirect {
    inner: ReqwestClient,
    url: String,
}

impl HttpClient for Redirect {
    fn get(&self, _url: &str) -> Result<HttpResponse> {
        self.inner.get(&self.url)
    }
}

#[test]
fn test_builtin_suite_network_scenario_against_stub() {
    let server = StubServer::start(200, "OK", "<h1>CAC TAT</h1>").unwrap();
    let http = Arc::new(Redirect {
        inner: ReqwestClient::default(),
        url: server.url("index.html"),
    });
    let ctx = fast_context().unwrap().with_http(http);
    let options = SuiteOptions {
        filter: Some("http request".into()),
        offline: false,
    };

    let report = run_suite(cac_tat_suite(), &ctx, &options, |_| {});
    assert_eq!(report.results.len(), 1);
    assert!(report.is_success());
    assert_eq!(report.skipped, 0);
    assert_eq!(server.hits(), 1);
}

#[test]
fn test_report_serializes_to_json() {
    let ctx = fast_context().unwrap();
    let options = SuiteOptions {
        filter: Some("title".into()),
        offline: true,
    };
    let report = run_suite(cac_tat_suite(), &ctx, &options, |_| {});
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["passed"], 1);
    assert_eq!(json["results"][0]["name"], "check application title");
    assert_eq!(json["results"][0]["success"], true);
    assert_eq!(json["run_id"].as_str().unwrap().len(), 36);
}
