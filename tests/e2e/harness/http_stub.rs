use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use hyper::ext::ReasonPhrase;
use std::net::TcpListener as StdTcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tokio::runtime::Builder;
use tokio::sync::oneshot;

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    reason: ReasonPhrase,
    body: Arc<str>,
    hits: Arc<AtomicUsize>,
}

/// Loopback HTTP server answering every path with the same response.
pub struct StubServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
}

impl StubServer {
    /// Serve `body` with the given status line on an ephemeral port
    pub fn start(status: u16, reason: &str, body: &str) -> Result<Self> {
        let listener = StdTcpListener::bind("127.0.0.1:0").context("stub bind failed")?;
        listener
            .set_nonblocking(true)
            .context("stub listener nonblocking failed")?;
        let addr = listener.local_addr()?;

        let hits = Arc::new(AtomicUsize::new(0));
        let state = StubState {
            status: StatusCode::from_u16(status)?,
            reason: ReasonPhrase::try_from(reason.to_string())?,
            body: Arc::from(body),
            hits: Arc::clone(&hits),
        };
        let app = Router::new().fallback(respond).with_state(state);

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("stub runtime failed")?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let join = thread::spawn(move || {
            runtime.block_on(async move {
                let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                    return;
                };
                let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                });
                let _ = server.await;
            });
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            hits,
            shutdown: Some(shutdown_tx),
            join: Some(join),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Number of requests answered so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

async fn respond(State(state): State<StubState>) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let mut response = (
        state.status,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        state.body.to_string(),
    )
        .into_response();
    response.extensions_mut().insert(state.reason);
    response
}

/// URL on a port nothing listens on.
pub fn closed_port_url() -> Result<String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}/index.html", addr))
}
