//! Test doubles: a scripted in-process generator and a fake HTTP provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;

use super::{GeneratorFactory, ProviderError, TextGenerator};

type Responder = dyn Fn(&str, usize) -> Result<String, ProviderError> + Send + Sync;

pub(crate) struct StubGenerator {
    calls: AtomicUsize,
    delay: Option<Duration>,
    responder: Box<Responder>,
}

impl StubGenerator {
    pub(crate) fn new(
        responder: impl Fn(&str, usize) -> Result<String, ProviderError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: None,
            responder: Box::new(responder),
        }
    }

    /// Answers with a report derived from the fenced activity block.
    pub(crate) fn echo() -> Self {
        Self::new(|prompt, _| Ok(format!("Bericht über {}", activities_of(prompt))))
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(prompt, n)
    }
}

/// Activity text between the trailing `---` fences of a report prompt.
pub(crate) fn activities_of(prompt: &str) -> &str {
    prompt.rsplit("---\n").nth(1).unwrap_or_default().trim()
}

pub(crate) struct StubFactory {
    pub(crate) generator: Arc<StubGenerator>,
    builds: AtomicUsize,
}

impl StubFactory {
    pub(crate) fn new(generator: StubGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
            builds: AtomicUsize::new(0),
        }
    }

    pub(crate) fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl GeneratorFactory for StubFactory {
    fn with_api_key(&self, _api_key: String) -> Arc<dyn TextGenerator> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.generator.clone()
    }
}

#[derive(Default)]
struct FakeState {
    script: Vec<(StatusCode, Value)>,
    hits: AtomicUsize,
    last_auth: Mutex<Option<String>>,
    last_body: Mutex<Option<Value>>,
}

/// Chat-completions endpoint on loopback that replays `script` in order,
/// repeating the last entry once exhausted.
pub(crate) struct FakeProvider {
    pub(crate) url: String,
    state: Arc<FakeState>,
}

impl FakeProvider {
    pub(crate) fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub(crate) fn last_auth(&self) -> Option<String> {
        self.state.last_auth.lock().unwrap().clone()
    }

    pub(crate) fn last_body(&self) -> Option<Value> {
        self.state.last_body.lock().unwrap().clone()
    }
}

pub(crate) async fn spawn_fake_provider(script: Vec<(StatusCode, Value)>) -> FakeProvider {
    assert!(!script.is_empty(), "fake provider needs at least one response");
    let state = Arc::new(FakeState {
        script,
        ..FakeState::default()
    });

    let app = Router::new()
        .route("/v1/chat/completions", post(fake_completion))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeProvider {
        url: format!("http://{addr}/v1/chat/completions"),
        state,
    }
}

async fn fake_completion(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let n = state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_auth.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_body.lock().unwrap() = Some(body);

    let (status, reply) = &state.script[n.min(state.script.len() - 1)];
    (*status, Json(reply.clone()))
}
