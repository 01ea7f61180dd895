#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use shortlink::application::services::VisitRecorder;
use shortlink::domain::repositories::MappingRepository;
use shortlink::domain::visit_event::VisitEvent;
use shortlink::domain::visit_stats::VisitStats;
use shortlink::domain::visit_worker::VisitWorkerPool;
use shortlink::infrastructure::persistence::InMemoryMappingRepository;
use shortlink::routes::app_router;
use shortlink::state::AppState;
use shortlink::utils::token_generator::{RandomTokenGenerator, TOKEN_LENGTH};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tower::Layer;

pub const BASE_URL: &str = "http://short.test";
pub const CLIENT_ADDR: &str = "127.0.0.1:12345";

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = CLIENT_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn create_test_state(
    repository: Arc<dyn MappingRepository>,
    queue_capacity: usize,
) -> (AppState, mpsc::Receiver<VisitEvent>, Arc<VisitStats>) {
    let stats = Arc::new(VisitStats::default());
    let (recorder, rx) = VisitRecorder::channel(queue_capacity, stats.clone());

    let state = AppState::new(
        repository,
        Arc::new(RandomTokenGenerator),
        recorder,
        BASE_URL,
        20,
    );

    (state, rx, stats)
}

pub fn create_test_server(state: AppState) -> TestServer {
    let app = app_router(state).layer(MockConnectInfoLayer);
    TestServer::new(app).unwrap()
}

/// A full application over the in-memory repository with visit workers running.
pub struct TestApp {
    pub server: TestServer,
    pub repository: Arc<InMemoryMappingRepository>,
    pub stats: Arc<VisitStats>,
    pub workers: VisitWorkerPool,
}

pub fn spawn_app() -> TestApp {
    let repository = Arc::new(InMemoryMappingRepository::new());
    let (state, rx, stats) = create_test_state(repository.clone(), 100);
    let workers = VisitWorkerPool::spawn(rx, repository.clone(), stats.clone(), 2);

    TestApp {
        server: create_test_server(state),
        repository,
        stats,
        workers,
    }
}

/// Finds the first token-shaped run of hex characters in a response body.
pub fn extract_token(body: &str) -> String {
    body.as_bytes()
        .windows(TOKEN_LENGTH)
        .find(|w| w.iter().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')))
        .map(|w| String::from_utf8(w.to_vec()).unwrap())
        .expect("no token in response body")
}

/// Polls until the mapping's visit count reaches `expected` or two seconds pass.
pub async fn wait_for_visit_count(
    repository: &InMemoryMappingRepository,
    token: &str,
    expected: i64,
) -> i64 {
    let deadline = Instant::now() + Duration::from_secs(2);

    loop {
        let count = repository.lookup(token).await.unwrap().visit_count;
        if count >= expected || Instant::now() >= deadline {
            return count;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
