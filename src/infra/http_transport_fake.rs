use crate::domain_model::Envelope;
use crate::domain_port::*;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

type Reply = Result<HttpResponse, TransportError>;

#[derive(Default)]
struct Route {
    queued: VecDeque<Reply>,
    sticky: Option<Reply>,
}

/// Scripted transport. Records every request; answers by path.
///
/// Queued replies are used once each, in order, before the sticky reply.
/// Paths without a script fail as a network error.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<HttpRequest>>,
    latency: Duration,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn route<R>(&self, path: &str, f: impl FnOnce(&mut Route) -> R) -> R {
        let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        f(routes.entry(path.to_owned()).or_default())
    }

    pub fn respond(&self, path: &str, status: u16, body: &str) {
        let reply = Ok(HttpResponse {
            status,
            body: body.to_owned(),
        });
        self.route(path, |r| r.sticky = Some(reply));
    }

    pub fn respond_ok<T: Serialize>(&self, path: &str, envelope: Envelope<T>) {
        let body = serde_json::to_string(&envelope).unwrap_or_default();
        self.respond(path, 200, &body);
    }

    pub fn enqueue(&self, path: &str, status: u16, body: &str) {
        let reply = Ok(HttpResponse {
            status,
            body: body.to_owned(),
        });
        self.route(path, |r| r.queued.push_back(reply));
    }

    pub fn fail(&self, path: &str, error: TransportError) {
        self.route(path, |r| r.sticky = Some(Err(error)));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait::async_trait]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = request.path.clone();
        let method = request.method;
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let reply = {
            let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
            routes
                .get_mut(&path)
                .and_then(|r| r.queued.pop_front().or_else(|| r.sticky.clone()))
        };
        reply.unwrap_or_else(|| Err(TransportError::Network(format!("no route for {} {}", method, path))))
    }
}
