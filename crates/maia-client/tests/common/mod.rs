//! In-process MAIA stand-in: serves canned responses and records requests.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One request as seen by the server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    /// Raw (still percent-encoded) path.
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum StubBody {
    Json(Value),
    Text(String),
    Empty,
}

/// Canned response for one method + path.
#[derive(Debug, Clone)]
pub struct Stub {
    method: Method,
    path: String,
    status: u16,
    body: StubBody,
    delay: Option<Duration>,
    headers: Vec<(&'static str, String)>,
}

impl Stub {
    pub fn json(method: Method, path: &str, status: u16, body: Value) -> Self {
        Self::new(method, path, status, StubBody::Json(body))
    }

    pub fn text(method: Method, path: &str, status: u16, body: &str) -> Self {
        Self::new(method, path, status, StubBody::Text(body.to_string()))
    }

    pub fn empty(method: Method, path: &str, status: u16) -> Self {
        Self::new(method, path, status, StubBody::Empty)
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        self.headers.push((name, value.to_string()));
        self
    }

    fn new(method: Method, path: &str, status: u16, body: StubBody) -> Self {
        Self {
            method,
            path: path.to_string(),
            status,
            body,
            delay: None,
            headers: Vec::new(),
        }
    }
}

struct Shared {
    stubs: Vec<Stub>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct MockServer {
    pub base_url: String,
    shared: Arc<Shared>,
}

impl MockServer {
    /// Serve `stubs` on the current tokio runtime.
    pub async fn start(stubs: Vec<Stub>) -> Self {
        let shared = Arc::new(Shared {
            stubs,
            requests: Mutex::new(Vec::new()),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(Arc::clone(&shared));
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service()).await.unwrap();
        });
        Self {
            base_url: format!("http://{}", addr),
            shared,
        }
    }

    /// Serve `stubs` from a dedicated runtime thread, for blocking-client tests.
    pub fn start_blocking(stubs: Vec<Stub>) -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async move {
                let server = MockServer::start(stubs).await;
                tx.send((server.base_url.clone(), Arc::clone(&server.shared)))
                    .unwrap();
                std::future::pending::<()>().await;
            });
        });
        let (base_url, shared) = rx.recv().unwrap();
        Self { base_url, shared }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.shared.requests.lock().unwrap().len()
    }

    /// The single recorded request; panics if there is not exactly one.
    pub fn only_request(&self) -> Recorded {
        let reqs = self.requests();
        assert_eq!(reqs.len(), 1, "expected one request, got {:?}", reqs);
        reqs.into_iter().next().unwrap()
    }
}

fn router(shared: Arc<Shared>) -> Router {
    Router::new().fallback(handle).with_state(shared)
}

async fn handle(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body_json = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };
    shared.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: body_json,
    });

    let stub = shared
        .stubs
        .iter()
        .find(|s| s.method == method && s.path == uri.path())
        .cloned();
    let Some(stub) = stub else {
        return (
            StatusCode::NOT_IMPLEMENTED,
            format!("no stub for {} {}", method, uri.path()),
        )
            .into_response();
    };
    if let Some(delay) = stub.delay {
        tokio::time::sleep(delay).await;
    }
    let status = StatusCode::from_u16(stub.status).unwrap();
    let mut res = match stub.body {
        StubBody::Json(v) => (status, axum::Json(v)).into_response(),
        StubBody::Text(t) => (status, t).into_response(),
        StubBody::Empty => status.into_response(),
    };
    for (name, value) in stub.headers {
        res.headers_mut().insert(name, value.parse().unwrap());
    }
    res
}

pub fn memory_json(id: &str, namespace: &str, content: &str) -> Value {
    json!({
        "id": id,
        "namespace": namespace,
        "content": content,
        "type": "semantic",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
        "accessed_at": "2024-01-01T00:00:00Z",
        "access_count": 0,
        "confidence": 1.0,
        "source": "user"
    })
}

pub fn namespace_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "config": {"token_budget": 4000, "inherit_from_parent": false},
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

pub fn context_json() -> Value {
    json!({
        "content": "User prefers dark mode",
        "memories": [{
            "id": "mem-1",
            "content": "User prefers dark mode",
            "type": "semantic",
            "score": 0.92,
            "position": "critical",
            "token_count": 5,
            "truncated": false
        }],
        "token_count": 5,
        "token_budget": 2000,
        "truncated": false,
        "query_time": "1.2ms"
    })
}

/// A base URL on which nothing is listening.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
