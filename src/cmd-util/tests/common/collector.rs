use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Clone, Debug)]
pub struct Received {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Clone)]
struct CollectorState {
    status: StatusCode,
    response: &'static str,
    received: Arc<Mutex<Vec<Received>>>,
}

/// A report collection endpoint answering every POST with a fixed status,
/// served from its own runtime so blocking clients can call it.
pub struct Collector {
    pub url: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl Collector {
    pub fn launch(status: StatusCode, response: &'static str) -> Self {
        // bound up front: requests queue in the backlog until the server runs
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();

        let received = Arc::new(Mutex::new(Vec::new()));
        let state = CollectorState {
            status,
            response,
            received: received.clone(),
        };

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                let app = Router::new()
                    .route("/report", post(collect))
                    .with_state(state);
                axum::serve(listener, app).await.unwrap();
            });
        });

        Self {
            url: format!("http://{}/report", addr),
            received,
        }
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

async fn collect(
    State(state): State<CollectorState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    state.received.lock().unwrap().push(Received {
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from),
        body: body.to_vec(),
    });
    (state.status, state.response)
}
