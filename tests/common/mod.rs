use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use futures::StreamExt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Local HTTP service the benchmarks are pointed at
pub struct MockService {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl MockService {
    /// Bind an ephemeral port and serve:
    /// - `/delay/ms/:delay_ms` answers 200 after sleeping
    /// - `/status/:code` answers with the given status
    /// - `/stream/ms/:gap_ms` sends the head and a first chunk at once,
    ///   then two more chunks `gap_ms` apart
    pub async fn start() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/delay/ms/:delay_ms", get(delay))
            .route("/status/:code", get(status))
            .route("/stream/ms/:gap_ms", get(stream))
            .with_state(hits.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, hits }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Requests received so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn delay(State(hits): State<Arc<AtomicUsize>>, Path(delay_ms): Path<u64>) -> &'static str {
    hits.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    "ok"
}

async fn status(State(hits): State<Arc<AtomicUsize>>, Path(code): Path<u16>) -> StatusCode {
    hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn stream(State(hits): State<Arc<AtomicUsize>>, Path(gap_ms): Path<u64>) -> Body {
    hits.fetch_add(1, Ordering::SeqCst);
    let chunks = futures::stream::iter(0..3u64).then(move |i| async move {
        if i > 0 {
            tokio::time::sleep(Duration::from_millis(gap_ms)).await;
        }
        Ok::<_, std::io::Error>(format!("chunk-{i}\n"))
    });
    Body::from_stream(chunks)
}

/// URL of a local port nothing listens on
#[allow(dead_code)]
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}
