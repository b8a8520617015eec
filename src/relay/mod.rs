use anyhow::Result;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::task::TaskTracker;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::pipeline::Pipeline;
use crate::wire::{HealthReply, HistoryReply, NoticeReply};

pub mod sessions;
pub mod socket;

use sessions::SessionSet;

const DRAIN_MARGIN: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub sessions: Arc<SessionSet>,
    shutdown: Arc<watch::Sender<bool>>,
    tasks: TaskTracker,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            pipeline: Arc::new(pipeline),
            sessions: Arc::new(SessionSet::new()),
            shutdown: Arc::new(shutdown),
            tasks: TaskTracker::new(),
        }
    }

    /// Tell every connected client we are going away, then close their
    /// sessions.
    pub async fn shutdown(&self) {
        let notice = to_json(&NoticeReply { notice: "server shutting down".into() });
        let reached = self.sessions.broadcast(&notice).await;
        info!(reached, "shutdown notice sent");
        self.shutdown.send_replace(true);
    }

    /// Wait for every session task to finish flushing its queue. Returns
    /// false if some were still running when `grace` ran out.
    pub async fn drain(&self, grace: Duration) -> bool {
        self.tasks.close();
        let pending = self.tasks.len();
        if pending > 0 {
            info!(pending, "waiting for sessions to close");
        }
        tokio::time::timeout(grace, self.tasks.wait()).await.is_ok()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(socket::ws_handler))
        .route("/responses", get(get_responses))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn get_responses(State(state): State<AppState>) -> Json<HistoryReply> {
    Json(HistoryReply { responses: state.pipeline.history().responses() })
}

async fn health(State(state): State<AppState>) -> Json<HealthReply> {
    Json(HealthReply {
        status: "ok".into(),
        sessions: state.sessions.len().await,
        responses: state.pipeline.history().len(),
    })
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    serve_with_shutdown(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Serve until `signal` resolves, then notify sessions and wait for them to
/// close. Upgraded sockets are not tracked by `axum::serve`, so the drain
/// happens here; an in-flight backend call gets its full time budget.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: AppState,
    signal: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state.clone());
    let notifier = state.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            notifier.shutdown().await;
        })
        .await?;

    let grace = state.pipeline.backend_timeout() + DRAIN_MARGIN;
    if !state.drain(grace).await {
        warn!(?grace, "sessions still open after grace period");
    }
    Ok(())
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| format!(r#"{{"error":"failed to encode reply: {e}"}}"#))
}
