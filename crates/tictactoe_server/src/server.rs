//! Router assembly and the listening loop.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::routing::{get, post};
use tictactoe_session::SessionStore;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::{info, instrument};

use crate::routes;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn SessionStore>,
}

impl AppState {
    /// Wraps a session store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// The backing session store.
    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }
}

/// Builds the session router over `store`.
pub fn router(store: Arc<dyn SessionStore>) -> Router {
    Router::new()
        .route("/", get(routes::reset))
        .route("/session", get(routes::read_session))
        .route("/dimensions", get(routes::dimensions))
        .route("/state", post(routes::write_state))
        .route("/winner", post(routes::winner))
        .route("/tic-tac-toe", get(routes::default_page))
        .route("/tic-tac-toe/{version}", get(routes::variant_page))
        .with_state(AppState::new(store))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
}

/// Serves the router on an already-bound listener until the connection
/// loop fails.
///
/// # Errors
///
/// Returns an error if the accept loop terminates abnormally.
#[instrument(skip_all)]
pub async fn serve_on(listener: TcpListener, store: Arc<dyn SessionStore>) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "Session server ready");
    axum::serve(listener, router(store)).await?;
    Ok(())
}

/// Binds `host:port` and serves until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or serving fails.
#[instrument(skip(store))]
pub async fn serve(host: &str, port: u16, store: Arc<dyn SessionStore>) -> Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    info!(addr = %listener.local_addr()?, "Session server listening");
    axum::serve(listener, router(store))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;
    info!("Session server stopped");
    Ok(())
}
