//! Route handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tictactoe_session::{DimensionsResponse, SessionPatch, SessionRecord, WinnerRequest};
use tracing::{debug, info, instrument, warn};

use crate::{ApiError, AppState, ClientVariant};

/// `GET /`: rewrite the default record and return it.
#[instrument(skip(state))]
pub(crate) async fn reset(State(state): State<AppState>) -> Result<Json<SessionRecord>, ApiError> {
    let record = state.store().reset().await?;
    info!("Session reset");
    Ok(Json(record))
}

/// `GET /session`: the whole record.
#[instrument(skip(state))]
pub(crate) async fn read_session(
    State(state): State<AppState>,
) -> Result<Json<SessionRecord>, ApiError> {
    let record = state.store().read_session().await?;
    debug!(?record, "Session read");
    Ok(Json(record))
}

/// `GET /dimensions`.
#[instrument(skip(state))]
pub(crate) async fn dimensions(
    State(state): State<AppState>,
) -> Result<Json<DimensionsResponse>, ApiError> {
    let record = state.store().read_session().await?;
    Ok(Json(DimensionsResponse {
        dimensions: *record.dimensions(),
    }))
}

/// `POST /state`: shallow merge of the given fields.
#[instrument(skip(state))]
pub(crate) async fn write_state(
    State(state): State<AppState>,
    Json(patch): Json<SessionPatch>,
) -> Result<StatusCode, ApiError> {
    state.store().write_session(patch).await?;
    Ok(StatusCode::OK)
}

/// `POST /winner`: add one game to a tally.
#[instrument(skip(state))]
pub(crate) async fn winner(
    State(state): State<AppState>,
    Json(request): Json<WinnerRequest>,
) -> Result<StatusCode, ApiError> {
    state.store().record_winner(request.winner).await?;
    Ok(StatusCode::OK)
}

/// `GET /tic-tac-toe`: page for the default variant.
pub(crate) async fn default_page(state: State<AppState>) -> Response {
    render_page(state, ClientVariant::default()).await
}

/// `GET /tic-tac-toe/{version}`.
#[instrument(skip(state))]
pub(crate) async fn variant_page(state: State<AppState>, Path(version): Path<String>) -> Response {
    match version.parse::<ClientVariant>() {
        Ok(variant) => render_page(state, variant).await,
        Err(_) => {
            warn!(%version, "Unknown client variant requested");
            (StatusCode::NOT_FOUND, format!("Unknown variant '{}'", version)).into_response()
        }
    }
}

async fn render_page(State(state): State<AppState>, variant: ClientVariant) -> Response {
    let record = match state.store().read_session().await {
        Ok(record) => record,
        Err(e) => return ApiError::from(e).into_response(),
    };
    let wins = record.recorded_wins();
    Html(format!(
        "<!doctype html>\n<html>\n<head><title>Tic-Tac-Toe ({variant})</title></head>\n<body>\n\
         <h1>Tic-Tac-Toe: {variant}</h1>\n<p>{summary}</p>\n\
         <p>Board: {n}x{n}. Wins so far: X {x}, O {o}, draws {none}.</p>\n\
         <pre>tictactoe play --variant {variant}</pre>\n</body>\n</html>\n",
        variant = variant,
        summary = variant.summary(),
        n = record.dimensions(),
        x = wins.x,
        o = wins.o,
        none = wins.none,
    ))
    .into_response()
}
