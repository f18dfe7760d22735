use crate::commands;
use crate::config::{exports_dir, static_dir};
use crate::error::DrawError;
use crate::export::{ExportSink, JsonLayoutSink};
use crate::seeding::ThreadShuffler;
use crate::types::*;
use axum::{
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{error, info};

// ── Error mapping ──────────────────────────────────────────────────────

fn status_for(err: &DrawError) -> StatusCode {
    match err {
        DrawError::Configuration { .. } | DrawError::NoCompetitors | DrawError::SlotCount { .. } => {
            StatusCode::BAD_REQUEST
        }
        DrawError::MatchNotFound { .. } | DrawError::NoDraw => StatusCode::NOT_FOUND,
        DrawError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(result: Result<T, DrawError>) -> Response {
    match result {
        Ok(body) => (
            [("Cache-Control", "no-store")],
            Json(body),
        )
            .into_response(),
        Err(e) => (status_for(&e), Json(json!({ "error": e.to_string() }))).into_response(),
    }
}

// ── Router ─────────────────────────────────────────────────────────────

pub fn draw_router(state: ServerState) -> Router {
    let static_files = ServeDir::new(static_dir(&state.config));

    Router::new()
        .route("/state.json", get(get_state_json))
        .route("/print.json", get(get_print_json))
        .route("/draw", post(post_draw))
        .route("/rounds/:round/matches/:position/toggle/:side", post(post_toggle))
        .route("/rounds/:round/matches/:position/clear", post(post_clear))
        .route("/rounds/:round/matches/:position/scores/:side", post(post_score))
        .route("/export", post(post_export))
        .fallback_service(static_files)
        .with_state(state)
}

pub async fn start_draw_server(state: ServerState) {
    let addr = state.config.server_addr.clone();
    let app = draw_router(state);
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("draw server failed to bind {addr}: {e}");
            return;
        }
    };
    info!("draw server listening at http://{addr}/");
    if let Err(e) = axum::serve(listener, app).await {
        error!("draw server error: {e}");
    }
}

// ── Handlers ───────────────────────────────────────────────────────────

async fn get_state_json(AxumState(state): AxumState<ServerState>) -> Response {
    respond(Ok(commands::draw_state(&state.draw_state)))
}

async fn get_print_json(AxumState(state): AxumState<ServerState>) -> Response {
    respond(commands::print_layout(&state.draw_state, &state.config))
}

async fn post_draw(AxumState(state): AxumState<ServerState>, Json(form): Json<DrawForm>) -> Response {
    respond(commands::generate_draw(
        &state.draw_state,
        &form,
        &state.config,
        &mut ThreadShuffler,
    ))
}

async fn post_toggle(
    AxumState(state): AxumState<ServerState>,
    Path((round, position, side)): Path<(usize, usize, u8)>,
) -> Response {
    respond(commands::toggle_winner(&state.draw_state, round, position, side))
}

async fn post_clear(
    AxumState(state): AxumState<ServerState>,
    Path((round, position)): Path<(usize, usize)>,
) -> Response {
    respond(commands::clear_result(&state.draw_state, round, position))
}

async fn post_score(
    AxumState(state): AxumState<ServerState>,
    Path((round, position, side)): Path<(usize, usize, u8)>,
    Json(update): Json<ScoreUpdate>,
) -> Response {
    respond(commands::update_score(
        &state.draw_state,
        round,
        position,
        side,
        &update.score,
    ))
}

async fn post_export(AxumState(state): AxumState<ServerState>) -> Response {
    let job = match commands::export_snapshot(&state.draw_state, &state.config) {
        Ok(job) => job,
        Err(e) => return respond::<ExportReceipt>(Err(e)),
    };
    let dir = exports_dir(&state.config);
    let result = tokio::task::spawn_blocking(move || {
        let mut sink = JsonLayoutSink::new(dir);
        sink.write(&job).map(|path| ExportReceipt {
            file_name: job.file_name.clone(),
            path,
            total_pages: job.pages.len(),
        })
    })
    .await
    .unwrap_or_else(|e| Err(DrawError::Export(e.to_string())));
    respond(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    fn test_state() -> ServerState {
        let exports = std::env::temp_dir().join(format!("bracket-draw-server-{}", std::process::id()));
        ServerState {
            draw_state: Arc::new(Mutex::new(DrawState::default())),
            config: AppConfig {
                exports_dir: exports.to_string_lossy().to_string(),
                ..AppConfig::default()
            },
        }
    }

    async fn call(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = router.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_generate_then_state() {
        let state = test_state();
        let router = draw_router(state.clone());

        let (status, body) = call(router.clone(), "GET", "/state.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);

        let form = json!({
            "title": "Open",
            "numSeeds": "2",
            "seededPlayers": "A\nB",
            "unseededPlayers": "C\nD\nE"
        });
        let (status, body) = call(router.clone(), "POST", "/draw", Some(form)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalSlots"], 8);
        assert_eq!(body["rounds"][0]["matches"][0]["slots"][0]["label"], "A (1)");

        let (status, body) = call(router.clone(), "GET", "/state.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Open");
        assert_eq!(body["champion"]["label"], "???");

        let (status, body) = call(router, "POST", "/rounds/0/matches/0/toggle/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rounds"][1]["matches"][0]["slots"][0]["label"], "A (1)");
    }

    #[tokio::test]
    async fn test_configuration_error_is_bad_request() {
        let router = draw_router(test_state());
        let form = json!({
            "numSeeds": "3",
            "seededPlayers": "A\nB",
            "unseededPlayers": "C"
        });
        let (status, body) = call(router.clone(), "POST", "/draw", Some(form)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Configuration Error: Expected 3 seeds, but found 2 names."
        );

        let (status, body) = call(router, "GET", "/state.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_missing_draw_and_match() {
        let router = draw_router(test_state());
        let (status, _) = call(router.clone(), "GET", "/print.json", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let form = json!({ "unseededPlayers": "A\nB" });
        call(router.clone(), "POST", "/draw", Some(form)).await;
        let (status, _) = call(router, "POST", "/rounds/4/matches/0/clear", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_print_and_export() {
        let state = test_state();
        let router = draw_router(state.clone());
        let form = json!({ "title": "Club Night", "unseededPlayers": "A\nB\nC" });
        call(router.clone(), "POST", "/draw", Some(form)).await;

        let (status, body) = call(router.clone(), "GET", "/print.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["footer"], "Page 1 of 1");

        let (status, body) = call(router, "POST", "/export", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fileName"], "Club_Night.pdf");
        assert_eq!(body["totalPages"], 1);
        std::fs::remove_dir_all(exports_dir(&state.config)).ok();
    }
}
