//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.
//!
//! Session lookup and action handling use separate locks: the store lock is
//! released before an action runs, so one session's in-flight generation call
//! never stalls the others.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::logic::apply_action;
use crate::protocol::{to_view, ErrorOut, HealthOut, SessionCreatedOut};
use crate::session::Action;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let (id, entry) = state.create_session().await;
  let session = entry.lock().await;
  let view = to_view(&session, state.min_questions, state.max_questions);
  Json(SessionCreatedOut { session_id: id.to_string(), view })
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
) -> impl IntoResponse {
  let Some(entry) = state.session(&id).await else {
    return not_found(&id);
  };
  let session = entry.lock().await;
  Json(to_view(&session, state.min_questions, state.max_questions)).into_response()
}

#[instrument(level = "info", skip(state, action), fields(%id))]
pub async fn http_post_action(
  State(state): State<Arc<AppState>>,
  Path(id): Path<Uuid>,
  Json(action): Json<Action>,
) -> impl IntoResponse {
  let Some(entry) = state.session(&id).await else {
    return not_found(&id);
  };

  // Only this session's lock is held across the (possibly slow) action.
  let mut session = entry.lock().await;
  match apply_action(&state, &mut session, action).await {
    Ok(()) => {
      info!(target: "quiz", session_id = %id, screen = ?session.screen, "HTTP action applied");
      Json(to_view(&session, state.min_questions, state.max_questions)).into_response()
    }
    Err(message) => {
      info!(target: "quiz", session_id = %id, %message, "HTTP action refused");
      (StatusCode::BAD_REQUEST, Json(ErrorOut { message })).into_response()
    }
  }
}

fn not_found(id: &Uuid) -> axum::response::Response {
  (
    StatusCode::NOT_FOUND,
    Json(ErrorOut { message: format!("Unknown session: {}", id) }),
  )
    .into_response()
}
