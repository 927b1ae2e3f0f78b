//! WebSocket upgrade + message loop. Each connection owns a private session
//! (lifetime = one user visit). Client messages are parsed as JSON and
//! forwarded to core logic; we reply with a single JSON message per request.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic::apply_action;
use crate::protocol::{to_view, ClientWsMessage, ServerWsMessage};
use crate::session::Session;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "quizmaster_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "quizmaster_backend", "WebSocket connected");
  let mut session = Session::new();

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "quizmaster_backend", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &mut session).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "quizmaster_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => {
        let _ = socket.send(Message::Pong(payload)).await;
      }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "quizmaster_backend", "WebSocket disconnected");
}

#[instrument(level = "info", skip(state, session), fields(screen = ?session.screen))]
async fn handle_client_ws(
  msg: ClientWsMessage,
  state: &AppState,
  session: &mut Session,
) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::GetView => ServerWsMessage::View {
      view: to_view(session, state.min_questions, state.max_questions),
    },

    ClientWsMessage::Action { action } => match apply_action(state, session, action).await {
      Ok(()) => {
        info!(target: "quiz", screen = ?session.screen, "WS action applied");
        ServerWsMessage::View {
          view: to_view(session, state.min_questions, state.max_questions),
        }
      }
      Err(message) => {
        info!(target: "quiz", %message, "WS action refused");
        ServerWsMessage::Error { message }
      }
    },
  }
}
