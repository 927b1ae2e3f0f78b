//! Application state: the session store, prompts, score-log path, and the
//! optional OpenAI client.

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::{load_quiz_config_from_env, Prompts, DEFAULT_SCORE_LOG};
use crate::openai::OpenAI;
use crate::session::Session;

/// Question-count bounds offered to the user (inclusive), overridable in TOML.
pub const DEFAULT_MIN_QUESTIONS: usize = 2;
pub const DEFAULT_MAX_QUESTIONS: usize = 15;

/// One store entry. Actions serialize per session on the entry's own lock;
/// the outer map lock is only ever held for lookup/insert/remove, never
/// across a generation call.
pub type SharedSession = Arc<Mutex<Session>>;

#[derive(Clone)]
pub struct AppState {
  /// HTTP-addressable sessions. WebSocket connections own private sessions
  /// instead and never appear here.
  pub sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
  pub openai: Option<OpenAI>,
  pub prompts: Prompts,
  pub score_log: PathBuf,
  pub min_questions: usize,
  pub max_questions: usize,
}

impl AppState {
  /// Build state from env: load config, resolve the score log, init OpenAI.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Self {
    let cfg = load_quiz_config_from_env().unwrap_or_default();
    let prompts = cfg.prompts.clone();

    // Env beats TOML for the log location; both beat the default.
    let score_log: PathBuf = std::env::var("SCORE_LOG_PATH")
      .ok()
      .or(cfg.score_log_path)
      .unwrap_or_else(|| DEFAULT_SCORE_LOG.to_string())
      .into();

    let min_questions = cfg.min_questions.unwrap_or(DEFAULT_MIN_QUESTIONS);
    let max_questions = cfg.max_questions.unwrap_or(DEFAULT_MAX_QUESTIONS);

    let openai = OpenAI::from_env();
    if let Some(oa) = &openai {
      info!(target: "quizmaster_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
    } else {
      info!(target: "quizmaster_backend", "OpenAI disabled (no OPENAI_API_KEY). Serving built-in seed quizzes.");
    }
    info!(target: "quizmaster_backend", score_log = %score_log.display(), min_questions, max_questions, "Quiz settings");

    Self {
      sessions: Arc::new(RwLock::new(HashMap::new())),
      openai,
      prompts,
      score_log,
      min_questions,
      max_questions,
    }
  }

  /// Create a fresh session and return its id together with the entry.
  #[instrument(level = "debug", skip(self))]
  pub async fn create_session(&self) -> (Uuid, SharedSession) {
    let id = Uuid::new_v4();
    let entry: SharedSession = Arc::new(Mutex::new(Session::new()));
    let mut sessions = self.sessions.write().await;
    sessions.insert(id, entry.clone());
    info!(target: "quizmaster_backend", session_id = %id, live = sessions.len(), "Session created");
    (id, entry)
  }

  /// Look up a session entry. The map lock is released before this returns;
  /// callers serialize on the entry's own lock.
  #[instrument(level = "debug", skip(self), fields(%id))]
  pub async fn session(&self, id: &Uuid) -> Option<SharedSession> {
    self.sessions.read().await.get(id).cloned()
  }

  /// Drop a session (e.g. on WS disconnect for HTTP-created ones, unused today).
  #[allow(dead_code)]
  #[instrument(level = "debug", skip(self), fields(%id))]
  pub async fn remove_session(&self, id: &Uuid) {
    self.sessions.write().await.remove(id);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;
  use tokio::time::timeout;

  fn test_state() -> AppState {
    AppState {
      sessions: Arc::new(RwLock::new(HashMap::new())),
      openai: None,
      prompts: Prompts::default(),
      score_log: std::env::temp_dir().join(format!("scorer-state-{}.txt", Uuid::new_v4())),
      min_questions: DEFAULT_MIN_QUESTIONS,
      max_questions: DEFAULT_MAX_QUESTIONS,
    }
  }

  #[tokio::test]
  async fn busy_session_does_not_stall_the_store() {
    let state = test_state();
    let (id, entry) = state.create_session().await;

    // Simulate an in-flight action (e.g. a slow generation call) by holding
    // this session's lock.
    let _held = entry.lock().await;

    // Unrelated store operations must still complete promptly.
    let other = timeout(Duration::from_millis(200), state.create_session()).await;
    assert!(other.is_ok(), "creating an unrelated session stalled behind a busy one");

    let lookup = timeout(Duration::from_millis(200), state.session(&id)).await;
    assert!(lookup.expect("lookup stalled behind a busy session").is_some());
  }

  #[tokio::test]
  async fn session_lookup_returns_the_stored_entry() {
    let state = test_state();
    let (id, entry) = state.create_session().await;
    let found = state.session(&id).await.expect("entry must exist");
    assert!(Arc::ptr_eq(&entry, &found));
    assert!(state.session(&Uuid::new_v4()).await.is_none());
  }
}
