//! Action orchestration shared by the HTTP and WebSocket handlers.
//!
//! Pure transitions are delegated to `Session`; this layer adds the two
//! effectful steps the state machine cannot do itself: the one quiz-generation
//! call on first entry into the quiz, and the score-log append + high-score
//! query on entry into the Score screen.

use tracing::{error, info, instrument, warn};

use crate::domain::QuizOutcome;
use crate::scores::{append_score, high_score, percentage};
use crate::seeds::seed_quiz;
use crate::session::{Action, Session};
use crate::state::AppState;

/// Apply one user action to a session. An `Err` means the action was refused
/// (out of turn, bad input) and the session is unchanged; the user-facing
/// rejection of a topic is NOT an error; it lands in the session state.
#[instrument(level = "info", skip(state, session, action), fields(screen = ?session.screen))]
pub async fn apply_action(state: &AppState, session: &mut Session, action: Action) -> Result<(), String> {
  match action {
    Action::SetUpQuiz => session.set_up_quiz(),
    Action::StartQuiz { num_questions, topic } => start_quiz(state, session, num_questions, topic).await,
    Action::NextQuestion => session.next_question(),
    Action::PreviousQuestion => session.previous_question(),
    Action::SelectAnswer { answer } => session.select_answer(answer),
    Action::Submit => {
      session.submit()?;
      record_score(state, session);
      Ok(())
    }
    Action::SeeFeedback => session.see_feedback(),
    Action::BackToMain => session.back_to_main(),
  }
}

/// Config → InQuiz: one generation attempt, no retry. Transport failures and
/// unparsable replies take the same path as an LLM-judged rejection; only the
/// log line differs.
async fn start_quiz(
  state: &AppState,
  session: &mut Session,
  num_questions: usize,
  topic: String,
) -> Result<(), String> {
  if num_questions < state.min_questions || num_questions > state.max_questions {
    return Err(format!(
      "Question count must be between {} and {}",
      state.min_questions, state.max_questions
    ));
  }
  session.record_config(num_questions, topic.clone())?;

  let topic = topic.trim();
  if topic.is_empty() {
    info!(target: "quiz", "Empty topic; rejecting without a model call");
    session.reject_topic();
    return Ok(());
  }

  let outcome = match &state.openai {
    Some(oa) => match oa.generate_quiz(&state.prompts, topic, num_questions).await {
      Ok(outcome) => outcome,
      Err(e) => {
        // Network-level failure, distinct from a topic rejection in the
        // logs but identical for the user: back to Config to retry.
        error!(target: "quiz", error = %e, "Quiz generation transport failure; treating as rejection");
        QuizOutcome::Rejected
      }
    },
    None => {
      warn!(target: "quiz", num_questions, "No OpenAI client; serving built-in seed quiz");
      QuizOutcome::Accepted(seed_quiz(num_questions))
    }
  };

  match outcome {
    QuizOutcome::Accepted(quiz) => {
      info!(target: "quiz", questions = quiz.len(), "Quiz generated");
      session.begin_quiz(quiz);
    }
    QuizOutcome::Rejected => {
      info!(target: "quiz", "Topic rejected");
      session.reject_topic();
    }
  }
  Ok(())
}

/// Score-screen entry: append the fresh percentage, then report the all-time
/// maximum. Log-file problems are recovered or downgraded, never fatal.
fn record_score(state: &AppState, session: &mut Session) {
  let total = session.quiz.as_ref().map_or(0, |q| q.len());
  let pct = percentage(session.score, total);

  if let Err(e) = append_score(&state.score_log, pct) {
    warn!(target: "quiz", error = %e, path = %state.score_log.display(), "Failed to append score");
  }

  session.high_score = match high_score(&state.score_log) {
    Ok(Some(best)) => Some(best.max(pct)),
    Ok(None) => Some(pct),
    Err(e) => {
      warn!(target: "quiz", error = %e, path = %state.score_log.display(), "Failed to read score log");
      Some(pct)
    }
  };
  info!(target: "quiz", score = session.score, total, pct, high = ?session.high_score, "Score recorded");
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;
  use std::sync::Arc;
  use tokio::sync::RwLock;
  use uuid::Uuid;

  use crate::config::Prompts;
  use crate::session::Screen;

  fn test_state() -> AppState {
    AppState {
      sessions: Arc::new(RwLock::new(HashMap::new())),
      openai: None,
      prompts: Prompts::default(),
      score_log: std::env::temp_dir().join(format!("scorer-logic-{}.txt", Uuid::new_v4())),
      min_questions: 2,
      max_questions: 15,
    }
  }

  #[tokio::test]
  async fn full_flow_with_seed_fallback() {
    let state = test_state();
    let mut s = Session::new();

    apply_action(&state, &mut s, Action::SetUpQuiz).await.unwrap();
    apply_action(&state, &mut s, Action::StartQuiz { num_questions: 3, topic: "space".into() })
      .await
      .unwrap();
    assert_eq!(s.screen, Screen::InQuiz);
    let answers = s.quiz.as_ref().unwrap().answers.clone();
    assert_eq!(answers.len(), 3);

    for (i, correct) in answers.iter().enumerate() {
      apply_action(&state, &mut s, Action::SelectAnswer { answer: correct.clone() })
        .await
        .unwrap();
      if i + 1 < answers.len() {
        apply_action(&state, &mut s, Action::NextQuestion).await.unwrap();
      }
    }
    apply_action(&state, &mut s, Action::Submit).await.unwrap();

    assert_eq!(s.screen, Screen::Score);
    assert_eq!(s.score, 3);
    assert_eq!(s.high_score, Some(100));
    let log = std::fs::read_to_string(&state.score_log).unwrap();
    assert_eq!(log, "100\n");

    apply_action(&state, &mut s, Action::SeeFeedback).await.unwrap();
    apply_action(&state, &mut s, Action::BackToMain).await.unwrap();
    assert_eq!(s.screen, Screen::Main);
    std::fs::remove_file(&state.score_log).ok();
  }

  #[tokio::test]
  async fn blank_topic_is_rejected_without_a_model() {
    let state = test_state();
    let mut s = Session::new();
    apply_action(&state, &mut s, Action::SetUpQuiz).await.unwrap();
    apply_action(&state, &mut s, Action::StartQuiz { num_questions: 5, topic: "   ".into() })
      .await
      .unwrap();
    assert_eq!(s.screen, Screen::Config);
    assert!(s.invalid_input);
    assert!(s.current_question.is_none());
  }

  #[tokio::test]
  async fn question_count_outside_bounds_is_refused() {
    let state = test_state();
    let mut s = Session::new();
    apply_action(&state, &mut s, Action::SetUpQuiz).await.unwrap();
    let err = apply_action(&state, &mut s, Action::StartQuiz { num_questions: 1, topic: "space".into() })
      .await
      .unwrap_err();
    assert!(err.contains("between 2 and 15"));
    assert_eq!(s.screen, Screen::Config);
    assert!(!s.invalid_input);
  }

  #[tokio::test]
  async fn partial_answers_truncate_percentage() {
    let state = test_state();
    let mut s = Session::new();
    apply_action(&state, &mut s, Action::SetUpQuiz).await.unwrap();
    apply_action(&state, &mut s, Action::StartQuiz { num_questions: 3, topic: "space".into() })
      .await
      .unwrap();
    let answers = s.quiz.as_ref().unwrap().answers.clone();

    // Answer the first two correctly, leave the last unanswered.
    apply_action(&state, &mut s, Action::SelectAnswer { answer: answers[0].clone() }).await.unwrap();
    apply_action(&state, &mut s, Action::NextQuestion).await.unwrap();
    apply_action(&state, &mut s, Action::SelectAnswer { answer: answers[1].clone() }).await.unwrap();
    apply_action(&state, &mut s, Action::NextQuestion).await.unwrap();
    apply_action(&state, &mut s, Action::Submit).await.unwrap();

    assert_eq!(s.score, 2);
    // 2/3 truncates to 66, never rounds to 67.
    let log = std::fs::read_to_string(&state.score_log).unwrap();
    assert_eq!(log, "66\n");
    std::fs::remove_file(&state.score_log).ok();
  }
}
