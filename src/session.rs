//! The screen state machine driving one user visit.
//!
//! Five screens (Main, Config, InQuiz, Score, Feedback) plus an explicit
//! action set. Transitions are pure methods on `Session` so they can be unit
//! tested without a rendering layer or a network. The one async step,
//! generating the quiz on first entry into `InQuiz`, is split out: logic.rs
//! calls the generator and then feeds the outcome into `begin_quiz` /
//! `reject_topic`.

use serde::{Deserialize, Serialize};

use crate::domain::Quiz;
use crate::scores::compute_score;

/// Which screen the session is currently on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
  Main,
  Config,
  InQuiz,
  Score,
  Feedback,
}

/// User-triggered actions, as accepted over HTTP and WebSocket.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
  SetUpQuiz,
  StartQuiz {
    #[serde(rename = "numQuestions")]
    num_questions: usize,
    topic: String,
  },
  NextQuestion,
  PreviousQuestion,
  SelectAnswer {
    answer: String,
  },
  Submit,
  SeeFeedback,
  BackToMain,
}

/// Session state for one user visit. Created fresh on first contact and
/// fully reset whenever the user returns to Main.
#[derive(Clone, Debug)]
pub struct Session {
  pub screen: Screen,
  pub num_questions: usize,
  pub topic: String,
  pub quiz: Option<Quiz>,
  /// One slot per question; None until the user picks an option.
  pub user_answers: Vec<Option<String>>,
  /// Snapshot taken when navigating backward, used to restore the
  /// previously selected option as the default.
  pub prev_user_answers: Vec<Option<String>>,
  /// None until the quiz has started; cleared again on rejection or reset.
  pub current_question: Option<usize>,
  pub score: usize,
  /// All-time high score percentage, filled in when the Score screen is entered.
  pub high_score: Option<u64>,
  pub invalid_input: bool,
}

impl Default for Session {
  fn default() -> Self {
    Self {
      screen: Screen::Main,
      num_questions: 0,
      topic: String::new(),
      quiz: None,
      user_answers: Vec::new(),
      prev_user_answers: Vec::new(),
      current_question: None,
      score: 0,
      high_score: None,
      invalid_input: false,
    }
  }
}

impl Session {
  pub fn new() -> Self {
    Self::default()
  }

  /// Full reset; equivalent to discarding the session and starting over.
  pub fn reset(&mut self) {
    *self = Self::default();
  }

  fn out_of_turn(&self, action: &str) -> String {
    format!("Action '{}' is not available on the {:?} screen", action, self.screen)
  }

  /// Main → Config. No side effects beyond the state change.
  pub fn set_up_quiz(&mut self) -> Result<(), String> {
    if self.screen != Screen::Main {
      return Err(self.out_of_turn("set_up_quiz"));
    }
    self.screen = Screen::Config;
    Ok(())
  }

  /// Records the submitted configuration ahead of generation. Only valid on
  /// the Config screen; bounds are enforced by the caller (config-driven).
  pub fn record_config(&mut self, num_questions: usize, topic: String) -> Result<(), String> {
    if self.screen != Screen::Config {
      return Err(self.out_of_turn("start_quiz"));
    }
    self.num_questions = num_questions;
    self.topic = topic;
    Ok(())
  }

  /// Generation succeeded: enter the quiz at question 0 with all answers unset.
  pub fn begin_quiz(&mut self, quiz: Quiz) {
    let n = quiz.len();
    self.user_answers = vec![None; n];
    self.prev_user_answers = vec![None; n];
    self.quiz = Some(quiz);
    self.score = 0;
    self.high_score = None;
    self.current_question = Some(0);
    self.invalid_input = false;
    self.screen = Screen::InQuiz;
  }

  /// Generation was rejected: flag the input and stay on Config with the
  /// question index cleared.
  pub fn reject_topic(&mut self) {
    self.invalid_input = true;
    self.quiz = None;
    self.current_question = None;
    self.screen = Screen::Config;
  }

  /// InQuiz → InQuiz, one question forward. Rejected at the last index,
  /// where Submit is the only control offered.
  pub fn next_question(&mut self) -> Result<(), String> {
    if self.screen != Screen::InQuiz {
      return Err(self.out_of_turn("next_question"));
    }
    let idx = self.current_question.ok_or("No active question")?;
    let last = self.quiz.as_ref().map(Quiz::len).unwrap_or(0).saturating_sub(1);
    if idx >= last {
      return Err("Already at the last question; submit instead".into());
    }
    self.current_question = Some(idx + 1);
    Ok(())
  }

  /// InQuiz → InQuiz, one question back. Snapshots the current answers so
  /// the earlier selection is shown as the default again. Rejected at 0.
  pub fn previous_question(&mut self) -> Result<(), String> {
    if self.screen != Screen::InQuiz {
      return Err(self.out_of_turn("previous_question"));
    }
    let idx = self.current_question.ok_or("No active question")?;
    if idx == 0 {
      return Err("Already at the first question".into());
    }
    self.prev_user_answers = self.user_answers.clone();
    self.current_question = Some(idx - 1);
    Ok(())
  }

  /// Record the selected option for the current question. The option must be
  /// one of the question's four choices.
  pub fn select_answer(&mut self, answer: String) -> Result<(), String> {
    if self.screen != Screen::InQuiz {
      return Err(self.out_of_turn("select_answer"));
    }
    let idx = self.current_question.ok_or("No active question")?;
    let quiz = self.quiz.as_ref().ok_or("No quiz loaded")?;
    if !quiz.choices[idx].contains(&answer) {
      return Err(format!("'{}' is not an option for question {}", answer, idx + 1));
    }
    self.user_answers[idx] = Some(answer);
    Ok(())
  }

  /// InQuiz → Score. Only enabled at the last question; tallies the score.
  /// The caller persists the percentage and fills in `high_score`.
  pub fn submit(&mut self) -> Result<(), String> {
    if self.screen != Screen::InQuiz {
      return Err(self.out_of_turn("submit"));
    }
    let idx = self.current_question.ok_or("No active question")?;
    let quiz = self.quiz.as_ref().ok_or("No quiz loaded")?;
    if idx + 1 != quiz.len() {
      return Err("Submit is only available on the last question".into());
    }
    self.score = compute_score(&self.user_answers, &quiz.answers);
    self.screen = Screen::Score;
    Ok(())
  }

  /// Score → Feedback.
  pub fn see_feedback(&mut self) -> Result<(), String> {
    if self.screen != Screen::Score {
      return Err(self.out_of_turn("see_feedback"));
    }
    self.screen = Screen::Feedback;
    Ok(())
  }

  /// Feedback → Main and Config → Main ("try again"). Full reset.
  pub fn back_to_main(&mut self) -> Result<(), String> {
    match self.screen {
      Screen::Feedback | Screen::Config => {
        self.reset();
        Ok(())
      }
      _ => Err(self.out_of_turn("back_to_main")),
    }
  }

  /// True while the quiz has a question before the current one.
  pub fn can_go_previous(&self) -> bool {
    matches!(self.current_question, Some(i) if i > 0) && self.screen == Screen::InQuiz
  }

  /// Label of the advance control: "Submit" exactly at the last index,
  /// "Next Question" strictly before it.
  pub fn advance_label(&self) -> Option<&'static str> {
    let idx = self.current_question?;
    let quiz = self.quiz.as_ref()?;
    if idx + 1 == quiz.len() {
      Some("Submit")
    } else {
      Some("Next Question")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_quiz(n: usize) -> Quiz {
    let questions = (0..n).map(|i| format!("Q{}", i)).collect();
    let choices = (0..n)
      .map(|i| vec![format!("A{}", i), format!("B{}", i), format!("C{}", i), format!("D{}", i)])
      .collect();
    let answers = (0..n).map(|i| format!("A{}", i)).collect();
    let q = Quiz { questions, choices, answers };
    q.validate().unwrap();
    q
  }

  #[test]
  fn set_up_quiz_moves_main_to_config() {
    let mut s = Session::new();
    assert_eq!(s.screen, Screen::Main);
    s.set_up_quiz().unwrap();
    assert_eq!(s.screen, Screen::Config);
  }

  #[test]
  fn rejected_topic_returns_to_config_with_flag_and_no_index() {
    let mut s = Session::new();
    s.set_up_quiz().unwrap();
    s.record_config(5, "gibberish".into()).unwrap();
    s.reject_topic();
    assert_eq!(s.screen, Screen::Config);
    assert!(s.invalid_input);
    assert!(s.current_question.is_none());
    assert!(s.quiz.is_none());
  }

  #[test]
  fn begin_quiz_initializes_answers_and_index() {
    let mut s = Session::new();
    s.set_up_quiz().unwrap();
    s.record_config(3, "space".into()).unwrap();
    s.begin_quiz(sample_quiz(3));
    assert_eq!(s.screen, Screen::InQuiz);
    assert_eq!(s.current_question, Some(0));
    assert_eq!(s.user_answers, vec![None, None, None]);
    assert_eq!(s.prev_user_answers, vec![None, None, None]);
    assert_eq!(s.score, 0);
    assert!(!s.invalid_input);
  }

  #[test]
  fn previous_question_rejected_at_index_zero() {
    let mut s = Session::new();
    s.set_up_quiz().unwrap();
    s.record_config(2, "space".into()).unwrap();
    s.begin_quiz(sample_quiz(2));
    assert!(!s.can_go_previous());
    assert!(s.previous_question().is_err());
    assert_eq!(s.current_question, Some(0));
  }

  #[test]
  fn previous_question_snapshots_answers() {
    let mut s = Session::new();
    s.set_up_quiz().unwrap();
    s.record_config(2, "space".into()).unwrap();
    s.begin_quiz(sample_quiz(2));
    s.select_answer("A0".into()).unwrap();
    s.next_question().unwrap();
    s.select_answer("B1".into()).unwrap();
    s.previous_question().unwrap();
    assert_eq!(s.current_question, Some(0));
    assert_eq!(s.prev_user_answers, vec![Some("A0".into()), Some("B1".into())]);
    assert!(!s.can_go_previous());
  }

  #[test]
  fn advance_label_toggles_exactly_at_last_index() {
    let mut s = Session::new();
    s.set_up_quiz().unwrap();
    s.record_config(3, "space".into()).unwrap();
    s.begin_quiz(sample_quiz(3));
    assert_eq!(s.advance_label(), Some("Next Question"));
    s.next_question().unwrap();
    assert_eq!(s.advance_label(), Some("Next Question"));
    s.next_question().unwrap();
    assert_eq!(s.advance_label(), Some("Submit"));
    assert!(s.next_question().is_err());
  }

  #[test]
  fn select_answer_rejects_unknown_option() {
    let mut s = Session::new();
    s.set_up_quiz().unwrap();
    s.record_config(2, "space".into()).unwrap();
    s.begin_quiz(sample_quiz(2));
    assert!(s.select_answer("not-an-option".into()).is_err());
    assert_eq!(s.user_answers[0], None);
  }

  #[test]
  fn submit_only_on_last_question_and_tallies_score() {
    let mut s = Session::new();
    s.set_up_quiz().unwrap();
    s.record_config(2, "space".into()).unwrap();
    s.begin_quiz(sample_quiz(2));
    assert!(s.submit().is_err());
    s.select_answer("A0".into()).unwrap();
    s.next_question().unwrap();
    s.select_answer("C1".into()).unwrap();
    s.submit().unwrap();
    assert_eq!(s.screen, Screen::Score);
    assert_eq!(s.score, 1);
  }

  #[test]
  fn feedback_then_back_to_main_resets_everything() {
    let mut s = Session::new();
    s.set_up_quiz().unwrap();
    s.record_config(2, "space".into()).unwrap();
    s.begin_quiz(sample_quiz(2));
    s.select_answer("A0".into()).unwrap();
    s.next_question().unwrap();
    s.submit().unwrap();
    s.see_feedback().unwrap();
    assert_eq!(s.screen, Screen::Feedback);
    s.back_to_main().unwrap();
    assert_eq!(s.screen, Screen::Main);
    assert!(s.quiz.is_none());
    assert!(s.current_question.is_none());
    assert!(s.topic.is_empty());
    assert_eq!(s.score, 0);
  }

  #[test]
  fn try_again_from_config_resets() {
    let mut s = Session::new();
    s.set_up_quiz().unwrap();
    s.record_config(5, "gibberish".into()).unwrap();
    s.reject_topic();
    s.back_to_main().unwrap();
    assert_eq!(s.screen, Screen::Main);
    assert!(!s.invalid_input);
  }

  #[test]
  fn out_of_turn_actions_leave_session_unchanged() {
    let mut s = Session::new();
    assert!(s.submit().is_err());
    assert!(s.see_feedback().is_err());
    assert!(s.back_to_main().is_err());
    assert!(s.next_question().is_err());
    assert_eq!(s.screen, Screen::Main);
  }
}
