//! Domain models: the generated quiz and the tagged generation outcome.

use serde::{Deserialize, Serialize};

/// Number of options every question must carry.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A validated multiple-choice quiz.
///
/// Shape invariant (enforced by [`Quiz::validate`] before a quiz is ever
/// handed to a session): the three sequences have equal, non-zero length, and
/// each `choices[i]` holds exactly four distinct options, one of which equals
/// `answers[i]`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Quiz {
  pub questions: Vec<String>,
  /// Four options per question, same order as `questions`.
  pub choices: Vec<Vec<String>>,
  /// The correct option string per question.
  pub answers: Vec<String>,
}

/// What the quiz generator produced for a (topic, count) request.
///
/// `Rejected` covers everything the user can recover from by retrying with
/// different input: an LLM-judged invalid topic, a malformed response, and
/// (by decision) a transport failure. The state machine only ever branches
/// two ways on this.
#[derive(Clone, Debug)]
pub enum QuizOutcome {
  Accepted(Quiz),
  Rejected,
}

impl Quiz {
  pub fn len(&self) -> usize {
    self.questions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.questions.is_empty()
  }

  /// Structural validation of the shape invariant.
  pub fn validate(&self) -> Result<(), String> {
    if self.questions.is_empty() {
      return Err("quiz has no questions".into());
    }
    if self.choices.len() != self.questions.len() || self.answers.len() != self.questions.len() {
      return Err(format!(
        "length mismatch: {} questions, {} choice lists, {} answers",
        self.questions.len(),
        self.choices.len(),
        self.answers.len()
      ));
    }
    for (i, opts) in self.choices.iter().enumerate() {
      if opts.len() != OPTIONS_PER_QUESTION {
        return Err(format!("question {} has {} options, want {}", i, opts.len(), OPTIONS_PER_QUESTION));
      }
      for (a, opt) in opts.iter().enumerate() {
        if opts[..a].contains(opt) {
          return Err(format!("question {} has duplicate option '{}'", i, opt));
        }
      }
      if !opts.contains(&self.answers[i]) {
        return Err(format!("question {}: correct answer not among its options", i));
      }
    }
    Ok(())
  }
}
