//! Quiz-generation contract: prompt construction and strict parsing of the
//! model's raw reply.
//!
//! The model either answers with the literal sentinel `NOT-VALID-TOPIC`, or
//! with a markdown-fenced JSON object carrying `questions`, `answers`
//! (4-option lists) and `correct_answers`. Every way the reply can disappoint
//! us (sentinel, no JSON, schema mismatch, shape violation) collapses into
//! [`QuizOutcome::Rejected`] so the state machine's two-way branch stays
//! exhaustive.

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::Prompts;
use crate::domain::{Quiz, QuizOutcome};
use crate::util::{fill_template, trunc_for_log};

/// Sentinel the model must emit for nonsensical or unfamiliar topics.
pub const NOT_VALID_TOPIC: &str = "NOT-VALID-TOPIC";

/// Build the (system, user) message pair for one generation request.
pub fn build_quiz_prompt(prompts: &Prompts, topic: &str, num_questions: usize) -> (String, String) {
  let n = num_questions.to_string();
  let system = prompts.quiz_system.clone();
  let user = fill_template(&prompts.quiz_user_template, &[("topic", topic), ("num_questions", &n)]);
  (system, user)
}

/// Raw three-key schema as the model emits it. `answers` holds the option
/// lists; `correct_answers` the right option per question.
#[derive(Deserialize)]
struct RawQuiz {
  questions: Vec<String>,
  answers: Vec<Vec<String>>,
  correct_answers: Vec<String>,
}

/// Parse the model's raw text reply into an outcome.
#[instrument(level = "debug", skip(raw), fields(raw_len = raw.len()))]
pub fn parse_quiz_response(raw: &str) -> QuizOutcome {
  if raw.contains(NOT_VALID_TOPIC) {
    debug!(target: "quiz", "Model rejected the topic");
    return QuizOutcome::Rejected;
  }

  let parsed: RawQuiz = match json_candidates(raw)
    .into_iter()
    .find_map(|payload| serde_json::from_str(payload).ok())
  {
    Some(p) => p,
    None => {
      warn!(target: "quiz", raw = %trunc_for_log(raw, 200), "No parseable JSON payload in model reply");
      return QuizOutcome::Rejected;
    }
  };

  let quiz = Quiz {
    questions: parsed.questions,
    choices: parsed.answers,
    answers: parsed.correct_answers,
  };
  match quiz.validate() {
    Ok(()) => QuizOutcome::Accepted(quiz),
    Err(e) => {
      warn!(target: "quiz", error = %e, "Model reply failed shape validation");
      QuizOutcome::Rejected
    }
  }
}

/// Payload candidates in preference order: an explicit ```json fenced block
/// first (replies may echo other fenced snippets, e.g. the topic from the
/// prompt), then the outermost brace span as the fallback.
fn json_candidates(raw: &str) -> Vec<&str> {
  let mut out = Vec::new();
  if let Some(start) = raw.find("```json") {
    let body = &raw[start + "```json".len()..];
    if let Some(end) = body.find("```") {
      let fenced = body[..end].trim();
      if !fenced.is_empty() {
        out.push(fenced);
      }
    }
  }
  if let (Some(open), Some(close)) = (raw.find('{'), raw.rfind('}')) {
    if close > open {
      out.push(&raw[open..=close]);
    }
  }
  out
}
