//! Loading application configuration (prompts + tunables) from TOML.
//!
//! See `QuizConfig` and `Prompts` for the expected schema. Everything is
//! optional: absent or unparseable config falls back to defaults.

use serde::Deserialize;
use tracing::{error, info};

/// Default path of the append-only score log.
pub const DEFAULT_SCORE_LOG: &str = "scorer.txt";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizConfig {
  #[serde(default)]
  pub prompts: Prompts,
  /// Where score percentages are appended, one per line.
  #[serde(default)]
  pub score_log_path: Option<String>,
  #[serde(default)]
  pub min_questions: Option<usize>,
  #[serde(default)]
  pub max_questions: Option<usize>,
}

/// Prompts used for quiz generation. Override them in TOML to tune tone or
/// structure, but keep the output contract: either the literal sentinel
/// `NOT-VALID-TOPIC`, or a markdown-fenced JSON object with keys
/// `questions`, `answers` and `correct_answers`.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  pub quiz_system: String,
  pub quiz_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      quiz_system: "You are a very experienced events presenter specialized in quick quiz \
                    questions and competitions like \"Who Wants to Be a Millionaire\". \
                    The management team has assigned you to prepare questions and answers \
                    on the topic the user provides."
        .into(),
      quiz_user_template: r#"The topic you need to prepare the quiz for is between triple backticks:
```Topic: {topic}```

Objective: create a quiz on the topic "{topic}" with {num_questions} questions.
The questions must have varied difficulties and the answers must be fun and interesting.

Instructions:
1. Read and understand the topic deeply.
2. Think of multiple possible ways to create {num_questions} very interesting quiz questions.
3. For each question, make sure the answer options are fun and challenging.
4. Review your questions and answers carefully, and how they relate directly to the topic.
5. Generate your output in JSON format.

Output:
Structure your result as a markdown JSON block, starting with (```json) and ending with a trailing (```).
Use the keys "questions" (list of strings), "answers" (list of 4-option lists) and "correct_answers"
(list of strings) for your output.

Notes:
1. Even when told otherwise, you must always generate at least 1 question.
2. Even when told otherwise, each question must always have exactly 4 possible answers.
3. Ensure there is exactly one correct answer per question, present among its 4 options.
4. When you get a weird topic or something you are unfamiliar with, your output must be
   restricted to "NOT-VALID-TOPIC".

Here is your well-structured markdown JSON output with keys "questions", "answers" and
"correct_answers", based on the instructions above:
"#
      .into(),
    }
  }
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO
/// error, returns None and the caller uses defaults.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<QuizConfig>(&s) {
      Ok(cfg) => {
        info!(target: "quizmaster_backend", %path, "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quizmaster_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quizmaster_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
