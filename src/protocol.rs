//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::session::{Action, Screen, Session};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    /// Re-request the current view without applying an action.
    GetView,
    /// Apply a user action to this connection's session.
    Action { action: Action },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    View { view: SessionView },
    Error { message: String },
}

/// One renderable snapshot of the session. Exactly one of `question`,
/// `score`, `feedback` is populated on the InQuiz/Score/Feedback screens.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub screen: Screen,
    #[serde(rename = "invalidInput")]
    pub invalid_input: bool,
    /// Inline message shown on Config after a rejected topic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
    #[serde(rename = "minQuestions")]
    pub min_questions: usize,
    #[serde(rename = "maxQuestions")]
    pub max_questions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Vec<FeedbackRow>>,
}

/// The current question as the quiz screen renders it.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    /// 1-based, for display.
    #[serde(rename = "questionNumber")]
    pub question_number: usize,
    #[serde(rename = "totalQuestions")]
    pub total_questions: usize,
    pub question: String,
    pub options: Vec<String>,
    /// Previously selected option, restored as the default when the user
    /// navigated backward.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    #[serde(rename = "canGoPrevious")]
    pub can_go_previous: bool,
    /// "Next Question" strictly before the last index, "Submit" at it.
    #[serde(rename = "advanceLabel")]
    pub advance_label: String,
}

#[derive(Debug, Serialize)]
pub struct ScoreView {
    pub score: usize,
    pub total: usize,
    pub percentage: u64,
    #[serde(rename = "highScore", skip_serializing_if = "Option::is_none")]
    pub high_score: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackRow {
    pub question: String,
    #[serde(rename = "yourAnswer")]
    pub your_answer: Option<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
}

pub const REJECTION_MESSAGE: &str =
    "I did not quite understand what topic you are looking for, please try again";

/// Convert the internal `Session` to the public view DTO.
pub fn to_view(s: &Session, min_questions: usize, max_questions: usize) -> SessionView {
    let question = match (s.screen, s.current_question, &s.quiz) {
        (Screen::InQuiz, Some(idx), Some(quiz)) => Some(QuestionView {
            question_number: idx + 1,
            total_questions: quiz.len(),
            question: quiz.questions[idx].clone(),
            options: quiz.choices[idx].clone(),
            selected: s.prev_user_answers.get(idx).cloned().flatten(),
            can_go_previous: s.can_go_previous(),
            advance_label: s.advance_label().unwrap_or("Next Question").to_string(),
        }),
        _ => None,
    };

    let score = match (s.screen, &s.quiz) {
        (Screen::Score, Some(quiz)) => Some(ScoreView {
            score: s.score,
            total: quiz.len(),
            percentage: crate::scores::percentage(s.score, quiz.len()),
            high_score: s.high_score,
        }),
        _ => None,
    };

    let feedback = match (s.screen, &s.quiz) {
        (Screen::Feedback, Some(quiz)) => Some(
            quiz.questions
                .iter()
                .enumerate()
                .map(|(i, q)| FeedbackRow {
                    question: q.clone(),
                    your_answer: s.user_answers.get(i).cloned().flatten(),
                    correct_answer: quiz.answers[i].clone(),
                })
                .collect(),
        ),
        _ => None,
    };

    SessionView {
        screen: s.screen,
        invalid_input: s.invalid_input,
        rejection: s.invalid_input.then(|| REJECTION_MESSAGE.to_string()),
        min_questions,
        max_questions,
        question,
        score,
        feedback,
    }
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct SessionCreatedOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub view: SessionView,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}
