//! Personality quiz routes. Question content and scoring live in
//! `ringforge_core::quiz`; this layer only checks the transport shape.

use axum::{
    routing::{get, post},
    Json, Router,
};
use ringforge_core::quiz::{self, QuizAnalysis, QuizQuestion};
use serde::Deserialize;
use tracing::info;

use crate::errors::{self, ApiReply};

#[derive(Debug, Deserialize)]
pub struct QuizAnswer {
    pub question_id: u32,
    pub personality: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub answers: Vec<QuizAnswer>,
}

pub fn router() -> Router {
    Router::new()
        .route("/quiz/questions", get(questions))
        .route("/quiz/analyze", post(analyze_quiz))
}

async fn questions() -> Json<Vec<QuizQuestion>> {
    Json(quiz::quiz_questions())
}

async fn analyze_quiz(Json(body): Json<AnalyzeRequest>) -> Result<Json<QuizAnalysis>, ApiReply> {
    let correlation_id = errors::correlation_id();

    for answer in &body.answers {
        if answer.personality.trim().is_empty() {
            return Err(errors::bad_request(
                &correlation_id,
                format!("answer for question {} is missing a personality tag", answer.question_id),
            ));
        }
    }

    let tags: Vec<String> =
        body.answers.iter().map(|answer| answer.personality.trim().to_string()).collect();

    let analysis =
        quiz::analyze(&tags).map_err(|error| errors::domain(&correlation_id, error))?;

    info!(
        event_name = "api.quiz.analyzed",
        correlation_id = %correlation_id,
        personality = %analysis.personality,
        confidence = analysis.confidence,
        "quiz answers analyzed"
    );

    Ok(Json(analysis))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::Json;
    use ringforge_core::StoneCut;

    use super::{analyze_quiz, questions, AnalyzeRequest, QuizAnswer};

    fn answers(tags: &[&str]) -> AnalyzeRequest {
        AnalyzeRequest {
            answers: tags
                .iter()
                .enumerate()
                .map(|(index, tag)| QuizAnswer {
                    question_id: index as u32 + 1,
                    personality: tag.to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn questions_returns_the_full_quiz() {
        let Json(payload) = questions().await;

        assert_eq!(payload.len(), 4);
        for question in &payload {
            assert_eq!(question.options.len(), 5);
        }
    }

    #[tokio::test]
    async fn unanimous_answers_map_to_the_classic_tuple() {
        let Json(analysis) = analyze_quiz(Json(answers(&["classic", "classic", "classic", "classic"])))
            .await
            .expect("analysis");

        assert_eq!(analysis.personality, "classic");
        assert_eq!(analysis.confidence, 1.0);
        assert_eq!(analysis.recommendation.stone, StoneCut::Round);
        assert_eq!(analysis.recommendation.setting, "solitaire");
        assert_eq!(analysis.recommendation.metal, "white-gold");
    }

    #[tokio::test]
    async fn an_empty_answer_list_is_rejected() {
        let (status, Json(body)) =
            analyze_quiz(Json(answers(&[]))).await.expect_err("empty answers should be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("at least one answer"));
    }

    #[tokio::test]
    async fn a_blank_personality_names_the_offending_question() {
        let mut request = answers(&["classic", "modern"]);
        request.answers[1].personality = "   ".to_string();

        let (status, Json(body)) =
            analyze_quiz(Json(request)).await.expect_err("blank tag should be rejected");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("question 2"));
    }
}
