use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::GradingDegraded;
use crate::models::domain::{GradeResult, OptionKey, Question, QuestionBody};
use crate::services::model_service::TextGenerator;
use crate::services::prompt_builder::build_evaluation_prompt;

/// Score used when the evaluator cannot produce one.
pub const NEUTRAL_CONFIDENCE: f64 = 0.5;
/// Minimum evaluator confidence for a subjective answer to count as correct.
pub const CORRECT_THRESHOLD: f64 = 0.6;

static SCORE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?\d*\.?\d+").expect("SCORE_REGEX is a valid regex pattern"));

/// Reads the option letter out of a `"<Letter>. <text>"` submission.
/// Without a `". "` separator the whole trimmed text is the token.
pub fn extract_choice_letter(submitted: &str) -> &str {
    let trimmed = submitted.trim();
    match trimmed.split_once(". ") {
        Some((letter, _)) => letter,
        None => trimmed,
    }
}

pub fn grade_multiple_choice(correct_key: OptionKey, marks: u32, submitted: &str) -> GradeResult {
    if submitted.trim().is_empty() {
        return GradeResult::unanswered();
    }

    let is_correct = extract_choice_letter(submitted) == correct_key.as_str();
    GradeResult {
        is_correct,
        awarded_marks: if is_correct { f64::from(marks) } else { 0.0 },
        confidence: None,
        degraded: false,
    }
}

/// First number in the evaluator's reply, if any.
pub fn parse_confidence(reply: &str) -> Option<f64> {
    SCORE_REGEX
        .find(reply)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return NEUTRAL_CONFIDENCE;
    }
    value.clamp(0.0, 1.0)
}

fn subjective_grade(marks: u32, confidence: f64, degraded: bool) -> GradeResult {
    let confidence = clamp_confidence(confidence);
    GradeResult {
        is_correct: confidence >= CORRECT_THRESHOLD,
        awarded_marks: f64::from(marks) * confidence,
        confidence: Some(confidence),
        degraded,
    }
}

/// Grades single answers. Never fails: evaluator trouble degrades the score.
pub struct GradingService {
    evaluator: Arc<dyn TextGenerator>,
}

impl GradingService {
    pub fn new(evaluator: Arc<dyn TextGenerator>) -> Self {
        Self { evaluator }
    }

    pub async fn grade(&self, question: &Question, submitted: &str) -> GradeResult {
        match &question.body {
            QuestionBody::MultipleChoice { correct_key, .. } => {
                grade_multiple_choice(*correct_key, question.marks, submitted)
            }
            QuestionBody::Subjective { reference_answer } => {
                if submitted.trim().is_empty() {
                    return subjective_grade(question.marks, 0.0, false);
                }

                match self.evaluate(&question.text, submitted, reference_answer).await {
                    Ok(confidence) => subjective_grade(question.marks, confidence, false),
                    Err(degraded) => {
                        log::warn!(
                            "Falling back to neutral score for subjective answer: {}",
                            degraded
                        );
                        subjective_grade(question.marks, NEUTRAL_CONFIDENCE, true)
                    }
                }
            }
        }
    }

    async fn evaluate(
        &self,
        question: &str,
        answer: &str,
        reference: &str,
    ) -> Result<f64, GradingDegraded> {
        let prompt = build_evaluation_prompt(question, answer, reference);
        let reply = self.evaluator.complete(&prompt).await?;

        parse_confidence(&reply).ok_or(GradingDegraded::Unparseable(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ModelError;
    use crate::models::domain::question::format_choice;
    use crate::services::model_service::MockTextGenerator;

    fn capital_question() -> Question {
        Question::multiple_choice(
            "Capital of France?",
            [
                "A. London".to_string(),
                "B. Paris".to_string(),
                "C. Rome".to_string(),
                "D. Madrid".to_string(),
            ],
            OptionKey::B,
            1,
        )
    }

    fn essay_question() -> Question {
        Question::subjective("Explain ownership", "Each value has a single owner", 10)
    }

    fn service_replying(reply: Result<String, ModelError>, calls: usize) -> GradingService {
        let mut mock = MockTextGenerator::new();
        mock.expect_complete()
            .times(calls)
            .returning(move |_| reply.clone());
        GradingService::new(Arc::new(mock))
    }

    #[test]
    fn extract_choice_letter_reads_leading_token() {
        assert_eq!(extract_choice_letter("B. Paris"), "B");
        assert_eq!(extract_choice_letter("  C. St. Louis "), "C");
        assert_eq!(extract_choice_letter("D"), "D");
        assert_eq!(extract_choice_letter(&format_choice(OptionKey::A, "London")), "A");
    }

    #[tokio::test]
    async fn mcq_exact_key_match_awards_full_marks() {
        let service = service_replying(Ok(String::new()), 0);
        let question = capital_question();

        let right = service.grade(&question, "B. Paris").await;
        let wrong = service.grade(&question, "A. London").await;

        assert!(right.is_correct);
        assert_eq!(right.awarded_marks, 1.0);
        assert!(!wrong.is_correct);
        assert_eq!(wrong.awarded_marks, 0.0);
        assert_eq!(right.confidence, None);
    }

    #[test]
    fn mcq_is_case_sensitive_and_blank_is_unanswered() {
        assert!(!grade_multiple_choice(OptionKey::B, 1, "b. Paris").is_correct);
        assert_eq!(grade_multiple_choice(OptionKey::B, 1, "   "), GradeResult::unanswered());
    }

    #[test]
    fn mcq_grading_is_deterministic() {
        let first = grade_multiple_choice(OptionKey::C, 2, "C. Rome");
        for _ in 0..10 {
            assert_eq!(grade_multiple_choice(OptionKey::C, 2, "C. Rome"), first);
        }
    }

    #[test]
    fn parse_confidence_takes_first_number() {
        assert_eq!(parse_confidence("Score: 0.85 out of 1"), Some(0.85));
        assert_eq!(parse_confidence("-0.3"), Some(-0.3));
        assert_eq!(parse_confidence(".7 overall"), Some(0.7));
        assert_eq!(parse_confidence("N/A"), None);
    }

    #[test]
    fn clamp_keeps_confidence_in_unit_range() {
        assert_eq!(clamp_confidence(1.7), 1.0);
        assert_eq!(clamp_confidence(-0.3), 0.0);
        assert_eq!(clamp_confidence(0.42), 0.42);
        assert_eq!(clamp_confidence(f64::NAN), NEUTRAL_CONFIDENCE);
    }

    #[tokio::test]
    async fn subjective_uses_evaluator_score() {
        let service = service_replying(Ok("Score: 0.85 out of 1".to_string()), 1);

        let grade = service.grade(&essay_question(), "Every value has one owner").await;

        assert_eq!(grade.confidence, Some(0.85));
        assert!((grade.awarded_marks - 8.5).abs() < 1e-9);
        assert!(grade.is_correct);
        assert!(!grade.degraded);
    }

    #[tokio::test]
    async fn subjective_score_is_clamped_to_marks() {
        let high = service_replying(Ok("1.7".to_string()), 1)
            .grade(&essay_question(), "answer")
            .await;
        let low = service_replying(Ok("-0.3".to_string()), 1)
            .grade(&essay_question(), "answer")
            .await;

        assert_eq!(high.awarded_marks, 10.0);
        assert_eq!(low.awarded_marks, 0.0);
        assert!(!low.is_correct);
    }

    #[tokio::test]
    async fn subjective_without_number_gets_neutral_score() {
        let grade = service_replying(Ok("N/A".to_string()), 1)
            .grade(&essay_question(), "answer")
            .await;

        assert_eq!(grade.confidence, Some(0.5));
        assert_eq!(grade.awarded_marks, 5.0);
        assert!(!grade.is_correct);
    }

    #[tokio::test]
    async fn evaluator_failure_degrades_to_neutral_score() {
        let grade = service_replying(Err(ModelError::Timeout(60)), 1)
            .grade(&essay_question(), "answer")
            .await;

        assert_eq!(grade.confidence, Some(NEUTRAL_CONFIDENCE));
        assert_eq!(grade.awarded_marks, 5.0);
        assert!(grade.degraded);
    }

    #[tokio::test]
    async fn blank_subjective_answer_skips_evaluator() {
        let service = service_replying(Ok("1.0".to_string()), 0);

        let grade = service.grade(&essay_question(), "  \n ").await;

        assert_eq!(grade.confidence, Some(0.0));
        assert_eq!(grade.awarded_marks, 0.0);
        assert!(!grade.is_correct);
    }

    #[tokio::test]
    async fn threshold_boundary_counts_as_correct() {
        let grade = service_replying(Ok("0.6".to_string()), 1)
            .grade(&essay_question(), "answer")
            .await;

        assert!(grade.is_correct);
    }
}
