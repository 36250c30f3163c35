use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;

use crate::models::domain::question::total_marks;
use crate::models::domain::{AnsweredQuestion, Question, QuizAttempt, QuizResult};
use crate::services::grading_service::GradingService;

pub const PASS_THRESHOLD: f64 = 60.0;
pub const REVIEW_UNLOCK_MINUTES: i64 = 15;

/// Completion metadata recorded on a finalized shared-quiz attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionStatus {
    pub answered_count: u32,
    pub question_count: u32,
    pub fullscreen_exit_flag: bool,
    pub is_full_completion: bool,
    pub submitted_at: DateTime<Utc>,
    pub review_unlocked_at: DateTime<Utc>,
}

pub struct SubmissionAggregator {
    grading: Arc<GradingService>,
}

impl SubmissionAggregator {
    pub fn new(grading: Arc<GradingService>) -> Self {
        Self { grading }
    }

    /// Grades every pair concurrently; the output keeps input order.
    pub async fn grade_all(&self, answers: &[(Question, String)]) -> Vec<AnsweredQuestion> {
        let grades = join_all(
            answers
                .iter()
                .map(|(question, submitted)| self.grading.grade(question, submitted)),
        )
        .await;

        answers
            .iter()
            .zip(grades)
            .map(|((question, submitted), grade)| {
                AnsweredQuestion::new(question.clone(), submitted.clone(), grade)
            })
            .collect()
    }

    pub async fn aggregate(
        &self,
        answers: &[(Question, String)],
        prior_level: u32,
        attempted_level: u32,
    ) -> QuizResult {
        summarize(self.grade_all(answers).await, prior_level, attempted_level)
    }
}

pub fn percentage(awarded: f64, possible: u32) -> f64 {
    if possible == 0 {
        return 0.0;
    }
    awarded / f64::from(possible) * 100.0
}

pub fn next_mastery_level(prior_level: u32, attempted_level: u32, passed: bool) -> u32 {
    if passed {
        prior_level.max(attempted_level.saturating_add(1))
    } else {
        prior_level
    }
}

pub fn summarize(answers: Vec<AnsweredQuestion>, prior_level: u32, attempted_level: u32) -> QuizResult {
    let total_possible_marks = total_marks(answers.iter().map(|a| &a.question));
    let total_awarded_marks: f64 = answers.iter().map(|a| a.awarded_marks).sum();
    let percentage = percentage(total_awarded_marks, total_possible_marks);
    let passed = percentage >= PASS_THRESHOLD;

    QuizResult {
        answers,
        total_possible_marks,
        total_awarded_marks,
        percentage,
        passed,
        previous_mastery_level: prior_level,
        mastery_level: next_mastery_level(prior_level, attempted_level, passed),
    }
}

pub fn completion_status(
    answers: &[AnsweredQuestion],
    question_count: u32,
    fullscreen_exit_flag: bool,
    submitted_at: DateTime<Utc>,
) -> CompletionStatus {
    let answered_count = answers.iter().filter(|a| a.is_answered()).count() as u32;

    CompletionStatus {
        answered_count,
        question_count,
        fullscreen_exit_flag,
        is_full_completion: answered_count == question_count && !fullscreen_exit_flag,
        submitted_at,
        review_unlocked_at: submitted_at + Duration::minutes(REVIEW_UNLOCK_MINUTES),
    }
}

/// Writes totals and completion metadata onto an open attempt and marks it completed.
pub fn finalize_attempt(attempt: &mut QuizAttempt, submitted_at: DateTime<Utc>) {
    let summary = summarize(attempt.answers.clone(), 0, 0);
    let status = completion_status(
        &attempt.answers,
        attempt.question_count,
        attempt.fullscreen_exit_flag,
        submitted_at,
    );

    attempt.score = summary.total_awarded_marks;
    attempt.total_possible = summary.total_possible_marks;
    attempt.percentage = summary.percentage;
    attempt.passed = summary.passed;
    attempt.answered_count = status.answered_count;
    attempt.is_full_completion = status.is_full_completion;
    attempt.submitted_at = Some(status.submitted_at);
    attempt.review_unlocked_at = Some(status.review_unlocked_at);
    attempt.completed = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ModelError;
    use crate::models::domain::{GradeResult, OptionKey};
    use crate::services::model_service::MockTextGenerator;

    fn mcq(key: OptionKey, marks: u32) -> Question {
        Question::multiple_choice(
            "Pick one",
            [
                "A. first".to_string(),
                "B. second".to_string(),
                "C. third".to_string(),
                "D. fourth".to_string(),
            ],
            key,
            marks,
        )
    }

    fn aggregator(evaluator_reply: Result<String, ModelError>, calls: usize) -> SubmissionAggregator {
        let mut mock = MockTextGenerator::new();
        mock.expect_complete()
            .times(calls)
            .returning(move |_| evaluator_reply.clone());
        SubmissionAggregator::new(Arc::new(GradingService::new(Arc::new(mock))))
    }

    fn graded(marks: u32, awarded: f64, text: &str) -> AnsweredQuestion {
        AnsweredQuestion::new(
            Question::subjective("Q", "ref", marks),
            text,
            GradeResult {
                is_correct: awarded > 0.0,
                awarded_marks: awarded,
                confidence: None,
                degraded: false,
            },
        )
    }

    #[tokio::test]
    async fn one_right_one_wrong_is_fifty_percent_and_fails() {
        let answers = vec![
            (mcq(OptionKey::A, 1), "A. first".to_string()),
            (mcq(OptionKey::B, 1), "C. third".to_string()),
        ];

        let result = aggregator(Ok(String::new()), 0).aggregate(&answers, 1, 1).await;

        assert_eq!(result.total_possible_marks, 2);
        assert_eq!(result.total_awarded_marks, 1.0);
        assert_eq!(result.percentage, 50.0);
        assert!(!result.passed);
        assert_eq!(result.mastery_level, 1);
        assert_eq!(result.correct_count(), 1);
    }

    #[tokio::test]
    async fn zero_questions_is_zero_percent() {
        let result = aggregator(Ok(String::new()), 0).aggregate(&[], 3, 3).await;

        assert_eq!(result.percentage, 0.0);
        assert!(!result.passed);
        assert_eq!(result.mastery_level, 3);
    }

    #[tokio::test]
    async fn pass_raises_mastery_past_attempted_level() {
        let answers = vec![
            (mcq(OptionKey::A, 1), "A. first".to_string()),
            (
                Question::subjective("Explain", "ref", 10),
                "an answer".to_string(),
            ),
        ];

        let result = aggregator(Ok("0.8".to_string()), 1).aggregate(&answers, 2, 2).await;

        assert!((result.total_awarded_marks - 9.0).abs() < 1e-9);
        assert!(result.passed);
        assert_eq!(result.mastery_level, 3);
        assert!(result.leveled_up());
    }

    #[tokio::test]
    async fn graded_answers_keep_input_order() {
        let answers = vec![
            (mcq(OptionKey::D, 1), "D. fourth".to_string()),
            (mcq(OptionKey::A, 2), "".to_string()),
            (mcq(OptionKey::B, 3), "B. second".to_string()),
        ];

        let graded = aggregator(Ok(String::new()), 0).grade_all(&answers).await;

        let awarded: Vec<f64> = graded.iter().map(|a| a.awarded_marks).collect();
        assert_eq!(awarded, vec![1.0, 0.0, 3.0]);
    }

    #[test]
    fn summarize_saturates_oversized_mark_totals() {
        let result = summarize(
            vec![graded(u32::MAX, 1.0, "a"), graded(1, 1.0, "b")],
            1,
            1,
        );

        assert_eq!(result.total_possible_marks, u32::MAX);
        assert!(!result.passed);
    }

    #[test]
    fn summarize_is_invariant_under_reordering() {
        let answers = vec![graded(1, 1.0, "a"), graded(10, 4.5, "b"), graded(5, 0.0, "")];
        let mut reversed = answers.clone();
        reversed.reverse();

        let forward = summarize(answers, 1, 2);
        let backward = summarize(reversed, 1, 2);

        assert_eq!(forward.total_awarded_marks, backward.total_awarded_marks);
        assert_eq!(forward.percentage, backward.percentage);
        assert_eq!(forward.passed, backward.passed);
        assert_eq!(forward.mastery_level, backward.mastery_level);
    }

    #[test]
    fn mastery_never_decreases_over_any_sequence() {
        let outcomes = [true, false, true, true, false, false, true];
        let attempted = [1, 5, 2, 1, 6, 1, 3];
        let mut level = 1;

        for (passed, attempted) in outcomes.iter().zip(attempted) {
            let next = next_mastery_level(level, attempted, *passed);
            assert!(next >= level);
            level = next;
        }

        assert_eq!(level, 4);
    }

    #[test]
    fn passing_at_a_lower_level_keeps_higher_mastery() {
        assert_eq!(next_mastery_level(5, 1, true), 5);
        assert_eq!(next_mastery_level(1, 1, true), 2);
        assert_eq!(next_mastery_level(4, 4, false), 4);
    }

    #[test]
    fn completion_requires_all_answers_and_no_fullscreen_exit() {
        let now = Utc::now();
        let answers = vec![graded(1, 1.0, "a"), graded(1, 0.0, "b")];

        let full = completion_status(&answers, 2, false, now);
        let exited = completion_status(&answers, 2, true, now);
        let partial = completion_status(&answers[..1], 2, false, now);

        assert!(full.is_full_completion);
        assert!(!exited.is_full_completion);
        assert!(!partial.is_full_completion);
        assert_eq!(partial.answered_count, 1);
        assert_eq!(full.review_unlocked_at, now + Duration::minutes(15));
    }

    #[test]
    fn finalize_attempt_fills_totals_and_marks_completed() {
        let now = Utc::now();
        let mut attempt = QuizAttempt::open("quiz-1", "student-1", 2);
        attempt.upsert_answer(graded(10, 7.0, "answer").with_question_id("q-1"));
        attempt.upsert_answer(graded(10, 0.0, " ").with_question_id("q-2"));

        finalize_attempt(&mut attempt, now);

        assert!(attempt.completed);
        assert_eq!(attempt.score, 7.0);
        assert_eq!(attempt.total_possible, 20);
        assert_eq!(attempt.percentage, 35.0);
        assert!(!attempt.passed);
        assert_eq!(attempt.answered_count, 1);
        assert!(!attempt.is_full_completion);
        assert_eq!(attempt.submitted_at, Some(now));
    }
}
