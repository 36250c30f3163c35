use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{
    AnsweredQuestion, Difficulty, MasteryProgress, PracticeSession, Question, QuestionKind, Quiz,
    QuizAttempt, QuizQuestion, QuizResult,
};

/// A question as shown to a learner: no answer key, no reference answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicQuestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub kind: QuestionKind,
    pub marks: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy_level: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl From<&Question> for PublicQuestion {
    fn from(question: &Question) -> Self {
        PublicQuestion {
            id: None,
            text: question.text.clone(),
            kind: question.kind(),
            marks: question.marks,
            taxonomy_level: question.taxonomy_level.clone(),
            options: question.options().to_vec(),
        }
    }
}

impl From<&QuizQuestion> for PublicQuestion {
    fn from(stored: &QuizQuestion) -> Self {
        PublicQuestion {
            id: Some(stored.id.clone()),
            ..PublicQuestion::from(&stored.question)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PracticeSessionView {
    pub id: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub attempted_level: u32,
    pub questions: Vec<PublicQuestion>,
    pub created_at: DateTime<Utc>,
}

impl From<&PracticeSession> for PracticeSessionView {
    fn from(session: &PracticeSession) -> Self {
        PracticeSessionView {
            id: session.id.clone(),
            topic: session.topic.clone(),
            difficulty: session.difficulty,
            attempted_level: session.attempted_level,
            questions: session.questions.iter().map(PublicQuestion::from).collect(),
            created_at: session.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PracticeResultResponse {
    pub topic: String,
    pub difficulty: Difficulty,
    /// Tier suggested by the updated mastery level.
    pub recommended_difficulty: Difficulty,
    #[serde(flatten)]
    pub result: QuizResult,
}

/// A shared quiz opened for taking, together with the student's open attempt.
#[derive(Debug, Clone, Serialize)]
pub struct SharedQuizView {
    pub code: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub total_marks: u32,
    pub attempt_id: String,
    pub started_at: DateTime<Utc>,
    pub questions: Vec<PublicQuestion>,
}

impl SharedQuizView {
    pub fn new(quiz: &Quiz, attempt: &QuizAttempt) -> Self {
        SharedQuizView {
            code: quiz.code.clone(),
            title: quiz.title.clone(),
            topic: quiz.topic.clone(),
            difficulty: quiz.difficulty,
            duration_minutes: quiz.duration_minutes,
            total_marks: quiz.total_marks(),
            attempt_id: attempt.id.clone(),
            started_at: attempt.started_at,
            questions: quiz.questions.iter().map(PublicQuestion::from).collect(),
        }
    }
}

/// An AI-generated draft returned to the teacher for review. Includes answers.
#[derive(Debug, Clone, Serialize)]
pub struct QuizDraft {
    pub title: String,
    pub topic: String,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
    pub id: String,
    pub code: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub difficulty: Difficulty,
    pub question_count: usize,
    pub total_marks: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<&Quiz> for QuizSummary {
    fn from(quiz: &Quiz) -> Self {
        QuizSummary {
            id: quiz.id.clone(),
            code: quiz.code.clone(),
            title: quiz.title.clone(),
            topic: quiz.topic.clone(),
            difficulty: quiz.difficulty,
            question_count: quiz.questions.len(),
            total_marks: quiz.total_marks(),
            duration_minutes: quiz.duration_minutes,
            created_at: quiz.created_at,
        }
    }
}

/// A finalized submission. Per-question feedback stays hidden until the
/// review unlock time has passed.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub score: f64,
    pub total_possible: u32,
    pub percentage: f64,
    pub passed: bool,
    pub answered_count: u32,
    pub question_count: u32,
    pub fullscreen_exit_flag: bool,
    pub is_full_completion: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_unlocked_at: Option<DateTime<Utc>>,
    pub review_unlocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answers: Option<Vec<AnsweredQuestion>>,
}

impl SubmissionView {
    /// Student-facing view; answers appear only once review is unlocked.
    pub fn for_student(attempt: QuizAttempt, now: DateTime<Utc>) -> Self {
        let unlocked = attempt.is_review_unlocked(now);
        Self::build(attempt, unlocked, unlocked)
    }

    /// Teacher-facing view; always includes answers.
    pub fn for_teacher(attempt: QuizAttempt, now: DateTime<Utc>) -> Self {
        let unlocked = attempt.is_review_unlocked(now);
        Self::build(attempt, unlocked, true)
    }

    fn build(attempt: QuizAttempt, review_unlocked: bool, include_answers: bool) -> Self {
        SubmissionView {
            id: attempt.id,
            quiz_id: attempt.quiz_id,
            student_id: attempt.student_id,
            score: attempt.score,
            total_possible: attempt.total_possible,
            percentage: attempt.percentage,
            passed: attempt.passed,
            answered_count: attempt.answered_count,
            question_count: attempt.question_count,
            fullscreen_exit_flag: attempt.fullscreen_exit_flag,
            is_full_completion: attempt.is_full_completion,
            submitted_at: attempt.submitted_at,
            review_unlocked_at: attempt.review_unlocked_at,
            review_unlocked,
            answers: include_answers.then_some(attempt.answers),
        }
    }
}

/// Model-written study guide in fixed `## SECTION` markdown.
#[derive(Debug, Clone, Serialize)]
pub struct LearningPath {
    pub topic: String,
    pub level: Difficulty,
    pub style: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    pub topic: String,
    pub level: u32,
    pub recommended_difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<MasteryProgress> for ProgressView {
    fn from(progress: MasteryProgress) -> Self {
        ProgressView {
            recommended_difficulty: progress.recommended_difficulty(),
            topic: progress.topic,
            level: progress.level,
            modified_at: progress.modified_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::OptionKey;
    use chrono::Duration;

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

    #[test]
    fn public_question_hides_answer_key() {
        let value = serde_json::to_value(PublicQuestion::from(&capital_question()))
            .expect("question should serialize");

        assert!(value.get("correct_key").is_none());
        assert!(value.get("reference_answer").is_none());
        assert_eq!(value["options"][1], "B. Paris");
        assert_eq!(value["kind"], "multiple_choice");
    }

    #[test]
    fn subjective_public_question_hides_reference_and_options() {
        let question = Question::subjective("Explain ownership", "Single owner rule", 10);
        let value = serde_json::to_value(PublicQuestion::from(&question)).expect("question should serialize");

        assert!(value.get("options").is_none());
        assert!(!value.to_string().contains("Single owner rule"));
    }

    #[test]
    fn shared_quiz_view_carries_question_ids() {
        let quiz = Quiz::new("Geo", "abc123", "teacher-1", Difficulty::Beginner, vec![capital_question()]);
        let attempt = QuizAttempt::open(&quiz.id, "student-1", 1);

        let view = SharedQuizView::new(&quiz, &attempt);

        assert_eq!(view.code, "ABC123");
        assert_eq!(view.questions[0].id.as_deref(), Some(quiz.questions[0].id.as_str()));
        assert_eq!(view.attempt_id, attempt.id);
    }

    #[test]
    fn student_submission_view_hides_answers_until_unlocked() {
        let now = Utc::now();
        let mut attempt = QuizAttempt::open("quiz-1", "student-1", 1);
        attempt.completed = true;
        attempt.review_unlocked_at = Some(now + Duration::minutes(15));

        let locked = SubmissionView::for_student(attempt.clone(), now);
        let unlocked = SubmissionView::for_student(attempt.clone(), now + Duration::minutes(16));
        let teacher = SubmissionView::for_teacher(attempt, now);

        assert!(locked.answers.is_none());
        assert!(!locked.review_unlocked);
        assert!(unlocked.answers.is_some());
        assert!(teacher.answers.is_some());
    }
}
