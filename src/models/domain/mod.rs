pub mod difficulty;
pub mod practice_session;
pub mod progress;
pub mod question;
pub mod quiz;
pub mod quiz_attempt;
pub mod quiz_result;

pub use difficulty::Difficulty;
pub use practice_session::PracticeSession;
pub use progress::MasteryProgress;
pub use question::{
    OptionKey, Question, QuestionBody, QuestionKind, QuizFormat, MAX_QUESTION_MARKS,
};
pub use quiz::{Quiz, QuizQuestion};
pub use quiz_attempt::QuizAttempt;
pub use quiz_result::{AnsweredQuestion, GradeResult, QuizResult};
