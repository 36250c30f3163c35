pub mod grading_service;
pub mod learning_service;
pub mod model_service;
pub mod practice_service;
pub mod prompt_builder;
pub mod quiz_generator;
pub mod quiz_service;
pub mod response_parser;
pub mod submission_aggregator;

pub use grading_service::GradingService;
pub use learning_service::LearningPathService;
pub use model_service::{OpenAiTextGenerator, TextGenerator};
pub use practice_service::PracticeService;
pub use quiz_generator::{GenerationRequest, QuizGenerator};
pub use quiz_service::QuizService;
pub use submission_aggregator::SubmissionAggregator;
