pub mod health_handler;
pub mod learn_handler;
pub mod practice_handler;
pub mod quiz_handler;
pub mod teacher_handler;

use actix_web::web;

use crate::errors::AppError;

pub use health_handler::health_check;
pub use learn_handler::generate_learning_path;
pub use practice_handler::{
    generate_next_level, generate_practice_quiz, get_practice_session, list_progress,
    submit_practice_quiz,
};
pub use quiz_handler::{auto_submit_quiz, list_my_submissions, submit_quiz, take_quiz};
pub use teacher_handler::{
    create_manual_quiz, finalize_quiz_draft, list_own_quizzes, preview_quiz_draft, quiz_results,
};

/// Registers every route. Static paths go before their `{param}` siblings.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .service(health_check)
    .service(generate_next_level)
    .service(generate_practice_quiz)
    .service(get_practice_session)
    .service(submit_practice_quiz)
    .service(list_progress)
    .service(generate_learning_path)
    .service(preview_quiz_draft)
    .service(finalize_quiz_draft)
    .service(create_manual_quiz)
    .service(list_own_quizzes)
    .service(quiz_results)
    .service(take_quiz)
    .service(submit_quiz)
    .service(auto_submit_quiz)
    .service(list_my_submissions);
}
