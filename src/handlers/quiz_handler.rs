use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::SubmitSharedQuizRequest,
};

#[get("/api/quizzes/{code}")]
pub async fn take_quiz(
    state: web::Data<AppState>,
    code: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.take(auth.id(), &code).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[post("/api/quizzes/{code}/submit")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    code: web::Path<String>,
    request: web::Json<SubmitSharedQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let submission = state
        .quiz_service
        .submit(auth.id(), &code, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(submission))
}

/// Browsers send this from `beforeunload`, often with an empty body.
#[post("/api/quizzes/{code}/auto-submit")]
pub async fn auto_submit_quiz(
    state: web::Data<AppState>,
    code: web::Path<String>,
    request: Option<web::Json<SubmitSharedQuizRequest>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.map(web::Json::into_inner).unwrap_or_default();
    let submission = state
        .quiz_service
        .auto_submit(auth.id(), &code, request)
        .await?;
    Ok(HttpResponse::Ok().json(submission))
}

#[get("/api/submissions")]
pub async fn list_my_submissions(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let submissions = state.quiz_service.my_submissions(auth.id()).await?;
    Ok(HttpResponse::Ok().json(submissions))
}
