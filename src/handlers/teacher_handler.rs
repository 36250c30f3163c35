use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_teacher, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{CreateManualQuizRequest, FinalizeQuizRequest, PreviewQuizRequest},
};

#[post("/api/teacher/quizzes")]
pub async fn create_manual_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateManualQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_teacher(&auth.0)?;

    let quiz = state
        .quiz_service
        .create_manual(auth.id(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(quiz))
}

#[post("/api/teacher/quizzes/preview")]
pub async fn preview_quiz_draft(
    state: web::Data<AppState>,
    request: web::Json<PreviewQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_teacher(&auth.0)?;

    let draft = state.quiz_service.preview_draft(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(draft))
}

#[post("/api/teacher/quizzes/finalize")]
pub async fn finalize_quiz_draft(
    state: web::Data<AppState>,
    request: web::Json<FinalizeQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_teacher(&auth.0)?;

    let quiz = state
        .quiz_service
        .finalize_draft(auth.id(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(quiz))
}

#[get("/api/teacher/quizzes")]
pub async fn list_own_quizzes(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_teacher(&auth.0)?;

    let quizzes = state.quiz_service.list_own(auth.id()).await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/api/teacher/quizzes/{code}/results")]
pub async fn quiz_results(
    state: web::Data<AppState>,
    code: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_teacher(&auth.0)?;

    let results = state.quiz_service.results(auth.id(), &code).await?;
    Ok(HttpResponse::Ok().json(results))
}
