use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{GeneratePracticeQuizRequest, NextLevelRequest, SubmitPracticeRequest},
};

#[post("/api/practice")]
pub async fn generate_practice_quiz(
    state: web::Data<AppState>,
    request: web::Json<GeneratePracticeQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state
        .practice_service
        .start(auth.id(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(session))
}

#[post("/api/practice/next")]
pub async fn generate_next_level(
    state: web::Data<AppState>,
    request: web::Json<NextLevelRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state
        .practice_service
        .next_level(auth.id(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(session))
}

#[get("/api/practice/{id}")]
pub async fn get_practice_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let session = state.practice_service.get_session(auth.id(), &id).await?;
    Ok(HttpResponse::Ok().json(session))
}

#[post("/api/practice/{id}/submit")]
pub async fn submit_practice_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitPracticeRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .practice_service
        .submit(auth.id(), &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/api/progress")]
pub async fn list_progress(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let progress = state.practice_service.list_progress(auth.id()).await?;
    Ok(HttpResponse::Ok().json(progress))
}
