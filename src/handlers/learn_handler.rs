use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState, auth::AuthenticatedUser, errors::AppError,
    models::dto::request::LearningPathRequest,
};

#[post("/api/learn")]
pub async fn generate_learning_path(
    state: web::Data<AppState>,
    request: web::Json<LearningPathRequest>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let path = state.learning_service.generate(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(path))
}
