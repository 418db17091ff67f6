use super::auth::Admin;
use super::error::ApiError;
use super::users::require_user;
use crate::database::{goals as db, Database};
use actix_web::{web, HttpResponse};
use shared_types::{CreateGoalRequest, GoalsResponse};
use std::sync::Arc;

pub async fn create_goal(
    _admin: Admin,
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<CreateGoalRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(db.async_connection.clone(), path.into_inner()).await?;
    if request.name.trim().is_empty() {
        return Err(ApiError::Validation("goal name is required".to_string()));
    }
    if request.target_amount <= 0.0 {
        return Err(ApiError::Validation("target_amount must be positive".to_string()));
    }

    let goal =
        db::create_goal(db.async_connection.clone(), user.id, &request.name, request.target_amount)
            .await?;
    Ok(HttpResponse::Created().json(goal))
}

pub async fn list_goals(
    _admin: Admin,
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(db.async_connection.clone(), path.into_inner()).await?;
    let goals = db::list_goals(db.async_connection.clone(), user.id, None).await?;
    Ok(HttpResponse::Ok().json(GoalsResponse { goals }))
}
