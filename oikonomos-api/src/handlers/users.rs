use super::auth::Admin;
use super::error::ApiError;
use crate::database::{users as db, AsyncDbConnection, Database};
use actix_web::{web, HttpResponse};
use shared_types::{CreateUserRequest, User, UsersResponse};
use std::sync::Arc;

/// 404 unless the path's user exists
pub(crate) async fn require_user(conn: AsyncDbConnection, user_id: i64) -> Result<User, ApiError> {
    db::get_user(conn, user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))
}

pub async fn create_user(
    _admin: Admin,
    db: web::Data<Arc<Database>>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let email = request.email.trim();
    if !email.contains('@') {
        return Err(ApiError::Validation(format!("invalid e-mail address: '{}'", email)));
    }

    let nickname = request.nickname.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let user = db::create_user(db.async_connection.clone(), email, nickname).await?;
    tracing::info!("Created user {}", user.id);

    Ok(HttpResponse::Created().json(user))
}

pub async fn list_users(_admin: Admin, db: web::Data<Arc<Database>>) -> Result<HttpResponse, ApiError> {
    let users = db::list_users(db.async_connection.clone()).await?;
    Ok(HttpResponse::Ok().json(UsersResponse { users }))
}
