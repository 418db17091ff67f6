use super::auth::Admin;
use super::error::ApiError;
use super::users::require_user;
use crate::database::{accounts as db, Database};
use actix_web::{web, HttpResponse};
use shared_types::{AccountsResponse, CreateAccountRequest};
use std::sync::Arc;

pub async fn create_account(
    _admin: Admin,
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(db.async_connection.clone(), path.into_inner()).await?;
    if request.name.trim().is_empty() {
        return Err(ApiError::Validation("account name is required".to_string()));
    }

    let account = db::create_account(
        db.async_connection.clone(),
        user.id,
        &request.name,
        request.balance,
        request.is_reserve,
    )
    .await?;

    Ok(HttpResponse::Created().json(account))
}

pub async fn list_accounts(
    _admin: Admin,
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(db.async_connection.clone(), path.into_inner()).await?;
    let accounts = db::list_accounts(db.async_connection.clone(), user.id).await?;
    let total_balance = accounts.iter().map(|a| a.balance).sum();

    Ok(HttpResponse::Ok().json(AccountsResponse {
        accounts,
        total_balance,
    }))
}

pub async fn set_default_account(
    _admin: Admin,
    db: web::Data<Arc<Database>>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, ApiError> {
    let (user_id, account_id) = path.into_inner();
    let user = require_user(db.async_connection.clone(), user_id).await?;
    db::get_account(db.async_connection.clone(), user.id, account_id)
        .await?
        .ok_or(ApiError::NotFound("account"))?;

    let account = db::set_default(db.async_connection.clone(), user.id, account_id).await?;
    Ok(HttpResponse::Ok().json(account))
}
