use super::auth::Admin;
use super::error::ApiError;
use super::users::require_user;
use crate::database::{transactions as db, Database};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use shared_types::TransactionsResponse;
use std::sync::Arc;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

#[derive(Deserialize)]
pub struct TransactionsQuery {
    limit: Option<usize>,
}

pub async fn list_transactions(
    _admin: Admin,
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    query: web::Query<TransactionsQuery>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(db.async_connection.clone(), path.into_inner()).await?;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

    let transactions = db::list_transactions(db.async_connection.clone(), user.id, limit).await?;
    Ok(HttpResponse::Ok().json(TransactionsResponse { transactions }))
}
