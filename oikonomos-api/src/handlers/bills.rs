use super::auth::Admin;
use super::error::ApiError;
use super::users::require_user;
use crate::database::{scheduled_transactions as db, Database};
use crate::helpers::dates::parse_date;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use shared_types::{BillStatus, BillsResponse, CreateBillRequest};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct BillsQuery {
    status: Option<BillStatus>,
    from: Option<String>,
    to: Option<String>,
}

pub async fn create_bill(
    _admin: Admin,
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<CreateBillRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(db.async_connection.clone(), path.into_inner()).await?;
    if request.description.trim().is_empty() {
        return Err(ApiError::Validation("description is required".to_string()));
    }
    if request.amount.is_nan() || request.amount <= 0.0 {
        return Err(ApiError::Validation("amount must be positive".to_string()));
    }
    parse_date(&request.due_date).map_err(|e| ApiError::Validation(e.to_string()))?;

    let bill = db::create_bill(
        db.async_connection.clone(),
        user.id,
        &request.description,
        request.amount,
        &request.category_name,
        &request.due_date,
        request.is_recurring,
    )
    .await?;

    Ok(HttpResponse::Created().json(bill))
}

pub async fn list_bills(
    _admin: Admin,
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    query: web::Query<BillsQuery>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(db.async_connection.clone(), path.into_inner()).await?;
    for date in [&query.from, &query.to].into_iter().flatten() {
        parse_date(date).map_err(|e| ApiError::Validation(e.to_string()))?;
    }

    let bills = db::list_bills(
        db.async_connection.clone(),
        user.id,
        query.status,
        query.from.as_deref(),
        query.to.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(BillsResponse { bills }))
}
