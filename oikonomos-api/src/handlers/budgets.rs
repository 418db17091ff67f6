use super::auth::Admin;
use super::error::ApiError;
use super::users::require_user;
use crate::database::{budgets as db, categories, Database};
use crate::helpers::dates::local_today;
use actix_web::{web, HttpResponse};
use chrono::{Datelike, Utc};
use chrono_tz::Tz;
use commands::normalize::normalize;
use serde::Deserialize;
use shared_types::{BudgetsResponse, CategoryKind, SetBudgetsRequest};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct BudgetsQuery {
    year: Option<i32>,
    month: Option<u32>,
}

/// Replaces every budget of the given month
pub async fn set_budgets(
    _admin: Admin,
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<SetBudgetsRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(db.async_connection.clone(), path.into_inner()).await?;
    if !(1..=12).contains(&request.month) {
        return Err(ApiError::Validation(format!("invalid month {}", request.month)));
    }
    let known: Vec<String> =
        categories::list_categories(db.async_connection.clone(), user.id, Some(CategoryKind::Expense))
            .await?
            .iter()
            .map(|c| normalize(&c.name))
            .collect();
    for entry in &request.budgets {
        if !known.contains(&normalize(&entry.category_name)) {
            return Err(ApiError::Validation(format!(
                "unknown expense category '{}'",
                entry.category_name.trim()
            )));
        }
        if entry.amount.is_nan() || entry.amount < 0.0 {
            return Err(ApiError::Validation(format!(
                "budget for '{}' must not be negative",
                entry.category_name
            )));
        }
    }

    let budgets = db::set_budgets(
        db.async_connection.clone(),
        user.id,
        request.year,
        request.month,
        &request.budgets,
    )
    .await?;
    tracing::info!(
        "Set {} budgets for user {} in {}-{:02}",
        budgets.len(),
        user.id,
        request.year,
        request.month
    );

    Ok(HttpResponse::Ok().json(BudgetsResponse { budgets }))
}

pub async fn list_budgets(
    _admin: Admin,
    db: web::Data<Arc<Database>>,
    tz: web::Data<Tz>,
    path: web::Path<i64>,
    query: web::Query<BudgetsQuery>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(db.async_connection.clone(), path.into_inner()).await?;
    let today = local_today(Utc::now(), *tz.get_ref());
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());
    if !(1..=12).contains(&month) {
        return Err(ApiError::Validation(format!("invalid month {}", month)));
    }

    let budgets = db::list_budgets(db.async_connection.clone(), user.id, year, month).await?;
    Ok(HttpResponse::Ok().json(BudgetsResponse { budgets }))
}
