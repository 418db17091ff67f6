use super::auth::check_token;
use super::error::ApiError;
use crate::database::Database;
use crate::helpers::dates::parse_period;
use crate::integrations::TelegramApi;
use crate::jobs::{MonthClosingJob, RecurringBillsJob};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use chrono_tz::Tz;
use serde::Deserialize;
use std::sync::Arc;

pub const TOKEN_HEADER: &str = "X-Job-Token";

#[derive(Clone)]
pub struct JobsState {
    /// Triggers are refused while this is unset
    pub token: Option<String>,
    pub notify_users: bool,
    pub tz: Tz,
    pub telegram: Arc<dyn TelegramApi>,
}

impl JobsState {
    fn authorize(&self, req: &HttpRequest) -> Result<(), ApiError> {
        check_token(req, TOKEN_HEADER, self.token.as_deref())
    }
}

#[derive(Deserialize)]
pub struct MonthClosingQuery {
    period: Option<String>,
}

pub async fn run_recurring_bills(
    db: web::Data<Arc<Database>>,
    state: web::Data<JobsState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    state.authorize(&req)?;

    let report = RecurringBillsJob::new(db.async_connection.clone())
        .run(Utc::now())
        .await?;
    tracing::info!(
        "recurring-bills: {} created, {} errors",
        report.records_created,
        report.errors.len()
    );

    Ok(HttpResponse::Ok().json(report))
}

pub async fn run_month_closing(
    db: web::Data<Arc<Database>>,
    state: web::Data<JobsState>,
    req: HttpRequest,
    query: web::Query<MonthClosingQuery>,
) -> Result<HttpResponse, ApiError> {
    state.authorize(&req)?;
    let period = query
        .period
        .as_deref()
        .map(parse_period)
        .transpose()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let telegram = state.notify_users.then(|| state.telegram.clone());
    let report = MonthClosingJob::new(db.async_connection.clone(), telegram, state.tz)
        .run(period, Utc::now())
        .await?;
    tracing::info!(
        "month-closing: {} created, {} skipped, {} notified",
        report.records_created,
        report.records_skipped,
        report.notifications_sent
    );

    Ok(HttpResponse::Ok().json(report))
}
