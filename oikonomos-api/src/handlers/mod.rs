pub mod accounts;
pub mod auth;
pub mod bills;
pub mod budgets;
pub mod categories;
pub mod error;
pub mod goals;
pub mod jobs;
pub mod transactions;
pub mod users;
pub mod webhook;

pub use auth::ManagementState;
pub use error::ApiError;

use actix_web::web;

/// JSON endpoints used to seed and inspect per-user data.
///
/// Expects `web::Data<Arc<Database>>`, `web::Data<Tz>` and `web::Data<ManagementState>`
/// in the app; every call must carry the `X-Admin-Token` header.
pub fn configure_management(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/users", web::post().to(users::create_user))
        .route("/api/users", web::get().to(users::list_users))
        .route("/api/users/{id}/accounts", web::post().to(accounts::create_account))
        .route("/api/users/{id}/accounts", web::get().to(accounts::list_accounts))
        .route(
            "/api/users/{id}/accounts/{account_id}/default",
            web::post().to(accounts::set_default_account),
        )
        .route("/api/users/{id}/categories", web::post().to(categories::create_category))
        .route("/api/users/{id}/categories", web::get().to(categories::list_categories))
        .route("/api/users/{id}/goals", web::post().to(goals::create_goal))
        .route("/api/users/{id}/goals", web::get().to(goals::list_goals))
        .route("/api/users/{id}/budgets", web::put().to(budgets::set_budgets))
        .route("/api/users/{id}/budgets", web::get().to(budgets::list_budgets))
        .route("/api/users/{id}/bills", web::post().to(bills::create_bill))
        .route("/api/users/{id}/bills", web::get().to(bills::list_bills))
        .route(
            "/api/users/{id}/transactions",
            web::get().to(transactions::list_transactions),
        );
}

/// Telegram webhook and job triggers; expects `WebhookState` and `JobsState`
pub fn configure_bot(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/bot", web::post().to(webhook::receive_update))
        .route(
            "/api/jobs/recurring-bills",
            web::post().to(jobs::run_recurring_bills),
        )
        .route(
            "/api/jobs/month-closing",
            web::post().to(jobs::run_month_closing),
        );
}
