use super::error::ApiError;
use crate::bot::Bot;
use actix_web::{web, HttpRequest, HttpResponse};
use shared_types::Update;
use std::sync::Arc;

pub const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

#[derive(Clone)]
pub struct WebhookState {
    pub bot: Arc<Bot>,
    /// When set, Telegram must echo it in `SECRET_HEADER`
    pub secret: Option<String>,
}

pub async fn receive_update(
    state: web::Data<WebhookState>,
    req: HttpRequest,
    update: web::Json<Update>,
) -> Result<HttpResponse, ApiError> {
    if let Some(secret) = &state.secret {
        let given = req
            .headers()
            .get(SECRET_HEADER)
            .and_then(|v| v.to_str().ok());
        if given != Some(secret.as_str()) {
            tracing::warn!("Rejected webhook call for update {}", update.update_id);
            return Err(ApiError::Unauthorized);
        }
    }

    match state.bot.handle_update(&update).await {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))),
        Err(e) => {
            tracing::error!("Update {} failed: {:#}", update.update_id, e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({ "status": "error" })))
        }
    }
}
