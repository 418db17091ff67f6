use super::auth::Admin;
use super::error::ApiError;
use super::users::require_user;
use crate::database::{categories as db, Database};
use actix_web::{web, HttpResponse};
use commands::normalize::normalize;
use serde::Deserialize;
use shared_types::{CategoriesResponse, CategoryKind, CreateCategoryRequest};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct CategoriesQuery {
    kind: Option<CategoryKind>,
}

pub async fn create_category(
    _admin: Admin,
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    request: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(db.async_connection.clone(), path.into_inner()).await?;
    let wanted = normalize(&request.name);
    if wanted.is_empty() {
        return Err(ApiError::Validation("category name is required".to_string()));
    }

    let existing = db::list_categories(db.async_connection.clone(), user.id, Some(request.kind)).await?;
    if existing.iter().any(|c| normalize(&c.name) == wanted) {
        return Err(ApiError::Conflict(format!(
            "category '{}' already exists",
            request.name.trim()
        )));
    }

    let category =
        db::create_category(db.async_connection.clone(), user.id, &request.name, request.kind).await?;
    Ok(HttpResponse::Created().json(category))
}

pub async fn list_categories(
    _admin: Admin,
    db: web::Data<Arc<Database>>,
    path: web::Path<i64>,
    query: web::Query<CategoriesQuery>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(db.async_connection.clone(), path.into_inner()).await?;
    let categories = db::list_categories(db.async_connection.clone(), user.id, query.kind).await?;
    Ok(HttpResponse::Ok().json(CategoriesResponse { categories }))
}
