use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::session::SessionManager;

/// GET /api/stories
pub async fn list_stories(State(manager): State<Arc<SessionManager>>) -> impl IntoResponse {
    Json(manager.catalog().stories.to_vec())
}

/// GET /api/categories
pub async fn list_categories(State(manager): State<Arc<SessionManager>>) -> impl IntoResponse {
    Json(manager.catalog().categories.clone())
}

/// GET /api/categories/:slug
/// Unknown slugs are not an error; the page carries an empty-state message.
pub async fn get_category(
    State(manager): State<Arc<SessionManager>>,
    Path(slug): Path<String>,
) -> impl IntoResponse {
    Json(manager.catalog().category_page(&slug))
}

/// GET /api/shorts
pub async fn list_shorts(State(manager): State<Arc<SessionManager>>) -> impl IntoResponse {
    Json(manager.catalog().shorts.clone())
}

/// GET /api/product
pub async fn get_product(State(manager): State<Arc<SessionManager>>) -> impl IntoResponse {
    Json(manager.catalog().product.clone())
}
