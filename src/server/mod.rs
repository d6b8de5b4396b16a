mod api;
mod error;
mod state;
mod types;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use self::state::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::upload_handler,
        api::list_handler,
        api::get_handler,
        api::delete_handler,
        api::search_handler,
        api::health_handler,
    ),
    components(schemas(
        types::UploadForm,
        types::SearchForm,
        types::ListResponse,
        types::SearchResponse,
        types::SearchResult,
        crate::db::ImageRecord,
        crate::db::ImageFormat,
    ))
)]
pub struct ApiDoc;

/// 构建API服务器
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/images", post(api::upload_handler).get(api::list_handler))
        .route("/api/images/{id}", get(api::get_handler).delete(api::delete_handler))
        .route("/api/images/search", post(api::search_handler))
        .route("/health", get(api::health_handler))
        .nest_service("/images", ServeDir::new(&state.image_dir))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::disable())
        // 上传限制：10M
        .layer(RequestBodyLimitLayer::new(1024 * 1024 * 10))
        .with_state(state)
}
