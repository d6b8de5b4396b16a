use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::{Path as UrlPath, Query, State};
use axum_typed_multipart::TypedMultipart;
use log::info;
use serde_json::{Value, json};
use uuid::Uuid;

use super::error::{AppError, Result};
use super::state::AppState;
use super::types::*;
use crate::db::ImageRecord;
use crate::store::{DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_COUNT};

/// 上传一张图片
#[utoipa::path(
    post,
    path = "/api/images",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = ImageRecord),
        (status = 400, description = "图片格式不支持"),
    )
)]
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    data: TypedMultipart<UploadRequest>,
) -> Result<Json<ImageRecord>> {
    let file_name = match &data.file.metadata.file_name {
        Some(file_name) => file_name.clone(),
        None => return Err(AppError::bad_request("文件名不能为空")),
    };

    info!("正在上传图片: {file_name}");
    let record = state.store.ingest(&data.file.contents, &file_name).await?;
    Ok(Json(record))
}

/// 根据 ID 获取图片信息
#[utoipa::path(
    get,
    path = "/api/images/{id}",
    params(("id" = Uuid, Path, description = "图片 ID")),
    responses(
        (status = 200, body = ImageRecord),
        (status = 404, description = "图片不存在"),
    )
)]
pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    UrlPath(id): UrlPath<Uuid>,
) -> Result<Json<ImageRecord>> {
    let record = state.store.get(id).await?;
    Ok(Json(record))
}

/// 分页列出图片
#[utoipa::path(
    get,
    path = "/api/images",
    params(ListQuery),
    responses(
        (status = 200, body = ListResponse),
    )
)]
pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    let (images, total) = state.store.list(page, page_size).await?;
    Ok(Json(ListResponse { images, total, page, page_size }))
}

/// 根据 ID 删除图片
#[utoipa::path(
    delete,
    path = "/api/images/{id}",
    params(("id" = Uuid, Path, description = "图片 ID")),
    responses(
        (status = 200, description = "删除成功"),
        (status = 404, description = "图片不存在"),
    )
)]
pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    UrlPath(id): UrlPath<Uuid>,
) -> Result<Json<Value>> {
    state.store.delete(id).await?;
    Ok(Json(json!({ "message": "图片删除成功" })))
}

/// 以图搜图
#[utoipa::path(
    post,
    path = "/api/images/search",
    request_body(content = SearchForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = SearchResponse),
        (status = 400, description = "图片格式不支持"),
    )
)]
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    data: TypedMultipart<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    let k = data.k.unwrap_or(DEFAULT_SEARCH_COUNT);

    let start = Instant::now();
    info!("正在搜索上传图片 (k={k})");

    let result = state.store.search_by_image(&data.file.contents, k).await?;
    info!("搜索完成，耗时 {}ms", start.elapsed().as_millis());

    let results: Vec<_> = result
        .into_iter()
        .map(|(image, distance)| {
            let image_url = format!("/images/{}", artifact_name(&image.file_path));
            SearchResult { image, distance, image_url }
        })
        .collect();
    let total = results.len();
    Ok(Json(SearchResponse { results, total }))
}

/// 健康检查
#[utoipa::path(get, path = "/health")]
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn artifact_name(file_path: &str) -> String {
    Path::new(file_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
