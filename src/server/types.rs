use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::ImageRecord;

/// 上传请求参数
#[derive(TryFromMultipart)]
pub struct UploadRequest {
    pub file: FieldData<Bytes>,
}

/// 上传表单（用于API文档）
#[derive(Debug, ToSchema)]
#[allow(unused)]
pub struct UploadForm {
    /// 上传的图片文件
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// 搜索请求参数
#[derive(TryFromMultipart)]
pub struct SearchRequest {
    pub file: FieldData<Bytes>,
    pub k: Option<usize>,
}

/// 搜索表单（用于API文档）
#[derive(Debug, ToSchema)]
#[allow(unused)]
pub struct SearchForm {
    /// 查询用的图片文件
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// 返回的结果数量，默认 10
    pub k: Option<usize>,
}

/// 分页参数
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// 页码，默认 1
    pub page: Option<i64>,
    /// 每页数量，默认 10，最大 100
    pub page_size: Option<i64>,
}

/// 图片列表响应
#[derive(Debug, Serialize, ToSchema)]
pub struct ListResponse {
    pub images: Vec<ImageRecord>,
    /// 图片总数，与分页无关
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// 单条搜索结果
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResult {
    pub image: ImageRecord,
    /// 与查询图片的欧氏距离，越小越相似
    pub distance: f32,
    /// 图片的静态访问路径
    pub image_url: String,
}

/// 搜索响应
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total: usize,
}
