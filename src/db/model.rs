use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// 支持的图片格式，封闭集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// 图片文件的扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    /// 从 image crate 的格式转换，不在允许列表中的格式返回 None
    pub fn from_image(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Png => Some(Self::Png),
            _ => None,
        }
    }
}

/// 图片元数据记录
///
/// 宽高和字节大小描述的是实际写入磁盘的（缩放后的）文件，
/// 而不是用户上传的原始文件。
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct ImageRecord {
    /// 图片 ID，创建时生成，不可由调用方指定
    pub id: Uuid,
    /// 上传时的原始文件名
    pub file_name: String,
    /// 图片文件在磁盘上的路径
    pub file_path: String,
    /// 图片格式
    pub format: ImageFormat,
    /// 图片宽度
    pub width: i64,
    /// 图片高度
    pub height: i64,
    /// 文件字节大小
    pub size: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 图片嵌入向量记录
///
/// 向量以小端序 f32 序列的形式存储为不透明 blob，
/// 维数由使用的嵌入策略决定，数据库层不作假设。
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EmbeddingRecord {
    /// 向量 ID
    pub id: Uuid,
    /// 所属图片 ID，每张图片有且只有一个向量
    pub image_id: Uuid,
    /// 序列化后的向量
    pub vector: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
