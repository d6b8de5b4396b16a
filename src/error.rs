use thiserror::Error;
use uuid::Uuid;

/// 核心错误类型
///
/// 区分客户端输入错误（`UnsupportedFormat`、`NotFound`）和服务端错误
/// （`Storage`、`Persistence`）。`Corruption` 只在扫描单条向量时出现，
/// 扫描方应跳过损坏的记录而不是中断整个操作。
#[derive(Debug, Error)]
pub enum Error {
    /// 输入无法解码为允许的图片格式
    #[error("不支持的图片格式: {0}")]
    UnsupportedFormat(String),
    /// 图片文件写入/删除失败
    #[error("图片存储失败: {0}")]
    Storage(#[from] std::io::Error),
    /// 数据库读写失败
    #[error("数据库操作失败: {0}")]
    Persistence(#[from] sqlx::Error),
    /// 指定 ID 的记录不存在
    #[error("图片不存在: {0}")]
    NotFound(Uuid),
    /// 存储的嵌入向量无法反序列化
    #[error("嵌入向量已损坏: {0}")]
    Corruption(String),
}

pub type Result<T> = std::result::Result<T, Error>;
