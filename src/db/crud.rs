use sqlx::{Executor, Result, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{EmbeddingRecord, ImageRecord};

/// 添加图片记录
pub async fn create_image<'c, E>(executor: E, image: &ImageRecord) -> Result<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO image (id, file_name, file_path, format, width, height, size, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(image.id)
    .bind(&image.file_name)
    .bind(&image.file_path)
    .bind(image.format)
    .bind(image.width)
    .bind(image.height)
    .bind(image.size)
    .bind(image.created_at)
    .bind(image.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// 根据 ID 查询图片记录
pub async fn get_image(executor: &SqlitePool, id: Uuid) -> Result<Option<ImageRecord>> {
    sqlx::query_as(
        r#"
        SELECT id, file_name, file_path, format, width, height, size, created_at, updated_at
        FROM image WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// 查询图片总数
pub async fn count_images(executor: &SqlitePool) -> Result<i64> {
    let (count,): (i64,) =
        sqlx::query_as(r#"SELECT COUNT(*) FROM image"#).fetch_one(executor).await?;
    Ok(count)
}

/// 分页查询图片记录，按插入顺序排列
pub async fn list_images(
    executor: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<ImageRecord>> {
    sqlx::query_as(
        r#"
        SELECT id, file_name, file_path, format, width, height, size, created_at, updated_at
        FROM image ORDER BY rowid ASC LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

/// 删除图片记录，返回删除的行数
pub async fn delete_image<'c, E>(executor: E, id: Uuid) -> Result<u64>
where
    E: Executor<'c, Database = Sqlite>,
{
    let result = sqlx::query(r#"DELETE FROM image WHERE id = ?"#).bind(id).execute(executor).await?;
    Ok(result.rows_affected())
}

/// 添加嵌入向量记录
pub async fn create_embedding<'c, E>(executor: E, embedding: &EmbeddingRecord) -> Result<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO image_embedding (id, image_id, vector, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(embedding.id)
    .bind(embedding.image_id)
    .bind(&embedding.vector)
    .bind(embedding.created_at)
    .bind(embedding.updated_at)
    .execute(executor)
    .await?;

    Ok(())
}

/// 根据图片 ID 查询嵌入向量
pub async fn get_embedding_by_image(
    executor: &SqlitePool,
    image_id: Uuid,
) -> Result<Option<EmbeddingRecord>> {
    sqlx::query_as(
        r#"
        SELECT id, image_id, vector, created_at, updated_at
        FROM image_embedding WHERE image_id = ?
        "#,
    )
    .bind(image_id)
    .fetch_optional(executor)
    .await
}

/// 删除图片对应的嵌入向量，返回删除的行数
pub async fn delete_embedding_by_image<'c, E>(executor: E, image_id: Uuid) -> Result<u64>
where
    E: Executor<'c, Database = Sqlite>,
{
    let result = sqlx::query(r#"DELETE FROM image_embedding WHERE image_id = ?"#)
        .bind(image_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// 遍历所有嵌入向量，按插入顺序排列
///
/// 只返回原始 blob，反序列化（以及对损坏记录的跳过）由搜索方负责。
pub async fn scan_embeddings(executor: &SqlitePool) -> Result<Vec<EmbeddingRecord>> {
    sqlx::query_as(
        r#"
        SELECT id, image_id, vector, created_at, updated_at
        FROM image_embedding ORDER BY rowid ASC
        "#,
    )
    .fetch_all(executor)
    .await
}
