use std::path::Path;

use log::info;
use sqlx::{SqlitePool, sqlite::*};

pub mod crud;
pub mod model;

pub use model::*;

pub type Database = SqlitePool;

pub async fn init_db(filename: impl AsRef<Path>) -> Result<Database, sqlx::Error> {
    let filename = filename.as_ref();
    info!("初始化数据库连接: {}", filename.display());

    let options = SqliteConnectOptions::new()
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .filename(filename)
        .create_if_missing(true);

    let pool = SqlitePool::connect_with(options).await?;

    info!("检查数据库迁移");
    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    async fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = init_db(dir.path().join("test.db")).await.unwrap();
        (dir, db)
    }

    fn image_record(name: &str) -> ImageRecord {
        let now = Utc::now();
        let id = Uuid::new_v4();
        ImageRecord {
            id,
            file_name: name.to_string(),
            file_path: format!("/tmp/{id}.png"),
            format: ImageFormat::Png,
            width: 800,
            height: 600,
            size: 1024,
            created_at: now,
            updated_at: now,
        }
    }

    fn embedding_record(image_id: Uuid) -> EmbeddingRecord {
        let now = Utc::now();
        EmbeddingRecord {
            id: Uuid::new_v4(),
            image_id,
            vector: vec![0; 12],
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_image_crud() {
        let (_dir, db) = test_db().await;

        let image = image_record("a.png");
        crud::create_image(&db, &image).await.unwrap();

        let found = crud::get_image(&db, image.id).await.unwrap().unwrap();
        assert_eq!(found.file_name, "a.png");
        assert_eq!(found.format, ImageFormat::Png);

        assert!(crud::get_image(&db, Uuid::new_v4()).await.unwrap().is_none());
        assert_eq!(crud::count_images(&db).await.unwrap(), 1);

        assert_eq!(crud::delete_image(&db, image.id).await.unwrap(), 1);
        assert_eq!(crud::delete_image(&db, image.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_embedding_unique_per_image() {
        let (_dir, db) = test_db().await;

        let image = image_record("a.png");
        crud::create_image(&db, &image).await.unwrap();
        crud::create_embedding(&db, &embedding_record(image.id)).await.unwrap();

        // 每张图片只允许一个向量
        let result = crud::create_embedding(&db, &embedding_record(image.id)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_pair_insert_rolls_back() {
        let (_dir, db) = test_db().await;

        let image_a = image_record("a.png");
        let embedding_a = embedding_record(image_a.id);
        let mut tx = db.begin().await.unwrap();
        crud::create_image(&mut *tx, &image_a).await.unwrap();
        crud::create_embedding(&mut *tx, &embedding_a).await.unwrap();
        tx.commit().await.unwrap();

        // 向量写入失败（此处用主键冲突模拟）时，整个事务回滚，
        // 已写入的图片记录不可见
        let image_b = image_record("b.png");
        let mut embedding_b = embedding_record(image_b.id);
        embedding_b.id = embedding_a.id;

        let mut tx = db.begin().await.unwrap();
        crud::create_image(&mut *tx, &image_b).await.unwrap();
        assert!(crud::create_embedding(&mut *tx, &embedding_b).await.is_err());
        tx.rollback().await.unwrap();

        assert!(crud::get_image(&db, image_b.id).await.unwrap().is_none());
        assert_eq!(crud::count_images(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_scan_preserves_insertion_order() {
        let (_dir, db) = test_db().await;

        let mut ids = vec![];
        for i in 0..3 {
            let image = image_record(&format!("{i}.png"));
            crud::create_image(&db, &image).await.unwrap();
            let embedding = embedding_record(image.id);
            crud::create_embedding(&db, &embedding).await.unwrap();
            ids.push(image.id);
        }

        let scanned: Vec<_> =
            crud::scan_embeddings(&db).await.unwrap().into_iter().map(|e| e.image_id).collect();
        assert_eq!(scanned, ids);
    }
}
