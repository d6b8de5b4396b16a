use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use image::{DynamicImage, GenericImageView};
use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::ConfDir;
use crate::db::{Database, EmbeddingRecord, ImageFormat, ImageRecord, crud, init_db};
use crate::embed::{EmbeddingStrategy, MeanColor, decode_vector, encode_vector};
use crate::error::{Error, Result};
use crate::search::{LinearSearcher, Searcher};
use crate::utils;

/// 默认分页大小
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// 最大分页大小
pub const MAX_PAGE_SIZE: i64 = 100;
/// 默认搜索结果数量
pub const DEFAULT_SEARCH_COUNT: usize = 10;

/// ImageStore 的构建器
pub struct ImageStoreBuilder {
    conf_dir: ConfDir,
    strategy: Arc<dyn EmbeddingStrategy>,
}

impl ImageStoreBuilder {
    pub fn new(conf_dir: ConfDir) -> Self {
        Self { conf_dir, strategy: Arc::new(MeanColor) }
    }

    /// 替换嵌入策略，默认为平均颜色
    pub fn strategy(mut self, strategy: Arc<dyn EmbeddingStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub async fn open(self) -> Result<ImageStore> {
        fs::create_dir_all(self.conf_dir.path())?;
        let image_dir = self.conf_dir.images();
        fs::create_dir_all(&image_dir)?;

        let db = init_db(self.conf_dir.database()).await?;
        let searcher = Box::new(LinearSearcher::new(db.clone()));

        info!("图库已打开: {} (嵌入策略: {})", self.conf_dir.path().display(), self.strategy.name());
        Ok(ImageStore { db, image_dir, strategy: self.strategy, searcher })
    }
}

/// 嵌入索引的图片库
///
/// 维护三个互相关联的产物：磁盘上的图片文件、图片元数据记录、
/// 嵌入向量记录。任何一次变更要么三者同时生效，要么三者都不生效。
/// 不持有任何内存缓存，每次读取都从持久化状态重新推导。
pub struct ImageStore {
    db: Database,
    image_dir: PathBuf,
    strategy: Arc<dyn EmbeddingStrategy>,
    searcher: Box<dyn Searcher>,
}

impl ImageStore {
    /// 摄取一张图片：解码、缩放、落盘、写入元数据和嵌入向量
    ///
    /// 文件名由随机 ID 生成，与用户提供的原始文件名无关。
    /// 任何一步失败都会清理掉本次已产生的所有产物。
    pub async fn ingest(&self, data: &[u8], file_name: &str) -> Result<ImageRecord> {
        let (image, format) = utils::decode_image(data)?;
        let image = utils::normalize_image(&image);

        let id = Uuid::new_v4();
        let file_path = self.image_dir.join(format!("{id}.{}", format.extension()));
        utils::encode_image(&image, format, &file_path)?;

        // 文件落盘之后的任何失败都要把文件一并回滚
        match self.persist_image(&image, format, id, &file_path, file_name).await {
            Ok(record) => {
                info!("图片已入库: {} -> {id}", record.file_name);
                Ok(record)
            }
            Err(e) => {
                if let Err(e) = fs::remove_file(&file_path) {
                    warn!("回滚图片文件失败: {}: {e}", file_path.display());
                }
                Err(e)
            }
        }
    }

    /// 从已落盘的文件构造元数据记录，并和嵌入向量一起写入数据库
    async fn persist_image(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        id: Uuid,
        file_path: &Path,
        file_name: &str,
    ) -> Result<ImageRecord> {
        // 宽高和大小取自落盘后的文件，而不是原始上传
        let (width, height) = image.dimensions();
        let size = fs::metadata(file_path)?.len() as i64;
        let now = Utc::now();
        let record = ImageRecord {
            id,
            file_name: file_name.to_string(),
            file_path: file_path.to_string_lossy().into_owned(),
            format,
            width: width as i64,
            height: height as i64,
            size,
            created_at: now,
            updated_at: now,
        };

        let vector = self.strategy.extract(image);
        self.persist_pair(&record, &vector).await?;
        Ok(record)
    }

    /// 在同一个事务中写入图片记录和嵌入向量记录
    async fn persist_pair(&self, record: &ImageRecord, vector: &[f32]) -> Result<()> {
        let embedding = EmbeddingRecord {
            id: Uuid::new_v4(),
            image_id: record.id,
            vector: encode_vector(vector),
            created_at: record.created_at,
            updated_at: record.updated_at,
        };

        let mut tx = self.db.begin().await?;
        crud::create_image(&mut *tx, record).await?;
        crud::create_embedding(&mut *tx, &embedding).await?;
        tx.commit().await?;
        Ok(())
    }

    /// 根据 ID 获取图片记录
    pub async fn get(&self, id: Uuid) -> Result<ImageRecord> {
        crud::get_image(&self.db, id).await?.ok_or(Error::NotFound(id))
    }

    /// 根据图片 ID 获取嵌入向量
    pub async fn get_embedding(&self, image_id: Uuid) -> Result<Vec<f32>> {
        let record = crud::get_embedding_by_image(&self.db, image_id)
            .await?
            .ok_or(Error::NotFound(image_id))?;
        decode_vector(&record.vector)
    }

    /// 分页列出图片记录，返回当前页和总数
    ///
    /// 页码从 1 开始，小于 1 时取 1；分页大小超出 [1, 100] 时取默认值。
    pub async fn list(&self, page: i64, page_size: i64) -> Result<(Vec<ImageRecord>, i64)> {
        let page = page.max(1);
        let page_size = if (1..=MAX_PAGE_SIZE).contains(&page_size) {
            page_size
        } else {
            DEFAULT_PAGE_SIZE
        };

        let total = crud::count_images(&self.db).await?;
        let images = crud::list_images(&self.db, page_size, (page - 1) * page_size).await?;
        Ok((images, total))
    }

    /// 删除一张图片：文件、元数据记录、嵌入向量记录作为一个整体删除
    ///
    /// 文件删除在事务提交前执行，文件删不掉则记录也不会被删除。
    pub async fn delete(&self, id: Uuid) -> Result<ImageRecord> {
        let image = self.get(id).await?;

        let mut tx = self.db.begin().await?;
        crud::delete_embedding_by_image(&mut *tx, id).await?;
        if crud::delete_image(&mut *tx, id).await? == 0 {
            return Err(Error::NotFound(id));
        }
        match fs::remove_file(&image.file_path) {
            Ok(()) => {}
            // 文件已经不存在时照常删除记录
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("图片文件已不存在: {}", image.file_path);
            }
            Err(e) => return Err(e.into()),
        }
        tx.commit().await?;

        info!("图片已删除: {id}");
        Ok(image)
    }

    /// 以图搜图：对查询图片提取嵌入向量，返回距离最近的至多 k 张图片
    ///
    /// 返回结果按距离升序排列。扫描和关联之间不加全局锁，
    /// 期间被并发删除的图片会被跳过。
    pub async fn search_by_image(&self, data: &[u8], k: usize) -> Result<Vec<(ImageRecord, f32)>> {
        let (image, _) = utils::decode_image(data)?;
        let image = utils::normalize_image(&image);
        let query = self.strategy.extract(&image);

        let hits = self.searcher.search(&query, k).await?;
        debug!("扫描完成，命中 {} 条", hits.len());

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            match crud::get_image(&self.db, hit.image_id).await? {
                Some(image) => results.push((image, hit.distance)),
                // 扫描后、关联前被并发删除的图片
                None => debug!("跳过已删除的图片: {}", hit.image_id),
            }
        }
        Ok(results)
    }
}
