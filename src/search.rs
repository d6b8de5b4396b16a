use futures::future::BoxFuture;
use log::warn;
use uuid::Uuid;

use crate::db::{self, Database};
use crate::embed::decode_vector;
use crate::error::Result;

/// 单条搜索结果
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub image_id: Uuid,
    pub distance: f32,
}

/// 相似度搜索接口
///
/// 当前只有暴力扫描一种实现。集合规模增长后，可以在不改动调用方的
/// 前提下替换为带索引的实现（例如空间划分树或近似近邻索引）。
pub trait Searcher: Send + Sync {
    /// 返回与查询向量距离最近的至多 k 条记录，按距离升序排列
    fn search<'a>(&'a self, query: &'a [f32], k: usize) -> BoxFuture<'a, Result<Vec<SearchHit>>>;
}

/// 暴力扫描搜索：逐条计算欧氏距离后排序
///
/// 每次搜索都重新扫描全部向量，不持有任何缓存。
pub struct LinearSearcher {
    db: Database,
}

impl LinearSearcher {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl Searcher for LinearSearcher {
    fn search<'a>(&'a self, query: &'a [f32], k: usize) -> BoxFuture<'a, Result<Vec<SearchHit>>> {
        Box::pin(async move {
            let mut hits = vec![];

            for record in db::crud::scan_embeddings(&self.db).await? {
                let vector = match decode_vector(&record.vector) {
                    Ok(vector) => vector,
                    Err(e) => {
                        // 损坏的向量只跳过，不中断整个搜索
                        warn!("跳过损坏的向量 (image_id={}): {e}", record.image_id);
                        continue;
                    }
                };
                // 维数不同的向量不可比较，直接排除
                if vector.len() != query.len() {
                    continue;
                }
                hits.push(SearchHit {
                    image_id: record.image_id,
                    distance: euclidean_distance(query, &vector),
                });
            }

            // 稳定排序，距离相同时保持插入顺序，保证结果可复现
            hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
            hits.truncate(k);
            Ok(hits)
        })
    }
}

/// 计算两个等长向量的欧氏距离
fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt()
}
