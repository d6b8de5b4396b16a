use std::path::PathBuf;
use std::sync::Arc;

use crate::ImageStore;

/// 应用状态
pub struct AppState {
    /// 图库
    pub store: ImageStore,
    /// 图片文件目录，用于静态文件服务
    pub image_dir: PathBuf,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(store: ImageStore, image_dir: PathBuf) -> Arc<Self> {
        Arc::new(AppState { store, image_dir })
    }
}
