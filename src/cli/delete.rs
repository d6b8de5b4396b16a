use clap::Parser;
use uuid::Uuid;

use crate::ImageStoreBuilder;
use crate::cli::SubCommandExtend;
use crate::config::Opts;

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// 要删除的图片 ID
    pub id: Uuid,
}

impl SubCommandExtend for DeleteCommand {
    async fn run(&self, opts: &Opts) -> anyhow::Result<()> {
        let store = ImageStoreBuilder::new(opts.conf_dir.clone()).open().await?;
        let image = store.delete(self.id).await?;
        println!("[OK] 已删除 {} ({})", image.id, image.file_name);
        Ok(())
    }
}
