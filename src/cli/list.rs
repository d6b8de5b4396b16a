use clap::Parser;

use crate::ImageStoreBuilder;
use crate::cli::SubCommandExtend;
use crate::config::Opts;
use crate::store::DEFAULT_PAGE_SIZE;

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// 页码，从 1 开始
    #[arg(short, long, default_value_t = 1)]
    pub page: i64,
    /// 每页数量
    #[arg(short = 's', long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: i64,
}

impl SubCommandExtend for ListCommand {
    async fn run(&self, opts: &Opts) -> anyhow::Result<()> {
        let store = ImageStoreBuilder::new(opts.conf_dir.clone()).open().await?;
        let (images, total) = store.list(self.page, self.page_size).await?;

        for image in &images {
            println!(
                "{}\t{}x{}\t{}\t{}",
                image.id, image.width, image.height, image.file_name, image.file_path
            );
        }
        println!("总计 {total} 张图片");
        Ok(())
    }
}
