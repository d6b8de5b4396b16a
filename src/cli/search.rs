use std::convert::Infallible;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::ImageStoreBuilder;
use crate::cli::SubCommandExtend;
use crate::config::Opts;
use crate::db::ImageRecord;
use crate::store::DEFAULT_SEARCH_COUNT;

#[derive(Parser, Debug, Clone)]
pub struct SearchCommand {
    /// 被搜索的图片路径
    pub image: PathBuf,
    /// 显示的结果数量
    #[arg(short, long, value_name = "COUNT", default_value_t = DEFAULT_SEARCH_COUNT)]
    pub count: usize,
    /// 输出格式
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    pub output_format: OutputFormat,
}

impl SubCommandExtend for SearchCommand {
    async fn run(&self, opts: &Opts) -> anyhow::Result<()> {
        let data = fs::read(&self.image)?;

        let store = ImageStoreBuilder::new(opts.conf_dir.clone()).open().await?;
        let result = store.search_by_image(&data, self.count).await?;

        print_result(&result, self)
    }
}

fn print_result(result: &[(ImageRecord, f32)], opts: &SearchCommand) -> Result<()> {
    match opts.output_format {
        OutputFormat::Json => {
            let result: Vec<_> = result
                .iter()
                .map(|(image, distance)| serde_json::json!({ "image": image, "distance": distance }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&result)?)
        }
        OutputFormat::Table => {
            for (image, distance) in result {
                println!("{:.4}\t{}\t{}", distance, image.id, image.file_path);
            }
        }
    }
    Ok(())
}

#[derive(ValueEnum, Debug, Clone)]
pub enum OutputFormat {
    Json,
    Table,
}

impl FromStr for OutputFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            _ => unreachable!(),
        }
    }
}
