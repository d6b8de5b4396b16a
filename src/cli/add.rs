use std::fs;
use std::path::PathBuf;

use clap::Parser;
use regex::Regex;
use walkdir::WalkDir;

use crate::ImageStoreBuilder;
use crate::cli::SubCommandExtend;
use crate::config::Opts;

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// 图片文件或目录，目录会被递归扫描
    #[arg(required = true)]
    pub path: Vec<PathBuf>,
    /// 扫描的文件后缀名，多个后缀用逗号分隔
    #[arg(short, long, default_value = "jpg,jpeg,png")]
    pub suffix: String,
}

impl SubCommandExtend for AddCommand {
    async fn run(&self, opts: &Opts) -> anyhow::Result<()> {
        let re_suf = format!("(?i)^({})$", self.suffix.replace(',', "|"));
        let re_suf = Regex::new(&re_suf).expect("failed to build regex");
        let store = ImageStoreBuilder::new(opts.conf_dir.clone()).open().await?;

        for path in &self.path {
            for entry in WalkDir::new(path).into_iter().filter_map(|entry| entry.ok()) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let entry = entry.into_path();
                if entry.extension().map(|s| re_suf.is_match(&s.to_string_lossy())) != Some(true) {
                    continue;
                }

                let file_name = entry
                    .file_name()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let result = match fs::read(&entry) {
                    Ok(data) => store.ingest(&data, &file_name).await,
                    Err(e) => Err(e.into()),
                };
                match result {
                    Ok(record) => println!("[OK] {} -> {}", entry.display(), record.id),
                    Err(e) => eprintln!("[ERR] {}: {e}", entry.display()),
                }
            }
        }
        Ok(())
    }
}
