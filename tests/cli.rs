use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::Result;
use assert_cmd::prelude::*;
use image::{Rgb, RgbImage};
use predicates::prelude::*;

macro_rules! cargo_run {
    ($cmd:expr, $($args:expr),*) => {
        {
            let mut cmd = Command::cargo_bin($cmd)?;
            $(cmd.arg($args);)*
            cmd.assert()
        }
    };
}

fn write_test_image(path: &Path, color: [u8; 3]) -> Result<()> {
    RgbImage::from_pixel(32, 32, Rgb(color)).save(path)?;
    Ok(())
}

#[test]
fn add_list_search_delete() -> Result<()> {
    let conf_dir = assert_fs::TempDir::new()?;
    let input_dir = conf_dir.path().join("input");
    fs::create_dir_all(&input_dir)?;

    let black = input_dir.join("black.png");
    let white = input_dir.join("white.png");
    write_test_image(&black, [0, 0, 0])?;
    write_test_image(&white, [255, 255, 255])?;

    cargo_run!("pixsearch", "-c", conf_dir.path(), "add", &input_dir)
        .success()
        .stdout(predicate::str::contains("[OK]").count(2));

    cargo_run!("pixsearch", "-c", conf_dir.path(), "list")
        .success()
        .stdout(predicate::str::contains("black.png"))
        .stdout(predicate::str::contains("white.png"))
        .stdout(predicate::str::contains("总计 2"));

    // 最相似的结果排在第一行，且距离为 0
    cargo_run!("pixsearch", "-c", conf_dir.path(), "search", &black)
        .success()
        .stdout(predicate::str::starts_with("0.0000"));

    // 通过 list 输出拿到一个图片 ID
    let output = Command::cargo_bin("pixsearch")?
        .args(["-c", conf_dir.path().to_str().unwrap(), "list"])
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;
    let id = stdout.lines().next().unwrap().split('\t').next().unwrap().to_string();

    cargo_run!("pixsearch", "-c", conf_dir.path(), "delete", &id)
        .success()
        .stdout(predicate::str::contains("[OK]"));

    cargo_run!("pixsearch", "-c", conf_dir.path(), "list")
        .success()
        .stdout(predicate::str::contains("总计 1"));

    Ok(())
}

#[test]
fn add_skips_non_image_files() -> Result<()> {
    let conf_dir = assert_fs::TempDir::new()?;
    let input_dir = conf_dir.path().join("input");
    fs::create_dir_all(&input_dir)?;

    write_test_image(&input_dir.join("ok.png"), [1, 2, 3])?;
    // 后缀匹配但内容不是图片
    fs::write(input_dir.join("fake.png"), b"not an image")?;
    // 后缀不匹配，直接跳过
    fs::write(input_dir.join("notes.txt"), b"hello")?;

    cargo_run!("pixsearch", "-c", conf_dir.path(), "add", &input_dir)
        .success()
        .stdout(predicate::str::contains("[OK]").count(1))
        .stderr(predicate::str::contains("[ERR]").count(1));

    cargo_run!("pixsearch", "-c", conf_dir.path(), "list")
        .success()
        .stdout(predicate::str::contains("总计 1"));

    Ok(())
}

#[test]
fn search_empty_store() -> Result<()> {
    let conf_dir = assert_fs::TempDir::new()?;
    let query = conf_dir.path().join("query.png");
    write_test_image(&query, [0, 0, 0])?;

    cargo_run!("pixsearch", "-c", conf_dir.path(), "search", &query)
        .success()
        .stdout(predicate::str::is_empty());

    Ok(())
}
