use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageError};
use log::warn;

use crate::db::ImageFormat;
use crate::error::{Error, Result};

/// 入库图片的统一宽度，高度按比例缩放
pub const CANONICAL_WIDTH: u32 = 800;

/// JPEG 编码质量
const JPEG_QUALITY: u8 = 90;

/// 解码图片，只接受允许列表中的格式
pub fn decode_image(data: &[u8]) -> Result<(DynamicImage, ImageFormat)> {
    let guessed =
        image::guess_format(data).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;
    let format = ImageFormat::from_image(guessed)
        .ok_or_else(|| Error::UnsupportedFormat(format!("{guessed:?}")))?;
    let image =
        image::load_from_memory(data).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;
    Ok((image, format))
}

/// 把图片缩放到统一宽度，高度按比例计算
pub fn normalize_image(image: &DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width == CANONICAL_WIDTH {
        return image.clone();
    }
    let new_height = ((CANONICAL_WIDTH as u64 * height as u64) / width as u64).max(1) as u32;
    image.resize_exact(CANONICAL_WIDTH, new_height, FilterType::Lanczos3)
}

/// 把图片编码后写入指定路径
///
/// 编码中途失败时会删除写到一半的文件，不在磁盘上留半成品。
pub fn encode_image(image: &DynamicImage, format: ImageFormat, path: &Path) -> Result<()> {
    write_image(image, format, path).inspect_err(|_| {
        if let Err(e) = fs::remove_file(path) {
            if e.kind() != ErrorKind::NotFound {
                warn!("清理未写完的文件失败: {}: {e}", path.display());
            }
        }
    })
}

fn write_image(image: &DynamicImage, format: ImageFormat, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let result = match format {
        ImageFormat::Jpeg => {
            image.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY))
        }
        ImageFormat::Png => image.write_with_encoder(PngEncoder::new(&mut writer)),
    };
    result.map_err(|e| match e {
        ImageError::IoError(e) => Error::Storage(e),
        e => Error::Storage(std::io::Error::other(e)),
    })?;
    writer.flush()?;
    Ok(())
}
