use byteorder::{ByteOrder, LittleEndian};
use image::DynamicImage;

use crate::error::{Error, Result};

/// 嵌入策略：把解码后的图片映射为定长浮点向量
///
/// 纯函数，维数由策略自身决定。存储和搜索层对维数不作假设，
/// 替换为更高维的模型时无需改动它们，只需保证查询和入库使用同一策略。
pub trait EmbeddingStrategy: Send + Sync {
    /// 策略名称
    fn name(&self) -> &'static str;
    /// 向量维数
    fn dim(&self) -> usize;
    /// 计算图片的嵌入向量
    fn extract(&self, image: &DynamicImage) -> Vec<f32>;
}

/// 平均颜色策略：三通道各自的平均亮度，归一化到 [0, 1]
///
/// 占位实现，用于验证存储和搜索链路，实际效果有限。
pub struct MeanColor;

impl EmbeddingStrategy for MeanColor {
    fn name(&self) -> &'static str {
        "mean_color"
    }

    fn dim(&self) -> usize {
        3
    }

    fn extract(&self, image: &DynamicImage) -> Vec<f32> {
        let rgb = image.to_rgb8();
        let count = (rgb.width() as u64 * rgb.height() as u64).max(1) as f64;

        let mut sum = [0f64; 3];
        for pixel in rgb.pixels() {
            sum[0] += pixel.0[0] as f64;
            sum[1] += pixel.0[1] as f64;
            sum[2] += pixel.0[2] as f64;
        }

        sum.iter().map(|s| (s / count / 255.0) as f32).collect()
    }
}

/// 把向量序列化为小端序 f32 blob
pub fn encode_vector(vector: &[f32]) -> Vec<u8> {
    let mut buf = vec![0u8; vector.len() * 4];
    LittleEndian::write_f32_into(vector, &mut buf);
    buf
}

/// 从 blob 反序列化向量，长度不是 4 的倍数视为损坏
pub fn decode_vector(blob: &[u8]) -> Result<Vec<f32>> {
    if blob.len() % 4 != 0 {
        return Err(Error::Corruption(format!("向量 blob 长度无效: {}", blob.len())));
    }
    let mut vector = vec![0f32; blob.len() / 4];
    LittleEndian::read_f32_into(blob, &mut vector);
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    #[test]
    fn test_mean_color_of_solid_image() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([255, 0, 51])));
        let vector = MeanColor.extract(&image);
        assert_eq!(vector.len(), MeanColor.dim());
        assert!((vector[0] - 1.0).abs() < 1e-6);
        assert!(vector[1].abs() < 1e-6);
        assert!((vector[2] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_vector_roundtrip() {
        let vector = vec![0.0, -1.5, 3.25];
        let blob = encode_vector(&vector);
        assert_eq!(blob.len(), 12);
        assert_eq!(decode_vector(&blob).unwrap(), vector);
    }

    #[test]
    fn test_corrupt_blob() {
        let result = decode_vector(&[1, 2, 3]);
        assert!(matches!(result, Err(Error::Corruption(_))));
    }
}
