// pixie-thumbnail/src/io/compressor.rs
use crate::core::{Result, ThumbnailError, ThumbnailParameter};
use crate::utils::format_name;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageError, ImageFormat};
use oxipng::{optimize_from_memory, Options};
use std::io::Cursor;

/// Encodes thumbnails, honouring the parameter's quality and format-type hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compressor {
    optimize_png: bool,
}

impl Compressor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    pub fn compress_to_bytes(
        &self,
        image: &DynamicImage,
        format: ImageFormat,
        param: Option<&ThumbnailParameter>,
    ) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let quality = param.and_then(|p| p.output_quality());
        let format_type = param.and_then(|p| p.output_format_type());

        log::debug!(
            "Encoding {}x{} image as {:?}, quality: {:?}, type: {:?}",
            image.width(),
            image.height(),
            format,
            quality,
            format_type
        );

        let written = match format {
            ImageFormat::Jpeg => {
                let encoder = match quality {
                    Some(quality) => JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality)),
                    None => JpegEncoder::new(&mut buffer),
                };
                // JPEG carries neither alpha nor 16-bit samples.
                match image.color() {
                    ColorType::L8 | ColorType::Rgb8 => image.write_with_encoder(encoder),
                    _ => DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder),
                }
            }
            ImageFormat::Png => {
                let encoder = PngEncoder::new_with_quality(
                    &mut buffer,
                    png_compression(format_type),
                    PngFilterType::Adaptive,
                );
                image.write_with_encoder(encoder)
            }
            other => image.write_to(&mut buffer, other),
        };

        written.map_err(|e| match e {
            ImageError::Unsupported(_) => ThumbnailError::UnsupportedOutputFormat(format_name(format)),
            other => ThumbnailError::Image(other),
        })?;

        let bytes = buffer.into_inner();
        if format == ImageFormat::Png && self.optimize_png {
            return self.optimize_png_bytes(&bytes);
        }

        Ok(bytes)
    }

    fn optimize_png_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let optimized = optimize_from_memory(data, &Options::default()).map_err(|e| {
            ThumbnailError::ProcessingError(format!("PNG optimization failed: {}", e))
        })?;
        log::debug!("Optimized PNG from {} to {} bytes", data.len(), optimized.len());
        Ok(optimized)
    }
}

fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

fn png_compression(format_type: Option<&str>) -> CompressionType {
    match format_type.map(|t| t.to_lowercase()).as_deref() {
        None | Some("default") => CompressionType::Default,
        Some("fast") => CompressionType::Fast,
        Some("best") => CompressionType::Best,
        Some(other) => {
            log::warn!("Unknown PNG compression type {:?}, using default", other);
            CompressionType::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::{FixedResizerFactory, ResizeAlgorithm};
    use image::RgbaImage;

    #[test]
    fn jpeg_quality_maps_unit_range() {
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(0.85), 85);
        assert_eq!(jpeg_quality(1.0), 100);
    }

    #[test]
    fn rgba_is_flattened_for_jpeg() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        let bytes = Compressor::new()
            .compress_to_bytes(&image, ImageFormat::Jpeg, None)
            .unwrap();

        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn lower_quality_gives_smaller_jpeg() {
        let mut image = image::RgbImage::new(64, 64);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = image::Rgb([(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8]);
        }
        let image = DynamicImage::ImageRgb8(image);

        let encode = |quality: f32| {
            let param = ThumbnailParameter::builder()
                .size(64, 64)
                .output_quality(quality)
                .resizer_factory(FixedResizerFactory::new(ResizeAlgorithm::Bilinear))
                .build()
                .unwrap();
            Compressor::new()
                .compress_to_bytes(&image, ImageFormat::Jpeg, Some(&param))
                .unwrap()
        };

        assert!(encode(0.1).len() < encode(0.95).len());
    }

    #[test]
    fn optimized_png_still_decodes() {
        let image = DynamicImage::new_rgb8(16, 16);
        let bytes = Compressor::new()
            .with_png_optimization(true)
            .compress_to_bytes(&image, ImageFormat::Png, None)
            .unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }
}
