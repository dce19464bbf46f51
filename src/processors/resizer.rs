// pixie-thumbnail/src/processors/resizer.rs
use crate::core::{Dimension, Geometry, ImageType, Result, ThumbnailError, ThumbnailParameter};
use image::{imageops::FilterType, ColorType, DynamicImage, GenericImageView};
use std::fmt;
use std::sync::Arc;

/// Scales an image to an exact size.
pub trait Resizer: fmt::Debug + Send + Sync {
    fn resize(&self, image: &DynamicImage, target: Dimension) -> DynamicImage;
}

/// Picks a [`Resizer`] for a given source and target size.
pub trait ResizerFactory: fmt::Debug + Send + Sync {
    fn resizer(&self, source: Dimension, target: Dimension) -> Arc<dyn Resizer>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAlgorithm {
    /// Copies pixels without scaling, cropping or padding to the target size.
    Null,
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
    /// Repeated halving with bilinear sampling before the final step.
    ProgressiveBilinear,
}

impl ResizeAlgorithm {
    fn filter_type(self) -> FilterType {
        match self {
            ResizeAlgorithm::Nearest | ResizeAlgorithm::Null => FilterType::Nearest,
            ResizeAlgorithm::Bilinear | ResizeAlgorithm::ProgressiveBilinear => {
                FilterType::Triangle
            }
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Resizer for ResizeAlgorithm {
    fn resize(&self, image: &DynamicImage, target: Dimension) -> DynamicImage {
        let target = Dimension::new(target.width.max(1), target.height.max(1));
        if Dimension::of(image) == target {
            log::debug!("Image dimensions unchanged, skipping resize");
            return image.clone();
        }

        log::debug!(
            "Resizing image from {}x{} to {}x{} using {:?}",
            image.width(),
            image.height(),
            target.width,
            target.height,
            self
        );

        match self {
            ResizeAlgorithm::Null => {
                let mut canvas = DynamicImage::new(target.width, target.height, image.color());
                image::imageops::replace(&mut canvas, image, 0, 0);
                canvas
            }
            ResizeAlgorithm::ProgressiveBilinear => progressive_resize(image, target, self.filter_type()),
            _ => image.resize_exact(target.width, target.height, self.filter_type()),
        }
    }
}

fn progressive_resize(image: &DynamicImage, target: Dimension, filter: FilterType) -> DynamicImage {
    let mut current = image.clone();

    loop {
        let (width, height) = current.dimensions();
        let (half_width, half_height) = (width / 2, height / 2);
        if half_width < target.width || half_height < target.height {
            break;
        }
        current = current.resize_exact(half_width, half_height, filter);
    }

    current.resize_exact(target.width, target.height, filter)
}

/// Always hands out the same resizer.
#[derive(Debug, Clone)]
pub struct FixedResizerFactory {
    resizer: Arc<dyn Resizer>,
}

impl FixedResizerFactory {
    pub fn new(resizer: impl Resizer + 'static) -> Self {
        Self {
            resizer: Arc::new(resizer),
        }
    }
}

impl ResizerFactory for FixedResizerFactory {
    fn resizer(&self, _source: Dimension, _target: Dimension) -> Arc<dyn Resizer> {
        Arc::clone(&self.resizer)
    }
}

/// Chooses the resizer from how much the image shrinks or grows.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResizerFactory;

impl DefaultResizerFactory {
    pub fn algorithm_for(source: Dimension, target: Dimension) -> ResizeAlgorithm {
        let shrinks = target.width < source.width && target.height < source.height;
        let grows = target.width > source.width && target.height > source.height;

        if shrinks {
            if target.width < source.width / 2 && target.height < source.height / 2 {
                ResizeAlgorithm::ProgressiveBilinear
            } else {
                ResizeAlgorithm::Bilinear
            }
        } else if grows {
            ResizeAlgorithm::Bicubic
        } else if source == target {
            ResizeAlgorithm::Null
        } else {
            ResizeAlgorithm::Bilinear
        }
    }
}

impl ResizerFactory for DefaultResizerFactory {
    fn resizer(&self, source: Dimension, target: Dimension) -> Arc<dyn Resizer> {
        Arc::new(Self::algorithm_for(source, target))
    }
}

/// Size of the thumbnail for a source image of the given size.
pub fn calculate_dimensions(source: Dimension, param: &ThumbnailParameter) -> Dimension {
    let (orig_w, orig_h) = (source.width, source.height);

    let (width, height) = match param.geometry() {
        Geometry::Scale { width, height } => (
            (orig_w as f64 * width).round() as u32,
            (orig_h as f64 * height).round() as u32,
        ),
        Geometry::Size(target) if !param.keep_aspect_ratio() => (
            if target.width == 0 { orig_w } else { target.width },
            if target.height == 0 { orig_h } else { target.height },
        ),
        Geometry::Size(target) => {
            preserve_aspect(source, target, param.fit_within_dimensions())
        }
    };

    Dimension::new(width.max(1), height.max(1))
}

fn preserve_aspect(source: Dimension, target: Dimension, fit: bool) -> (u32, u32) {
    let (orig_w, orig_h) = (source.width, source.height);
    let (target_w, target_h) = (target.width, target.height);

    if target_w == 0 && target_h == 0 {
        return (orig_w, orig_h);
    }

    if target_w == 0 {
        let ratio = target_h as f64 / orig_h as f64;
        return ((orig_w as f64 * ratio).round() as u32, target_h);
    }

    if target_h == 0 {
        let ratio = target_w as f64 / orig_w as f64;
        return (target_w, (orig_h as f64 * ratio).round() as u32);
    }

    let ratio_w = target_w as f64 / orig_w as f64;
    let ratio_h = target_h as f64 / orig_h as f64;
    // Fitting keeps the whole image inside the box, filling covers the box.
    let ratio = if fit {
        ratio_w.min(ratio_h)
    } else {
        ratio_w.max(ratio_h)
    };

    (
        (orig_w as f64 * ratio).round() as u32,
        (orig_h as f64 * ratio).round() as u32,
    )
}

/// Crop, scale and convert an image as described by the parameter.
pub fn resize_with_parameter(image: DynamicImage, param: &ThumbnailParameter) -> Result<DynamicImage> {
    let image = match param.source_region() {
        Some(region) => {
            let bounds = Dimension::of(&image);
            let region = region.clamp_to(bounds).ok_or_else(|| {
                ThumbnailError::InvalidParameter(format!(
                    "Source region {:?} lies outside the {}x{} image",
                    region, bounds.width, bounds.height
                ))
            })?;
            log::debug!("Cropping source to {:?}", region);
            image.crop_imm(region.x, region.y, region.width, region.height)
        }
        None => image,
    };

    let source = Dimension::of(&image);
    let target = calculate_dimensions(source, param);
    if target.width > ThumbnailParameter::MAX_DIMENSION
        || target.height > ThumbnailParameter::MAX_DIMENSION
    {
        return Err(ThumbnailError::InvalidParameter(format!(
            "Dimensions too large (max 100,000 pixels): {}x{} would become {}x{}",
            source.width, source.height, target.width, target.height
        )));
    }
    let resizer = param.resizer_factory().resizer(source, target);
    let resized = resizer.resize(&image, target);

    Ok(match param.output_image_type() {
        ImageType::Original => resized,
        ImageType::Color(color) => convert_color(resized, color),
    })
}

fn convert_color(image: DynamicImage, color: ColorType) -> DynamicImage {
    if image.color() == color {
        return image;
    }

    match color {
        ColorType::L8 => image.to_luma8().into(),
        ColorType::La8 => image.to_luma_alpha8().into(),
        ColorType::Rgb8 => image.to_rgb8().into(),
        ColorType::Rgba8 => image.to_rgba8().into(),
        ColorType::L16 => image.to_luma16().into(),
        ColorType::La16 => image.to_luma_alpha16().into(),
        ColorType::Rgb16 => image.to_rgb16().into(),
        ColorType::Rgba16 => image.to_rgba16().into(),
        ColorType::Rgb32F => image.to_rgb32f().into(),
        ColorType::Rgba32F => image.to_rgba32f().into(),
        other => {
            log::warn!("Cannot convert to {:?}, keeping {:?}", other, image.color());
            image
        }
    }
}
