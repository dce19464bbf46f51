// pixie-thumbnail/src/processors/filters.rs
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use std::fmt;
use std::sync::Arc;

/// Post-processing step applied to a resized thumbnail.
pub trait ImageFilter: fmt::Debug + Send + Sync {
    fn apply(&self, image: DynamicImage) -> DynamicImage;
}

/// Rotates clockwise by an arbitrary angle in degrees.
///
/// Quarter turns are lossless. Other angles keep the canvas size and fill the
/// uncovered corners with transparent pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
}

impl Rotation {
    pub fn new(degrees: f32) -> Self {
        Self { degrees }
    }
}

impl ImageFilter for Rotation {
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        let degrees = self.degrees.rem_euclid(360.0);

        if degrees == 0.0 {
            image
        } else if degrees == 90.0 {
            image.rotate90()
        } else if degrees == 180.0 {
            image.rotate180()
        } else if degrees == 270.0 {
            image.rotate270()
        } else {
            let rgba = image.to_rgba8();
            let rotated = rotate_about_center(
                &rgba,
                degrees.to_radians(),
                Interpolation::Bilinear,
                Rgba([0, 0, 0, 0]),
            );
            DynamicImage::ImageRgba8(rotated)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    Horizontal,
    Vertical,
}

impl ImageFilter for Flip {
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        match self {
            Flip::Horizontal => image.fliph(),
            Flip::Vertical => image.flipv(),
        }
    }
}

/// Places the image centered on a canvas of fixed size.
///
/// Smaller images are padded with `fill`, larger ones are cropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub fill: Rgba<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, fill: Rgba<u8>) -> Self {
        Self { width, height, fill }
    }
}

impl ImageFilter for Canvas {
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        let (width, height) = image.dimensions();
        let mut canvas = RgbaImage::from_pixel(self.width, self.height, self.fill);
        let x = (self.width as i64 - width as i64) / 2;
        let y = (self.height as i64 - height as i64) / 2;

        image::imageops::overlay(&mut canvas, &image.to_rgba8(), x, y);
        DynamicImage::ImageRgba8(canvas)
    }
}

/// Unsharp mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sharpen {
    pub sigma: f32,
    pub threshold: i32,
}

impl Sharpen {
    /// Light sharpening suitable for thumbnails.
    pub fn light() -> Self {
        Self {
            sigma: 0.5,
            threshold: 0,
        }
    }
}

impl ImageFilter for Sharpen {
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        image.unsharpen(self.sigma, self.threshold)
    }
}

/// Runs filters in order.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    filters: Vec<Arc<dyn ImageFilter>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, filter: impl ImageFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl From<Vec<Arc<dyn ImageFilter>>> for Pipeline {
    fn from(filters: Vec<Arc<dyn ImageFilter>>) -> Self {
        Self { filters }
    }
}

impl ImageFilter for Pipeline {
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        apply_filters(&self.filters, image)
    }
}

pub fn apply_filters(filters: &[Arc<dyn ImageFilter>], image: DynamicImage) -> DynamicImage {
    filters.iter().fold(image, |image, filter| {
        log::debug!("Applying filter {:?}", filter);
        filter.apply(image)
    })
}
