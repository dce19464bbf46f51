// pixie-thumbnail/src/core/parameter.rs
use super::{Result, ThumbnailError};
use crate::processors::{ImageFilter, ResizerFactory};
use image::{ColorType, DynamicImage, GenericImageView};
use std::sync::Arc;

/// Width and height of an image or of a requested thumbnail, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Dimension {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn of(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }
}

/// Crop rectangle applied to the source image before resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Intersect the region with an image of the given size.
    ///
    /// Returns `None` when nothing of the region lies inside the image.
    pub fn clamp_to(&self, bounds: Dimension) -> Option<Region> {
        if self.x >= bounds.width || self.y >= bounds.height {
            return None;
        }

        let width = self.width.min(bounds.width - self.x);
        let height = self.height.min(bounds.height - self.y);
        if width == 0 || height == 0 {
            return None;
        }

        Some(Region::new(self.x, self.y, width, height))
    }
}

/// How the size of the thumbnail is derived from the source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Target box in pixels. A zero axis is unconstrained when the aspect ratio is kept.
    Size(Dimension),
    /// Scaling factors applied to the source dimensions.
    Scale { width: f64, height: f64 },
}

/// Requested output format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Reuse the format the source image was decoded from.
    Original,
    /// Let the sink decide, falling back to the original format.
    Determine,
    /// An explicit format name such as `"png"` or `"jpeg"`.
    Named(String),
}

impl OutputFormat {
    pub fn named(name: impl Into<String>) -> Self {
        OutputFormat::Named(name.into())
    }
}

/// Pixel layout of the thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Original,
    Color(ColorType),
}

/// Immutable description of a thumbnail to produce.
///
/// Built through [`ThumbnailParameterBuilder`]; once built it is only ever read.
#[derive(Debug, Clone)]
pub struct ThumbnailParameter {
    geometry: Geometry,
    source_region: Option<Region>,
    keep_aspect_ratio: bool,
    output_format: OutputFormat,
    output_format_type: Option<String>,
    output_quality: Option<f32>,
    output_image_type: ImageType,
    filters: Vec<Arc<dyn ImageFilter>>,
    resizer_factory: Arc<dyn ResizerFactory>,
    fit_within_dimensions: bool,
    use_exif_orientation: bool,
}

impl ThumbnailParameter {
    pub const ORIGINAL_FORMAT: OutputFormat = OutputFormat::Original;
    pub const DETERMINE_FORMAT: OutputFormat = OutputFormat::Determine;
    pub const DEFAULT_FORMAT_TYPE: Option<String> = None;
    pub const DEFAULT_QUALITY: Option<f32> = None;
    pub const ORIGINAL_IMAGE_TYPE: ImageType = ImageType::Original;
    /// Largest thumbnail width or height accepted.
    pub const MAX_DIMENSION: u32 = 100_000;

    pub fn builder() -> ThumbnailParameterBuilder {
        ThumbnailParameterBuilder::default()
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Target size, when the thumbnail is specified by size rather than by scale.
    pub fn size(&self) -> Option<Dimension> {
        match self.geometry {
            Geometry::Size(size) => Some(size),
            Geometry::Scale { .. } => None,
        }
    }

    pub fn source_region(&self) -> Option<Region> {
        self.source_region
    }

    pub fn keep_aspect_ratio(&self) -> bool {
        self.keep_aspect_ratio
    }

    pub fn output_format(&self) -> &OutputFormat {
        &self.output_format
    }

    pub fn output_format_type(&self) -> Option<&str> {
        self.output_format_type.as_deref()
    }

    pub fn output_quality(&self) -> Option<f32> {
        self.output_quality
    }

    pub fn output_image_type(&self) -> ImageType {
        self.output_image_type
    }

    pub fn filters(&self) -> &[Arc<dyn ImageFilter>] {
        &self.filters
    }

    pub fn resizer_factory(&self) -> &Arc<dyn ResizerFactory> {
        &self.resizer_factory
    }

    pub fn fit_within_dimensions(&self) -> bool {
        self.fit_within_dimensions
    }

    pub fn use_exif_orientation(&self) -> bool {
        self.use_exif_orientation
    }
}

// Filters and the resizer factory compare by identity.
impl PartialEq for ThumbnailParameter {
    fn eq(&self, other: &Self) -> bool {
        self.geometry == other.geometry
            && self.source_region == other.source_region
            && self.keep_aspect_ratio == other.keep_aspect_ratio
            && self.output_format == other.output_format
            && self.output_format_type == other.output_format_type
            && self.output_quality == other.output_quality
            && self.output_image_type == other.output_image_type
            && self.filters.len() == other.filters.len()
            && self
                .filters
                .iter()
                .zip(&other.filters)
                .all(|(a, b)| Arc::ptr_eq(a, b))
            && Arc::ptr_eq(&self.resizer_factory, &other.resizer_factory)
            && self.fit_within_dimensions == other.fit_within_dimensions
            && self.use_exif_orientation == other.use_exif_orientation
    }
}

#[derive(Debug, Clone)]
pub struct ThumbnailParameterBuilder {
    size: Option<Dimension>,
    scale: Option<(f64, f64)>,
    source_region: Option<Region>,
    keep_aspect_ratio: bool,
    output_format: OutputFormat,
    output_format_type: Option<String>,
    output_quality: Option<f32>,
    output_image_type: ImageType,
    filters: Vec<Arc<dyn ImageFilter>>,
    resizer_factory: Option<Arc<dyn ResizerFactory>>,
    fit_within_dimensions: bool,
    use_exif_orientation: bool,
}

impl Default for ThumbnailParameterBuilder {
    fn default() -> Self {
        Self {
            size: None,
            scale: None,
            source_region: None,
            keep_aspect_ratio: true,
            output_format: ThumbnailParameter::ORIGINAL_FORMAT,
            output_format_type: ThumbnailParameter::DEFAULT_FORMAT_TYPE,
            output_quality: ThumbnailParameter::DEFAULT_QUALITY,
            output_image_type: ThumbnailParameter::ORIGINAL_IMAGE_TYPE,
            filters: Vec::new(),
            resizer_factory: None,
            fit_within_dimensions: true,
            use_exif_orientation: true,
        }
    }
}

impl ThumbnailParameterBuilder {
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = Some(Dimension::new(width, height));
        self
    }

    pub fn scale(mut self, width: f64, height: f64) -> Self {
        self.scale = Some((width, height));
        self
    }

    pub fn source_region(mut self, region: Region) -> Self {
        self.source_region = Some(region);
        self
    }

    pub fn keep_aspect_ratio(mut self, keep: bool) -> Self {
        self.keep_aspect_ratio = keep;
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn output_format_type(mut self, format_type: impl Into<String>) -> Self {
        self.output_format_type = Some(format_type.into());
        self
    }

    pub fn output_quality(mut self, quality: f32) -> Self {
        self.output_quality = Some(quality);
        self
    }

    pub fn output_image_type(mut self, image_type: ImageType) -> Self {
        self.output_image_type = image_type;
        self
    }

    pub fn filter(mut self, filter: impl ImageFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn filters(mut self, filters: Vec<Arc<dyn ImageFilter>>) -> Self {
        self.filters = filters;
        self
    }

    pub fn resizer_factory(mut self, factory: impl ResizerFactory + 'static) -> Self {
        self.resizer_factory = Some(Arc::new(factory));
        self
    }

    pub fn shared_resizer_factory(mut self, factory: Arc<dyn ResizerFactory>) -> Self {
        self.resizer_factory = Some(factory);
        self
    }

    pub fn fit_within_dimensions(mut self, fit: bool) -> Self {
        self.fit_within_dimensions = fit;
        self
    }

    pub fn use_exif_orientation(mut self, use_exif: bool) -> Self {
        self.use_exif_orientation = use_exif;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.is_some() && self.scale.is_some() {
            return Err(ThumbnailError::InvalidParameter(
                "Cannot specify both size and scale".to_string(),
            ));
        }

        if let Some(size) = self.size {
            if size.width == 0 && size.height == 0 {
                return Err(ThumbnailError::InvalidParameter(
                    "At least one dimension must be specified".to_string(),
                ));
            }

            if size.width > ThumbnailParameter::MAX_DIMENSION
                || size.height > ThumbnailParameter::MAX_DIMENSION
            {
                return Err(ThumbnailError::InvalidParameter(
                    "Dimensions too large (max 100,000 pixels)".to_string(),
                ));
            }
        }

        if let Some((width, height)) = self.scale {
            if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
                return Err(ThumbnailError::InvalidParameter(format!(
                    "Scaling factors must be positive, got {}x{}",
                    width, height
                )));
            }
        }

        if let Some(quality) = self.output_quality {
            if !(0.0..=1.0).contains(&quality) {
                return Err(ThumbnailError::InvalidParameter(format!(
                    "Quality must be between 0.0 and 1.0, got {}",
                    quality
                )));
            }
        }

        if let OutputFormat::Named(name) = &self.output_format {
            if name.trim().is_empty() {
                return Err(ThumbnailError::InvalidParameter(
                    "Output format name cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn build(self) -> Result<ThumbnailParameter> {
        self.validate()?;

        let geometry = match (self.size, self.scale) {
            (Some(size), _) => Geometry::Size(size),
            (None, Some((width, height))) => Geometry::Scale { width, height },
            (None, None) => {
                return Err(ThumbnailError::MissingConfiguration(
                    "thumbnail size or scaling factor".to_string(),
                ))
            }
        };

        let resizer_factory = self.resizer_factory.ok_or_else(|| {
            ThumbnailError::MissingConfiguration("resizer factory".to_string())
        })?;

        Ok(ThumbnailParameter {
            geometry,
            source_region: self.source_region,
            keep_aspect_ratio: self.keep_aspect_ratio,
            output_format: self.output_format,
            output_format_type: self.output_format_type,
            output_quality: self.output_quality,
            output_image_type: self.output_image_type,
            filters: self.filters,
            resizer_factory,
            fit_within_dimensions: self.fit_within_dimensions,
            use_exif_orientation: self.use_exif_orientation,
        })
    }
}
