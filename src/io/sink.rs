// pixie-thumbnail/src/io/sink.rs
use super::Compressor;
use crate::core::{Result, ThumbnailError, ThumbnailParameter};
use crate::utils::{get_file_extension, parse_format_name};
use image::{DynamicImage, ImageFormat};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where a finished thumbnail goes.
pub trait ImageSink {
    /// Key identifying the destination: a path, a stream, an in-memory slot.
    type Destination;

    fn write(&mut self, image: DynamicImage) -> Result<()>;

    /// Format this sink would choose on its own. `None` defers to the input format.
    fn preferred_output_format_name(&self) -> Option<String> {
        None
    }

    /// Format to encode the next `write` with.
    fn set_output_format_name(&mut self, format: &str);

    fn sink(&self) -> &Self::Destination;

    fn set_thumbnail_parameter(&mut self, param: ThumbnailParameter);
}

fn resolve_format(name: Option<&str>) -> Result<ImageFormat> {
    let name = name.ok_or_else(|| {
        ThumbnailError::UnsupportedOutputFormat("no output format set".to_string())
    })?;
    parse_format_name(name).ok_or_else(|| ThumbnailError::UnsupportedOutputFormat(name.to_string()))
}

pub struct FileImageSink {
    path: PathBuf,
    allow_overwrite: bool,
    output_format: Option<String>,
    param: Option<ThumbnailParameter>,
    compressor: Compressor,
}

impl FileImageSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            allow_overwrite: true,
            output_format: None,
            param: None,
            compressor: Compressor::new(),
        }
    }

    pub fn with_overwrite(mut self, allow: bool) -> Self {
        self.allow_overwrite = allow;
        self
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.compressor = self.compressor.with_png_optimization(optimize);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSink for FileImageSink {
    type Destination = PathBuf;

    /// Encodes with the format given to `set_output_format_name`. The path's
    /// extension is only a preference and is never used on its own.
    fn write(&mut self, image: DynamicImage) -> Result<()> {
        let format = resolve_format(self.output_format.as_deref())?;

        if !self.allow_overwrite && self.path.exists() {
            return Err(ThumbnailError::DestinationExists(
                self.path.display().to_string(),
            ));
        }

        let bytes = self
            .compressor
            .compress_to_bytes(&image, format, self.param.as_ref())?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, &bytes)?;

        log::info!("Saved thumbnail: {} ({} bytes)", self.path.display(), bytes.len());
        Ok(())
    }

    fn preferred_output_format_name(&self) -> Option<String> {
        get_file_extension(&self.path).filter(|ext| parse_format_name(ext).is_some())
    }

    fn set_output_format_name(&mut self, format: &str) {
        self.output_format = Some(format.to_string());
    }

    fn sink(&self) -> &PathBuf {
        &self.path
    }

    fn set_thumbnail_parameter(&mut self, param: ThumbnailParameter) {
        self.param = Some(param);
    }
}

pub struct OutputStreamImageSink<W: Write> {
    stream: W,
    output_format: Option<String>,
    param: Option<ThumbnailParameter>,
    compressor: Compressor,
}

impl<W: Write> OutputStreamImageSink<W> {
    pub fn new(stream: W) -> Self {
        Self {
            stream,
            output_format: None,
            param: None,
            compressor: Compressor::new(),
        }
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.compressor = self.compressor.with_png_optimization(optimize);
        self
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}

impl<W: Write> ImageSink for OutputStreamImageSink<W> {
    type Destination = W;

    fn write(&mut self, image: DynamicImage) -> Result<()> {
        let format = resolve_format(self.output_format.as_deref())?;
        let bytes = self
            .compressor
            .compress_to_bytes(&image, format, self.param.as_ref())?;

        self.stream.write_all(&bytes)?;
        self.stream.flush()?;

        log::info!("Wrote {} bytes of {:?} to output stream", bytes.len(), format);
        Ok(())
    }

    fn set_output_format_name(&mut self, format: &str) {
        self.output_format = Some(format.to_string());
    }

    fn sink(&self) -> &W {
        &self.stream
    }

    fn set_thumbnail_parameter(&mut self, param: ThumbnailParameter) {
        self.param = Some(param);
    }
}

/// Keeps the thumbnail in memory instead of encoding it.
#[derive(Default)]
pub struct BufferedImageSink {
    image: Option<DynamicImage>,
    output_format: Option<String>,
}

impl BufferedImageSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    pub fn output_format_name(&self) -> Option<&str> {
        self.output_format.as_deref()
    }

    pub fn into_image(self) -> Option<DynamicImage> {
        self.image
    }
}

impl ImageSink for BufferedImageSink {
    type Destination = Option<DynamicImage>;

    fn write(&mut self, image: DynamicImage) -> Result<()> {
        self.image = Some(image);
        Ok(())
    }

    fn set_output_format_name(&mut self, format: &str) {
        self.output_format = Some(format.to_string());
    }

    fn sink(&self) -> &Option<DynamicImage> {
        &self.image
    }

    fn set_thumbnail_parameter(&mut self, _param: ThumbnailParameter) {}
}
