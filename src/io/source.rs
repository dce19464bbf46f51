// pixie-thumbnail/src/io/source.rs
use crate::core::{Result, ThumbnailError, ThumbnailParameter};
use crate::processors::{read_exif_orientation, Orientation};
use crate::utils::format_name;
use image::{DynamicImage, GenericImageView, ImageError, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};

/// Where a thumbnail's original image comes from.
pub trait ImageSource {
    /// Key identifying the origin: a path, a stream, an in-memory image.
    type Origin;

    fn read(&mut self) -> Result<DynamicImage>;

    /// Name of the format the last successful `read` decoded, if known.
    fn input_format_name(&self) -> Option<&str>;

    /// Orientation found during the last `read`, when EXIF orientation is enabled.
    fn orientation(&self) -> Option<Orientation> {
        None
    }

    fn source(&self) -> &Self::Origin;

    fn set_thumbnail_parameter(&mut self, param: ThumbnailParameter);
}

struct Decoded {
    image: DynamicImage,
    format: ImageFormat,
    orientation: Option<Orientation>,
}

fn decode<R: BufRead + Seek>(mut reader: R, use_exif: bool, origin: &str) -> Result<Decoded> {
    let orientation = if use_exif {
        let orientation = read_exif_orientation(&mut reader, 0)?;
        reader.rewind()?;
        orientation
    } else {
        None
    };

    let reader = ImageReader::new(reader).with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| ThumbnailError::UnsupportedFormat(origin.to_string()))?;

    let image = reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => ThumbnailError::UnsupportedFormat(origin.to_string()),
        other => ThumbnailError::Image(other),
    })?;

    let (width, height) = image.dimensions();
    log::info!(
        "Loaded image: {}x{} pixels, format: {:?}, from {}",
        width,
        height,
        format,
        origin
    );

    Ok(Decoded {
        image,
        format,
        orientation,
    })
}

fn use_exif(param: &Option<ThumbnailParameter>) -> bool {
    param.as_ref().is_some_and(|p| p.use_exif_orientation())
}

pub struct FileImageSource {
    path: PathBuf,
    param: Option<ThumbnailParameter>,
    input_format: Option<String>,
    orientation: Option<Orientation>,
}

impl FileImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            param: None,
            input_format: None,
            orientation: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileImageSource {
    type Origin = PathBuf;

    fn read(&mut self) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", self.path.display());

        let origin = self.path.display().to_string();
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ThumbnailError::OriginNotFound(origin.clone()),
            _ => ThumbnailError::Io(e),
        })?;

        let decoded = decode(BufReader::new(file), use_exif(&self.param), &origin)?;
        self.input_format = Some(format_name(decoded.format));
        self.orientation = decoded.orientation;
        Ok(decoded.image)
    }

    fn input_format_name(&self) -> Option<&str> {
        self.input_format.as_deref()
    }

    fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    fn source(&self) -> &PathBuf {
        &self.path
    }

    fn set_thumbnail_parameter(&mut self, param: ThumbnailParameter) {
        self.param = Some(param);
    }
}

/// Reads the whole stream on `read`; the stream itself is the origin key.
pub struct InputStreamImageSource<R: Read> {
    stream: R,
    param: Option<ThumbnailParameter>,
    input_format: Option<String>,
    orientation: Option<Orientation>,
}

impl<R: Read> InputStreamImageSource<R> {
    pub fn new(stream: R) -> Self {
        Self {
            stream,
            param: None,
            input_format: None,
            orientation: None,
        }
    }

    pub fn into_inner(self) -> R {
        self.stream
    }
}

impl<R: Read> ImageSource for InputStreamImageSource<R> {
    type Origin = R;

    fn read(&mut self) -> Result<DynamicImage> {
        let mut buffer = Vec::new();
        self.stream.read_to_end(&mut buffer)?;
        log::debug!("Read {} bytes from input stream", buffer.len());

        let decoded = decode(Cursor::new(buffer), use_exif(&self.param), "input stream")?;
        self.input_format = Some(format_name(decoded.format));
        self.orientation = decoded.orientation;
        Ok(decoded.image)
    }

    fn input_format_name(&self) -> Option<&str> {
        self.input_format.as_deref()
    }

    fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    fn source(&self) -> &R {
        &self.stream
    }

    fn set_thumbnail_parameter(&mut self, param: ThumbnailParameter) {
        self.param = Some(param);
    }
}

/// An already decoded image. It has no input format.
pub struct BufferedImageSource {
    image: DynamicImage,
}

impl BufferedImageSource {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }
}

impl ImageSource for BufferedImageSource {
    type Origin = DynamicImage;

    fn read(&mut self) -> Result<DynamicImage> {
        Ok(self.image.clone())
    }

    fn input_format_name(&self) -> Option<&str> {
        None
    }

    fn source(&self) -> &DynamicImage {
        &self.image
    }

    fn set_thumbnail_parameter(&mut self, _param: ThumbnailParameter) {}
}
