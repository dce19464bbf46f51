// pixie-thumbnail/src/core/task.rs
use super::{OutputFormat, Result, ThumbnailError, ThumbnailParameter};
use crate::io::{
    FileImageSink, FileImageSource, ImageSink, ImageSource, InputStreamImageSource,
    OutputStreamImageSink,
};
use crate::processors::{apply_filters, resize_with_parameter, ImageFilter};
use image::DynamicImage;
use std::io::{Read, Write};
use std::path::PathBuf;

/// Progress of a task through its read/write cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState {
    Created,
    Read { input_format: Option<String> },
    Written { input_format: Option<String> },
}

impl TaskState {
    /// Format recorded by the last successful read.
    pub fn input_format(&self) -> Option<&str> {
        match self {
            TaskState::Created => None,
            TaskState::Read { input_format } | TaskState::Written { input_format } => {
                input_format.as_deref()
            }
        }
    }
}

/// One thumbnail job: a parameter bound to one source and one destination.
pub trait ThumbnailTask {
    type Source;
    type Destination;

    fn param(&self) -> &ThumbnailParameter;

    /// Decode the original image, upright when EXIF orientation is enabled.
    fn read(&mut self) -> Result<DynamicImage>;

    /// Apply the parameter's filters and hand the thumbnail to the destination.
    fn write(&mut self, image: DynamicImage) -> Result<()>;

    fn source(&self) -> &Self::Source;

    fn destination(&self) -> &Self::Destination;
}

/// Read, resize, filter and write a single thumbnail.
pub fn create_thumbnail<T: ThumbnailTask + ?Sized>(task: &mut T) -> Result<()> {
    let image = task.read()?;
    let thumbnail = resize_with_parameter(image, task.param())?;
    task.write(thumbnail)
}

pub struct SourceSinkThumbnailTask<S: ImageSource, K: ImageSink> {
    param: ThumbnailParameter,
    source: S,
    sink: K,
    state: TaskState,
}

impl<S: ImageSource, K: ImageSink> SourceSinkThumbnailTask<S, K> {
    pub fn new(param: ThumbnailParameter, mut source: S, mut sink: K) -> Self {
        source.set_thumbnail_parameter(param.clone());
        sink.set_thumbnail_parameter(param.clone());

        Self {
            param,
            source,
            sink,
            state: TaskState::Created,
        }
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub fn image_source(&self) -> &S {
        &self.source
    }

    pub fn image_sink(&self) -> &K {
        &self.sink
    }

    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }

    fn original_format(&self) -> Result<String> {
        self.state
            .input_format()
            .map(str::to_string)
            .ok_or(ThumbnailError::FormatUndefined)
    }

    fn resolve_output_format(&self) -> Result<String> {
        match self.param.output_format() {
            OutputFormat::Named(name) => Ok(name.clone()),
            OutputFormat::Determine => match self.sink.preferred_output_format_name() {
                Some(name) => Ok(name),
                None => self.original_format(),
            },
            OutputFormat::Original => self.original_format(),
        }
    }
}

impl<S: ImageSource, K: ImageSink> ThumbnailTask for SourceSinkThumbnailTask<S, K> {
    type Source = S::Origin;
    type Destination = K::Destination;

    fn param(&self) -> &ThumbnailParameter {
        &self.param
    }

    fn read(&mut self) -> Result<DynamicImage> {
        let image = self.source.read()?;
        let input_format = self.source.input_format_name().map(str::to_string);

        let image = match self.source.orientation() {
            Some(orientation) if self.param.use_exif_orientation() => {
                log::debug!("Correcting orientation {:?}", orientation);
                orientation.apply(image)
            }
            _ => image,
        };

        self.state = TaskState::Read { input_format };
        Ok(image)
    }

    fn write(&mut self, image: DynamicImage) -> Result<()> {
        let format = self.resolve_output_format()?;
        let image = apply_filters(self.param.filters(), image);

        self.sink.set_output_format_name(&format);
        self.sink.write(image)?;

        self.state = TaskState::Written {
            input_format: self.state.input_format().map(str::to_string),
        };
        Ok(())
    }

    fn source(&self) -> &S::Origin {
        self.source.source()
    }

    fn destination(&self) -> &K::Destination {
        self.sink.sink()
    }
}

pub type FileThumbnailTask = SourceSinkThumbnailTask<FileImageSource, FileImageSink>;

impl SourceSinkThumbnailTask<FileImageSource, FileImageSink> {
    pub fn from_paths(
        param: ThumbnailParameter,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self::new(
            param,
            FileImageSource::new(source),
            FileImageSink::new(destination),
        )
    }
}

pub type StreamThumbnailTask<R, W> =
    SourceSinkThumbnailTask<InputStreamImageSource<R>, OutputStreamImageSink<W>>;

impl<R: Read, W: Write> SourceSinkThumbnailTask<InputStreamImageSource<R>, OutputStreamImageSink<W>> {
    pub fn from_streams(param: ThumbnailParameter, input: R, output: W) -> Self {
        Self::new(
            param,
            InputStreamImageSource::new(input),
            OutputStreamImageSink::new(output),
        )
    }
}
