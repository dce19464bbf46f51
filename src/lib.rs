//! Thumbnail generation as a `Source -> Resize -> Sink` pipeline.
//!
//! A [`ThumbnailParameter`] describes the thumbnail, an [`ImageSource`] supplies
//! the original and an [`ImageSink`] receives the result. A
//! [`SourceSinkThumbnailTask`] binds the three, and [`create_thumbnail`] runs it.

mod core;
mod io;
mod processors;
mod utils;

#[cfg(test)]
mod test_helpers;

pub use self::core::{
    create_thumbnail, Dimension, FileThumbnailTask, Geometry, ImageType, OutputFormat, Region,
    Result, SourceSinkThumbnailTask, StreamThumbnailTask, TaskState, ThumbnailError,
    ThumbnailParameter, ThumbnailParameterBuilder, ThumbnailTask,
};
pub use io::{
    BufferedImageSink, BufferedImageSource, Compressor, FileImageSink, FileImageSource,
    ImageSink, ImageSource, InputStreamImageSource, OutputStreamImageSink,
};
pub use processors::{
    apply_filters, calculate_dimensions, read_exif_orientation, resize_with_parameter, Canvas,
    DefaultResizerFactory, FixedResizerFactory, Flip, ImageFilter, Orientation, Pipeline,
    ResizeAlgorithm, Resizer, ResizerFactory, Rotation, Sharpen,
};
pub use utils::{format_name, parse_format_name};

pub mod prelude {
    pub use crate::{
        create_thumbnail, FileThumbnailTask, ImageSink, ImageSource, OutputFormat,
        SourceSinkThumbnailTask, StreamThumbnailTask, ThumbnailParameter, ThumbnailTask,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
