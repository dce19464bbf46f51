// pixie-thumbnail/src/core/mod.rs
mod parameter;
mod task;

use thiserror::Error;

pub use parameter::{
    Dimension, Geometry, ImageType, OutputFormat, Region, ThumbnailParameter,
    ThumbnailParameterBuilder,
};
pub use task::{
    create_thumbnail, FileThumbnailTask, SourceSinkThumbnailTask, StreamThumbnailTask, TaskState,
    ThumbnailTask,
};

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Could not find file: {0}")]
    OriginNotFound(String),

    #[error("No suitable decoder found for {0}.")]
    UnsupportedFormat(String),

    #[error("Unrecognized EXIF orientation value: {0}")]
    UnrecognizedOrientation(u32),

    #[error("No output format could be resolved: the input format is unknown and neither the parameter nor the sink names one")]
    FormatUndefined,

    #[error("Unsupported output format: {0}")]
    UnsupportedOutputFormat(String),

    #[error("The destination file exists: {0}")]
    DestinationExists(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),
}

pub type Result<T> = std::result::Result<T, ThumbnailError>;
