// pixie-thumbnail/src/io/mod.rs
mod compressor;
mod sink;
mod source;

pub use compressor::Compressor;
pub use sink::{BufferedImageSink, FileImageSink, ImageSink, OutputStreamImageSink};
pub use source::{BufferedImageSource, FileImageSource, ImageSource, InputStreamImageSource};
