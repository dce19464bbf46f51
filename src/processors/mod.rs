// pixie-thumbnail/src/processors/mod.rs
mod filters;
mod metadata;
mod resizer;

pub use filters::{apply_filters, Canvas, Flip, ImageFilter, Pipeline, Rotation, Sharpen};
pub use metadata::{read_exif_orientation, Orientation};
pub use resizer::{
    calculate_dimensions, resize_with_parameter, DefaultResizerFactory, FixedResizerFactory,
    ResizeAlgorithm, Resizer, ResizerFactory,
};
