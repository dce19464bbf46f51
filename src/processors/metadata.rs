// pixie-thumbnail/src/processors/metadata.rs
//! EXIF orientation lookup and correction.
//!
//! The EXIF `Orientation` tag (0x0112) names which corner of the stored
//! pixel grid is the visual top-left. Each value maps to a rotation followed
//! by an optional horizontal flip that brings the image upright:
//!
//! | Tag | Variant | Rotation | Flip |
//! |---|---|---|---|
//! | 1 | `TopLeft` | 0° | no |
//! | 2 | `TopRight` | 0° | yes |
//! | 3 | `BottomRight` | 180° | no |
//! | 4 | `BottomLeft` | 180° | yes |
//! | 5 | `LeftTop` | 90° | yes |
//! | 6 | `RightTop` | 90° | no |
//! | 7 | `RightBottom` | 270° | yes |
//! | 8 | `LeftBottom` | 270° | no |

use super::ImageFilter;
use crate::core::{Result, ThumbnailError};
use exif::{In, Reader, Tag};
use image::DynamicImage;
use std::io::{BufRead, Seek};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    LeftTop,
    RightTop,
    RightBottom,
    LeftBottom,
}

impl Orientation {
    pub fn from_exif_value(value: u32) -> Result<Self> {
        match value {
            1 => Ok(Orientation::TopLeft),
            2 => Ok(Orientation::TopRight),
            3 => Ok(Orientation::BottomRight),
            4 => Ok(Orientation::BottomLeft),
            5 => Ok(Orientation::LeftTop),
            6 => Ok(Orientation::RightTop),
            7 => Ok(Orientation::RightBottom),
            8 => Ok(Orientation::LeftBottom),
            other => Err(ThumbnailError::UnrecognizedOrientation(other)),
        }
    }

    pub fn exif_value(self) -> u32 {
        match self {
            Orientation::TopLeft => 1,
            Orientation::TopRight => 2,
            Orientation::BottomRight => 3,
            Orientation::BottomLeft => 4,
            Orientation::LeftTop => 5,
            Orientation::RightTop => 6,
            Orientation::RightBottom => 7,
            Orientation::LeftBottom => 8,
        }
    }

    /// Clockwise rotation applied before the optional flip.
    pub fn rotation_degrees(self) -> u32 {
        match self {
            Orientation::TopLeft | Orientation::TopRight => 0,
            Orientation::BottomRight | Orientation::BottomLeft => 180,
            Orientation::LeftTop | Orientation::RightTop => 90,
            Orientation::RightBottom | Orientation::LeftBottom => 270,
        }
    }

    pub fn is_flipped(self) -> bool {
        matches!(
            self,
            Orientation::TopRight
                | Orientation::BottomLeft
                | Orientation::LeftTop
                | Orientation::RightBottom
        )
    }

    /// Whether the upright image has width and height swapped.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self.rotation_degrees(), 90 | 270)
    }
}

impl ImageFilter for Orientation {
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        let rotated = match self.rotation_degrees() {
            90 => image.rotate90(),
            180 => image.rotate180(),
            270 => image.rotate270(),
            _ => image,
        };

        if self.is_flipped() {
            rotated.fliph()
        } else {
            rotated
        }
    }
}

/// Read the orientation of one image in an EXIF-bearing container.
///
/// Missing or unreadable metadata, and a missing tag, yield `Ok(None)`.
/// Malformed entries are skipped with a warning; the remaining fields are
/// still consulted.
/// A tag outside 1..=8 is an error. The reader is left wherever EXIF
/// parsing stopped; callers rewind it before decoding.
pub fn read_exif_orientation<R: BufRead + Seek>(
    reader: &mut R,
    image_index: u16,
) -> Result<Option<Orientation>> {
    let mut exif_reader = Reader::new();
    exif_reader.continue_on_error(true);

    let parsed = exif_reader.read_from_container(reader).or_else(|e| {
        e.distill_partial_result(|errors| {
            errors
                .iter()
                .for_each(|e| log::warn!("Skipping malformed EXIF entry: {}", e));
        })
    });
    let exif = match parsed {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => {
            log::debug!("No EXIF data found");
            return Ok(None);
        }
        Err(e) => {
            log::debug!("Ignoring unreadable EXIF data: {}", e);
            return Ok(None);
        }
    };

    let value = match exif
        .get_field(Tag::Orientation, In(image_index))
        .and_then(|field| field.value.get_uint(0))
    {
        Some(value) => value,
        None => return Ok(None),
    };

    let orientation = Orientation::from_exif_value(value)?;
    log::debug!("EXIF orientation {} ({:?})", value, orientation);
    Ok(Some(orientation))
}
