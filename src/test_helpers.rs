// pixie-thumbnail/src/test_helpers.rs
//! Encoded fixtures built in memory so tests need no files on disk.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

fn gradient(width: u32, height: u32) -> DynamicImage {
    let mut img = RgbImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = image::Rgb([(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 128]);
    }
    DynamicImage::ImageRgb8(img)
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    gradient(width, height)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

/// APP1 segment holding a big-endian TIFF with a single IFD0 Orientation entry.
pub fn exif_app1(orientation: u16) -> Vec<u8> {
    app1_from_entries(&[orientation_entry(orientation)])
}

/// Like `exif_app1`, but IFD0 also holds an ImageDescription entry whose
/// value offset points past the end of the TIFF data.
pub fn exif_app1_with_truncated_entry(orientation: u16) -> Vec<u8> {
    let mut description = Vec::new();
    description.extend_from_slice(&0x010Eu16.to_be_bytes());
    description.extend_from_slice(&2u16.to_be_bytes()); // ASCII
    description.extend_from_slice(&100u32.to_be_bytes());
    description.extend_from_slice(&0xFFFFu32.to_be_bytes());

    app1_from_entries(&[description, orientation_entry(orientation)])
}

fn orientation_entry(orientation: u16) -> Vec<u8> {
    let mut entry = Vec::new();
    entry.extend_from_slice(&0x0112u16.to_be_bytes());
    entry.extend_from_slice(&3u16.to_be_bytes()); // SHORT
    entry.extend_from_slice(&1u32.to_be_bytes());
    entry.extend_from_slice(&orientation.to_be_bytes());
    entry.extend_from_slice(&[0, 0]);
    entry
}

fn app1_from_entries(entries: &[Vec<u8>]) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\0\x2a");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    tiff.extend_from_slice(&(entries.len() as u16).to_be_bytes());
    for entry in entries {
        tiff.extend_from_slice(entry);
    }
    tiff.extend_from_slice(&0u32.to_be_bytes());

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    segment.extend_from_slice(&payload);
    segment
}

/// Splices an APP1 segment into a JPEG right after SOI.
pub fn splice_app1(jpeg: &[u8], app1: &[u8]) -> Vec<u8> {
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// JPEG of the given size, with an EXIF orientation tag spliced in after SOI.
pub fn jpeg_with_orientation(width: u32, height: u32, orientation: Option<u16>) -> Vec<u8> {
    let mut jpeg = Vec::new();
    gradient(width, height)
        .write_with_encoder(JpegEncoder::new(&mut jpeg))
        .unwrap();

    match orientation {
        Some(value) => splice_app1(&jpeg, &exif_app1(value)),
        None => jpeg,
    }
}
