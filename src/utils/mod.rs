// pixie-thumbnail/src/utils/mod.rs
use image::ImageFormat;
use std::path::Path;

/// Canonical lowercase name for a decoded format, as reported by sources.
pub fn format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::Gif => "gif",
        ImageFormat::WebP => "webp",
        ImageFormat::Pnm => "pnm",
        ImageFormat::Tiff => "tiff",
        ImageFormat::Tga => "tga",
        ImageFormat::Dds => "dds",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Ico => "ico",
        ImageFormat::Hdr => "hdr",
        ImageFormat::OpenExr => "openexr",
        ImageFormat::Farbfeld => "farbfeld",
        ImageFormat::Avif => "avif",
        ImageFormat::Qoi => "qoi",
        _ => "unknown",
    }
    .to_string()
}

/// Format for a name or file extension, case-insensitive (`"JPG"`, `"jpeg"`, `"png"`).
pub fn parse_format_name(name: &str) -> Option<ImageFormat> {
    match name.to_lowercase().as_str() {
        "openexr" => Some(ImageFormat::OpenExr),
        "farbfeld" => Some(ImageFormat::Farbfeld),
        other => ImageFormat::from_extension(other),
    }
}

pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
}
