use assert_fs::prelude::*;
use assert_fs::TempDir;
use pixie_thumbnail::{
    create_thumbnail, BufferedImageSink, BufferedImageSource, DefaultResizerFactory,
    FileThumbnailTask, FixedResizerFactory, ImageSink, OutputFormat, ResizeAlgorithm,
    SourceSinkThumbnailTask, StreamThumbnailTask, ThumbnailError, ThumbnailParameter,
    ThumbnailTask,
};
use rayon::prelude::*;
use std::io::Cursor;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn default_param() -> ThumbnailParameter {
    ThumbnailParameter::builder()
        .size(100, 100)
        .keep_aspect_ratio(true)
        .output_format(ThumbnailParameter::ORIGINAL_FORMAT)
        .resizer_factory(FixedResizerFactory::new(ResizeAlgorithm::ProgressiveBilinear))
        .fit_within_dimensions(true)
        .use_exif_orientation(false)
        .build()
        .unwrap()
}

fn white_jpeg(temp_dir: &TempDir, name: &str) -> assert_fs::fixture::ChildPath {
    let child = temp_dir.child(name);
    let img = image::RgbImage::from_pixel(200, 200, image::Rgb([255, 255, 255]));
    img.save(child.path()).unwrap();
    child
}

#[test]
fn test_read_returns_decoded_image() {
    init_logging();
    let temp_dir = TempDir::new().unwrap();
    let source = white_jpeg(&temp_dir, "source.jpg");
    let destination = temp_dir.child("destination.jpg");

    let mut task = FileThumbnailTask::from_paths(default_param(), source.path(), destination.path());
    let image = task.read().unwrap();

    assert_eq!(image.width(), 200);
    assert_eq!(image.height(), 200);
}

#[test]
fn test_write_saves_image_in_original_format() -> anyhow::Result<()> {
    init_logging();
    let temp_dir = TempDir::new()?;
    let source = white_jpeg(&temp_dir, "source.jpg");
    // Extension says png, but the parameter asks for the original format.
    let destination = temp_dir.child("destination.png");

    let mut task = FileThumbnailTask::from_paths(default_param(), source.path(), destination.path());
    let image = task.read()?;
    task.write(image)?;

    let bytes = std::fs::read(destination.path())?;
    assert_eq!(image::guess_format(&bytes)?, image::ImageFormat::Jpeg);
    Ok(())
}

#[test]
fn test_accessors_return_bound_values() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.child("source.jpg");
    let destination = temp_dir.child("destination.jpg");
    let param = default_param();

    let task = FileThumbnailTask::from_paths(param.clone(), source.path(), destination.path());

    assert_eq!(task.param(), &param);
    assert_eq!(task.param(), task.param());
    assert_eq!(task.source(), source.path());
    assert_eq!(task.destination(), destination.path());
}

#[test]
fn test_missing_file_is_origin_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.child("doesNotExist.jpg");

    let mut task =
        FileThumbnailTask::from_paths(default_param(), missing.path(), temp_dir.child("out.jpg").path());
    let error = task.read().unwrap_err();

    assert!(matches!(error, ThumbnailError::OriginNotFound(_)));
    assert_eq!(
        error.to_string(),
        format!("Could not find file: {}", missing.path().display())
    );
}

#[test]
fn test_unrecognized_content_is_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let document = temp_dir.child("LabL.pdf");
    document.write_str("%PDF-1.4\nnot an image\n").unwrap();

    let mut task =
        FileThumbnailTask::from_paths(default_param(), document.path(), temp_dir.child("out.jpg").path());
    let error = task.read().unwrap_err();

    assert!(matches!(error, ThumbnailError::UnsupportedFormat(_)));
    assert_eq!(
        error.to_string(),
        format!("No suitable decoder found for {}.", document.path().display())
    );
}

#[test]
fn test_create_thumbnail_from_file() -> anyhow::Result<()> {
    init_logging();
    let temp_dir = TempDir::new()?;
    let source = temp_dir.child("wide.png");
    image::RgbImage::new(400, 200).save(source.path())?;
    let destination = temp_dir.child("thumbs/wide.jpg");

    let param = ThumbnailParameter::builder()
        .size(100, 100)
        .output_format(ThumbnailParameter::DETERMINE_FORMAT)
        .output_quality(0.8)
        .resizer_factory(DefaultResizerFactory)
        .build()?;
    let mut task = FileThumbnailTask::from_paths(param, source.path(), destination.path());
    create_thumbnail(&mut task)?;

    let written = image::open(destination.path())?;
    assert_eq!((written.width(), written.height()), (100, 50));
    let bytes = std::fs::read(destination.path())?;
    assert_eq!(image::guess_format(&bytes)?, image::ImageFormat::Jpeg);
    Ok(())
}

#[test]
fn test_stream_task_round_trip() -> anyhow::Result<()> {
    let mut png = Cursor::new(Vec::new());
    image::DynamicImage::new_rgb8(300, 150).write_to(&mut png, image::ImageFormat::Png)?;

    let param = ThumbnailParameter::builder()
        .size(60, 60)
        .output_format(ThumbnailParameter::DETERMINE_FORMAT)
        .resizer_factory(FixedResizerFactory::new(ResizeAlgorithm::Lanczos3))
        .build()?;
    let mut task = StreamThumbnailTask::from_streams(param, Cursor::new(png.into_inner()), Vec::new());
    create_thumbnail(&mut task)?;

    // Stream sinks have no preference, so the input format is kept.
    let (_, sink) = task.into_parts();
    let bytes = sink.into_inner();
    assert_eq!(image::guess_format(&bytes)?, image::ImageFormat::Png);
    let thumbnail = image::load_from_memory(&bytes)?;
    assert_eq!((thumbnail.width(), thumbnail.height()), (60, 30));
    Ok(())
}

#[test]
fn test_stream_task_with_empty_input_is_unsupported() {
    let mut task = StreamThumbnailTask::from_streams(default_param(), Cursor::new(Vec::new()), Vec::new());
    assert!(matches!(task.read(), Err(ThumbnailError::UnsupportedFormat(_))));
}

#[test]
fn test_in_memory_task_with_explicit_format() {
    let param = ThumbnailParameter::builder()
        .scale(0.5, 0.5)
        .output_format(OutputFormat::named("webp"))
        .resizer_factory(DefaultResizerFactory)
        .build()
        .unwrap();
    let source = BufferedImageSource::new(image::DynamicImage::new_rgba8(80, 40));
    let mut task = SourceSinkThumbnailTask::new(param, source, BufferedImageSink::new());

    create_thumbnail(&mut task).unwrap();

    let sink = task.image_sink();
    assert_eq!(sink.output_format_name(), Some("webp"));
    let thumbnail = sink.image().unwrap();
    assert_eq!((thumbnail.width(), thumbnail.height()), (40, 20));
    assert!(sink.sink().is_some());
}

#[test]
fn test_independent_tasks_in_parallel() {
    init_logging();
    let temp_dir = TempDir::new().unwrap();
    let jobs: Vec<_> = (0..8)
        .map(|i| {
            let source = white_jpeg(&temp_dir, &format!("source-{}.jpg", i));
            let destination = temp_dir.child(format!("thumb-{}.png", i));
            (source.path().to_path_buf(), destination.path().to_path_buf())
        })
        .collect();

    let param = ThumbnailParameter::builder()
        .size(50, 50)
        .output_format(ThumbnailParameter::DETERMINE_FORMAT)
        .resizer_factory(DefaultResizerFactory)
        .build()
        .unwrap();

    let results: Vec<_> = jobs
        .par_iter()
        .map(|(source, destination)| {
            let mut task = FileThumbnailTask::from_paths(param.clone(), source, destination);
            create_thumbnail(&mut task)
        })
        .collect();

    assert!(results.iter().all(|r| r.is_ok()));
    for (_, destination) in &jobs {
        let written = image::open(destination).unwrap();
        assert_eq!((written.width(), written.height()), (50, 50));
    }
}
