use std::fs;
use std::path::PathBuf;

use svg2png::shell::{convert_file, user_message, CONVERSION_FAILED_MESSAGE, WRONG_TYPE_MESSAGE};
use svg2png::{Error, RasterConfig, Rasterizer};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("svg2png-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn rasterizer() -> Rasterizer {
    Rasterizer::new(RasterConfig {
        load_system_fonts: false,
        ..Default::default()
    })
    .expect("create rasterizer")
}

#[tokio::test]
async fn converts_file_next_to_input() {
    let dir = scratch_dir("next-to-input");
    let input = dir.join("square.svg");
    fs::copy("tests/fixtures/red_square.svg", &input).unwrap();

    let (path, result) = convert_file(&rasterizer(), &input, None).await.expect("convert");
    assert_eq!(path, dir.join("square.png"));
    assert_eq!(fs::read(&path).unwrap(), result.payload);
    assert_eq!((result.width, result.height), (200, 200));

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn converts_into_output_dir() {
    let dir = scratch_dir("output-dir");
    let out = dir.join("out");
    fs::create_dir_all(&out).unwrap();

    let (path, _) = convert_file(
        &rasterizer(),
        std::path::Path::new("tests/fixtures/badge.svg"),
        Some(&out),
    )
    .await
    .expect("convert");
    assert_eq!(path, out.join("badge.png"));
    assert!(path.exists());

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn non_svg_file_is_rejected() {
    let dir = scratch_dir("wrong-type");
    let input = dir.join("photo.png");
    fs::write(&input, b"\x89PNG\r\n\x1a\n").unwrap();

    let err = convert_file(&rasterizer(), &input, None).await.unwrap_err();
    assert!(matches!(err, Error::InputTypeError(_)));
    assert_eq!(user_message(&err), WRONG_TYPE_MESSAGE);
    assert!(!dir.join("photo.png.png").exists());

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn wrong_extension_rejected_before_reading() {
    // The file does not exist: a read would surface as an IoError instead
    let err = convert_file(&rasterizer(), std::path::Path::new("tests/fixtures/missing.png"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InputTypeError(_)));
}

#[tokio::test]
async fn broken_svg_reports_generic_message() {
    let dir = scratch_dir("broken");
    let input = dir.join("broken.svg");
    fs::write(&input, "<svg").unwrap();

    let err = convert_file(&rasterizer(), &input, None).await.unwrap_err();
    assert!(matches!(err, Error::DecodeError(_)));
    assert_eq!(user_message(&err), CONVERSION_FAILED_MESSAGE);
    assert!(!dir.join("broken.png").exists());

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let err = convert_file(&rasterizer(), std::path::Path::new("tests/fixtures/nope.svg"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::IoError(_)));
}
