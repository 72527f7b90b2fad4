//! End-to-end tests for directory batch conversion.
//!
//! These tests cover:
//! - Converting a folder of images into the output directory
//! - Per-file failure reporting without aborting the batch
//! - Input validation errors

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use tempfile::TempDir;

use ascii_media::batch::{self, BatchError};
use ascii_media::convert::ConvertSettings;
use ascii_media::render::OutputFormat;

/// Test helper: write a solid-color image to disk and return its path.
fn write_image(dir: &Path, name: &str, width: u32, height: u32, pixel: [u8; 3]) -> PathBuf {
    let img = RgbImage::from_pixel(width, height, Rgb(pixel));
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

fn settings(output_dir: &Path, format: OutputFormat) -> ConvertSettings {
    ConvertSettings {
        ratio: 8,
        font_size: 10,
        format,
        output_dir: output_dir.to_path_buf(),
    }
}

// ==================== Conversion Tests ====================

#[test]
fn test_batch_converts_all_images() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_image(input.path(), "a.png", 16, 16, [0, 0, 0]);
    write_image(input.path(), "b.jpg", 32, 32, [128, 128, 128]);
    write_image(input.path(), "c.png", 24, 24, [255, 255, 255]);

    let report = batch::run(input.path(), &settings(output.path(), OutputFormat::Text)).unwrap();
    assert_eq!(report.detected, 3);
    assert_eq!(report.succeeded, 3);
    assert!(report.failures.is_empty());
    assert_eq!(report.skipped, 0);

    assert!(output.path().join("a.txt").is_file());
    assert!(output.path().join("b.txt").is_file());
    assert!(output.path().join("c.txt").is_file());
}

#[test]
fn test_batch_svg_output() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_image(input.path(), "frame.png", 16, 16, [200, 200, 200]);

    batch::run(input.path(), &settings(output.path(), OutputFormat::Svg)).unwrap();

    let svg = std::fs::read_to_string(output.path().join("frame.svg")).unwrap();
    assert!(svg.starts_with("<?xml"));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn test_batch_creates_output_dir() {
    let input = TempDir::new().unwrap();
    let output_root = TempDir::new().unwrap();
    let output = output_root.path().join("nested").join("out_ascii");
    write_image(input.path(), "a.png", 16, 16, [90, 90, 90]);

    batch::run(input.path(), &settings(&output, OutputFormat::Text)).unwrap();
    assert!(output.join("a.txt").is_file());
}

#[test]
fn test_batch_ignores_other_extensions() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_image(input.path(), "photo.JPG", 16, 16, [10, 10, 10]);
    std::fs::write(input.path().join("notes.txt"), "not an image").unwrap();
    std::fs::write(input.path().join("clip.gif"), "not supported").unwrap();

    let report = batch::run(input.path(), &settings(output.path(), OutputFormat::Text)).unwrap();
    assert_eq!(report.detected, 1);
    assert_eq!(report.succeeded, 1);
}

// ==================== Failure Reporting Tests ====================

#[test]
fn test_batch_reports_failures_without_aborting() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_image(input.path(), "good1.png", 16, 16, [50, 50, 50]);
    write_image(input.path(), "good2.png", 16, 16, [60, 60, 60]);
    std::fs::write(input.path().join("broken.png"), b"garbage").unwrap();

    let report = batch::run(input.path(), &settings(output.path(), OutputFormat::Text)).unwrap();
    assert_eq!(report.detected, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failures.len(), 1);

    let (failed_path, message) = &report.failures[0];
    assert!(failed_path.ends_with("broken.png"));
    assert!(message.contains("failed to read image"));

    // The good files still produced output
    assert!(output.path().join("good1.txt").is_file());
    assert!(output.path().join("good2.txt").is_file());
}

// ==================== Input Validation Tests ====================

#[test]
fn test_batch_empty_directory() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let err = batch::run(input.path(), &settings(output.path(), OutputFormat::Text)).unwrap_err();
    match err {
        BatchError::NoImages { .. } => {
            assert!(err.to_string().contains(".jpg, .jpeg, .png"));
        }
        other => panic!("Expected NoImages, got {:?}", other),
    }
}

#[test]
fn test_batch_rejects_file_input() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("single.png");
    std::fs::write(&file, b"x").unwrap();
    let output = TempDir::new().unwrap();

    let err = batch::run(&file, &settings(output.path(), OutputFormat::Text)).unwrap_err();
    assert!(matches!(err, BatchError::NotADirectory { .. }));
    assert!(err.to_string().contains("single.png"));
}
