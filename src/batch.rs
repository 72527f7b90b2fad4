//! Image-directory conversion.
//!
//! Scans a directory for supported images and converts them in parallel,
//! tolerating per-file failures and reporting a summary at the end.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::convert::{self, ConvertSettings};
use crate::render;
use crate::tools;

/// File extensions accepted as input images (case-insensitive).
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Errors that can occur while converting an image directory.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("input path '{}' is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error(
        "no images with a supported extension (.jpg, .jpeg, .png) found in '{}'",
        .path.display()
    )]
    NoImages { path: PathBuf },

    #[error("failed to read directory '{}': {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create output directory '{}': {source}", .path.display())]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("interrupted")]
    Interrupted,
}

/// Summary of a directory conversion run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of convertible files found in the input directory.
    pub detected: usize,
    /// Files converted and written successfully.
    pub succeeded: usize,
    /// Files that failed, with the reason.
    pub failures: Vec<(PathBuf, String)>,
    /// Files left unprocessed after a Ctrl+C.
    pub skipped: usize,
}

enum Outcome {
    Converted,
    Failed(String),
    Skipped,
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

fn file_name(path: &Path) -> Cow<'_, str> {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default()
}

/// Find the convertible images in a directory, sorted by name.
pub fn scan_images(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|source| BatchError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_image_extension(path))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(BatchError::NoImages {
            path: dir.to_path_buf(),
        });
    }

    Ok(files)
}

fn convert_one(path: &Path, settings: &ConvertSettings) -> Result<PathBuf, String> {
    let (grid, dims) = convert::grid_from_file(path, settings.ratio).map_err(|e| e.to_string())?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| "invalid file name".to_string())?;
    render::render_grid(
        &grid,
        &settings.output_dir,
        stem,
        settings.format,
        settings.font_size,
        dims,
    )
    .map_err(|e| e.to_string())
}

fn print_summary(report: &BatchReport) {
    println!(
        "Completed. Success: {}, Failed: {}",
        report.succeeded,
        report.failures.len()
    );
    if !report.failures.is_empty() {
        println!("First 5 errors:");
        for (path, msg) in report.failures.iter().take(5) {
            println!("  {} -> {}", file_name(path), msg);
        }
    }
    if report.skipped > 0 {
        println!("Interrupted: {} files were not processed.", report.skipped);
    }
}

/// Convert every supported image in `input_dir` into the output
/// directory.
///
/// Files are converted in parallel; a failed file does not abort the
/// batch. A Ctrl+C stops scheduling further files, and the run then
/// reports what finished before returning [`BatchError::Interrupted`].
pub fn run(input_dir: &Path, settings: &ConvertSettings) -> Result<BatchReport, BatchError> {
    let files = scan_images(input_dir)?;

    std::fs::create_dir_all(&settings.output_dir).map_err(|source| {
        BatchError::CreateOutputDir {
            path: settings.output_dir.clone(),
            source,
        }
    })?;

    let total = files.len();
    println!("Input files detected: {}", total);
    println!(
        "Starting conversion with {} workers",
        rayon::current_num_threads()
    );

    let completed = AtomicUsize::new(0);
    let outcomes: Vec<Outcome> = files
        .par_iter()
        .map(|path| {
            if tools::ctrlc_received() {
                return Outcome::Skipped;
            }
            let result = convert_one(path, settings);
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            match result {
                Ok(out_path) => {
                    println!(
                        "[{}/{}] {} -> {}",
                        done,
                        total,
                        file_name(path),
                        file_name(&out_path)
                    );
                    Outcome::Converted
                }
                Err(msg) => {
                    eprintln!("[{}/{}] {}: {}", done, total, file_name(path), msg);
                    Outcome::Failed(msg)
                }
            }
        })
        .collect();

    let mut report = BatchReport {
        detected: total,
        ..Default::default()
    };
    for (path, outcome) in files.iter().zip(outcomes) {
        match outcome {
            Outcome::Converted => report.succeeded += 1,
            Outcome::Failed(msg) => report.failures.push((path.clone(), msg)),
            Outcome::Skipped => report.skipped += 1,
        }
    }

    print_summary(&report);

    if report.skipped > 0 {
        return Err(BatchError::Interrupted);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_image_extension() {
        assert!(has_image_extension(Path::new("photo.jpg")));
        assert!(has_image_extension(Path::new("photo.JPG")));
        assert!(has_image_extension(Path::new("photo.jpeg")));
        assert!(has_image_extension(Path::new("photo.png")));
        assert!(has_image_extension(Path::new("photo.PNG")));
        assert!(!has_image_extension(Path::new("notes.txt")));
        assert!(!has_image_extension(Path::new("archive.tar.gz")));
        assert!(!has_image_extension(Path::new("no_extension")));
    }

    #[test]
    fn test_scan_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.png"), b"x").unwrap();
        std::fs::write(dir.path().join("a.JPG"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let files = scan_images(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file_name().unwrap(), "a.JPG");
        assert_eq!(files[1].file_name().unwrap(), "b.png");
    }

    #[test]
    fn test_scan_images_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_images(dir.path()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("no images"));
        assert!(msg.contains(".jpg, .jpeg, .png"));
    }

    #[test]
    fn test_scan_images_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.png");
        std::fs::write(&file, b"x").unwrap();

        let err = scan_images(&file).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_report_default_is_empty() {
        let report = BatchReport::default();
        assert_eq!(report.detected, 0);
        assert_eq!(report.succeeded, 0);
        assert!(report.failures.is_empty());
        assert_eq!(report.skipped, 0);
    }
}
