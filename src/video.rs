//! Video conversion through ffmpeg.
//!
//! Extracts every frame of the source video into a scratch directory,
//! converts each frame, and for PNG output re-encodes the rendered
//! frames into a new video carrying the original audio track.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rayon::prelude::*;

use crate::convert::{self, ConvertSettings};
use crate::render::{self, OutputFormat};
use crate::tools::{self, ToolError};

/// Errors that can occur while converting a video.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("video file '{}' not found", .path.display())]
    NotFound { path: PathBuf },

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("no frames were extracted from '{}'", .path.display())]
    NoFrames { path: PathBuf },

    #[error("frame conversion failed: {0}")]
    Frame(String),

    #[error("failed to prepare working directory '{}': {source}", .path.display())]
    Workspace {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read frames from '{}': {source}", .path.display())]
    ReadFrames {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create output directory '{}': {source}", .path.display())]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

// Distinguishes scratch roots when several pipelines run in one process.
static WORKSPACE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Per-run scratch directories under the system temp dir.
///
/// Removed on drop, errors ignored.
struct Workspace {
    root: PathBuf,
}

impl Workspace {
    fn create() -> Result<Self, VideoError> {
        let seq = WORKSPACE_SEQ.fetch_add(1, Ordering::SeqCst);
        let root = std::env::temp_dir().join(format!(
            "ascii-media-{}-{}",
            std::process::id(),
            seq
        ));
        let ws = Workspace { root };
        for dir in [ws.frames_dir(), ws.rendered_dir()] {
            std::fs::create_dir_all(&dir).map_err(|source| VideoError::Workspace {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(ws)
    }

    /// Where extracted source frames land.
    fn frames_dir(&self) -> PathBuf {
        self.root.join("frames")
    }

    /// Where rendered PNG frames land before encoding.
    fn rendered_dir(&self) -> PathBuf {
        self.root.join("rendered")
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Seconds since the epoch, used to give each run a distinct output name.
fn run_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// ffmpeg accepts the probed fraction verbatim; anything that does not
/// look like one falls back to 30 fps.
fn normalize_framerate(raw: &str) -> String {
    let rate = raw.trim();
    if rate.is_empty() || !rate.contains('/') {
        log::warn!("Unexpected framerate {:?} from ffprobe, using 30/1", raw);
        "30/1".to_string()
    } else {
        rate.to_string()
    }
}

/// Ask ffprobe for the source frame rate as a literal fraction string
/// (e.g. `30000/1001`).
fn probe_framerate(video: &Path) -> Result<String, ToolError> {
    let input = video.display().to_string();
    let raw = tools::run_capture(
        "ffprobe",
        &[
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=avg_frame_rate",
            "-of",
            "default=nw=1:nk=1",
            &input,
        ],
        "probing frame rate",
    )?;
    Ok(normalize_framerate(&raw))
}

/// Pull every frame out of the video as JPEG files.
fn extract_frames(video: &Path, frames_dir: &Path) -> Result<(), ToolError> {
    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .to_string();
    let input = video.display().to_string();
    let pattern = frames_dir.join("frame_%09d.jpg").display().to_string();

    tools::run(
        "ffmpeg",
        &[
            "-y", "-i", &input, "-vsync", "vfr", "-q:v", "2", "-threads", &threads, &pattern,
        ],
        "extracting frames",
    )
}

fn list_frames(dir: &Path, extension: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().map(|e| e == extension).unwrap_or(false))
        .collect();
    frames.sort();
    Ok(frames)
}

/// Convert extracted frames into `target_dir`, keeping their numbering.
///
/// Any failure aborts the run: a dropped frame would silently truncate
/// the encoded sequence.
fn convert_frames(
    frames: &[PathBuf],
    ref_size: (u32, u32),
    target_dir: &Path,
    settings: &ConvertSettings,
) -> Result<(), VideoError> {
    let total = frames.len();
    let completed = AtomicUsize::new(0);

    frames.par_iter().try_for_each(|frame| {
        if tools::ctrlc_received() {
            return Err(VideoError::Tool(ToolError::Interrupted));
        }

        let stem = frame
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| VideoError::Frame(format!("invalid frame name '{}'", frame.display())))?;
        let (grid, _) = convert::grid_from_file(frame, settings.ratio)
            .map_err(|e| VideoError::Frame(e.to_string()))?;
        render::render_grid(
            &grid,
            target_dir,
            stem,
            settings.format,
            settings.font_size,
            ref_size,
        )
        .map_err(|e| VideoError::Frame(e.to_string()))?;

        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        if done % 100 == 0 || done == total {
            println!("  {}/{} frames", done, total);
        }
        Ok(())
    })
}

/// Re-encode rendered frames into the final video, mapping the original
/// audio track in when one exists.
fn encode_video(
    video: &Path,
    rendered_dir: &Path,
    framerate: &str,
    output_dir: &Path,
) -> Result<PathBuf, VideoError> {
    std::fs::create_dir_all(output_dir).map_err(|source| VideoError::CreateOutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let stem = video.file_stem().and_then(|s| s.to_str()).unwrap_or("video");
    let ext = video.extension().and_then(|s| s.to_str()).unwrap_or("mp4");
    let final_path = output_dir.join(format!("{}_{}.{}", stem, run_timestamp(), ext));

    let pattern = rendered_dir.join("frame_%09d.png").display().to_string();
    let input = video.display().to_string();
    let out = final_path.display().to_string();

    tools::run(
        "ffmpeg",
        &[
            "-y",
            "-framerate",
            framerate,
            "-i",
            &pattern,
            "-i",
            &input,
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-map",
            "0:v",
            "-map",
            "1:a?",
            "-shortest",
            &out,
        ],
        "encoding final video",
    )?;

    Ok(final_path)
}

/// Convert a whole video.
///
/// With PNG output the rendered frames are re-encoded into a new video
/// with a unique name suffix; text and SVG output leave a frame
/// sequence under the output directory instead.
///
/// # Returns
/// The final artifact path: the encoded video, or the frame sequence
/// directory.
pub fn run(video: &Path, settings: &ConvertSettings) -> Result<PathBuf, VideoError> {
    if !video.is_file() {
        return Err(VideoError::NotFound {
            path: video.to_path_buf(),
        });
    }

    let workspace = Workspace::create()?;
    log::debug!("scratch workspace at {:?}", workspace.root);

    println!("Extracting frames from '{}'", video.display());
    extract_frames(video, &workspace.frames_dir())?;

    let frames = list_frames(&workspace.frames_dir(), "jpg").map_err(|source| {
        VideoError::ReadFrames {
            path: workspace.frames_dir(),
            source,
        }
    })?;
    if frames.is_empty() {
        return Err(VideoError::NoFrames {
            path: video.to_path_buf(),
        });
    }

    // Every rendered frame uses the first frame's dimensions so the
    // encoded sequence is uniform.
    let ref_size = image::image_dimensions(&frames[0]).map_err(|e| {
        VideoError::Frame(format!(
            "failed to read frame '{}': {}",
            frames[0].display(),
            e
        ))
    })?;

    let stem = video.file_stem().and_then(|s| s.to_str()).unwrap_or("video");
    let (target_dir, encode) = match settings.format {
        OutputFormat::Png => (workspace.rendered_dir(), true),
        _ => (settings.output_dir.join(format!("{}_frames", stem)), false),
    };
    std::fs::create_dir_all(&target_dir).map_err(|source| VideoError::CreateOutputDir {
        path: target_dir.clone(),
        source,
    })?;

    println!(
        "Converting {} frames with {} workers",
        frames.len(),
        rayon::current_num_threads()
    );
    convert_frames(&frames, ref_size, &target_dir, settings)?;

    if !encode {
        return Ok(target_dir);
    }

    println!("Proceeding to final video encoding...");
    let framerate = probe_framerate(video)?;
    println!("Detected source framerate: {}", framerate);

    encode_video(video, &workspace.rendered_dir(), &framerate, &settings.output_dir)
}
