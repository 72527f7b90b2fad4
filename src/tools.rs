//! External tool invocation for the render and video pipelines.
//!
//! ffmpeg, ffprobe, rsvg-convert and ImageMagick convert run as child
//! processes with stdin closed. Stderr is captured for error reporting,
//! and a Ctrl+C interrupts a long-running child instead of orphaning it.

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Errors that can occur when running an external tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("'{tool}' not found. {hint}")]
    NotFound { tool: String, hint: &'static str },

    #[error("{desc} failed (exit code {exit_code:?})\n{stderr}")]
    Failed {
        desc: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("interrupted")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn install_hint(tool: &str) -> &'static str {
    match tool {
        "ffmpeg" | "ffprobe" => "Install FFmpeg and make sure it is on your PATH.",
        "rsvg-convert" => "Install librsvg and make sure it is on your PATH.",
        "convert" => "Install ImageMagick and make sure it is on your PATH.",
        _ => "Make sure it is installed and on your PATH.",
    }
}

fn spawn_error(tool: &str, e: std::io::Error) -> ToolError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ToolError::NotFound {
            tool: tool.to_string(),
            hint: install_hint(tool),
        }
    } else {
        ToolError::Io(e)
    }
}

/// Run a tool to completion, discarding stdout.
///
/// Stderr is collected on a reader thread and included in the error when
/// the tool exits non-zero. A Ctrl+C while the child runs sends it a
/// SIGINT (unix) and gives it two seconds before a hard kill.
///
/// # Arguments
/// * `tool` - Executable name
/// * `args` - Command-line arguments
/// * `desc` - Human-readable description for error messages
pub fn run(tool: &str, args: &[&str], desc: &str) -> Result<(), ToolError> {
    log::debug!("running: {} {}", tool, args.join(" "));

    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(tool, e))?;

    // Drain stderr on a separate thread so the child never blocks on a
    // full pipe
    let tool_name = tool.to_string();
    let stderr_thread = child.stderr.take().map(|stderr| {
        thread::spawn(move || {
            let reader = BufReader::new(stderr);
            let mut lines = Vec::new();
            for line in reader.lines() {
                match line {
                    Ok(l) => {
                        log::debug!("[{}] {}", tool_name, l);
                        lines.push(l);
                    }
                    Err(_) => break,
                }
            }
            lines
        })
    });

    let wait_result = wait_with_interrupt(&mut child);
    let stderr_lines = stderr_thread
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    let status = wait_result?;

    if status.success() {
        Ok(())
    } else {
        Err(ToolError::Failed {
            desc: desc.to_string(),
            exit_code: status.code(),
            stderr: stderr_lines.join("\n"),
        })
    }
}

/// Run a tool to completion and capture its stdout as text.
///
/// Used for quick probe commands that finish on their own.
pub fn run_capture(tool: &str, args: &[&str], desc: &str) -> Result<String, ToolError> {
    log::debug!("running: {} {}", tool, args.join(" "));

    let output = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| spawn_error(tool, e))?;

    if !output.status.success() {
        return Err(ToolError::Failed {
            desc: desc.to_string(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Poll the child until it exits, honoring Ctrl+C.
fn wait_with_interrupt(child: &mut Child) -> Result<std::process::ExitStatus, ToolError> {
    loop {
        if ctrlc_received() {
            interrupt(child);
            return Err(ToolError::Interrupted);
        }
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => thread::sleep(Duration::from_millis(50)),
            Err(e) => return Err(ToolError::Io(e)),
        }
    }
}

/// Stop a child: SIGINT on unix so it can finalize output, then a grace
/// period before a hard kill.
fn interrupt(child: &mut Child) {
    #[cfg(unix)]
    {
        unsafe {
            libc::kill(child.id() as i32, libc::SIGINT);
        }
    }

    #[cfg(not(unix))]
    {
        let _ = child.kill();
    }

    let start = Instant::now();
    let timeout = Duration::from_secs(2);

    loop {
        match child.try_wait() {
            Ok(Some(_)) => return,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return;
                }
                thread::sleep(Duration::from_millis(50));
            }
            Err(_) => return,
        }
    }
}

/// Global flag for handling Ctrl+C across the application
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Check if Ctrl+C has been received.
pub fn ctrlc_received() -> bool {
    CTRLC_RECEIVED.load(Ordering::SeqCst)
}

/// Set up the Ctrl+C handler.
///
/// This should be called once at program startup.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
        eprintln!("\nReceived Ctrl+C, stopping...");
    })
}
