//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing and value validators.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::render::OutputFormat;

/// Banner shown at the top of --help output.
pub const BANNER: &str = r#"
::::: ###::::: ######::: ######:: ######: ######::::
:::: ## ##::: ##... ##: ##... ##::: ##::::: ##::::::
::: ##:. ##:: ##:::..:: ##:::..:::: ##::::: ##::::::
:: ##:::. ##:. ######:: ##::::::::: ##::::: ##::::::
:: #########::..... ##: ##::::::::: ##::::: ##::::::
:: ##.... ##: ##::: ##: ##::: ##::: ##::::: ##::::::
:: ##:::: ##:. ######::. ######:: ######: ######::::
:::..::::..::::.....:::::.....::::.....:::.....:::::
: ##:::::##: ########: ########:: ######:::: ###::::
: ###:::###: ##.....:: ##.... ##::  ##::::: ## ##:::
: ####:####: ##::::::: ##:::: ##::: ##:::: ##:. ##::
: ## ### ##: ######::: ##:::: ##::: ##::: ##:::. ##:
: ##. #: ##: ##...:::: ##:::: ##::: ##::: #########:
: ##:.:: ##: ##::::::: ##:::: ##::: ##::: ##.... ##:
: ##:::: ##: ########: ########:: ######: ##:::: ##:
::..::::..:::.......:::.......::::.....:::..::::..::
"#;

// ==================== CLI Enums ====================

/// Output format for converted frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Svg,
    Png,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Svg => OutputFormat::Svg,
            Format::Png => OutputFormat::Png,
        }
    }
}

// ==================== Value Validators ====================

fn parse_ratio(value: &str) -> Result<u32, String> {
    let ratio: u32 = value
        .parse()
        .map_err(|_| format!("'{}' is not a valid ratio", value))?;
    if ratio < 1 {
        return Err(format!("Ratio must be at least 1, got {}", ratio));
    }
    Ok(ratio)
}

fn parse_font_size(value: &str) -> Result<u32, String> {
    let size: u32 = value
        .parse()
        .map_err(|_| format!("'{}' is not a valid font size", value))?;
    if !(1..=512).contains(&size) {
        return Err(format!(
            "Font size must be between 1 and 512, got {}",
            size
        ));
    }
    Ok(size)
}

// ==================== CLI Arguments ====================

/// Transform images or videos into ASCII art
#[derive(Parser, Debug)]
#[command(name = "ascii-media")]
#[command(version, about = "Transform images or videos into ASCII art", long_about = None)]
#[command(before_help = BANNER)]
#[command(after_help = "EXAMPLES:
    # Convert a folder of images to text grids
    ascii-media photos/

    # Finer detail, SVG output into a custom directory
    ascii-media photos/ -r 4 --format svg -o renders

    # Turn a video into an ASCII video (PNG frames re-encoded)
    ascii-media --video clip.mp4 --format png")]
pub struct Args {
    /// Path to folder with source images (.jpg, .png). Required if --video is not used
    #[arg(
        value_name = "INPUT_DIR",
        required_unless_present = "video",
        conflicts_with = "video"
    )]
    pub input_dir: Option<PathBuf>,

    /// Path to a video file to convert into ASCII art
    #[arg(short, long)]
    pub video: Option<PathBuf>,

    /// ASCII resolution ratio, lower means finer detail (default: 8)
    #[arg(short, long, value_parser = parse_ratio)]
    pub ratio: Option<u32>,

    /// Output directory for ASCII files (default: out_ascii)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output format (default: text)
    #[arg(short, long)]
    pub format: Option<Format>,

    /// Font size in pixels for SVG and PNG rendering (default: 10)
    #[arg(long, value_parser = parse_font_size)]
    pub font_size: Option<u32>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}
