use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use ascii_media::batch;
use ascii_media::cli::Args;
use ascii_media::config::Config;
use ascii_media::convert::ConvertSettings;
use ascii_media::render::OutputFormat;
use ascii_media::tools;
use ascii_media::video;

/// Format a duration the way the final timing line reports it.
fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    let minutes = (total / 60.0) as u64;
    let seconds = total - (minutes * 60) as f64;
    format!("{} min {:.1} sec", minutes, seconds)
}

/// Resolve effective settings: CLI args > config file > built-in defaults.
fn merged_settings(args: &Args, config: &Config) -> ConvertSettings {
    // Ratio: CLI > config > default (8)
    let ratio = args.ratio.or(config.conversion.ratio).unwrap_or(8);

    // Font size: CLI > config > default (10). The CLI validator already
    // bounds its value; a config value outside 1..=512 is ignored.
    let font_size = match args.font_size.or(config.render.font_size) {
        Some(size) if (1..=512).contains(&size) => size,
        Some(size) => {
            eprintln!(
                "Warning: font_size {} in config is out of range (1-512), using 10",
                size
            );
            10
        }
        None => 10,
    };

    // Format: CLI > config > default (text)
    let format = args
        .format
        .map(OutputFormat::from)
        .or_else(|| {
            config
                .render
                .format
                .as_deref()
                .and_then(OutputFormat::from_name)
        })
        .unwrap_or_default();

    // Output dir: CLI > config > default (out_ascii)
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output.dir.clone())
        .unwrap_or_else(|| PathBuf::from("out_ascii"));

    ConvertSettings {
        ratio,
        font_size,
        format,
        output_dir,
    }
}

fn run(args: &Args, settings: &ConvertSettings) -> Result<(), String> {
    if let Some(ref video_path) = args.video {
        let artifact = video::run(video_path, settings).map_err(|e| e.to_string())?;
        if settings.format == OutputFormat::Png {
            println!("ASCII video successfully generated: {}", artifact.display());
        } else {
            println!("ASCII frames written to '{}'", artifact.display());
        }
        Ok(())
    } else if let Some(ref input_dir) = args.input_dir {
        batch::run(input_dir, settings).map_err(|e| e.to_string())?;
        println!(
            "ASCII image completed. Files stored in '{}'",
            settings.output_dir.display()
        );
        Ok(())
    } else {
        // clap enforces one of the two; kept for completeness
        Err("Specify an image directory or use --video.".to_string())
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    // Load config file
    // If --config is specified, require the file to exist
    // Otherwise, fall back to defaults if default config not found
    let config = if let Some(ref path) = args.config {
        match Config::load(Some(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        match Config::load(None) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Warning: Failed to load config file: {}", e);
                eprintln!("Using default settings.\n");
                Config::default()
            }
        }
    };

    let settings = merged_settings(&args, &config);

    if let Err(e) = tools::setup_ctrlc_handler() {
        eprintln!("Warning: Failed to set up Ctrl+C handler: {}", e);
    }

    let start = Instant::now();
    let result = run(&args, &settings);

    // Always report timing, even after a failure
    println!(
        "\nTotal processing time: {}",
        format_elapsed(start.elapsed())
    );

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ascii_media::config::{ConversionConfig, OutputConfig, RenderConfig};

    // Settings merge tests

    fn sample_config() -> Config {
        Config {
            conversion: ConversionConfig { ratio: Some(2) },
            render: RenderConfig {
                font_size: Some(14),
                format: Some("svg".to_string()),
            },
            output: OutputConfig {
                dir: Some(PathBuf::from("config_out")),
            },
        }
    }

    #[test]
    fn test_merged_settings_built_in_defaults() {
        let args = Args::parse_from(["ascii-media", "photos"]);
        let settings = merged_settings(&args, &Config::default());
        assert_eq!(settings.ratio, 8);
        assert_eq!(settings.font_size, 10);
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.output_dir, PathBuf::from("out_ascii"));
    }

    #[test]
    fn test_merged_settings_config_overrides_defaults() {
        let args = Args::parse_from(["ascii-media", "photos"]);
        let settings = merged_settings(&args, &sample_config());
        assert_eq!(settings.ratio, 2);
        assert_eq!(settings.font_size, 14);
        assert_eq!(settings.format, OutputFormat::Svg);
        assert_eq!(settings.output_dir, PathBuf::from("config_out"));
    }

    #[test]
    fn test_merged_settings_cli_overrides_config() {
        let args = Args::parse_from([
            "ascii-media",
            "photos",
            "-r",
            "4",
            "--font-size",
            "12",
            "--format",
            "png",
            "-o",
            "cli_out",
        ]);
        let settings = merged_settings(&args, &sample_config());
        assert_eq!(settings.ratio, 4);
        assert_eq!(settings.font_size, 12);
        assert_eq!(settings.format, OutputFormat::Png);
        assert_eq!(settings.output_dir, PathBuf::from("cli_out"));
    }

    #[test]
    fn test_merged_settings_ignores_out_of_range_config_font_size() {
        let mut config = sample_config();
        config.render.font_size = Some(4_000_000_000);
        let args = Args::parse_from(["ascii-media", "photos"]);
        let settings = merged_settings(&args, &config);
        assert_eq!(settings.font_size, 10);
    }

    #[test]
    fn test_merged_settings_unknown_config_format_falls_back() {
        let mut config = sample_config();
        config.render.format = Some("bmp".to_string());
        let args = Args::parse_from(["ascii-media", "photos"]);
        let settings = merged_settings(&args, &config);
        assert_eq!(settings.format, OutputFormat::Text);
    }

    // Elapsed time formatting tests

    #[test]
    fn test_format_elapsed_seconds_only() {
        assert_eq!(format_elapsed(Duration::from_millis(3_500)), "0 min 3.5 sec");
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0 min 0.0 sec");
    }

    #[test]
    fn test_format_elapsed_with_minutes() {
        assert_eq!(format_elapsed(Duration::from_secs(60)), "1 min 0.0 sec");
        assert_eq!(format_elapsed(Duration::from_secs(90)), "1 min 30.0 sec");
        assert_eq!(
            format_elapsed(Duration::from_millis(125_300)),
            "2 min 5.3 sec"
        );
    }
}
