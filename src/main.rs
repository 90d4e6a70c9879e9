//! ocr-bridge - single-shot OCR adapter CLI
//!
//! Takes one image path, runs it through an external OCR engine, and prints
//! a normalized JSON result on stdout. Engine-level failures are embedded in
//! the result (exit 0); only a malformed invocation exits non-zero.

mod config;
mod engine;
mod error;
mod logging;
mod pipeline;
mod result;

use std::path::{Path, PathBuf};

use clap::Parser;
use serde_json::json;
use tracing::{error, info, warn};

use crate::config::BridgeConfig;
use crate::pipeline::OutputMode;
use crate::result::RecognitionResult;

/// ocr-bridge - normalize OCR engine output into a stable JSON contract
#[derive(Parser, Debug)]
#[command(name = "ocr-bridge")]
#[command(about = "Recognize text in an image and print a normalized JSON result")]
struct Args {
    /// Path to the image to recognize
    image_path: PathBuf,

    /// Annotation mode: 0 = boxes with labels, 1 = boxes only, anything else = no image
    #[arg(short = 'm', long, default_value_t = 0)]
    output_mode: i32,

    /// Recognition language (overrides the config file)
    #[arg(long)]
    lang: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(long, default_value = "ocr-bridge.toml")]
    config: PathBuf,
}

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    if let Err(err) = logging::init(Path::new(logging::LOG_PATH)) {
        // Logging is observability only; a broken log file must not change
        // the stdout/exit contract.
        eprintln!("warning: failed to initialize logging: {err:#}");
    }

    info!("start main");

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            warn!("wrong arguments: {err}");
            let message = json!({
                "error": "wrong argument count; usage: ocr-bridge <image_path>"
            });
            println!("{message}");
            return 1;
        }
    };

    let mut config = BridgeConfig::load_or_default(&args.config);
    if let Some(lang) = args.lang {
        config.engine.lang = lang;
    }

    // The engine is the one expensive, process-wide resource: built once here
    // and handed to the pipeline by reference.
    let result = match engine::create_engine(&config.engine) {
        Ok(mut engine) => pipeline::recognize(
            engine.as_mut(),
            &args.image_path,
            OutputMode::from(args.output_mode),
        ),
        Err(err) => {
            error!("engine initialization failed: {err:?}");
            RecognitionResult::failure(&err)
        }
    };

    print_result(&result);
    info!("end");
    0
}

fn print_result(result: &RecognitionResult) {
    match serde_json::to_string_pretty(result) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => {
            error!("failed to serialize result: {err}");
            println!("{}", json!({ "error": format!("failed to serialize result: {err}") }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_positional_argument_parses() {
        let args = Args::try_parse_from(["ocr-bridge", "photo.png"]).unwrap();
        assert_eq!(args.image_path, PathBuf::from("photo.png"));
        assert_eq!(args.output_mode, 0);
        assert!(args.lang.is_none());
    }

    #[test]
    fn test_missing_positional_argument_is_rejected() {
        assert!(Args::try_parse_from(["ocr-bridge"]).is_err());
    }

    #[test]
    fn test_extra_positional_arguments_are_rejected() {
        assert!(Args::try_parse_from(["ocr-bridge", "a.png", "b.png"]).is_err());
    }

    #[test]
    fn test_output_mode_flag() {
        let args = Args::try_parse_from(["ocr-bridge", "photo.png", "-m", "2"]).unwrap();
        assert_eq!(args.output_mode, 2);
    }
}
