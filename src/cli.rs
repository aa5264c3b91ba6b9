use std::io::Write;
use std::path::PathBuf;

use crate::codec::{read_png, write_png};
use crate::error::{DiffError, Result};
use crate::pixelmatch::compare;
use crate::types::{Invocation, MatchOptions, Mode};

pub const USAGE_ARG_COUNT: &str = "ERROR: You must specify just 3 args ('diff cmd img1 img2')";
pub const USAGE_MODE: &str = "ERROR: First argument must be 'pixel' or 'image'";
pub const USAGE_PIXEL: &str = "ERROR: You must specify just 3 args: 'diff pixel img1 img2'";
pub const USAGE_IMAGE: &str = "ERROR: You must specify just 4 args: 'diff image img1 img2 outputFile'";

/// Validates the arguments that follow the program name.
pub fn parse_args(args: &[String]) -> Result<Invocation> {
    if args.len() < 3 {
        return Err(DiffError::Validation(USAGE_ARG_COUNT.to_string()));
    }

    let mode = Mode::from_token(&args[0]).ok_or_else(|| DiffError::Validation(USAGE_MODE.to_string()))?;
    if args.len() != mode.arg_count() {
        let usage = match mode {
            Mode::Pixel => USAGE_PIXEL,
            Mode::Image => USAGE_IMAGE,
        };
        return Err(DiffError::Validation(usage.to_string()));
    }

    let original = PathBuf::from(&args[1]);
    let comparison = PathBuf::from(&args[2]);
    Ok(match mode {
        Mode::Pixel => Invocation::Pixel { original, comparison },
        Mode::Image => Invocation::Image {
            original,
            comparison,
            output: PathBuf::from(&args[3]),
        },
    })
}

/// Decodes both inputs, compares them and emits the result for the mode.
///
/// Pixel mode writes the count to `out`; image mode writes the diff PNG and
/// leaves `out` untouched.
pub fn run<W: Write>(invocation: &Invocation, out: &mut W) -> Result<()> {
    let (original, comparison) = invocation.inputs();
    let img1 = read_png(original)?;
    let img2 = read_png(comparison)?;

    let options = MatchOptions::default();
    if log::log_enabled!(log::Level::Debug) {
        if let Ok(json) = serde_json::to_string(&options) {
            log::debug!("{:?} mode, match options {}", invocation.mode(), json);
        }
    }

    let result = compare(&img1, &img2, &options)?;

    match invocation {
        Invocation::Pixel { .. } => {
            writeln!(out, "{}", result.diff_count).map_err(|source| DiffError::FileAccess {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
        }
        Invocation::Image { output, .. } => write_png(output, &result.diff_image)?,
    }

    Ok(())
}
