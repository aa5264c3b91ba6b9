use std::path::{Path, PathBuf};

/// Sensitivity used by the command line. Not configurable at runtime.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Mode {
    Pixel,
    Image,
}

impl Mode {
    /// Matches the literal, case-sensitive mode token.
    pub fn from_token(token: &str) -> Option<Mode> {
        match token {
            "pixel" => Some(Mode::Pixel),
            "image" => Some(Mode::Image),
            _ => None,
        }
    }

    /// Number of positional arguments this mode expects, mode token included.
    pub fn arg_count(&self) -> usize {
        match self {
            Mode::Pixel => 3,
            Mode::Image => 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    Pixel {
        original: PathBuf,
        comparison: PathBuf,
    },
    Image {
        original: PathBuf,
        comparison: PathBuf,
        output: PathBuf,
    },
}

impl Invocation {
    pub fn mode(&self) -> Mode {
        match self {
            Invocation::Pixel { .. } => Mode::Pixel,
            Invocation::Image { .. } => Mode::Image,
        }
    }

    pub fn inputs(&self) -> (&Path, &Path) {
        match self {
            Invocation::Pixel { original, comparison }
            | Invocation::Image { original, comparison, .. } => (original.as_path(), comparison.as_path()),
        }
    }
}

/// Tuning knobs of the pixel matcher.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MatchOptions {
    /// Matching threshold in 0..1; smaller is more sensitive.
    pub threshold: f64,
    /// Count anti-aliased pixels as differences instead of ignoring them.
    pub include_aa: bool,
    /// Opacity of the faded original drawn under the diff.
    pub alpha: f64,
    pub aa_color: [u8; 3],
    pub diff_color: [u8; 3],
    /// Used for differences where the second image is darker, if set.
    pub diff_color_alt: Option<[u8; 3]>,
    /// Leave unchanged pixels transparent instead of drawing the faded original.
    pub diff_mask: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            include_aa: false,
            alpha: 0.1,
            aa_color: [255, 255, 0],
            diff_color: [255, 0, 0],
            diff_color_alt: None,
            diff_mask: false,
        }
    }
}
