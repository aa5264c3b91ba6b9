pub mod cli;
pub mod codec;
pub mod error;
pub mod pixelmatch;
pub mod types;

pub use error::DiffError;
pub use pixelmatch::{compare, pixelmatch, Comparison};
pub use types::{Invocation, MatchOptions, Mode, DEFAULT_THRESHOLD};
