use std::io;
use std::path::PathBuf;

/// Logs `$err` at `$level`, or returns it when `$level` is at or above the
/// configured `fail_level` of `$state`.
#[macro_export]
macro_rules! log_or_err {
    ($state:expr, $level:expr, $err:expr $(,)?) => {{
        if $level <= $state.fail_level {
            return Err($err.into());
        } else {
            match $level {
                ::log::Level::Error => ::log::error!("{}", $err),
                ::log::Level::Warn => ::log::warn!("{}", $err),
                ::log::Level::Info => ::log::info!("{}", $err),
                ::log::Level::Debug => ::log::debug!("{}", $err),
                ::log::Level::Trace => ::log::trace!("{}", $err),
            }
        }
    }};
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("Record range must satisfy start < end <= {len}. Got {start:#X}..{end:#X}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("Record name must not be empty")]
    EmptyName,
}

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("Export range {start:#X}..{end:#X} is empty")]
    EmptyRange { start: usize, end: usize },

    #[error("Cannot open source {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("Cannot seek source to {offset:#X}: {source}")]
    Seek { offset: usize, source: io::Error },

    #[error("Cannot read source {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Source ended early: wanted {expected} bytes from {offset:#X}, got {actual}")]
    ShortRead {
        offset: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot create output {path}: {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("Cannot write output {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    #[error("Cannot read input {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("No end boundary found for marker at {0:#X}")]
    BoundaryNotFound(usize),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}
