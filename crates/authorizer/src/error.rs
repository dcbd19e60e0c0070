use thiserror::Error;

/// A per-line classification failure.
///
/// These are always recoverable: the offending line is logged and skipped, and processing
/// continues with the next line. None of these variants should ever reach `main`.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The line was not valid JSON at all.
    #[error("parsing-failure: {0}")]
    Parsing(#[from] serde_json::Error),
    /// The line was valid JSON but didn't match the shape of a known event.
    #[error("decoding-failure: {0}")]
    Decoding(String),
    /// The line was valid JSON but contained neither an `account` nor a `transaction` key.
    #[error("unrecognized-event")]
    Unrecognized,
}

impl ClassifyError {
    /// The stable tag reported in structured logs for this failure.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Parsing(_) => "parsing-failure",
            Self::Decoding(_) => "decoding-failure",
            Self::Unrecognized => "unrecognized-event",
        }
    }
}

/// A fatal, process-level failure.
///
/// Unlike [`ClassifyError`], this propagates out of the pipeline and becomes a non-zero exit
/// code.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Reading from stdin or writing a snapshot to stdout failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
