use thiserror::Error;

/// Bad run parameters, detected before any output is written
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("window size must be a positive integer")]
    NonPositiveWindowSize,

    #[error("averaging window must be a positive number of windows")]
    NonPositiveAveragingWindow,

    #[error("contig '{0}' from the previous output is not declared in the variant header")]
    UnknownResumeContig(String),
}

/// Failure to fetch records for an interval. Fatal for the current contig only.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("contig '{0}' not found in the variant index")]
    UnknownContig(String),

    #[error("invalid interval {start}-{end}")]
    InvalidInterval { start: u64, end: u64 },

    #[error(transparent)]
    Backend(#[from] rust_htslib::errors::Error),
}

/// Could not derive a resume position from existing output
#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("failed to read previous output")]
    Io(#[from] std::io::Error),

    #[error("failed to parse previous output")]
    Csv(#[from] csv::Error),

    #[error("malformed last row: {0}")]
    Malformed(String),
}
