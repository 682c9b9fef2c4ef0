//! Error taxonomy for spectrum construction and the SED pipeline.

use thiserror::Error;

/// Errors raised while building or transforming spectra.
///
/// None of these are recovered inside the pipeline: a failing stage aborts
/// the whole calculation and the error is handed back to the caller.
#[derive(Debug, Error)]
pub enum SedError {
    /// A physical or geometric precondition on wavelength coverage failed
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// A tabulated resource could not be parsed
    #[error("Malformed data in {resource} at line {line}: {reason}")]
    MalformedData {
        resource: String,
        line: usize,
        reason: String,
    },

    /// A referenced data file or resource does not exist
    #[error("Missing resource: {0}")]
    MissingResource(String),

    /// An unrecognized spectral band tag
    #[error("Unsupported spectral band: {0}")]
    UnsupportedBand(String),

    /// A scalar parameter outside its physical domain
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The resource exists but could not be read
    #[error("I/O error reading {resource}: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },
}

impl SedError {
    pub(crate) fn malformed(resource: &str, line: usize, reason: impl Into<String>) -> Self {
        SedError::MalformedData {
            resource: resource.to_string(),
            line,
            reason: reason.into(),
        }
    }
}
