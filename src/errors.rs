use thiserror::Error;

/// Error taxonomy for a patch invocation.
///
/// Everything except [`PatchError::Io`] and [`PatchError::VerificationFailed`]
/// is raised before any store write, so a failed patch leaves the document
/// untouched.
#[derive(Error, Debug)]
pub enum PatchError {
    #[error("pattern not found; try enlarging 'window' or refining anchors")]
    PatternNotFound,

    #[error("pattern ambiguous; anchors match {count} locations, expected exactly 1")]
    PatternAmbiguous { count: usize },

    #[error("no change detected (old_snippet already equals new_snippet)")]
    NoChangeDetected,

    #[error("window must be greater than zero")]
    InvalidWindow,

    #[error("invalid region: [{start}, {end}) in text of length {len}")]
    InvalidRegion {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("patch verification failed: {detail}")]
    VerificationFailed { detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
