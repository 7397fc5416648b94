//! Round-trip verification of generated diffs.
//!
//! This module re-parses the unified diff the engine just produced, strictly
//! re-applies it to the original text, and demands the result be
//! byte-identical to the patched text. A failure signals a bug in diff
//! generation, not in the caller's input, and is surfaced loudly as
//! [`PatchError::VerificationFailed`].
//!
//! The whole module sits behind the `verify` cargo feature; without it the
//! engine reports [`Verification::Skipped`](crate::engine::Verification) and
//! carries on.

pub mod applier;
pub mod parser;

use crate::engine::Verifier;
use crate::errors::PatchError;
use thiserror::Error;

pub use applier::apply;
pub use parser::{parse, Hunk, HunkLine, LineKind};

#[derive(Error, Debug)]
pub enum UdiffError {
    #[error("malformed hunk header: {0:?}")]
    MalformedHunkHeader(String),

    #[error("unrecognized diff line: {0:?}")]
    UnrecognizedLine(String),

    #[error("stray 'no newline' marker")]
    StrayNewlineMarker,

    #[error("hunk does not apply at line {line}: expected {expected:?}, found {found:?}")]
    HunkMismatch {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("hunk extends past end of file")]
    PastEndOfFile,

    #[error("hunks out of order or overlapping")]
    OutOfOrder,

    #[error("re-applied diff does not reproduce the patched text")]
    Mismatch,
}

impl From<UdiffError> for PatchError {
    fn from(err: UdiffError) -> Self {
        PatchError::VerificationFailed {
            detail: err.to_string(),
        }
    }
}

/// Built-in verifier: parse the unified diff and re-apply it strictly.
#[derive(Debug, Default)]
pub struct UdiffVerifier;

impl Verifier for UdiffVerifier {
    fn verify(&self, diff: &str, original: &str, updated: &str) -> Result<(), PatchError> {
        let hunks = parse(diff)?;
        let reapplied = apply(&hunks, original)?;
        if reapplied != updated {
            return Err(UdiffError::Mismatch.into());
        }
        Ok(())
    }
}
