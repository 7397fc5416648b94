//! Anchor Patch: replace an exact snippet in a text document using only
//! surrounding anchor strings.
//!
//! # Architecture
//!
//! A patch names the snippet to replace plus two bounding anchors and a
//! search window. [`locator::locate`] enumerates every `anchor_before`
//! occurrence, searches the next `window` characters for the snippet,
//! requires `anchor_after` somewhere beyond it, and insists on exactly one
//! surviving match. [`splice::splice`] produces the updated text,
//! [`diff::unified_diff`] renders the audit diff, and [`PatchEngine`] wires
//! the stages together over a pluggable [`DocumentStore`].
//!
//! # Safety
//!
//! - Ambiguous matches are refused, never guessed at
//! - Generated diffs are round-trip verified before anything is written
//!   (with the `verify` feature, on by default)
//! - Atomic file writes (tempfile + fsync + rename)
//! - No-op patches are rejected without touching the document
//!
//! # Example
//!
//! ```no_run
//! use anchor_patch::{PatchEngine, PatchRequest};
//! use std::path::PathBuf;
//!
//! let request = PatchRequest {
//!     path: PathBuf::from("src/hello.js"),
//!     anchor_before: "function greet() {".into(),
//!     old_snippet: "console.log(\"Hello Wordl!\");".into(),
//!     new_snippet: "console.log(\"Hello World!\");".into(),
//!     anchor_after: "}".into(),
//!     window: 500,
//! };
//!
//! match PatchEngine::new().patch(&request) {
//!     Ok(outcome) => print!("{}", outcome.diff),
//!     Err(e) => eprintln!("patch failed: {}", e),
//! }
//! ```

pub mod diff;
pub mod engine;
pub mod errors;
pub mod locator;
pub mod splice;
pub mod store;
#[cfg(feature = "verify")]
pub mod verify;

// Re-exports
pub use engine::{PatchEngine, PatchOutcome, PatchRequest, Verification, Verifier};
pub use errors::PatchError;
pub use locator::{locate, AnchorSpec, MatchRegion, DEFAULT_WINDOW};
pub use splice::splice;
pub use store::{DocumentStore, FsStore, MemStore};
#[cfg(feature = "verify")]
pub use verify::UdiffVerifier;
