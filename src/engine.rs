use crate::diff::unified_diff;
use crate::errors::PatchError;
use crate::locator::{locate, AnchorSpec, DEFAULT_WINDOW};
use crate::splice::splice;
use crate::store::{DocumentStore, FsStore};
use serde::Deserialize;
use std::path::PathBuf;

/// One anchor-window patch request against a single document.
///
/// Deserializable so callers can hand over a JSON parameter object (the
/// CLI's `--spec` form) instead of individual fields.
#[derive(Debug, Clone, Deserialize)]
pub struct PatchRequest {
    /// Document to patch, resolved by the engine's store.
    pub path: PathBuf,
    /// Text that must appear immediately before the snippet. Can span lines.
    pub anchor_before: String,
    /// Exact text to be replaced.
    pub old_snippet: String,
    /// Replacement text.
    pub new_snippet: String,
    /// Text that must appear after the snippet. Can span lines.
    pub anchor_after: String,
    /// How many characters after `anchor_before` to search for
    /// `old_snippet` (increase for huge files).
    #[serde(default = "default_window")]
    pub window: usize,
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

impl PatchRequest {
    fn anchors(&self) -> AnchorSpec {
        AnchorSpec::with_window(
            self.anchor_before.as_str(),
            self.anchor_after.as_str(),
            self.window,
        )
    }
}

/// Seam for the optional diff-verification capability.
///
/// Re-applies `diff` to `original` and confirms the result is byte-identical
/// to `updated`. The built-in implementation lives in [`crate::verify`]
/// behind the `verify` feature; absence of a verifier degrades to
/// [`Verification::Skipped`], never to an error.
pub trait Verifier {
    fn verify(&self, diff: &str, original: &str, updated: &str) -> Result<(), PatchError>;
}

/// Whether the generated diff was round-trip checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Verified,
    Skipped,
}

/// Result of a successful patch: the unified diff, for the audit trail.
#[derive(Debug, Clone)]
#[must_use = "the diff is the caller-visible record of the change"]
pub struct PatchOutcome {
    pub diff: String,
    pub verification: Verification,
}

/// Orchestrates one patch invocation: locate, splice, diff, verify, store.
///
/// Every stage before the store write is a pure computation over in-memory
/// text, so a failure at any stage leaves the document untouched.
pub struct PatchEngine<S> {
    store: S,
    verifier: Option<Box<dyn Verifier>>,
}

impl PatchEngine<FsStore> {
    /// Engine over the local file system, with the built-in diff verifier
    /// when the `verify` feature is enabled.
    pub fn new() -> Self {
        let engine = Self::with_store(FsStore);
        #[cfg(feature = "verify")]
        let engine = engine.with_verifier(Box::new(crate::verify::UdiffVerifier));
        engine
    }
}

impl Default for PatchEngine<FsStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DocumentStore> PatchEngine<S> {
    /// Engine over a custom document store, with no verifier installed.
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            verifier: None,
        }
    }

    /// Install a verifier for the post-diff safety check.
    pub fn with_verifier(mut self, verifier: Box<dyn Verifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Apply the patch and write the document back through the store.
    ///
    /// Verification, when available, runs before the write: a diff the
    /// engine cannot re-apply never reaches the store. `FsStore` writes
    /// atomically (tempfile + fsync + rename).
    pub fn patch(&self, request: &PatchRequest) -> Result<PatchOutcome, PatchError> {
        let (updated, outcome) = self.compute(request)?;
        self.store.store(&request.path, &updated)?;
        Ok(outcome)
    }

    /// Compute the diff without writing anything (dry run).
    pub fn preview(&self, request: &PatchRequest) -> Result<PatchOutcome, PatchError> {
        let (_, outcome) = self.compute(request)?;
        Ok(outcome)
    }

    fn compute(&self, request: &PatchRequest) -> Result<(String, PatchOutcome), PatchError> {
        // A no-op request fails the same way no matter what else it says,
        // before the document is even loaded.
        if request.old_snippet == request.new_snippet {
            return Err(PatchError::NoChangeDetected);
        }

        let original = self.store.load(&request.path)?;
        let region = locate(&original, &request.anchors(), &request.old_snippet)?;
        let updated = splice(&original, region, &request.new_snippet)?;
        let diff = unified_diff(&original, &updated, &request.path.to_string_lossy());

        let verification = match &self.verifier {
            Some(verifier) => {
                verifier.verify(&diff, &original, &updated)?;
                Verification::Verified
            }
            None => Verification::Skipped,
        };

        Ok((updated, PatchOutcome { diff, verification }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;
    use std::path::Path;

    const HELLO_JS: &str = "function greet() {\n  console.log(\"Hello Wordl!\");\n}\n";

    fn request(window: usize) -> PatchRequest {
        PatchRequest {
            path: PathBuf::from("src/hello.js"),
            anchor_before: "function greet() {".to_string(),
            old_snippet: "console.log(\"Hello Wordl!\");".to_string(),
            new_snippet: "console.log(\"Hello World!\");".to_string(),
            anchor_after: "}".to_string(),
            window,
        }
    }

    fn engine_with(doc: &str) -> PatchEngine<MemStore> {
        let store = MemStore::new();
        store.insert("src/hello.js", doc);
        let engine = PatchEngine::with_store(store);
        #[cfg(feature = "verify")]
        let engine = engine.with_verifier(Box::new(crate::verify::UdiffVerifier));
        engine
    }

    fn stored(engine: &PatchEngine<MemStore>) -> String {
        engine.store.get(Path::new("src/hello.js")).unwrap()
    }

    #[test]
    fn test_patch_applies_and_reports_diff() {
        let engine = engine_with(HELLO_JS);
        let outcome = engine.patch(&request(500)).unwrap();

        assert_eq!(
            stored(&engine),
            "function greet() {\n  console.log(\"Hello World!\");\n}\n"
        );
        assert!(outcome.diff.contains("-  console.log(\"Hello Wordl!\");\n"));
        assert!(outcome.diff.contains("+  console.log(\"Hello World!\");\n"));
        assert!(outcome.diff.starts_with("--- src/hello.js\n+++ src/hello.js\n"));

        #[cfg(feature = "verify")]
        assert_eq!(outcome.verification, Verification::Verified);
    }

    #[test]
    fn test_patch_failure_leaves_document_untouched() {
        let engine = engine_with(HELLO_JS);
        let mut req = request(500);
        req.old_snippet = "console.log(\"absent\");".to_string();

        let result = engine.patch(&req);
        assert!(matches!(result, Err(PatchError::PatternNotFound)));
        assert_eq!(stored(&engine), HELLO_JS);
    }

    #[test]
    fn test_patch_ambiguous_between_duplicate_regions() {
        let doubled = format!("{}{}", HELLO_JS, HELLO_JS);
        let engine = engine_with(&doubled);

        let result = engine.patch(&request(500));
        assert!(matches!(
            result,
            Err(PatchError::PatternAmbiguous { count: 2 })
        ));
        assert_eq!(stored(&engine), doubled);
    }

    #[test]
    fn test_patch_noop_rejected_before_load() {
        let store = MemStore::new();
        let engine = PatchEngine::with_store(store);

        // The document does not even exist; the no-change gate still wins.
        let mut req = request(500);
        req.new_snippet = req.old_snippet.clone();
        let result = engine.patch(&req);
        assert!(matches!(result, Err(PatchError::NoChangeDetected)));
    }

    #[test]
    fn test_patch_snippet_beyond_window() {
        let engine = engine_with(HELLO_JS);
        let result = engine.patch(&request(3));
        assert!(matches!(result, Err(PatchError::PatternNotFound)));
        assert_eq!(stored(&engine), HELLO_JS);
    }

    #[test]
    fn test_preview_never_writes() {
        let engine = engine_with(HELLO_JS);
        let outcome = engine.preview(&request(500)).unwrap();
        assert!(outcome.diff.contains("+  console.log(\"Hello World!\");\n"));
        assert_eq!(stored(&engine), HELLO_JS);
    }

    #[test]
    fn test_missing_document_is_io_error() {
        let engine = PatchEngine::with_store(MemStore::new());
        let result = engine.patch(&request(500));
        assert!(matches!(result, Err(PatchError::Io(_))));
    }

    #[test]
    fn test_verification_skipped_without_verifier() {
        let store = MemStore::new();
        store.insert("src/hello.js", HELLO_JS);
        let engine = PatchEngine::with_store(store);

        let outcome = engine.patch(&request(500)).unwrap();
        assert_eq!(outcome.verification, Verification::Skipped);
    }

    struct FailingVerifier;

    impl Verifier for FailingVerifier {
        fn verify(&self, _: &str, _: &str, _: &str) -> Result<(), PatchError> {
            Err(PatchError::VerificationFailed {
                detail: "synthetic failure".to_string(),
            })
        }
    }

    #[test]
    fn test_verification_failure_blocks_write() {
        let store = MemStore::new();
        store.insert("src/hello.js", HELLO_JS);
        let engine = PatchEngine::with_store(store).with_verifier(Box::new(FailingVerifier));

        let result = engine.patch(&request(500));
        assert!(matches!(
            result,
            Err(PatchError::VerificationFailed { .. })
        ));
        assert_eq!(stored(&engine), HELLO_JS);
    }

    #[test]
    fn test_request_from_json_spec() {
        let request: PatchRequest = serde_json::from_str(
            r#"{
                "path": "src/hello.js",
                "anchor_before": "function greet() {",
                "old_snippet": "console.log(\"Hello Wordl!\");",
                "new_snippet": "console.log(\"Hello World!\");",
                "anchor_after": "}"
            }"#,
        )
        .unwrap();
        assert_eq!(request.window, DEFAULT_WINDOW);

        let engine = engine_with(HELLO_JS);
        engine.patch(&request).unwrap();
        assert!(stored(&engine).contains("Hello World!"));
    }
}
