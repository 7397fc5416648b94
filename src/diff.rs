use similar::TextDiff;

/// Render a unified diff between the original and patched text.
///
/// Both headers carry `path_label` (the patch rewrites one document in
/// place, so the from-file and to-file are the same path). Output follows
/// the conventional unified-diff format with three context lines, so it can
/// be re-parsed by standard patch tooling and by the built-in verifier.
pub fn unified_diff(original: &str, updated: &str, path_label: &str) -> String {
    TextDiff::from_lines(original, updated)
        .unified_diff()
        .context_radius(3)
        .header(path_label, path_label)
        .to_string()
}
