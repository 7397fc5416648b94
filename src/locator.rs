use crate::errors::PatchError;

/// Default search window, in characters after `anchor_before`.
pub const DEFAULT_WINDOW: usize = 2000;

/// Anchor pair plus search window bounding the snippet lookup.
///
/// Anchors are literal text fragments surrounding the snippet; they are not
/// modified by the patch. Neither anchor is required to be unique on its own:
/// uniqueness is enforced over the whole `anchor_before … snippet …
/// anchor_after` combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSpec {
    /// Text that must appear immediately before the snippet. Can span lines.
    pub anchor_before: String,
    /// Text that must appear somewhere after the snippet. Can span lines.
    pub anchor_after: String,
    /// Maximum number of characters after `anchor_before` in which the
    /// snippet must be found. Must be greater than zero.
    pub window: usize,
}

impl AnchorSpec {
    /// Create a spec with the default window.
    pub fn new(anchor_before: impl Into<String>, anchor_after: impl Into<String>) -> Self {
        Self {
            anchor_before: anchor_before.into(),
            anchor_after: anchor_after.into(),
            window: DEFAULT_WINDOW,
        }
    }

    /// Create a spec with an explicit window.
    pub fn with_window(
        anchor_before: impl Into<String>,
        anchor_after: impl Into<String>,
        window: usize,
    ) -> Self {
        Self {
            anchor_before: anchor_before.into(),
            anchor_after: anchor_after.into(),
            window,
        }
    }
}

/// Byte range of the single snippet occurrence selected for replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRegion {
    /// Starting byte offset (inclusive)
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
}

/// Locate the unique occurrence of `old_snippet` bounded by the anchors.
///
/// Scans `text` left to right for every occurrence of `anchor_before`
/// (overlapping scan: after a hit at character `i`, scanning resumes at
/// `i + 1`, not at the end of the match, so anchors that are substrings of
/// one another are still enumerated). For each occurrence, the next
/// `window` characters are searched for `old_snippet`; a candidate also
/// requires `anchor_after` to occur anywhere after the snippet end.
///
/// Exactly one candidate region must survive: zero is
/// [`PatchError::PatternNotFound`], two or more is
/// [`PatchError::PatternAmbiguous`]. Refusing to pick among multiple
/// candidates is a hard invariant; guessing would risk corrupting the wrong
/// occurrence.
///
/// Worst-case cost is O(occurrences × window). The window bounds the scan on
/// large documents and forces callers to supply anchors close to the target.
pub fn locate(
    text: &str,
    anchors: &AnchorSpec,
    old_snippet: &str,
) -> Result<MatchRegion, PatchError> {
    if anchors.window == 0 {
        return Err(PatchError::InvalidWindow);
    }

    let mut matches: Vec<MatchRegion> = Vec::new();
    let mut cursor = 0;

    while cursor <= text.len() {
        let idx_before = match text[cursor..].find(&anchors.anchor_before) {
            Some(rel) => cursor + rel,
            None => break,
        };

        let search_start = idx_before + anchors.anchor_before.len();
        let segment = clamp_to_window(&text[search_start..], anchors.window);

        if let Some(j) = segment.find(old_snippet) {
            let start = search_start + j;
            let end = start + old_snippet.len();
            // The closing anchor may sit anywhere after the snippet, not
            // just inside the window.
            if text[end..].contains(&anchors.anchor_after) {
                matches.push(MatchRegion { start, end });
            }
        }

        // Resume one character past the anchor hit, not past the whole
        // match. An empty anchor_before matches at every position; the
        // loop bound above keeps that case terminating.
        cursor = idx_before + char_width(text, idx_before);
    }

    match matches.len() {
        0 => Err(PatchError::PatternNotFound),
        1 => Ok(matches[0]),
        count => Err(PatchError::PatternAmbiguous { count }),
    }
}

/// Truncate `tail` to at most `window` characters.
fn clamp_to_window(tail: &str, window: usize) -> &str {
    match tail.char_indices().nth(window) {
        Some((end, _)) => &tail[..end],
        None => tail,
    }
}

/// Width in bytes of the character starting at `idx`, or 1 at end of text.
fn char_width(text: &str, idx: usize) -> usize {
    text[idx..].chars().next().map_or(1, char::len_utf8)
}
