use crate::errors::PatchError;
use crate::locator::MatchRegion;

/// Replace the located region with `new_snippet`, producing the updated text.
///
/// The region must lie inside `text` on character boundaries; [`locate`]
/// always produces such regions, but the bounds are re-checked here since
/// the region is caller-supplied.
///
/// Fails with [`PatchError::NoChangeDetected`] when the splice leaves the
/// text unchanged. The engine already rejects `old_snippet == new_snippet`
/// before locating; this is the second invariant gate.
///
/// [`locate`]: crate::locator::locate
pub fn splice(
    text: &str,
    region: MatchRegion,
    new_snippet: &str,
) -> Result<String, PatchError> {
    if region.start > region.end
        || region.end > text.len()
        || !text.is_char_boundary(region.start)
        || !text.is_char_boundary(region.end)
    {
        return Err(PatchError::InvalidRegion {
            start: region.start,
            end: region.end,
            len: text.len(),
        });
    }

    let mut updated = String::with_capacity(
        text.len() - (region.end - region.start) + new_snippet.len(),
    );
    updated.push_str(&text[..region.start]);
    updated.push_str(new_snippet);
    updated.push_str(&text[region.end..]);

    if updated == text {
        return Err(PatchError::NoChangeDetected);
    }

    Ok(updated)
}
