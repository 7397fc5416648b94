use crate::verify::UdiffError;

/// Role of a single hunk line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Remove,
    Add,
}

/// One hunk line. `text` carries the line's terminator exactly as the
/// document had it (`\n` or `\r\n`), except when a
/// `\ No newline at end of file` marker stripped the final `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkLine {
    pub kind: LineKind,
    pub text: String,
}

/// One `@@` hunk. Starts are 1-based line numbers; a zero length marks an
/// empty range beginning just after `start` (the usual unified-diff
/// convention for pure insertions and deletions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
    pub lines: Vec<HunkLine>,
}

/// Parse a unified diff into hunks.
///
/// `---`/`+++` file headers before the first hunk are skipped; every other
/// line must belong to a hunk. An empty diff parses to no hunks.
///
/// Splitting is on bare `\n` only: a `\r` before it belongs to the document
/// line, not to the diff framing, so CRLF content survives the round trip.
pub fn parse(diff: &str) -> Result<Vec<Hunk>, UdiffError> {
    let mut hunks: Vec<Hunk> = Vec::new();

    for raw in diff.split_inclusive('\n') {
        let line = raw.strip_suffix('\n').unwrap_or(raw);

        if hunks.is_empty() && (line.starts_with("--- ") || line.starts_with("+++ ")) {
            continue;
        }

        if line.starts_with("@@ ") {
            hunks.push(parse_hunk_header(line)?);
            continue;
        }

        let hunk = hunks
            .last_mut()
            .ok_or_else(|| UdiffError::UnrecognizedLine(line.to_string()))?;

        if line == "\\ No newline at end of file" {
            let last = hunk
                .lines
                .last_mut()
                .ok_or(UdiffError::StrayNewlineMarker)?;
            if last.text.pop() != Some('\n') {
                return Err(UdiffError::StrayNewlineMarker);
            }
            continue;
        }

        let (kind, content) = match line.as_bytes().first() {
            Some(b' ') => (LineKind::Context, &line[1..]),
            Some(b'-') => (LineKind::Remove, &line[1..]),
            Some(b'+') => (LineKind::Add, &line[1..]),
            _ => return Err(UdiffError::UnrecognizedLine(line.to_string())),
        };

        hunk.lines.push(HunkLine {
            kind,
            text: format!("{}\n", content),
        });
    }

    Ok(hunks)
}

/// Parse `@@ -old_start,old_len +new_start,new_len @@` (lengths of 1 may be
/// omitted, per the format).
fn parse_hunk_header(raw: &str) -> Result<Hunk, UdiffError> {
    let malformed = || UdiffError::MalformedHunkHeader(raw.to_string());

    let inner = raw
        .strip_prefix("@@ ")
        .and_then(|s| s.strip_suffix(" @@"))
        .ok_or_else(malformed)?;

    let (old, new) = inner.split_once(' ').ok_or_else(malformed)?;
    let old = old.strip_prefix('-').ok_or_else(malformed)?;
    let new = new.strip_prefix('+').ok_or_else(malformed)?;

    let (old_start, old_len) = parse_range(old).ok_or_else(malformed)?;
    let (new_start, new_len) = parse_range(new).ok_or_else(malformed)?;

    Ok(Hunk {
        old_start,
        old_len,
        new_start,
        new_len,
        lines: Vec::new(),
    })
}

fn parse_range(s: &str) -> Option<(usize, usize)> {
    match s.split_once(',') {
        Some((start, len)) => Some((start.parse().ok()?, len.parse().ok()?)),
        None => Some((s.parse().ok()?, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_diff() {
        assert_eq!(parse("").unwrap(), Vec::new());
    }

    #[test]
    fn test_parse_basic_hunk() {
        let diff = "--- a.txt\n+++ a.txt\n@@ -1,3 +1,3 @@\n one\n-two\n+TWO\n three\n";
        let hunks = parse(diff).unwrap();
        assert_eq!(hunks.len(), 1);
        let hunk = &hunks[0];
        assert_eq!((hunk.old_start, hunk.old_len), (1, 3));
        assert_eq!((hunk.new_start, hunk.new_len), (1, 3));
        assert_eq!(hunk.lines.len(), 4);
        assert_eq!(hunk.lines[1].kind, LineKind::Remove);
        assert_eq!(hunk.lines[1].text, "two\n");
        assert_eq!(hunk.lines[2].kind, LineKind::Add);
        assert_eq!(hunk.lines[2].text, "TWO\n");
    }

    #[test]
    fn test_parse_omitted_length_defaults_to_one() {
        let hunks = parse("@@ -5 +7 @@\n-x\n+y\n").unwrap();
        assert_eq!((hunks[0].old_start, hunks[0].old_len), (5, 1));
        assert_eq!((hunks[0].new_start, hunks[0].new_len), (7, 1));
    }

    #[test]
    fn test_parse_keeps_carriage_returns() {
        // CRLF endings are document content; only the bare LF is framing.
        let hunks = parse("@@ -1,2 +1,2 @@\n one\r\n-two\r\n+TWO\r\n").unwrap();
        assert_eq!(hunks[0].lines[0].text, "one\r\n");
        assert_eq!(hunks[0].lines[1].text, "two\r\n");
        assert_eq!(hunks[0].lines[2].text, "TWO\r\n");
    }

    #[test]
    fn test_parse_no_newline_marker_strips_newline() {
        let diff = "@@ -1 +1 @@\n-old\n+new\n\\ No newline at end of file\n";
        let hunks = parse(diff).unwrap();
        assert_eq!(hunks[0].lines[0].text, "old\n");
        assert_eq!(hunks[0].lines[1].text, "new");
    }

    #[test]
    fn test_parse_rejects_line_outside_hunk() {
        let result = parse("stray prose\n@@ -1 +1 @@\n");
        assert!(matches!(result, Err(UdiffError::UnrecognizedLine(_))));
    }

    #[test]
    fn test_parse_rejects_malformed_header() {
        let result = parse("@@ -x,1 +1,1 @@\n");
        assert!(matches!(result, Err(UdiffError::MalformedHunkHeader(_))));
    }
}
