use crate::verify::parser::{Hunk, LineKind};
use crate::verify::UdiffError;

/// Strictly re-apply parsed hunks to `original`.
///
/// Context and removed lines must match the original byte-for-byte at the
/// positions the hunk headers state. There is no fuzzing or offset drift:
/// the diff being applied is the one this engine just generated, so any
/// disagreement is a generation bug, not bad input.
pub fn apply(hunks: &[Hunk], original: &str) -> Result<String, UdiffError> {
    let old_lines: Vec<&str> = original.split_inclusive('\n').collect();
    let mut output = String::with_capacity(original.len());
    let mut cursor = 0; // next unconsumed 0-based old line

    for hunk in hunks {
        // A zero-length old range starts just after `old_start`; otherwise
        // the range is 1-based and inclusive of `old_start`.
        let hunk_start = if hunk.old_len == 0 {
            hunk.old_start
        } else {
            hunk.old_start.checked_sub(1).ok_or(UdiffError::OutOfOrder)?
        };

        if hunk_start < cursor {
            return Err(UdiffError::OutOfOrder);
        }
        if hunk_start > old_lines.len() {
            return Err(UdiffError::PastEndOfFile);
        }

        for line in &old_lines[cursor..hunk_start] {
            output.push_str(line);
        }
        cursor = hunk_start;

        for line in &hunk.lines {
            match line.kind {
                LineKind::Context | LineKind::Remove => {
                    let found = old_lines
                        .get(cursor)
                        .copied()
                        .ok_or(UdiffError::PastEndOfFile)?;
                    if found != line.text {
                        return Err(UdiffError::HunkMismatch {
                            line: cursor + 1,
                            expected: line.text.clone(),
                            found: found.to_string(),
                        });
                    }
                    if line.kind == LineKind::Context {
                        output.push_str(found);
                    }
                    cursor += 1;
                }
                LineKind::Add => output.push_str(&line.text),
            }
        }
    }

    for line in &old_lines[cursor..] {
        output.push_str(line);
    }

    Ok(output)
}
