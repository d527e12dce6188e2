//! Cleanup pass applied to raw statements before structural parsing.
//!
//! Imported statements sometimes carry the same line twice, or a line followed
//! by a longer retyped version of itself. Both are collapsed here, together
//! with runs of blank lines.

/// Lines shorter than this are never treated as a truncated copy of the next line.
const MIN_PREFIX_DUPLICATE_CHARS: usize = 20;

/// Normalizes a raw statement: drops duplicated lines, collapses blank runs, trims.
pub fn normalize_statement(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n");
    let lines: Vec<&str> = unified.split('\n').collect();

    let deduplicated = lines
        .iter()
        .enumerate()
        .filter(|(index, line)| match lines.get(index + 1) {
            Some(next) => !is_superseded_by(line, next),
            None => true,
        })
        .map(|(_, line)| *line);

    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut previous_blank = false;
    for line in deduplicated {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        previous_blank = blank;
        kept.push(line);
    }

    kept.join("\n").trim().to_string()
}

/// True when `line` is an exact copy of `next`, or a long enough prefix of it.
fn is_superseded_by(line: &str, next: &str) -> bool {
    if line == next {
        return true;
    }
    line.chars().count() >= MIN_PREFIX_DUPLICATE_CHARS
        && next.len() > line.len()
        && next.starts_with(line)
}
