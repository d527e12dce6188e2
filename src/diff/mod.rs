//! Line-level diff between two attempt snapshots.
//!
//! The engine walks both line sequences once with a single line of lookahead.
//! A lone inserted or deleted line is reported as `Added` / `Removed`; longer
//! inserted or deleted blocks show up as a run of `Changed` rows instead of a
//! clean block. Row colouring in the comparison view is keyed on that output,
//! so the heuristic is kept as is rather than replaced by an LCS diff.
//!
//! # Example
//!
//! ```
//! use codepractice::diff::{compute_diff, DiffKind};
//!
//! let rows = compute_diff(&["a", "b"], &["a", "b", "c"]);
//! assert_eq!(rows.len(), 3);
//! assert_eq!(rows[2].kind, DiffKind::Added);
//! ```

use serde::Serialize;

/// Classification of a single diff row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Both sides carry the same line.
    Same,
    /// Line exists only on the right (current) side.
    Added,
    /// Line exists only on the left (previous) side.
    Removed,
    /// Lines differ; either side may be missing past the end of its sequence.
    Changed,
}

impl DiffKind {
    /// Returns the lowercase name used in rendered output.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffKind::Same => "same",
            DiffKind::Added => "added",
            DiffKind::Removed => "removed",
            DiffKind::Changed => "changed",
        }
    }
}

impl std::fmt::Display for DiffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One aligned row of a side-by-side diff.
///
/// Line numbers are 1-based. `None` means the side has no line in this row,
/// in which case its text is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDiffRow {
    pub left_line_number: Option<usize>,
    pub right_line_number: Option<usize>,
    pub left_text: String,
    pub right_text: String,
    pub kind: DiffKind,
}

/// Per-kind row counts for a computed diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub same: usize,
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

impl DiffSummary {
    /// Tallies the rows of a diff by kind.
    pub fn from_rows(rows: &[LineDiffRow]) -> Self {
        rows.iter().fold(Self::default(), |mut summary, row| {
            match row.kind {
                DiffKind::Same => summary.same += 1,
                DiffKind::Added => summary.added += 1,
                DiffKind::Removed => summary.removed += 1,
                DiffKind::Changed => summary.changed += 1,
            }
            summary
        })
    }

    /// True when every row is `Same`.
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.changed == 0
    }
}

/// Aligns two pre-split line sequences into diff rows.
///
/// Empty trailing lines are significant: `"a\n"` split on `'\n'` is
/// `["a", ""]` and is not the same sequence as `["a"]`.
pub fn compute_diff<P, C>(previous: &[P], current: &[C]) -> Vec<LineDiffRow>
where
    P: AsRef<str>,
    C: AsRef<str>,
{
    let prev_at = |index: usize| previous.get(index).map(AsRef::as_ref);
    let cur_at = |index: usize| current.get(index).map(AsRef::as_ref);

    let mut rows = Vec::with_capacity(previous.len().max(current.len()));
    let mut p = 0;
    let mut c = 0;

    while p < previous.len() || c < current.len() {
        let prev_line = prev_at(p);
        let cur_line = cur_at(c);

        if prev_line == cur_line {
            rows.push(LineDiffRow {
                left_line_number: Some(p + 1),
                right_line_number: Some(c + 1),
                left_text: prev_line.unwrap_or_default().to_string(),
                right_text: cur_line.unwrap_or_default().to_string(),
                kind: DiffKind::Same,
            });
            p += 1;
            c += 1;
            continue;
        }

        if prev_at(p + 1) == cur_line {
            rows.push(LineDiffRow {
                left_line_number: Some(p + 1),
                right_line_number: None,
                left_text: prev_line.unwrap_or_default().to_string(),
                right_text: String::new(),
                kind: DiffKind::Removed,
            });
            p += 1;
            continue;
        }

        if prev_line == cur_at(c + 1) {
            rows.push(LineDiffRow {
                left_line_number: None,
                right_line_number: Some(c + 1),
                left_text: String::new(),
                right_text: cur_line.unwrap_or_default().to_string(),
                kind: DiffKind::Added,
            });
            c += 1;
            continue;
        }

        let left_in_range = p < previous.len();
        let right_in_range = c < current.len();
        rows.push(LineDiffRow {
            left_line_number: left_in_range.then_some(p + 1),
            right_line_number: right_in_range.then_some(c + 1),
            left_text: prev_line.unwrap_or_default().to_string(),
            right_text: cur_line.unwrap_or_default().to_string(),
            kind: DiffKind::Changed,
        });
        if left_in_range {
            p += 1;
        }
        if right_in_range {
            c += 1;
        }
    }

    rows
}

/// Splits both texts on `'\n'` and diffs the resulting lines.
pub fn diff_text(previous: &str, current: &str) -> Vec<LineDiffRow> {
    let previous_lines: Vec<&str> = previous.split('\n').collect();
    let current_lines: Vec<&str> = current.split('\n').collect();
    compute_diff(&previous_lines, &current_lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left_texts(rows: &[LineDiffRow]) -> Vec<&str> {
        rows.iter()
            .filter(|row| row.left_line_number.is_some())
            .map(|row| row.left_text.as_str())
            .collect()
    }

    fn right_texts(rows: &[LineDiffRow]) -> Vec<&str> {
        rows.iter()
            .filter(|row| row.right_line_number.is_some())
            .map(|row| row.right_text.as_str())
            .collect()
    }

    fn kinds(rows: &[LineDiffRow]) -> Vec<DiffKind> {
        rows.iter().map(|row| row.kind).collect()
    }

    #[test]
    fn test_identical_sequences_are_all_same() {
        let lines = ["fn main() {", "    println!(\"hi\");", "}"];
        let rows = compute_diff(&lines, &lines);

        assert_eq!(rows.len(), 3);
        for (index, row) in rows.iter().enumerate() {
            assert_eq!(row.kind, DiffKind::Same);
            assert_eq!(row.left_line_number, Some(index + 1));
            assert_eq!(row.right_line_number, Some(index + 1));
        }
    }

    #[test]
    fn test_single_append() {
        let rows = compute_diff(&["a", "b"], &["a", "b", "c"]);

        assert_eq!(
            kinds(&rows),
            vec![DiffKind::Same, DiffKind::Same, DiffKind::Added]
        );
        assert_eq!(rows[2].left_line_number, None);
        assert_eq!(rows[2].right_line_number, Some(3));
        assert_eq!(rows[2].right_text, "c");
    }

    #[test]
    fn test_single_deletion() {
        let rows = compute_diff(&["a", "b", "c"], &["a", "c"]);

        assert_eq!(
            kinds(&rows),
            vec![DiffKind::Same, DiffKind::Removed, DiffKind::Same]
        );
        assert_eq!(rows[1].left_text, "b");
        assert_eq!(rows[1].left_line_number, Some(2));
        assert_eq!(rows[1].right_line_number, None);
        assert_eq!(rows[2].left_line_number, Some(3));
        assert_eq!(rows[2].right_line_number, Some(2));
    }

    #[test]
    fn test_single_insertion_in_middle() {
        let rows = compute_diff(&["a", "c"], &["a", "b", "c"]);

        assert_eq!(
            kinds(&rows),
            vec![DiffKind::Same, DiffKind::Added, DiffKind::Same]
        );
        assert_eq!(rows[1].right_text, "b");
    }

    #[test]
    fn test_trailing_deletion() {
        let rows = compute_diff(&["a", "b"], &["a"]);

        assert_eq!(kinds(&rows), vec![DiffKind::Same, DiffKind::Removed]);
        assert_eq!(rows[1].left_text, "b");
    }

    #[test]
    fn test_modified_line_is_changed() {
        let rows = compute_diff(&["x = 1", "print(x)"], &["x = 2", "print(x)"]);

        assert_eq!(kinds(&rows), vec![DiffKind::Changed, DiffKind::Same]);
        assert_eq!(rows[0].left_text, "x = 1");
        assert_eq!(rows[0].right_text, "x = 2");
        assert_eq!(rows[0].left_line_number, Some(1));
        assert_eq!(rows[0].right_line_number, Some(1));
    }

    #[test]
    fn test_multi_line_insertion_degrades_to_changed_rows() {
        let rows = compute_diff(&["a", "z"], &["a", "b", "c", "z"]);

        // Only one line of lookahead: the first inserted line cannot be
        // matched against "z", so it pairs with it as a change.
        assert_eq!(rows[0].kind, DiffKind::Same);
        assert!(rows[1..].iter().any(|row| row.kind == DiffKind::Changed));
        assert_eq!(left_texts(&rows), vec!["a", "z"]);
        assert_eq!(right_texts(&rows), vec!["a", "b", "c", "z"]);
    }

    #[test]
    fn test_changed_row_past_left_end_has_no_left_number() {
        let rows = compute_diff(&["a"], &["a", "b", "c"]);

        assert_eq!(
            kinds(&rows),
            vec![DiffKind::Same, DiffKind::Changed, DiffKind::Added]
        );
        assert_eq!(rows[1].left_line_number, None);
        assert_eq!(rows[1].right_line_number, Some(2));
        assert_eq!(rows[1].left_text, "");
    }

    #[test]
    fn test_round_trip_reproduces_both_sides() {
        let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
            (vec![], vec![]),
            (vec![], vec!["x", "y"]),
            (vec!["x", "y"], vec![]),
            (vec!["a", "b", "c", "d"], vec!["d", "c", "b", "a"]),
            (vec!["a", "", "b", ""], vec!["", "a", "b"]),
            (vec!["1", "2", "3", "4", "5"], vec!["1", "9", "9", "9", "5", "6"]),
        ];

        for (previous, current) in cases {
            let rows = compute_diff(&previous, &current);
            assert_eq!(left_texts(&rows), previous, "left side of {:?}", previous);
            assert_eq!(right_texts(&rows), current, "right side of {:?}", current);
        }
    }

    #[test]
    fn test_empty_inputs_produce_no_rows() {
        let empty: [&str; 0] = [];
        assert!(compute_diff(&empty, &empty).is_empty());
    }

    #[test]
    fn test_diff_text_keeps_trailing_empty_line() {
        let rows = diff_text("a\n", "a");

        assert_eq!(kinds(&rows), vec![DiffKind::Same, DiffKind::Removed]);
        assert_eq!(rows[1].left_text, "");
        assert_eq!(rows[1].left_line_number, Some(2));
    }

    #[test]
    fn test_summary_counts_kinds() {
        let rows = compute_diff(&["a", "b", "c"], &["a", "c", "d"]);
        let summary = DiffSummary::from_rows(&rows);

        assert_eq!(summary.same, 2);
        assert_eq!(summary.removed, 1);
        assert_eq!(summary.added, 1);
        assert!(!summary.is_unchanged());
        assert!(DiffSummary::from_rows(&diff_text("x", "x")).is_unchanged());
    }

    #[test]
    fn test_row_serializes_with_camel_case_fields() {
        let rows = compute_diff(&["a"], &["b"]);
        let json = serde_json::to_value(&rows[0]).expect("row should serialize");

        assert_eq!(json["leftLineNumber"], 1);
        assert_eq!(json["kind"], "changed");
    }
}
