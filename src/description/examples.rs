//! Extraction of input/output example triples from an examples section.
//!
//! Two marker styles are scanned independently: markers alone on their line
//! (`Input` / `Output:`), and inline markers followed by arbitrary whitespace
//! (`Input: 3 Output: 6`). Both scans can find the same example, so results
//! are deduplicated on the exact `(input, output)` pair.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// One example parsed out of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedStatementExample {
    pub input: String,
    pub output: String,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy)]
struct Marker {
    kind: MarkerKind,
    start: usize,
    end: usize,
}

fn line_marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?im)^[ \t]*(input|output)[ \t]*:?[ \t]*$")
            .expect("Invalid regex for line examples marker")
    })
}

fn inline_marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(input|output)(?:[ \t]*#?\d+)?[ \t]*:")
            .expect("Invalid regex for inline examples marker")
    })
}

fn explanation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\bexplanation[ \t]*:").expect("Invalid regex for explanation marker")
    })
}

/// Parses every example found in `examples_text`, in order of first appearance.
pub fn parse_examples_from_statement(examples_text: &str) -> Vec<ParsedStatementExample> {
    let text = examples_text.replace("\r\n", "\n");
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut examples = Vec::new();

    for pattern in [line_marker_pattern(), inline_marker_pattern()] {
        let markers = collect_markers(pattern, &text);
        for example in pair_markers(&text, &markers) {
            let key = (example.input.clone(), example.output.clone());
            if seen.insert(key) {
                examples.push(example);
            }
        }
    }

    examples
}

fn collect_markers(pattern: &Regex, text: &str) -> Vec<Marker> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let keyword = caps.get(1)?;
            let kind = if keyword.as_str().eq_ignore_ascii_case("input") {
                MarkerKind::Input
            } else {
                MarkerKind::Output
            };
            Some(Marker {
                kind,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Pairs each input marker with the next output marker. The output runs until
/// the following input marker or the end of the text.
fn pair_markers(text: &str, markers: &[Marker]) -> Vec<ParsedStatementExample> {
    let next_of = |kind: MarkerKind, from: usize| {
        (from..markers.len()).find(|&index| markers[index].kind == kind)
    };

    let mut examples = Vec::new();
    let mut cursor = next_of(MarkerKind::Input, 0);

    while let Some(input_index) = cursor {
        let Some(output_index) = next_of(MarkerKind::Output, input_index + 1) else {
            break;
        };
        let next_input = next_of(MarkerKind::Input, output_index + 1);

        let input_marker = markers[input_index];
        let output_marker = markers[output_index];
        let output_end = next_input.map_or(text.len(), |index| markers[index].start);

        let input = text[input_marker.end..output_marker.start].trim();
        let raw_output = &text[output_marker.end..output_end];
        let (output, explanation) = split_explanation(raw_output);

        if !input.is_empty() || !output.is_empty() {
            examples.push(ParsedStatementExample {
                input: input.to_string(),
                output,
                explanation,
            });
        }

        cursor = next_input;
    }

    examples
}

fn split_explanation(raw_output: &str) -> (String, Option<String>) {
    match explanation_pattern().find(raw_output) {
        Some(marker) => {
            let output = raw_output[..marker.start()].trim().to_string();
            let explanation = raw_output[marker.end()..].trim();
            let explanation = (!explanation.is_empty()).then(|| explanation.to_string());
            (output, explanation)
        }
        None => (raw_output.trim().to_string(), None),
    }
}
