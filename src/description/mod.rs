//! Structured view of an unstructured problem statement.
//!
//! Imported statements arrive as a single text blob in which the input
//! format, output format and examples are delimited by dash markers such as
//! `-----Input-----`, followed by an optional `Source:` line and an import
//! footer. [`parse_problem_description`] splits the blob into those sections;
//! parsing never fails and missing sections come back empty.
//!
//! # Example
//!
//! ```
//! use codepractice::description::parse_problem_description;
//!
//! let parsed = parse_problem_description(
//!     "Solve it.\n-----Input-----\nOne integer.\n-----Output-----\nOne integer.\nSource: ACM",
//! );
//! assert_eq!(parsed.statement_paragraphs, vec!["Solve it."]);
//! assert_eq!(parsed.source.as_deref(), Some("ACM"));
//! ```

mod examples;
mod normalize;

pub use examples::{parse_examples_from_statement, ParsedStatementExample};
pub use normalize::normalize_statement;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Sections recovered from a raw statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedProblemDescription {
    /// Statement body split into unwrapped paragraphs.
    pub statement_paragraphs: Vec<String>,
    pub input_format: String,
    pub output_format: String,
    /// Raw examples section; see [`ParsedProblemDescription::examples`].
    pub examples_text: String,
    pub source: Option<String>,
    /// Import attribution lifted out of the footer.
    pub import_note: Option<String>,
}

impl ParsedProblemDescription {
    /// Parses the example triples out of the examples section.
    pub fn examples(&self) -> Vec<ParsedStatementExample> {
        parse_examples_from_statement(&self.examples_text)
    }

    /// True when no marker-delimited section was found.
    pub fn has_sections(&self) -> bool {
        !self.input_format.is_empty()
            || !self.output_format.is_empty()
            || !self.examples_text.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Input,
    Output,
    Examples,
}

impl Section {
    fn from_keyword(keyword: &str) -> Self {
        let keyword = keyword.to_ascii_lowercase();
        if keyword == "input" {
            Section::Input
        } else if keyword == "output" {
            Section::Output
        } else {
            Section::Examples
        }
    }
}

fn source_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?im)^[ \t]*source[ \t]*:[ \t]*(.*)$")
            .expect("Invalid regex for source line")
    })
}

fn section_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\B-+[ \t]*(input|output|examples?)[ \t]*-+\B")
            .expect("Invalid regex for section marker")
    })
}

fn import_note_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)imported[ \t]+from[ \t]+apps[ \t]+dataset[^\n]*")
            .expect("Invalid regex for import note")
    })
}

fn paragraph_break_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\n(?:[ \t]*\n)+").expect("Invalid regex for paragraph break")
    })
}

/// Splits a raw statement into paragraphs, format sections, examples and footer.
pub fn parse_problem_description(raw: &str) -> ParsedProblemDescription {
    let text = normalize_statement(raw);

    let (main, source, footer) = split_source(&text);

    // The import note normally sits in the footer after the source line; without
    // a source line it is lifted from wherever it appears. Footer text only
    // rejoins the body when a note was lifted out of it.
    let (import_note, main, leftover_footer) = match footer {
        Some(footer) => {
            let (note, rest) = extract_import_note(footer);
            let rest = if note.is_some() { rest } else { String::new() };
            (note, main.to_string(), rest)
        }
        None => {
            let (note, rest) = extract_import_note(main);
            (note, rest, String::new())
        }
    };

    let sections = split_sections(&main);

    let mut body = sections.body;
    if !leftover_footer.is_empty() {
        if !body.is_empty() {
            body.push_str("\n\n");
        }
        body.push_str(&leftover_footer);
    }

    ParsedProblemDescription {
        statement_paragraphs: split_paragraphs(&body),
        input_format: sections.input_format,
        output_format: sections.output_format,
        examples_text: sections.examples_text,
        source,
        import_note,
    }
}

/// Returns `(text before the source line, captured source, text after it)`.
fn split_source(text: &str) -> (&str, Option<String>, Option<&str>) {
    let Some(caps) = source_pattern().captures(text) else {
        return (text, None, None);
    };
    let (Some(line), Some(value)) = (caps.get(0), caps.get(1)) else {
        return (text, None, None);
    };

    let value = value.as_str().trim();
    let source = (!value.is_empty()).then(|| value.to_string());
    (&text[..line.start()], source, Some(&text[line.end()..]))
}

/// Removes the first import note from `text`, returning it and the trimmed remainder.
fn extract_import_note(text: &str) -> (Option<String>, String) {
    match import_note_pattern().find(text) {
        Some(found) => {
            let note = found.as_str().trim().to_string();
            let mut rest = String::with_capacity(text.len());
            rest.push_str(text[..found.start()].trim_end());
            let after = text[found.end()..].trim_start();
            if !rest.is_empty() && !after.is_empty() {
                rest.push('\n');
            }
            rest.push_str(after);
            (Some(note), rest.trim().to_string())
        }
        None => (None, text.trim().to_string()),
    }
}

#[derive(Debug, Default)]
struct Sections {
    body: String,
    input_format: String,
    output_format: String,
    examples_text: String,
}

/// Slices `main` at every section marker, assigning content by keyword.
fn split_sections(main: &str) -> Sections {
    let markers: Vec<(Section, usize, usize)> = section_pattern()
        .captures_iter(main)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let keyword = caps.get(1)?;
            Some((Section::from_keyword(keyword.as_str()), whole.start(), whole.end()))
        })
        .collect();

    let body_end = markers.first().map_or(main.len(), |(_, start, _)| *start);
    let mut sections = Sections {
        body: main[..body_end].trim().to_string(),
        ..Sections::default()
    };

    for (index, (section, _, content_start)) in markers.iter().enumerate() {
        let content_end = markers
            .get(index + 1)
            .map_or(main.len(), |(_, next_start, _)| *next_start);
        let content = main[*content_start..content_end].trim();

        let slot = match section {
            Section::Input => &mut sections.input_format,
            Section::Output => &mut sections.output_format,
            Section::Examples => &mut sections.examples_text,
        };
        if slot.is_empty() {
            *slot = content.to_string();
        }
    }

    sections
}

/// Splits on blank lines and unwraps each paragraph onto a single line.
fn split_paragraphs(body: &str) -> Vec<String> {
    paragraph_break_pattern()
        .split(body)
        .map(|paragraph| {
            paragraph
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|paragraph| !paragraph.is_empty())
        .collect()
}
