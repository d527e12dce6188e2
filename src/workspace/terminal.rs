//! Terminal transcript lines shown for the last workspace action.

use crate::api::{ExecutionTestResult, OverallStatus, SessionAnalysis};
use crate::error::WorkspaceError;

pub const TERMINAL_READY: &str = "Terminal ready. Select a language and run visible tests.";
pub const STARTER_RESTORED: &str = "Starter template restored.";
pub const SESSION_RESTORED: &str =
    "Session restored from dashboard. Click Analyze to refresh insights.";

/// Maximum number of test results listed in a transcript.
pub const MAX_TERMINAL_TESTS: usize = 8;

/// Maximum characters kept from a compacted stdout/stderr/compile output.
pub const MAX_OUTPUT_CHARS: usize = 240;

/// Collapses all whitespace runs to single spaces and truncates.
pub fn compact_output(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_OUTPUT_CHARS)
        .collect()
}

/// Normalizes test input or output for display; blank values render as `<empty>`.
pub fn format_io(value: Option<&str>) -> String {
    let normalized = value.unwrap_or_default().replace("\r\n", "\n");
    let normalized = normalized.trim_end();
    if normalized.is_empty() {
        "<empty>".to_string()
    } else {
        normalized.to_string()
    }
}

pub fn run_command(language_name: &str) -> String {
    format!("$ run --language \"{}\"", language_name)
}

pub fn submit_command(language_name: &str) -> String {
    format!("$ submit --language \"{}\"", language_name)
}

pub fn analyze_command(session_id: &str, from_saved: bool) -> String {
    if from_saved {
        format!("$ analyze --session {} --load", session_id)
    } else {
        format!("$ analyze --session {}", session_id)
    }
}

/// Transcript for a finished run or submit.
pub fn execution_lines(
    command: String,
    overall_status: OverallStatus,
    passed_count: u32,
    total_count: u32,
    tests: &[ExecutionTestResult],
) -> Vec<String> {
    let mut lines = vec![
        command,
        format!("status: {}", overall_status),
        format!("passed: {}/{}", passed_count, total_count),
        String::new(),
    ];

    for test in tests.iter().take(MAX_TERMINAL_TESTS) {
        let hidden = if test.is_hidden { " [hidden]" } else { "" };
        lines.push(format!("{}{}: {}", test.id, hidden, test.status_description));

        let outputs = [
            ("stdout", test.stdout.as_deref()),
            ("stderr", test.stderr.as_deref()),
            ("compile", test.compile_output.as_deref()),
        ];
        for (label, value) in outputs {
            let compacted = compact_output(value);
            if !compacted.is_empty() {
                lines.push(format!("  {}: {}", label, compacted));
            }
        }
    }

    lines
}

pub fn error_lines(command: String, error: &WorkspaceError) -> Vec<String> {
    vec![command, format!("error: {}", error)]
}

pub fn analysis_lines(command: String, analysis: &SessionAnalysis) -> Vec<String> {
    vec![
        command,
        format!("summary: {}", analysis.summary),
        format!(
            "complexity: {}",
            analysis.time_complexity.as_deref().unwrap_or("Unknown")
        ),
        format!("recommendations: {}", analysis.recommendations.len()),
    ]
}

pub fn session_restored_lines(session_id: &str) -> Vec<String> {
    vec![format!("$ session {}", session_id), SESSION_RESTORED.to_string()]
}

pub fn language_switched_line(language_name: &str) -> String {
    format!(
        "Language switched to {}. Starter template loaded.",
        language_name
    )
}

/// `time_limit_exceeded` → `Time Limit Exceeded`.
pub fn to_readable_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len());
    let mut previous_is_word = false;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        let is_word = c.is_alphanumeric();
        if is_word && !previous_is_word {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        previous_is_word = is_word;
    }
    label
}

/// Like [`to_readable_label`] but lowercases first, for SHOUTY enum values.
pub fn to_readable_enum(value: &str) -> String {
    to_readable_label(&value.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn test_result(id: &str, hidden: bool, stdout: Option<&str>) -> ExecutionTestResult {
        ExecutionTestResult {
            id: id.to_string(),
            note: None,
            is_hidden: hidden,
            passed: true,
            status_id: 3,
            status_description: "Accepted".to_string(),
            input: String::new(),
            expected_output: String::new(),
            stdout: stdout.map(str::to_string),
            stderr: None,
            compile_output: None,
            time: None,
            memory: None,
        }
    }

    #[test]
    fn test_compact_output() {
        assert_eq!(compact_output(None), "");
        assert_eq!(compact_output(Some("  a\n\n b\t c  ")), "a b c");

        let long = "x".repeat(500);
        assert_eq!(compact_output(Some(&long)).len(), MAX_OUTPUT_CHARS);
    }

    #[test]
    fn test_format_io() {
        assert_eq!(format_io(None), "<empty>");
        assert_eq!(format_io(Some("  \r\n")), "<empty>");
        assert_eq!(format_io(Some("1 2\r\n3\r\n")), "1 2\n3");
    }

    #[test]
    fn test_execution_lines_layout() {
        let tests = vec![
            test_result("visible-1", false, Some("3\n")),
            test_result("hidden-1", true, None),
        ];
        let lines = execution_lines(
            run_command("Python (3.x)"),
            OverallStatus::Accepted,
            2,
            2,
            &tests,
        );

        assert_eq!(
            lines,
            vec![
                "$ run --language \"Python (3.x)\"",
                "status: accepted",
                "passed: 2/2",
                "",
                "visible-1: Accepted",
                "  stdout: 3",
                "hidden-1 [hidden]: Accepted",
            ]
        );
    }

    #[test]
    fn test_execution_lines_cap_test_count() {
        let tests: Vec<_> = (0..12)
            .map(|i| test_result(&format!("t{}", i), false, None))
            .collect();
        let lines = execution_lines(submit_command("C"), OverallStatus::Failed, 0, 12, &tests);
        assert_eq!(lines.len(), 4 + MAX_TERMINAL_TESTS);
        assert_eq!(lines[0], "$ submit --language \"C\"");
    }

    #[test]
    fn test_error_lines() {
        let error = WorkspaceError::from(ApiError::NetworkFailure("connection reset".to_string()));
        assert_eq!(
            error_lines(analyze_command("s1", false), &error),
            vec![
                "$ analyze --session s1",
                "error: Network request failed: connection reset"
            ]
        );
        assert_eq!(analyze_command("s1", true), "$ analyze --session s1 --load");
    }

    #[test]
    fn test_readable_labels() {
        assert_eq!(to_readable_label("time_limit_exceeded"), "Time Limit Exceeded");
        assert_eq!(to_readable_label("two-pointers"), "Two-Pointers");
        assert_eq!(to_readable_enum("WRONG_ANSWER"), "Wrong Answer");
        assert_eq!(to_readable_label(""), "");
    }
}
