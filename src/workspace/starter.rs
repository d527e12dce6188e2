//! Built-in language list and per-language starter templates.

use crate::api::{Language, ProblemDetail};

/// Python 3, selected by default when the backend offers it.
pub const DEFAULT_LANGUAGE_ID: u32 = 71;

pub const LANGUAGE_C: u32 = 50;
pub const LANGUAGE_CPP: u32 = 54;
pub const LANGUAGE_JAVA: u32 = 62;

const C_TEMPLATE: &str = r#"#include <stdio.h>

int main() {
    // Read from stdin and print to stdout exactly as expected by tests.
    return 0;
}"#;

const CPP_TEMPLATE: &str = r#"#include <bits/stdc++.h>
using namespace std;

int main() {
    ios::sync_with_stdio(false);
    cin.tie(nullptr);

    // Read from stdin and print to stdout exactly as expected by tests.
    return 0;
}"#;

const JAVA_TEMPLATE: &str = r#"import java.io.*;

public class Main {
    public static void main(String[] args) throws Exception {
        BufferedReader br = new BufferedReader(new InputStreamReader(System.in));
        // Read input from br and print exact expected output.
    }
}"#;

/// Languages offered when the backend list is unavailable or empty.
pub fn fallback_languages() -> Vec<Language> {
    vec![
        Language::new(DEFAULT_LANGUAGE_ID, "Python (3.x)"),
        Language::new(LANGUAGE_C, "C (GCC)"),
        Language::new(LANGUAGE_CPP, "C++ (GCC)"),
        Language::new(LANGUAGE_JAVA, "Java (OpenJDK)"),
    ]
}

/// Picks the language to use after a load.
///
/// Keeps `current` when it is still offered, otherwise prefers
/// [`DEFAULT_LANGUAGE_ID`], otherwise the first language.
pub fn pick_language(languages: &[Language], current: u32) -> Option<&Language> {
    languages
        .iter()
        .find(|language| language.id == current)
        .or_else(|| {
            languages
                .iter()
                .find(|language| language.id == DEFAULT_LANGUAGE_ID)
        })
        .or_else(|| languages.first())
}

/// Starter code for `problem` in the given language.
///
/// Python and unknown languages use the problem's own template; C, C++ and
/// Java get a stdin/stdout skeleton.
pub fn build_starter_code(problem: &ProblemDetail, language_id: u32) -> String {
    match language_id {
        LANGUAGE_C => C_TEMPLATE.to_string(),
        LANGUAGE_CPP => CPP_TEMPLATE.to_string(),
        LANGUAGE_JAVA => JAVA_TEMPLATE.to_string(),
        _ => problem.starter_code.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Difficulty;

    fn problem() -> ProblemDetail {
        ProblemDetail {
            id: 1,
            slug: "echo".to_string(),
            title: "Echo".to_string(),
            difficulty: Difficulty::Easy,
            summary: String::new(),
            description: String::new(),
            concepts: Vec::new(),
            constraints: Vec::new(),
            starter_code: "def solve():\n    pass\n".to_string(),
            examples: Vec::new(),
            visible_tests: Vec::new(),
        }
    }

    #[test]
    fn test_python_and_unknown_use_problem_template() {
        let problem = problem();
        assert_eq!(build_starter_code(&problem, 71), problem.starter_code);
        assert_eq!(build_starter_code(&problem, 999), problem.starter_code);
    }

    #[test]
    fn test_compiled_languages_get_skeletons() {
        let problem = problem();
        assert!(build_starter_code(&problem, LANGUAGE_C).contains("#include <stdio.h>"));
        assert!(build_starter_code(&problem, LANGUAGE_CPP).contains("cin.tie(nullptr)"));
        assert!(build_starter_code(&problem, LANGUAGE_JAVA).contains("public class Main"));
    }

    #[test]
    fn test_pick_language_prefers_current_then_default() {
        let languages = fallback_languages();
        assert_eq!(pick_language(&languages, LANGUAGE_JAVA).map(|l| l.id), Some(62));
        assert_eq!(pick_language(&languages, 12345).map(|l| l.id), Some(71));

        let no_python = vec![Language::new(54, "C++"), Language::new(62, "Java")];
        assert_eq!(pick_language(&no_python, 71).map(|l| l.id), Some(54));
        assert!(pick_language(&[], 71).is_none());
    }
}
