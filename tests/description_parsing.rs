//! End-to-end checks of statement parsing on realistic imported statements.

use codepractice::description::{parse_examples_from_statement, parse_problem_description};

const IMPORTED_STATEMENT: &str = "\
Polycarp has $n$ coins, the value of the $i$-th coin is $a_i$. Polycarp wants
to distribute all the coins between his pockets, but he cannot put two coins
with the same values into the same pocket.

For example, if Polycarp has got six coins represented as an array
$a = [1, 2, 4, 3, 3, 2]$, he can distribute the coins into two pockets.

-----Input-----

The first line of the input contains one integer $n$ ($1 \\le n \\le 100$).

The second line contains $n$ integers $a_1, a_2, \\dots, a_n$.

-----Output-----

Print only one integer - the minimum number of pockets.

-----Examples-----
Input
6
1 2 4 3 3 2

Output
2

Input
1
100

Output
1

Source: Codeforces Round 1003
Imported from APPS dataset (introductory split).
";

#[test]
fn test_imported_statement_sections() {
    let parsed = parse_problem_description(IMPORTED_STATEMENT);

    assert_eq!(parsed.statement_paragraphs.len(), 2);
    assert!(parsed.statement_paragraphs[0].starts_with("Polycarp has $n$ coins"));
    assert!(!parsed.statement_paragraphs[0].contains('\n'));
    assert!(parsed.input_format.starts_with("The first line of the input"));
    assert_eq!(
        parsed.output_format,
        "Print only one integer - the minimum number of pockets."
    );
    assert_eq!(parsed.source.as_deref(), Some("Codeforces Round 1003"));
    assert_eq!(
        parsed.import_note.as_deref(),
        Some("Imported from APPS dataset (introductory split).")
    );
}

#[test]
fn test_imported_statement_examples() {
    let examples = parse_problem_description(IMPORTED_STATEMENT).examples();

    assert_eq!(examples.len(), 2);
    assert_eq!(examples[0].input, "6\n1 2 4 3 3 2");
    assert_eq!(examples[0].output, "2");
    assert_eq!(examples[1].input, "1\n100");
    assert_eq!(examples[1].output, "1");
}

#[test]
fn test_inline_examples_with_explanation() {
    let text = "Input: 3 4 Output: 7 Explanation: 3 + 4 = 7\nInput: 1 1 Output: 2";
    let examples = parse_examples_from_statement(text);

    assert_eq!(examples.len(), 2);
    assert_eq!(examples[0].input, "3 4");
    assert_eq!(examples[0].output, "7");
    assert_eq!(examples[0].explanation.as_deref(), Some("3 + 4 = 7"));
    assert_eq!(examples[1].explanation, None);
}

#[test]
fn test_duplicate_examples_are_dropped() {
    let text = "Input\n5\nOutput\n25\nInput\n5\nOutput\n25";
    assert_eq!(parse_examples_from_statement(text).len(), 1);
}

#[test]
fn test_garbage_never_fails() {
    for raw in ["", "-----", "Source:", "-----Input-----", "Output\n\n\nInput"] {
        let parsed = parse_problem_description(raw);
        let _ = parsed.examples();
    }
}
