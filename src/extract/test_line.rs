//! Shared splitting of result lines such as
//! `FAILED test_foo::TestBar[param1] - ValueError: bad input`
//! or `test_foo.py::test_x PASSED [ 50%]`.

use crate::record::TestStatus;
use regex::Regex;
use std::sync::OnceLock;

static STATUS_WORD_RE: OnceLock<Regex> = OnceLock::new();
static STATUS_KEYWORD_RE: OnceLock<Regex> = OnceLock::new();

/// Leftmost status keyword, preferring a standalone word over one embedded
/// in a test id such as `test_ERROR_paths.py`
fn find_status_keyword(line: &str) -> Option<regex::Match<'_>> {
    let word = STATUS_WORD_RE.get_or_init(|| {
        // SAFETY: static alternation of literals.
        Regex::new(r"\b(?:PASSED|FAILED|ERROR|SKIPPED)\b").expect("status word regex is valid")
    });
    let keyword = STATUS_KEYWORD_RE.get_or_init(|| {
        // SAFETY: static alternation of literals.
        Regex::new("PASSED|FAILED|ERROR|SKIPPED").expect("status keyword regex is valid")
    });
    word.find(line).or_else(|| keyword.find(line))
}

/// Fields recovered from one result line
///
/// Anything the line does not carry is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TestLine<'a> {
    pub status: TestStatus,
    pub name: Option<String>,
    pub category: Option<&'a str>,
    pub arguments: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Split a line containing a status keyword; `None` when it has none
pub(crate) fn parse_test_line(line: &str) -> Option<TestLine<'_>> {
    let found = find_status_keyword(line)?;
    let status = TestStatus::from_keyword(found.as_str())?;

    // `pytest -v` layout: the test id precedes the keyword and runs from
    // the token holding `::` up to the keyword, spaces in arguments included
    let before = line[..found.start()].trim_end();
    if let Some(sep) = before.find("::") {
        let start = before[..sep]
            .rfind(char::is_whitespace)
            .map_or(0, |i| i + 1);
        let (name, category, arguments) = split_test_id(&before[start..]);
        return Some(TestLine {
            status,
            name,
            category,
            arguments,
            description: None,
        });
    }

    let rest = &line[found.end()..];
    let (head, description) = split_description(rest);
    let (name, category, arguments) = split_test_id(head);
    let name = name.filter(|n| !is_progress_marker(n));

    Some(TestLine {
        status,
        name,
        category,
        arguments,
        description,
    })
}

/// `test_foo::TestBar[param1]` into name, category and arguments
///
/// Arguments keep their closing bracket.
pub(crate) fn split_test_id(id: &str) -> (Option<String>, Option<&str>, Option<&str>) {
    let (left, right) = match id.split_once("::") {
        Some((left, right)) => (left, Some(right)),
        None => (id, None),
    };

    let name: String = left.chars().filter(|c| !c.is_whitespace()).collect();
    let name = (!name.is_empty()).then_some(name);

    let Some(right) = right else {
        return (name, None, None);
    };
    let (category, arguments) = match right.split_once('[') {
        Some((category, arguments)) => (category, Some(arguments)),
        None => (right, None),
    };

    (name, non_empty(category.trim()), arguments.and_then(non_empty))
}

/// Separate a trailing ` - description` from the test id part
fn split_description(rest: &str) -> (&str, Option<&str>) {
    let dash = rest.find(" - ");
    let bracket = rest.find('[');

    let bracket_first = match (bracket, dash) {
        (Some(b), Some(d)) => b < d,
        (Some(_), None) => true,
        _ => false,
    };

    if bracket_first {
        if let Some(i) = rest.find("] - ") {
            return (&rest[..i + 1], non_empty(rest[i + 4..].trim()));
        }
        return (rest, None);
    }

    match dash {
        Some(d) => (&rest[..d], non_empty(rest[d + 3..].trim())),
        None => (rest, None),
    }
}

/// `ValueError: bad input` into error type and details
pub(crate) fn split_error(description: &str) -> (Option<&str>, Option<&str>) {
    match description.split_once([':', ' ']) {
        Some((error, details)) => (non_empty(error.trim()), non_empty(details.trim())),
        None => (non_empty(description.trim()), None),
    }
}

/// `[ 50%]` or `[100%]` once whitespace is removed
fn is_progress_marker(name: &str) -> bool {
    name.strip_prefix('[')
        .and_then(|n| n.strip_suffix("%]"))
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_first_line_splits_all_parts() {
        let line = "FAILED test_foo::TestBar[param1] - ValueError: bad input";
        let parsed = parse_test_line(line).expect("line has a keyword");

        assert_eq!(parsed.status, TestStatus::Failed);
        assert_eq!(parsed.name.as_deref(), Some("test_foo"));
        assert_eq!(parsed.category, Some("TestBar"));
        assert_eq!(parsed.arguments, Some("param1]"));
        assert_eq!(parsed.description, Some("ValueError: bad input"));
    }

    #[test]
    fn test_parse_verbose_line_reads_id_before_keyword() {
        let parsed = parse_test_line("tests/test_a.py::test_x[1-2] PASSED      [ 50%]").unwrap();

        assert_eq!(parsed.status, TestStatus::Passed);
        assert_eq!(parsed.name.as_deref(), Some("tests/test_a.py"));
        assert_eq!(parsed.category, Some("test_x"));
        assert_eq!(parsed.arguments, Some("1-2]"));
        assert_eq!(parsed.description, None);
    }

    #[test]
    fn test_parse_verbose_line_keeps_spaces_inside_arguments() {
        let parsed =
            parse_test_line("tests/test_a.py::test_x[hello world] PASSED [ 50%]").unwrap();

        assert_eq!(parsed.name.as_deref(), Some("tests/test_a.py"));
        assert_eq!(parsed.category, Some("test_x"));
        assert_eq!(parsed.arguments, Some("hello world]"));
    }

    #[test]
    fn test_parse_progress_marker_is_not_a_name() {
        let parsed = parse_test_line("PASSED [ 50%]").unwrap();
        assert_eq!(parsed.name, None);

        let parsed = parse_test_line("SKIPPED [100%]").unwrap();
        assert_eq!(parsed.name, None);
    }

    #[test]
    fn test_parse_line_without_separator_pads_missing_fields() {
        let parsed = parse_test_line("SKIPPED test_module").unwrap();
        assert_eq!(parsed.status, TestStatus::Skipped);
        assert_eq!(parsed.name.as_deref(), Some("test_module"));
        assert_eq!(parsed.category, None);
        assert_eq!(parsed.arguments, None);
    }

    #[test]
    fn test_parse_line_without_keyword_is_none() {
        assert!(parse_test_line("collected 4 items").is_none());
        assert!(parse_test_line("").is_none());
    }

    #[test]
    fn test_parse_bare_keyword_has_no_name() {
        let parsed = parse_test_line("PASSED").unwrap();
        assert_eq!(parsed.name, None);
    }

    #[test]
    fn test_parse_dash_description_without_brackets() {
        let parsed = parse_test_line("ERROR test_a.py::test_b - KeyError: ['x']").unwrap();
        assert_eq!(parsed.category, Some("test_b"));
        assert_eq!(parsed.arguments, None);
        assert_eq!(parsed.description, Some("KeyError: ['x']"));
    }

    #[test]
    fn test_parse_bracket_arguments_may_contain_dashes() {
        let parsed = parse_test_line("FAILED t::c[a - b] - OSError: gone").unwrap();
        assert_eq!(parsed.arguments, Some("a - b]"));
        assert_eq!(parsed.description, Some("OSError: gone"));
    }

    #[test]
    fn test_parse_prefers_standalone_keyword_over_embedded_one() {
        let parsed = parse_test_line("test_ERROR_paths.py::test_a PASSED [ 10%]").unwrap();
        assert_eq!(parsed.status, TestStatus::Passed);
        assert_eq!(parsed.name.as_deref(), Some("test_ERROR_paths.py"));
    }

    #[test]
    fn test_parse_embedded_keyword_still_counts_when_alone() {
        let parsed = parse_test_line("xFAILEDx").unwrap();
        assert_eq!(parsed.status, TestStatus::Failed);
    }

    #[test]
    fn test_split_error_on_first_colon_or_space() {
        assert_eq!(
            split_error("ValueError: bad input"),
            (Some("ValueError"), Some("bad input"))
        );
        assert_eq!(split_error("assert 1 == 2"), (Some("assert"), Some("1 == 2")));
        assert_eq!(split_error("Timeout"), (Some("Timeout"), None));
    }

    #[test]
    fn test_split_test_id_removes_whitespace_from_name() {
        let (name, category, _) = split_test_id(" test foo ::Cls");
        assert_eq!(name.as_deref(), Some("testfoo"));
        assert_eq!(category, Some("Cls"));
    }
}
