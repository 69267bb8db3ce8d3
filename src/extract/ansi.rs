//! Terminal escape sequence removal

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// CSI (`ESC [ ... final`), OSC (`ESC ] ... BEL|ST`) and two-byte `ESC x` escapes
static ANSI_ESCAPE_RE: OnceLock<Regex> = OnceLock::new();

fn ansi_escape_re() -> &'static Regex {
    ANSI_ESCAPE_RE.get_or_init(|| {
        // SAFETY: static pattern, exercised by the tests below.
        Regex::new(r"\x1B(?:\[[0-?]*[ -/]*[@-~]|\][^\x07\x1B]*(?:\x07|\x1B\\)|[@-_])")
            .expect("ANSI escape regex is valid")
    })
}

/// Remove terminal escape sequences, leaving every other byte untouched
///
/// Text without escapes is returned borrowed.
///
/// # Examples
///
/// ```
/// use pytest_digest::extract::sanitize;
///
/// assert_eq!(sanitize("\x1b[32mPASSED\x1b[0m test_a"), "PASSED test_a");
/// assert_eq!(sanitize("plain"), "plain");
/// ```
pub fn sanitize(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\x1B') {
        return Cow::Borrowed(raw);
    }
    ansi_escape_re().replace_all(raw, "")
}
