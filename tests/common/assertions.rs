//! Test assertion helpers

/// Assert that two floating-point values are approximately equal
///
/// Use this instead of `assert_eq!` for computed seconds and percentages.
#[allow(dead_code)]
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff < epsilon,
        "Float values not approximately equal:\n  actual: {}\n  expected: {}\n  diff: {} (epsilon: {})",
        actual, expected, diff, epsilon
    );
}

/// Assert that a JSON value is a number approximately equal to `expected`
#[allow(dead_code)]
pub fn assert_json_secs(value: &serde_json::Value, expected: f64) {
    let actual = value
        .as_f64()
        .unwrap_or_else(|| panic!("expected seconds, got {}", value));
    assert_approx_eq(actual, expected, 1e-9);
}
