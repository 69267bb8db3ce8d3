//! Shared formatting utilities for console output

use console::Emoji;

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅ ", "[OK] ");

/// Crossmark emoji for failure
pub const CROSSMARK: Emoji = Emoji("❌ ", "[FAIL] ");

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊 ", "~ ");

/// Microscope emoji for parsing/inspection
pub const MICROSCOPE: Emoji = Emoji("🔍 ", ">> ");

/// Floppy emoji for persisted tables
pub const FLOPPY: Emoji = Emoji("💾 ", "# ");

/// Warning emoji for caution/alerts
pub const WARNING: Emoji = Emoji("⚠️  ", "! ");

/// Format seconds as a short human-readable duration
///
/// # Examples
///
/// ```
/// use pytest_digest::fmt::format_secs;
///
/// assert_eq!(format_secs(0.25), "250 ms");
/// assert_eq!(format_secs(42.0), "42.00 s");
/// assert_eq!(format_secs(5400.0), "1h 30m 0s");
/// ```
pub fn format_secs(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0} ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.2} s", secs)
    } else {
        let whole = secs.round() as u64;
        let (h, m, s) = (whole / 3600, (whole % 3600) / 60, whole % 60);
        if h > 0 {
            format!("{}h {}m {}s", h, m, s)
        } else {
            format!("{}m {}s", m, s)
        }
    }
}

/// Truncate string to at most `max_len` characters
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
