//! Transcript segmentation into named sections
//!
//! pytest separates its report blocks with header lines such as
//! `===== test session starts =====` or `----- live log call -----`.
//! [`Segmenter::segment`] walks the transcript once, opens a new section at
//! every header line and files the following lines under it.

use log::debug;

/// Substrings that mark boilerplate lines to drop wherever they appear
pub const EXCLUDED_KEYWORDS: &[&str] = &["deselected", "passed in", "grand total", "live log"];

/// Marker that switches a whole document into live-log mode
pub const LIVE_LOG_MARKER: &str = "live log";

/// What a section contains, as far as the parsers care
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// The per-test result table
    Session,
    /// A `pytest-durations` timing table
    DurationTop,
    /// Short test summary (or any other summary block)
    Summary,
    /// Stand-in for the session table when live logging was enabled
    LiveLog,
    /// Anything else; ignored downstream
    Other,
}

/// Header substring that names a section
#[derive(Debug, Clone, Copy)]
pub struct SectionRule {
    /// Lowercase substring looked for in the header text
    pub needle: &'static str,
    /// Kind assigned on match
    pub kind: SectionKind,
}

/// Header vocabulary, first match wins
pub const SECTION_RULES: &[SectionRule] = &[
    SectionRule {
        needle: "test session",
        kind: SectionKind::Session,
    },
    SectionRule {
        needle: "duration top",
        kind: SectionKind::DurationTop,
    },
    SectionRule {
        needle: "summary",
        kind: SectionKind::Summary,
    },
];

impl SectionKind {
    /// Classify a stripped header line
    pub fn classify(header: &str) -> Self {
        let lowered = header.to_lowercase();
        SECTION_RULES
            .iter()
            .find(|rule| lowered.contains(rule.needle))
            .map(|rule| rule.kind)
            .unwrap_or(SectionKind::Other)
    }
}

/// Document-wide layout, resolved once before segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// Normal transcript with a session result table
    Standard,
    /// Live logging interleaved output; the session table is unusable
    LiveLog,
}

impl LogMode {
    /// Detect the mode of a sanitized transcript
    pub fn detect(text: &str) -> Self {
        if text.contains(LIVE_LOG_MARKER) {
            LogMode::LiveLog
        } else {
            LogMode::Standard
        }
    }
}

/// A header and the lines filed under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    /// Classified kind
    pub kind: SectionKind,
    /// Header text with the delimiter runs stripped
    pub header: &'a str,
    /// Content lines, in transcript order
    pub lines: Vec<&'a str>,
}

/// Result of segmenting one transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments<'a> {
    /// Document mode
    pub mode: LogMode,
    /// Sections in transcript order
    pub sections: Vec<Section<'a>>,
}

impl<'a> Segments<'a> {
    /// Sections of one kind, in transcript order
    pub fn of_kind(&self, kind: SectionKind) -> impl Iterator<Item = &Section<'a>> {
        self.sections.iter().filter(move |s| s.kind == kind)
    }
}

/// Line-scanning segmenter with a configurable exclusion set
#[derive(Debug, Clone)]
pub struct Segmenter {
    excluded: Vec<String>,
}

impl Segmenter {
    /// Segmenter with the built-in exclusion keywords
    pub fn new() -> Self {
        Self {
            excluded: EXCLUDED_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Add more keywords whose lines are dropped
    pub fn with_exclusions<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for keyword in extra {
            let keyword = keyword.into();
            if !keyword.is_empty() && !self.excluded.contains(&keyword) {
                self.excluded.push(keyword);
            }
        }
        self
    }

    fn is_excluded(&self, line: &str) -> bool {
        self.excluded.iter().any(|k| line.contains(k.as_str()))
    }

    /// Split a sanitized transcript into sections
    ///
    /// Never fails: unknown headers become [`SectionKind::Other`] and lines
    /// before the first header are ignored.
    pub fn segment<'a>(&self, text: &'a str) -> Segments<'a> {
        self.segment_with_mode(text, LogMode::detect(text))
    }

    /// Split a transcript whose mode was already resolved
    pub fn segment_with_mode<'a>(&self, text: &'a str, mode: LogMode) -> Segments<'a> {
        let mut sections: Vec<Section<'a>> = Vec::new();
        let mut dropped = 0usize;

        for line in text.lines() {
            if self.is_excluded(line) {
                dropped += 1;
                continue;
            }

            if let Some(header) = header_text(line) {
                sections.push(Section {
                    kind: SectionKind::classify(header),
                    header,
                    lines: Vec::new(),
                });
            } else if let Some(open) = sections.last_mut() {
                open.lines.push(line);
            }
        }

        if mode == LogMode::LiveLog {
            sections.retain(|s| s.kind != SectionKind::Session);
            sections.insert(
                0,
                Section {
                    kind: SectionKind::LiveLog,
                    header: LIVE_LOG_MARKER,
                    lines: Vec::new(),
                },
            );
        }

        debug!(
            "segmented transcript into {} sections ({:?} mode, {} boilerplate lines dropped)",
            sections.len(),
            mode,
            dropped
        );

        Segments { mode, sections }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Header text of a delimiter line, or `None` for ordinary lines
fn header_text(line: &str) -> Option<&str> {
    if !line.starts_with(['=', '-']) {
        return None;
    }
    Some(line.trim_matches(['=', '-']).trim())
}
