//! Marker-based classification of subject tool output.

use regex::Regex;
use std::sync::OnceLock;

/// Informational progress marker emitted in CI builds.
pub const INFO_MARKER: &str = "[TEST_CI]";
/// Error raised by the tool itself.
pub const TOOL_ERROR_MARKER: &str = "[*Error*]";
/// Error raised by the underlying library.
pub const LIBRARY_ERROR_MARKER: &str = "[Error]";
/// Non-fatal warning.
pub const WARNING_MARKER: &str = "[Warning]";

/// Static regex for ANSI colour escapes.
fn ansi_escape_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").ok())
        .as_ref()
}

/// Class of a marker-bearing output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Info,
    ToolError,
    LibraryError,
    Warning,
}

impl LineClass {
    /// Classes in priority order; the first marker found in a line wins.
    pub const PRIORITY: [Self; 4] = [
        Self::Info,
        Self::ToolError,
        Self::LibraryError,
        Self::Warning,
    ];

    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Info => INFO_MARKER,
            Self::ToolError => TOOL_ERROR_MARKER,
            Self::LibraryError => LIBRARY_ERROR_MARKER,
            Self::Warning => WARNING_MARKER,
        }
    }
}

/// Classify a single line, or `None` if it carries no marker.
#[must_use]
pub fn classify_line(line: &str) -> Option<LineClass> {
    LineClass::PRIORITY
        .into_iter()
        .find(|class| line.contains(class.marker()))
}

/// Captured output of one test case, split and classified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub exit_status: i32,
    /// Every line of output, including unmarked ones.
    pub lines: Vec<String>,
    pub info: Vec<String>,
    pub tool_errors: Vec<String>,
    pub library_errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RunResult {
    /// Split `output` on line feeds and classify every line.
    ///
    /// A final newline leaves an empty trailing element in `lines`; it carries
    /// no marker and never lands in a bucket.
    #[must_use]
    pub fn from_output(exit_status: i32, output: &str) -> Self {
        let mut result = Self {
            exit_status,
            ..Self::default()
        };

        for raw in output.split('\n') {
            let line = raw.strip_suffix('\r').unwrap_or(raw).to_string();
            match classify_line(&line) {
                Some(LineClass::Info) => result.info.push(line.clone()),
                Some(LineClass::ToolError) => result.tool_errors.push(line.clone()),
                Some(LineClass::LibraryError) => result.library_errors.push(line.clone()),
                Some(LineClass::Warning) => result.warnings.push(line.clone()),
                None => {}
            }
            result.lines.push(line);
        }

        result
    }

    /// Lines of the given class.
    #[must_use]
    pub fn bucket(&self, class: LineClass) -> &[String] {
        match class {
            LineClass::Info => &self.info,
            LineClass::ToolError => &self.tool_errors,
            LineClass::LibraryError => &self.library_errors,
            LineClass::Warning => &self.warnings,
        }
    }
}

/// Text following `marker` in `line`, without the separating space and
/// terminal colour codes.
#[must_use]
pub fn marker_message(line: &str, marker: &str) -> String {
    let rest = line
        .split_once(marker)
        .map_or(line, |(_, after)| after);
    let rest = rest.strip_prefix(' ').unwrap_or(rest);
    strip_ansi(rest).trim_end().to_string()
}

fn strip_ansi(text: &str) -> String {
    match ansi_escape_regex() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}
