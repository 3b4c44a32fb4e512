//! Diagnostic types and the reporting sink
//!
//! Provides diagnostics with:
//! - Precise code positioning with line/column information
//! - Secondary locations, each with an optional message
//! - An optional remediation gap (effort estimate)

use biome_text_size::TextRange;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Represents an issue found in a regular expression, mapped onto source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique identifier for the check that generated this diagnostic
    pub rule_id: String,
    /// Severity level of the diagnostic
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Primary location in the source file
    pub location: Location,
    /// Related locations, in reporting order
    pub secondary_locations: Vec<SecondaryLocation>,
    /// Remediation gap
    pub gap: Option<f64>,
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational messages
    Info,
    /// Hints for improvements
    Hint,
    /// Warnings that should be addressed
    Warning,
    /// Errors that must be fixed
    Error,
}

/// Location information for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// End line number (1-based)
    pub end_line: usize,
    /// End column number (1-based, exclusive)
    pub end_column: usize,
    /// Byte offset in the file
    pub offset: usize,
    /// Length of the span in bytes
    pub length: usize,
}

/// A secondary location with an optional explanatory message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecondaryLocation {
    pub location: Location,
    pub message: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            location,
            secondary_locations: Vec::new(),
            gap: None,
        }
    }

    /// Add a secondary location to this diagnostic
    pub fn with_secondary(mut self, secondary: SecondaryLocation) -> Self {
        self.secondary_locations.push(secondary);
        self
    }

    /// Set the remediation gap
    pub fn with_gap(mut self, gap: Option<f64>) -> Self {
        self.gap = gap;
        self
    }
}

impl Location {
    /// Text covered by this location
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.offset..self.offset + self.length]
    }
}

impl SecondaryLocation {
    pub fn new(location: Location, message: Option<String>) -> Self {
        Self { location, message }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.location, self.severity, self.rule_id, self.message
        )
    }
}

/// Receiver of translated issues
pub trait IssueSink {
    fn report_issue(&mut self, diagnostic: Diagnostic);
}

impl IssueSink for Vec<Diagnostic> {
    fn report_issue(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Line index for converting byte offsets to line/column positions
#[derive(Debug, Clone)]
pub struct SourceMap {
    /// Byte offset of the start of each line
    line_starts: Vec<usize>,
}

impl SourceMap {
    /// Create a source map from source text
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (idx, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(idx + 1);
            }
        }

        Self { line_starts }
    }

    /// Convert byte offset to 1-based (line, column)
    ///
    /// Columns count characters, not bytes.
    pub fn offset_to_position(&self, offset: usize, source: &str) -> (usize, usize) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };

        let line_start = self.line_starts[line_idx];
        let line_text = &source[line_start..offset.min(source.len())];
        let column = line_text.chars().count() + 1;

        (line_idx + 1, column)
    }

    /// Create a Location from a source range
    pub fn range_to_location(&self, range: TextRange, source: &str, file: &Path) -> Location {
        let start = usize::from(range.start());
        let end = usize::from(range.end());
        let (line, column) = self.offset_to_position(start, source);
        let (end_line, end_column) = self.offset_to_position(end, source);

        Location {
            file: file.to_path_buf(),
            line,
            column,
            end_line,
            end_column,
            offset: start,
            length: end - start,
        }
    }
}
