use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An inclusive range of 1-based source line numbers.
///
/// Matches source-file numbering: `start >= 1` and `end >= start`.
///
/// # Examples
///
/// ```
/// use smellscope_core::LineRange;
///
/// let range = LineRange::new(10, 16);
/// assert_eq!(range.len(), 7);
/// assert!(range.overlaps(LineRange::new(16, 20)));
/// assert!(!range.overlaps(LineRange::new(17, 20)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRange {
    /// First line of the range (1-based).
    pub start: u32,
    /// Last line of the range, inclusive.
    pub end: u32,
}

impl LineRange {
    /// Create a new range.
    ///
    /// Callers are expected to uphold `1 <= start <= end`.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start >= 1, "line numbers are 1-based");
        debug_assert!(end >= start, "range end must not precede start");
        Self { start, end }
    }

    /// Number of lines covered by the range.
    pub fn len(self) -> u32 {
        self.end - self.start + 1
    }

    /// Always `false`: an inclusive range covers at least one line.
    pub fn is_empty(self) -> bool {
        false
    }

    /// Returns `true` if `self` and `other` share at least one line.
    pub fn overlaps(self, other: LineRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Widen the range by `margin` lines on both sides, clamping the start
    /// at line 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use smellscope_core::LineRange;
    ///
    /// assert_eq!(LineRange::new(12, 14).padded(10), LineRange::new(2, 24));
    /// assert_eq!(LineRange::new(3, 3).padded(10), LineRange::new(1, 13));
    /// ```
    pub fn padded(self, margin: u32) -> Self {
        Self {
            start: self.start.saturating_sub(margin).max(1),
            end: self.end.saturating_add(margin),
        }
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A single static-analysis finding, produced by an external analyzer.
///
/// Findings are read-only input: smellscope never evaluates rules itself,
/// it only decides which findings matter for a review and what source text
/// to show next to them.
///
/// # Examples
///
/// ```
/// use smellscope_core::Finding;
///
/// let json = r#"{
///     "filePath": "src/Billing.java",
///     "startLine": 10,
///     "endLine": 16,
///     "ruleId": "java:S1144",
///     "description": "Remove this unused private method."
/// }"#;
/// let finding: Finding = serde_json::from_str(json).unwrap();
/// assert_eq!(finding.rule_id, "java:S1144");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Path of the affected file, relative to the repository root.
    pub file_path: PathBuf,
    /// First line of the flagged span (1-based).
    pub start_line: u32,
    /// Last line of the flagged span, inclusive.
    pub end_line: u32,
    /// Analyzer rule identifier, e.g. `java:S1488`.
    pub rule_id: String,
    /// Human-readable description of the violation.
    pub description: String,
}

impl Finding {
    /// The flagged span as a [`LineRange`].
    pub fn span(&self) -> LineRange {
        LineRange::new(self.start_line, self.end_line.max(self.start_line))
    }
}

/// A finding paired with its extracted source context: the final output
/// unit, ready for review-comment rendering.
///
/// `context` is literal multi-line source text, newline-terminated per
/// original line, never re-indented or otherwise altered.
///
/// # Examples
///
/// ```
/// use smellscope_core::Issue;
/// use std::path::PathBuf;
///
/// let issue = Issue {
///     file: PathBuf::from("/repo/src/Billing.java"),
///     start_line: 10,
///     end_line: 16,
///     rule_id: "java:S1144".into(),
///     description: "Remove this unused private method.".into(),
///     context: "    private void unused() {\n    }\n".into(),
/// };
/// assert!(issue.context.ends_with('\n'));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Absolute path of the affected file.
    pub file: PathBuf,
    /// First line of the original finding (1-based).
    pub start_line: u32,
    /// Last line of the original finding, inclusive.
    pub end_line: u32,
    /// Analyzer rule identifier.
    pub rule_id: String,
    /// Human-readable description of the violation.
    pub description: String,
    /// Extracted source text surrounding the finding.
    pub context: String,
}

/// Coarse classification of the code region a rule usually points at.
///
/// Carried as policy data for consumers that want to label or group
/// context windows; extraction itself never inspects syntax.
///
/// # Examples
///
/// ```
/// use smellscope_core::ScopeHint;
///
/// let hint: ScopeHint = serde_json::from_str("\"method\"").unwrap();
/// assert_eq!(hint, ScopeHint::Method);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeHint {
    /// The rule points at a method or function.
    Method,
    /// The rule points at a whole class.
    Class,
    /// The rule points at a field or variable declaration.
    Field,
    /// The rule points at a statement or block.
    Block,
}

impl fmt::Display for ScopeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeHint::Method => write!(f, "method"),
            ScopeHint::Class => write!(f, "class"),
            ScopeHint::Field => write!(f, "field"),
            ScopeHint::Block => write!(f, "block"),
        }
    }
}

/// How much context to extract around a finding for one rule.
///
/// Policies are data, not behavior: `scope` and `needs_wider_context` are
/// hints recorded for consumers and future extension, while `lines_above`
/// and `lines_below` drive the actual window.
///
/// # Examples
///
/// ```
/// use smellscope_core::{ContextPolicy, ScopeHint};
///
/// let policy = ContextPolicy {
///     lines_above: 2,
///     lines_below: 3,
///     scope: ScopeHint::Block,
///     needs_wider_context: false,
/// };
/// assert_eq!(policy.lines_above, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextPolicy {
    /// Lines to include above the finding span.
    #[serde(default)]
    pub lines_above: u32,
    /// Lines to include below the finding span.
    #[serde(default)]
    pub lines_below: u32,
    /// Region the rule usually points at.
    #[serde(default = "default_scope")]
    pub scope: ScopeHint,
    /// Whether the rule benefits from seeing surrounding declarations.
    #[serde(default)]
    pub needs_wider_context: bool,
}

fn default_scope() -> ScopeHint {
    ScopeHint::Block
}

impl Default for ContextPolicy {
    fn default() -> Self {
        Self {
            lines_above: 0,
            lines_below: 0,
            scope: default_scope(),
            needs_wider_context: false,
        }
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument
/// parsing.
///
/// # Examples
///
/// ```
/// use smellscope_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
    /// SARIF v2.1.0 (analyze subcommand only).
    Sarif,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Sarif => write!(f, "sarif"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
