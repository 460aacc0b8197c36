use std::path::Path;

use smellscope_core::{LineRange, Result, SmellscopeError};

use crate::catalog::RuleCatalog;

/// Extracts the literal source text around a finding, sized by the rule's
/// context policy.
///
/// The extractor is a pure function of file content and arguments: the
/// same span on an unmodified file always yields the same text. Lines are
/// returned byte-for-byte with their original terminators, with no
/// trimming and no re-indentation.
///
/// # Examples
///
/// ```no_run
/// use smellscope_context::catalog::RuleCatalog;
/// use smellscope_context::extractor::ContextExtractor;
/// use smellscope_core::LineRange;
/// use std::path::Path;
///
/// let extractor = ContextExtractor::new(RuleCatalog::builtin());
/// let context = extractor
///     .extract(Path::new("src/Billing.java"), LineRange::new(3, 3), "java:S1488")
///     .unwrap();
/// assert!(context.contains('\n'));
/// ```
pub struct ContextExtractor {
    catalog: RuleCatalog,
}

impl ContextExtractor {
    /// Create an extractor around the given catalog.
    pub fn new(catalog: RuleCatalog) -> Self {
        Self { catalog }
    }

    /// The catalog this extractor consults.
    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Extract the context window for a finding span.
    ///
    /// The window is `[max(1, span.start - lines_above),
    /// span.end + lines_below]` in 1-based inclusive line numbers, clipped
    /// to the file's bounds. Reading past end-of-file is not an error;
    /// the window is silently truncated. A window entirely past the end of
    /// the file (or a window on an empty file) yields the empty string.
    ///
    /// # Errors
    ///
    /// [`SmellscopeError::FileNotFound`] when `path` does not exist, and
    /// [`SmellscopeError::Io`] for any other read failure. Callers get the
    /// error rather than silently empty context.
    pub fn extract(&self, path: &Path, span: LineRange, rule_id: &str) -> Result<String> {
        let policy = self.catalog.policy_for(rule_id);

        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SmellscopeError::FileNotFound(path.to_path_buf())
            } else {
                SmellscopeError::Io(e)
            }
        })?;

        let window_start = span.start.saturating_sub(policy.lines_above).max(1);
        let window_end = span.end.saturating_add(policy.lines_below);

        let mut context = String::new();
        for (idx, line) in content.split_inclusive('\n').enumerate() {
            let line_number = idx as u32 + 1;
            if line_number < window_start {
                continue;
            }
            if line_number > window_end {
                break;
            }
            context.push_str(line);
        }

        Ok(context)
    }
}
