use std::path::Path;

use smellscope_core::DiffConfig;

/// Decides which changed files are worth tracking.
///
/// A file is tracked when its extension is in the configured set and its
/// path matches none of the skip patterns. Untracked files never enter the
/// change map.
///
/// # Examples
///
/// ```
/// use smellscope_difflens::filter::FileFilter;
/// use std::path::Path;
///
/// let filter = FileFilter::new(&["java".into()], &[]);
/// assert!(filter.is_tracked(Path::new("src/Billing.java")));
/// assert!(!filter.is_tracked(Path::new("scripts/deploy.py")));
/// ```
pub struct FileFilter {
    extensions: Vec<String>,
    skip_patterns: Vec<glob::Pattern>,
}

impl FileFilter {
    /// Create a filter from an extension set and glob skip patterns.
    ///
    /// Invalid glob patterns are ignored rather than failing the run.
    pub fn new(extensions: &[String], skip_patterns: &[String]) -> Self {
        let mut patterns = Vec::new();
        for pat in skip_patterns {
            if let Ok(p) = glob::Pattern::new(pat) {
                patterns.push(p);
            }
        }

        Self {
            extensions: extensions.to_vec(),
            skip_patterns: patterns,
        }
    }

    /// Create a filter from diff configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use smellscope_core::DiffConfig;
    /// use smellscope_difflens::filter::FileFilter;
    /// use std::path::Path;
    ///
    /// let filter = FileFilter::from_config(&DiffConfig::default());
    /// assert!(filter.is_tracked(Path::new("src/Main.java")));
    /// ```
    pub fn from_config(config: &DiffConfig) -> Self {
        Self::new(&config.extensions, &config.skip_patterns)
    }

    /// Check whether changes to `path` should be tracked.
    pub fn is_tracked(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        if !self.extensions.iter().any(|e| e == ext) {
            return false;
        }

        let path_str = path.to_string_lossy();
        !self.skip_patterns.iter().any(|p| p.matches(&path_str))
    }
}
