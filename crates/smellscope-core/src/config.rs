use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SmellscopeError;
use crate::types::ContextPolicy;

/// Top-level configuration loaded from `.smellscope.toml`.
///
/// # Examples
///
/// ```
/// use smellscope_core::SmellscopeConfig;
///
/// let config = SmellscopeConfig::default();
/// assert_eq!(config.diff.extensions, vec!["java"]);
/// assert_eq!(config.context.margin, 10);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmellscopeConfig {
    /// Diff parsing settings.
    #[serde(default)]
    pub diff: DiffConfig,
    /// Context extraction settings.
    #[serde(default)]
    pub context: ContextConfig,
    /// Per-rule context policy overrides, keyed by rule id.
    ///
    /// A `default` key replaces the built-in fallback policy.
    #[serde(default)]
    pub rules: HashMap<String, ContextPolicy>,
}

impl SmellscopeConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SmellscopeError::Io`] if the file cannot be read, or
    /// [`SmellscopeError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use smellscope_core::SmellscopeConfig;
    /// use std::path::Path;
    ///
    /// let config = SmellscopeConfig::from_file(Path::new(".smellscope.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, SmellscopeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`SmellscopeError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use smellscope_core::SmellscopeConfig;
    ///
    /// let toml = r#"
    /// [context]
    /// margin = 5
    /// "#;
    /// let config = SmellscopeConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.context.margin, 5);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, SmellscopeError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Diff parsing configuration.
///
/// # Examples
///
/// ```
/// use smellscope_core::DiffConfig;
///
/// let config = DiffConfig::default();
/// assert_eq!(config.extensions, vec!["java"]);
/// assert!(config.skip_patterns.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffConfig {
    /// File extensions whose changes are tracked (default: `["java"]`).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Glob patterns for paths to skip even when the extension matches.
    #[serde(default)]
    pub skip_patterns: Vec<String>,
}

fn default_extensions() -> Vec<String> {
    vec!["java".into()]
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            skip_patterns: Vec::new(),
        }
    }
}

/// Context extraction configuration.
///
/// # Examples
///
/// ```
/// use smellscope_core::ContextConfig;
///
/// let config = ContextConfig::default();
/// assert_eq!(config.margin, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Fixed padding applied to every finding span before the per-rule
    /// window is computed (default: 10 lines above and below).
    #[serde(default = "default_margin")]
    pub margin: u32,
}

fn default_margin() -> u32 {
    10
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            margin: default_margin(),
        }
    }
}
