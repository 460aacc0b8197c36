use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use smellscope_core::{Finding, Result};

/// A findings report as emitted by the external analyzer step.
///
/// The wire shape is a single JSON object with an `issues` array of
/// findings in the analyzer's camelCase key style.
///
/// # Examples
///
/// ```
/// use smellscope_context::report::FindingsReport;
///
/// let report = FindingsReport::from_json(r#"{
///     "issues": [{
///         "filePath": "src/SomeFile.java",
///         "startLine": 10,
///         "endLine": 16,
///         "ruleId": "java:S1144",
///         "description": "Unused private method"
///     }]
/// }"#).unwrap();
/// assert_eq!(report.issues.len(), 1);
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingsReport {
    /// The reported findings, in analyzer order.
    #[serde(default)]
    pub issues: Vec<Finding>,
}

impl FindingsReport {
    /// Load a findings report from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`smellscope_core::SmellscopeError::Io`] if the file cannot
    /// be read, or [`smellscope_core::SmellscopeError::Serialization`] if
    /// the content is not a valid report.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a findings report from a JSON string.
    pub fn from_json(content: &str) -> Result<Self> {
        let report: Self = serde_json::from_str(content)?;
        Ok(report)
    }

    /// Group the findings per file, preserving the analyzer's order within
    /// each file.
    pub fn by_file(self) -> BTreeMap<PathBuf, Vec<Finding>> {
        let mut map: BTreeMap<PathBuf, Vec<Finding>> = BTreeMap::new();
        for finding in self.issues {
            map.entry(finding.file_path.clone()).or_default().push(finding);
        }
        map
    }
}
