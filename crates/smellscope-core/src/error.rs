use std::path::PathBuf;

/// Errors that can occur across the smellscope crates.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `miette` diagnostics at the
/// boundary.
///
/// # Examples
///
/// ```
/// use smellscope_core::SmellscopeError;
///
/// let err = SmellscopeError::Process("git diff exited with code 128".into());
/// assert!(err.to_string().contains("128"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SmellscopeError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// An external process could not be launched or exited non-zero.
    #[error("process error: {0}")]
    Process(String),

    /// Diff or report parsing failure.
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SmellscopeError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn process_error_displays_message() {
        let err = SmellscopeError::Process("could not launch git".into());
        assert_eq!(err.to_string(), "process error: could not launch git");
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = SmellscopeError::FileNotFound(PathBuf::from("/tmp/Missing.java"));
        assert!(err.to_string().contains("/tmp/Missing.java"));
    }
}
