use std::path::Path;
use std::process::Command;

use smellscope_core::{Result, SmellscopeError};

use crate::filter::FileFilter;
use crate::parser::{parse_changed_ranges, ChangeMap};

/// Run `git diff` between two revisions and return the raw diff text.
///
/// The diff is taken with zero context lines so that every hunk header
/// exactly bounds its changed region, recursively for the whole tree.
/// Revisions are passed as separate argument-vector entries; nothing is
/// interpreted by a shell.
///
/// One-shot and synchronous: a launch failure or non-zero exit status is a
/// fatal [`SmellscopeError::Process`] carrying git's stderr. No retries.
///
/// # Examples
///
/// ```no_run
/// use smellscope_difflens::git::diff_tree;
/// use std::path::Path;
///
/// let diff = diff_tree(Path::new("."), "origin/main", "HEAD").unwrap();
/// ```
pub fn diff_tree(repo: &Path, base: &str, head: &str) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["diff", "--unified=0", base, head])
        .output()
        .map_err(|e| SmellscopeError::Process(format!("failed to launch git diff: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SmellscopeError::Process(format!(
            "git diff {base} {head} failed: {}",
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Compute the changed line intervals per tracked file between two
/// revisions.
///
/// Composes [`diff_tree`] and [`parse_changed_ranges`]; see those for the
/// underlying contracts.
///
/// # Errors
///
/// Returns [`SmellscopeError::Process`] when the diff command cannot run.
pub fn changed_ranges(
    repo: &Path,
    base: &str,
    head: &str,
    filter: &FileFilter,
) -> Result<ChangeMap> {
    let diff = diff_tree(repo, base, head)?;
    Ok(parse_changed_ranges(&diff, filter))
}
