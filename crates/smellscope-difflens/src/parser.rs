use std::collections::BTreeMap;
use std::path::PathBuf;

use smellscope_core::LineRange;

use crate::filter::FileFilter;

/// Changed line intervals per tracked file, in hunk order.
///
/// Files with no hunks are absent, never empty-valued.
pub type ChangeMap = BTreeMap<PathBuf, Vec<LineRange>>;

/// Parse zero-context unified diff output into a [`ChangeMap`].
///
/// Walks the diff line by line, keeping a "current file" state: a `+++ `
/// to-file marker selects the file (with the VCS `b/` prefix stripped) when
/// its extension is tracked, and each subsequent `@@` hunk header appends
/// the changed interval of the new file version. Because the diff is taken
/// with zero context lines, the hunk header numbers exactly bound the
/// changed region.
///
/// Malformed hunk headers are skipped, as are pure-deletion hunks, which
/// touch no line of the new file.
///
/// # Examples
///
/// ```
/// use smellscope_difflens::filter::FileFilter;
/// use smellscope_difflens::parser::parse_changed_ranges;
/// use smellscope_core::LineRange;
/// use std::path::PathBuf;
///
/// let diff = "\
/// +++ b/src/SomeFile.java\n\
/// @@ -10,6 +10,7 @@ public class SomeClass {\n\
/// +    private String newField;\n";
/// let filter = FileFilter::new(&["java".into()], &[]);
/// let changes = parse_changed_ranges(diff, &filter);
/// assert_eq!(
///     changes[&PathBuf::from("src/SomeFile.java")],
///     vec![LineRange::new(10, 16)]
/// );
/// ```
pub fn parse_changed_ranges(diff: &str, filter: &FileFilter) -> ChangeMap {
    let mut changes = ChangeMap::new();
    // None while between files, or while the current file is untracked.
    let mut current: Option<PathBuf> = None;

    for line in diff.lines() {
        if let Some(raw) = line.strip_prefix("+++ ") {
            current = match parse_path(raw) {
                Some(path) if filter.is_tracked(&path) => Some(path),
                _ => None,
            };
            continue;
        }

        if line.starts_with("@@") {
            let Some(file) = current.as_ref() else {
                continue;
            };
            if let Some(range) = parse_hunk_header(line) {
                changes.entry(file.clone()).or_default().push(range);
            }
        }
    }

    changes
}

/// Strip the VCS path prefix and quoting from a to-file marker operand.
///
/// Returns `None` for `/dev/null` (deleted files have no new version).
fn parse_path(raw: &str) -> Option<PathBuf> {
    let normalized = raw.trim_matches('"');

    if normalized == "/dev/null" {
        return None;
    }

    let stripped = normalized.strip_prefix("b/").unwrap_or(normalized);
    Some(PathBuf::from(stripped))
}

/// Extract the new-file interval from a hunk header.
///
/// The header shape is `@@ -<old>[,<count>] +<new-start>[,<new-count>] @@`,
/// optionally followed by a section heading. An absent count means a
/// single-line hunk; a zero count means the hunk only deletes lines.
/// Anything else malformed yields `None` so the caller can skip the hunk.
fn parse_hunk_header(line: &str) -> Option<LineRange> {
    let inner = line.strip_prefix("@@ ")?;
    let end = inner.find(" @@")?;
    let inner = &inner[..end];

    let mut parts = inner.split(' ');
    let _old = parts.next()?.strip_prefix('-')?;
    let new = parts.next()?.strip_prefix('+')?;
    if parts.next().is_some() {
        return None;
    }

    let (start, count) = parse_range(new)?;
    if count == 0 {
        return None;
    }
    Some(LineRange::new(start, start + count - 1))
}

fn parse_range(range: &str) -> Option<(u32, u32)> {
    if let Some((start, count)) = range.split_once(',') {
        Some((start.parse().ok()?, count.parse().ok()?))
    } else {
        Some((range.parse().ok()?, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn java_filter() -> FileFilter {
        FileFilter::new(&["java".into()], &[])
    }

    #[test]
    fn empty_diff_returns_empty_map() {
        let changes = parse_changed_ranges("", &java_filter());
        assert!(changes.is_empty());
    }

    #[test]
    fn single_file_single_hunk() {
        let diff = "\
diff --git a/src/SomeFile.java b/src/SomeFile.java
index abc1234..def5678 100644
--- a/src/SomeFile.java
+++ b/src/SomeFile.java
@@ -10,6 +10,7 @@ public class SomeClass {
+    private String newField;
";
        let changes = parse_changed_ranges(diff, &java_filter());
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[&PathBuf::from("src/SomeFile.java")],
            vec![LineRange::new(10, 16)]
        );
    }

    #[test]
    fn multiple_hunks_stay_in_order() {
        let diff = "\
+++ b/src/A.java
@@ -1,2 +1,3 @@
+import java.util.List;
@@ -40,0 +42,5 @@
+    void added() {
";
        let changes = parse_changed_ranges(diff, &java_filter());
        assert_eq!(
            changes[&PathBuf::from("src/A.java")],
            vec![LineRange::new(1, 3), LineRange::new(42, 46)]
        );
    }

    #[test]
    fn non_tracked_extensions_are_ignored() {
        let diff = "\
+++ b/src/SomeFile.java
@@ -10,6 +10,7 @@ public class SomeClass {
+    private String newField;
+++ b/src/some_file.py
@@ -20,7 +20,9 @@ def some_function():
+    print('python')
";
        let changes = parse_changed_ranges(diff, &java_filter());
        assert_eq!(changes.len(), 1);
        assert!(changes.contains_key(&PathBuf::from("src/SomeFile.java")));
        assert!(!changes.contains_key(&PathBuf::from("src/some_file.py")));
    }

    #[test]
    fn file_marker_without_hunks_is_absent() {
        let diff = "\
+++ b/src/Empty.java
+++ b/src/Changed.java
@@ -1 +1,2 @@
+line
";
        let changes = parse_changed_ranges(diff, &java_filter());
        assert!(!changes.contains_key(&PathBuf::from("src/Empty.java")));
        assert!(changes.contains_key(&PathBuf::from("src/Changed.java")));
    }

    #[test]
    fn count_defaults_to_one_when_absent() {
        let diff = "\
+++ b/src/A.java
@@ -5 +7 @@
-old
+new
";
        let changes = parse_changed_ranges(diff, &java_filter());
        assert_eq!(changes[&PathBuf::from("src/A.java")], vec![LineRange::new(7, 7)]);
    }

    #[test]
    fn pure_deletion_hunk_adds_no_range() {
        let diff = "\
+++ b/src/A.java
@@ -10,3 +9,0 @@
-gone
-gone
-gone
@@ -30,2 +27,4 @@
+kept
";
        let changes = parse_changed_ranges(diff, &java_filter());
        assert_eq!(
            changes[&PathBuf::from("src/A.java")],
            vec![LineRange::new(27, 30)]
        );
    }

    #[test]
    fn deleted_file_is_skipped() {
        let diff = "\
--- a/src/Gone.java
+++ /dev/null
@@ -1,10 +0,0 @@
-gone
";
        let changes = parse_changed_ranges(diff, &java_filter());
        assert!(changes.is_empty());
    }

    #[test]
    fn malformed_hunk_header_is_skipped() {
        let diff = "\
+++ b/src/A.java
@@ not a hunk header @@
@@ -1,2 +1,garbage @@
@@ -3,1 +3,2 @@
+fine
";
        let changes = parse_changed_ranges(diff, &java_filter());
        assert_eq!(changes[&PathBuf::from("src/A.java")], vec![LineRange::new(3, 4)]);
    }

    #[test]
    fn hunk_before_any_file_marker_is_ignored() {
        let diff = "\
@@ -1,2 +1,3 @@
+orphan
";
        let changes = parse_changed_ranges(diff, &java_filter());
        assert!(changes.is_empty());
    }

    #[test]
    fn quoted_paths_are_unwrapped() {
        let diff = "\
+++ \"b/src/My File.java\"
@@ -1,1 +1,2 @@
+line
";
        let changes = parse_changed_ranges(diff, &java_filter());
        assert!(changes.contains_key(&PathBuf::from("src/My File.java")));
    }

    #[test]
    fn skip_patterns_apply_to_diff_paths() {
        let filter = FileFilter::new(&["java".into()], &["**/generated/**".into()]);
        let diff = "\
+++ b/src/generated/Stub.java
@@ -1,1 +1,2 @@
+line
+++ b/src/Real.java
@@ -1,1 +1,2 @@
+line
";
        let changes = parse_changed_ranges(diff, &filter);
        assert_eq!(changes.len(), 1);
        assert!(changes.contains_key(&PathBuf::from("src/Real.java")));
    }

    #[test]
    fn hunk_header_parses_all_shapes() {
        assert_eq!(
            parse_hunk_header("@@ -10,6 +10,7 @@"),
            Some(LineRange::new(10, 16))
        );
        assert_eq!(
            parse_hunk_header("@@ -5 +7 @@ void method() {"),
            Some(LineRange::new(7, 7))
        );
        assert_eq!(parse_hunk_header("@@ -10,3 +9,0 @@"), None);
        assert_eq!(parse_hunk_header("@@ bogus @@"), None);
        assert_eq!(parse_hunk_header("@@ -1,2 +1,2 +9,9 @@"), None);
    }
}
