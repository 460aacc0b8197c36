use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use smellscope_core::{Finding, Issue, LineRange, Result};
use smellscope_difflens::parser::ChangeMap;
use smellscope_difflens::ranges::merge_ranges;

use crate::catalog::RuleCatalog;
use crate::extractor::ContextExtractor;

/// Fixed padding applied to every finding span before extraction, so each
/// issue carries a workable amount of surrounding code on top of its
/// rule-specific window.
pub const DEFAULT_MARGIN: u32 = 10;

/// Result of a completed analysis run.
///
/// # Examples
///
/// ```
/// use smellscope_context::analyzer::{AnalysisReport, AnalysisStats};
///
/// let report = AnalysisReport {
///     issues: vec![],
///     skipped: vec![],
///     stats: AnalysisStats::default(),
/// };
/// assert!(report.issues.is_empty());
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Findings paired with their extracted context, in input order.
    pub issues: Vec<Issue>,
    /// Files whose extraction failed, with reasons.
    pub skipped: Vec<SkippedFile>,
    /// Statistics about the run.
    pub stats: AnalysisStats,
}

/// A file whose findings produced no issues because its source could not
/// be read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    /// Path of the file, relative to the repository root.
    pub path: PathBuf,
    /// Why extraction failed.
    pub reason: String,
}

/// Statistics about an analysis run.
///
/// # Examples
///
/// ```
/// use smellscope_context::analyzer::AnalysisStats;
///
/// let stats = AnalysisStats::default();
/// assert_eq!(stats.findings_total, 0);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    /// Files whose findings were fully processed.
    pub files_analyzed: usize,
    /// Files skipped because their source could not be read.
    pub files_skipped: usize,
    /// Findings received, before any scoping.
    pub findings_total: usize,
    /// Findings dropped because they overlap no changed line.
    pub out_of_scope: usize,
    /// Distinct changed regions after merging finding spans per file.
    pub merged_regions: usize,
}

/// Orchestrates the analysis pipeline: scope findings to the change map,
/// merge their spans for bookkeeping, and extract context per finding.
///
/// Each finding travels as one record from input to issue; the merged
/// ranges feed only the `merged_regions` statistic and never drive the
/// extraction loop, so a merge that changes cardinality cannot detach a
/// finding from its context.
pub struct Analyzer {
    extractor: ContextExtractor,
    margin: u32,
}

impl Analyzer {
    /// Create an analyzer with the default context margin.
    pub fn new(catalog: RuleCatalog) -> Self {
        Self::with_margin(catalog, DEFAULT_MARGIN)
    }

    /// Create an analyzer with an explicit context margin.
    pub fn with_margin(catalog: RuleCatalog, margin: u32) -> Self {
        Self {
            extractor: ContextExtractor::new(catalog),
            margin,
        }
    }

    /// Analyze findings grouped per file, producing the final issue list.
    ///
    /// When `changes` is given, findings whose span overlaps no changed
    /// interval of their file are dropped first and counted as out of
    /// scope. Files are processed independently: a file whose source
    /// cannot be read contributes a [`SkippedFile`] entry instead of
    /// issues, and every other file is unaffected.
    ///
    /// Output preserves per-file input order; files follow the map's
    /// iteration order.
    pub fn analyze(
        &self,
        repo_root: &Path,
        findings_by_file: &BTreeMap<PathBuf, Vec<Finding>>,
        changes: Option<&ChangeMap>,
    ) -> AnalysisReport {
        let mut issues = Vec::new();
        let mut skipped = Vec::new();
        let mut stats = AnalysisStats::default();

        for (file, findings) in findings_by_file {
            stats.findings_total += findings.len();

            let in_scope: Vec<&Finding> = match changes {
                Some(map) => {
                    let changed = map.get(file).map(Vec::as_slice).unwrap_or(&[]);
                    let (kept, dropped): (Vec<&Finding>, Vec<&Finding>) = findings
                        .iter()
                        .partition(|f| changed.iter().any(|r| r.overlaps(f.span())));
                    stats.out_of_scope += dropped.len();
                    kept
                }
                None => findings.iter().collect(),
            };

            if in_scope.is_empty() {
                continue;
            }

            let spans: Vec<LineRange> = in_scope.iter().map(|f| f.span()).collect();
            stats.merged_regions += merge_ranges(&spans).len();

            match self.analyze_file(repo_root, file, &in_scope) {
                Ok(mut file_issues) => {
                    stats.files_analyzed += 1;
                    issues.append(&mut file_issues);
                }
                Err(e) => {
                    stats.files_skipped += 1;
                    skipped.push(SkippedFile {
                        path: file.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        AnalysisReport {
            issues,
            skipped,
            stats,
        }
    }

    fn analyze_file(
        &self,
        repo_root: &Path,
        file: &Path,
        findings: &[&Finding],
    ) -> Result<Vec<Issue>> {
        let full_path = repo_root.join(file);
        let mut issues = Vec::with_capacity(findings.len());

        for finding in findings {
            let padded = finding.span().padded(self.margin);
            let context = self
                .extractor
                .extract(&full_path, padded, &finding.rule_id)?;
            issues.push(Issue {
                file: full_path.clone(),
                start_line: finding.start_line,
                end_line: finding.end_line,
                rule_id: finding.rule_id.clone(),
                description: finding.description.clone(),
                context,
            });
        }

        Ok(issues)
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis Results")?;
        writeln!(f, "================")?;
        writeln!(
            f,
            "Files: {} analyzed, {} skipped | Findings: {} ({} out of scope) | Changed regions: {}\n",
            self.stats.files_analyzed,
            self.stats.files_skipped,
            self.stats.findings_total,
            self.stats.out_of_scope,
            self.stats.merged_regions,
        )?;

        if self.issues.is_empty() {
            writeln!(f, "No issues in scope.")?;
        } else {
            for issue in &self.issues {
                writeln!(
                    f,
                    "[{}] {}:{}",
                    issue.rule_id,
                    issue.file.display(),
                    LineRange::new(issue.start_line, issue.end_line.max(issue.start_line)),
                )?;
                writeln!(f, "  {}", issue.description)?;
                writeln!(f, "  (context: {} lines)", issue.context.lines().count())?;
                writeln!(f)?;
            }
        }

        for skipped in &self.skipped {
            writeln!(
                f,
                "SKIPPED {}: {}",
                skipped.path.display(),
                skipped.reason
            )?;
        }

        Ok(())
    }
}

impl AnalysisReport {
    /// Render the report as markdown, with each issue's context in a
    /// fenced code block.
    pub fn to_markdown(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        out.push_str("# Analysis Results\n\n");
        let _ = writeln!(
            out,
            "**Files:** {} analyzed, {} skipped | **Findings:** {} ({} out of scope)\n",
            self.stats.files_analyzed,
            self.stats.files_skipped,
            self.stats.findings_total,
            self.stats.out_of_scope,
        );

        if self.issues.is_empty() {
            out.push_str("No issues in scope.\n");
        } else {
            for issue in &self.issues {
                let _ = writeln!(
                    out,
                    "## `{}:{}` — {}\n",
                    issue.file.display(),
                    LineRange::new(issue.start_line, issue.end_line.max(issue.start_line)),
                    issue.rule_id,
                );
                let _ = writeln!(out, "{}\n", issue.description);
                out.push_str("```java\n");
                out.push_str(&issue.context);
                if !issue.context.ends_with('\n') && !issue.context.is_empty() {
                    out.push('\n');
                }
                out.push_str("```\n\n");
            }
        }

        for skipped in &self.skipped {
            let _ = writeln!(
                out,
                "> Skipped `{}`: {}",
                skipped.path.display(),
                skipped.reason
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smellscope_core::ScopeHint;

    fn finding(file: &str, start: u32, end: u32, rule: &str, desc: &str) -> Finding {
        Finding {
            file_path: PathBuf::from(file),
            start_line: start,
            end_line: end,
            rule_id: rule.into(),
            description: desc.into(),
        }
    }

    fn numbered_file(dir: &Path, name: &str, lines: u32) -> PathBuf {
        let content: String = (1..=lines).map(|n| format!("line {n}\n")).collect();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        PathBuf::from(name)
    }

    fn by_file(findings: Vec<Finding>) -> BTreeMap<PathBuf, Vec<Finding>> {
        let mut map: BTreeMap<PathBuf, Vec<Finding>> = BTreeMap::new();
        for f in findings {
            map.entry(f.file_path.clone()).or_default().push(f);
        }
        map
    }

    #[test]
    fn findings_become_issues_with_context() {
        let dir = tempfile::tempdir().unwrap();
        numbered_file(dir.path(), "SomeFile.java", 60);

        let findings = by_file(vec![finding(
            "SomeFile.java",
            30,
            32,
            "java:S1068",
            "Unused private field",
        )]);

        let analyzer = Analyzer::new(RuleCatalog::builtin());
        let report = analyzer.analyze(dir.path(), &findings, None);

        assert!(report.skipped.is_empty());
        assert_eq!(report.issues.len(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.rule_id, "java:S1068");
        assert_eq!(issue.file, dir.path().join("SomeFile.java"));
        assert_eq!(issue.start_line, 30);
        // Margin of 10 plus the rule's {2 above, 2 below} window:
        // lines 18 through 44 inclusive.
        assert!(issue.context.starts_with("line 18\n"));
        assert!(issue.context.ends_with("line 44\n"));
        assert_eq!(issue.context.lines().count(), 27);
    }

    #[test]
    fn empty_findings_produce_no_issues() {
        let dir = tempfile::tempdir().unwrap();
        let mut map: BTreeMap<PathBuf, Vec<Finding>> = BTreeMap::new();
        map.insert(PathBuf::from("SomeFile.java"), Vec::new());

        let report = Analyzer::new(RuleCatalog::builtin()).analyze(dir.path(), &map, None);
        assert!(report.issues.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(report.stats.files_analyzed, 0);
    }

    #[test]
    fn per_file_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        numbered_file(dir.path(), "A.java", 40);

        // Deliberately not sorted by line.
        let findings = by_file(vec![
            finding("A.java", 30, 30, "java:S1481", "second in file order"),
            finding("A.java", 5, 5, "java:S1488", "first by line"),
        ]);

        let report = Analyzer::new(RuleCatalog::builtin()).analyze(dir.path(), &findings, None);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.issues[0].description, "second in file order");
        assert_eq!(report.issues[1].description, "first by line");
    }

    #[test]
    fn overlapping_findings_each_keep_their_own_context() {
        let dir = tempfile::tempdir().unwrap();
        numbered_file(dir.path(), "A.java", 80);

        // Two overlapping spans merge into one region, but both findings
        // must still come back as separate issues.
        let findings = by_file(vec![
            finding("A.java", 40, 45, "java:S138", "long method"),
            finding("A.java", 42, 44, "java:S3776", "too complex"),
        ]);

        let report = Analyzer::new(RuleCatalog::builtin()).analyze(dir.path(), &findings, None);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.stats.merged_regions, 1);
        assert_eq!(report.issues[0].rule_id, "java:S138");
        assert_eq!(report.issues[1].rule_id, "java:S3776");
        assert_ne!(report.issues[0].context, report.issues[1].context);
    }

    #[test]
    fn unreadable_file_skips_only_that_file() {
        let dir = tempfile::tempdir().unwrap();
        numbered_file(dir.path(), "Good.java", 30);

        let findings = by_file(vec![
            finding("Good.java", 10, 10, "java:S1488", "fine"),
            finding("Missing.java", 5, 5, "java:S1488", "no file"),
        ]);

        let report = Analyzer::new(RuleCatalog::builtin()).analyze(dir.path(), &findings, None);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].description, "fine");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, PathBuf::from("Missing.java"));
        assert!(report.skipped[0].reason.contains("file not found"));
        assert_eq!(report.stats.files_analyzed, 1);
        assert_eq!(report.stats.files_skipped, 1);
    }

    #[test]
    fn change_scoping_drops_untouched_findings() {
        let dir = tempfile::tempdir().unwrap();
        numbered_file(dir.path(), "A.java", 60);
        numbered_file(dir.path(), "B.java", 60);

        let findings = by_file(vec![
            finding("A.java", 10, 12, "java:S1488", "inside change"),
            finding("A.java", 50, 51, "java:S1488", "outside change"),
            finding("B.java", 5, 5, "java:S1488", "file not in diff"),
        ]);

        let mut changes = ChangeMap::new();
        changes.insert(PathBuf::from("A.java"), vec![LineRange::new(11, 20)]);

        let report =
            Analyzer::new(RuleCatalog::builtin()).analyze(dir.path(), &findings, Some(&changes));
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].description, "inside change");
        assert_eq!(report.stats.out_of_scope, 2);
    }

    #[test]
    fn margin_is_configurable() {
        let dir = tempfile::tempdir().unwrap();
        numbered_file(dir.path(), "A.java", 40);

        let catalog = RuleCatalog::empty(smellscope_core::ContextPolicy {
            lines_above: 0,
            lines_below: 0,
            scope: ScopeHint::Block,
            needs_wider_context: false,
        });
        let findings = by_file(vec![finding("A.java", 20, 20, "any", "d")]);

        let report = Analyzer::with_margin(catalog, 2).analyze(dir.path(), &findings, None);
        assert_eq!(report.issues[0].context, "line 18\nline 19\nline 20\nline 21\nline 22\n");
    }

    #[test]
    fn display_and_markdown_render() {
        let dir = tempfile::tempdir().unwrap();
        numbered_file(dir.path(), "A.java", 30);
        let findings = by_file(vec![finding("A.java", 10, 12, "java:S1144", "unused method")]);

        let report = Analyzer::new(RuleCatalog::builtin()).analyze(dir.path(), &findings, None);

        let text = format!("{report}");
        assert!(text.contains("[java:S1144]"));
        assert!(text.contains("10-12"));
        assert!(text.contains("unused method"));

        let md = report.to_markdown();
        assert!(md.contains("# Analysis Results"));
        assert!(md.contains("```java"));
        assert!(md.contains("line 10\n"));
    }
}
