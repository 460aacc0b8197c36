use std::collections::BTreeSet;

use smellscope_core::Issue;

use crate::analyzer::AnalysisReport;

/// Convert an analysis report to SARIF v2.1.0 JSON.
///
/// Produces a standalone SARIF log with a single run containing one result
/// per issue, anchored on the finding's original line span. Intended for
/// upload to code-scanning backends.
///
/// # Examples
///
/// ```
/// use smellscope_context::analyzer::{AnalysisReport, AnalysisStats};
/// use smellscope_context::sarif::to_sarif;
///
/// let report = AnalysisReport {
///     issues: vec![],
///     skipped: vec![],
///     stats: AnalysisStats::default(),
/// };
/// let sarif = to_sarif(&report);
/// assert_eq!(sarif["version"], "2.1.0");
/// ```
pub fn to_sarif(report: &AnalysisReport) -> serde_json::Value {
    let rules = build_rules(&report.issues);
    let results: Vec<serde_json::Value> = report
        .issues
        .iter()
        .map(|issue| {
            serde_json::json!({
                "ruleId": issue.rule_id,
                "level": "warning",
                "message": { "text": issue.description },
                "locations": [{
                    "physicalLocation": {
                        "artifactLocation": {
                            "uri": issue.file.display().to_string()
                        },
                        "region": {
                            "startLine": issue.start_line,
                            "endLine": issue.end_line.max(issue.start_line),
                            "snippet": { "text": issue.context }
                        }
                    }
                }]
            })
        })
        .collect();

    serde_json::json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "smellscope",
                    "version": env!("CARGO_PKG_VERSION"),
                    "informationUri": "https://github.com/smellscope/smellscope",
                    "rules": rules
                }
            },
            "results": results
        }]
    })
}

/// Build the SARIF `rules` array from the set of issues present.
///
/// Deduplicates by rule id so each appears at most once; the first issue
/// seen for a rule supplies its description.
fn build_rules(issues: &[Issue]) -> Vec<serde_json::Value> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut rules = Vec::new();

    for issue in issues {
        if !seen.insert(issue.rule_id.as_str()) {
            continue;
        }
        rules.push(serde_json::json!({
            "id": issue.rule_id,
            "shortDescription": { "text": issue.description },
            "defaultConfiguration": { "level": "warning" }
        }));
    }

    rules
}
