use crate::mapping::RuleMapper;
use crate::types::{Impact, NormalizedIssue, RawFinding};

/// Fields pulled out of a raw finding before normalization
#[derive(Debug, Clone, PartialEq)]
struct ExtractedFields<'a> {
    id: &'a str,
    impact_label: Option<&'a str>,
    description: &'a str,
}

/// First candidate that is present and not blank
fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|value| !value.trim().is_empty())
}

/// Per-engine field mapping: which raw fields carry the identifier, the
/// impact label and the description.
fn extract(finding: &RawFinding) -> ExtractedFields<'_> {
    match finding {
        RawFinding::Axe(violation) => ExtractedFields {
            id: first_non_empty(&[Some(violation.id.as_str())]).unwrap_or_default(),
            impact_label: first_non_empty(&[violation.impact.as_deref()]),
            description: first_non_empty(&[Some(violation.description.as_str()), Some(violation.help.as_str())])
                .unwrap_or_default(),
        },
        RawFinding::Pa11y(issue) => ExtractedFields {
            id: first_non_empty(&[Some(issue.code.as_str())]).unwrap_or_default(),
            impact_label: first_non_empty(&[Some(issue.issue_type.as_str())]),
            description: first_non_empty(&[Some(issue.message.as_str())]).unwrap_or_default(),
        },
    }
}

/// Turns raw engine findings into uniform issues carrying RGAA references
#[derive(Debug, Clone)]
pub struct IssueNormalizer {
    mapper: RuleMapper,
}

impl IssueNormalizer {
    pub fn new(mapper: RuleMapper) -> Self {
        Self { mapper }
    }

    pub fn normalize_one(&self, finding: &RawFinding) -> NormalizedIssue {
        let fields = extract(finding);
        let entry = self.mapper.lookup(fields.id);
        NormalizedIssue {
            source: finding.source(),
            id: fields.id.to_string(),
            impact: fields.impact_label.map(Impact::from_label).unwrap_or(Impact::Unknown),
            description: fields.description.to_string(),
            clause_references: entry.clause_references,
            explanation: entry.explanation,
        }
    }

    /// Normalize findings in input order
    pub fn normalize(&self, findings: &[RawFinding]) -> Vec<NormalizedIssue> {
        findings.iter().map(|finding| self.normalize_one(finding)).collect()
    }

    /// Concatenate per-engine batches in the given order (every finding of one
    /// batch before any finding of the next) and normalize the result.
    pub fn normalize_batches(
        &self,
        batches: impl IntoIterator<Item = Vec<RawFinding>>,
    ) -> Vec<NormalizedIssue> {
        let combined: Vec<RawFinding> = batches.into_iter().flatten().collect();
        self.normalize(&combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AxeViolation, IssueSource, Pa11yIssue, RuleEntry};
    use std::collections::HashMap;

    fn mapper() -> RuleMapper {
        let mut table = HashMap::new();
        table.insert(
            "color-contrast".to_string(),
            RuleEntry {
                clause_references: vec!["3.2".into()],
                explanation: "Contraste suffisant entre texte et fond".into(),
            },
        );
        table.insert(
            "WCAG2AA.Principle3.Guideline3_1.3_1_1.H57.2".to_string(),
            RuleEntry {
                clause_references: vec!["8.3".into()],
                explanation: "Langue par défaut présente".into(),
            },
        );
        RuleMapper::new(table)
    }

    fn axe(id: &str, impact: Option<&str>, description: &str) -> RawFinding {
        RawFinding::Axe(AxeViolation {
            id: id.into(),
            impact: impact.map(str::to_string),
            description: description.into(),
            help: "help text".into(),
            help_url: None,
        })
    }

    fn pa11y(code: &str, issue_type: &str, message: &str) -> RawFinding {
        RawFinding::Pa11y(Pa11yIssue {
            code: code.into(),
            issue_type: issue_type.into(),
            message: message.into(),
            selector: None,
            runner: Some("htmlcs".into()),
        })
    }

    #[test]
    fn axe_violation_is_mapped() {
        let normalizer = IssueNormalizer::new(mapper());
        let issue = normalizer.normalize_one(&axe("color-contrast", Some("serious"), "Low contrast"));
        assert_eq!(issue.source, IssueSource::Axe);
        assert_eq!(issue.id, "color-contrast");
        assert_eq!(issue.impact, Impact::Serious);
        assert_eq!(issue.description, "Low contrast");
        assert_eq!(issue.clause_references, vec!["3.2"]);
    }

    #[test]
    fn pa11y_issue_uses_code_type_and_message() {
        let normalizer = IssueNormalizer::new(mapper());
        let issue = normalizer.normalize_one(&pa11y(
            "WCAG2AA.Principle3.Guideline3_1.3_1_1.H57.2",
            "notice",
            "The html element should have a lang attribute",
        ));
        assert_eq!(issue.source, IssueSource::Pa11y);
        assert_eq!(issue.impact, Impact::Notice);
        assert_eq!(issue.description, "The html element should have a lang attribute");
        assert_eq!(issue.clause_references, vec!["8.3"]);
    }

    #[test]
    fn missing_impact_defaults_to_unknown() {
        let normalizer = IssueNormalizer::new(mapper());
        assert_eq!(normalizer.normalize_one(&axe("region", None, "x")).impact, Impact::Unknown);
        assert_eq!(normalizer.normalize_one(&axe("region", Some("  "), "x")).impact, Impact::Unknown);
        assert_eq!(normalizer.normalize_one(&pa11y("X", "error", "x")).impact, Impact::Unknown);
    }

    #[test]
    fn blank_description_falls_back_to_help() {
        let normalizer = IssueNormalizer::new(mapper());
        let issue = normalizer.normalize_one(&axe("region", Some("moderate"), ""));
        assert_eq!(issue.description, "help text");
    }

    #[test]
    fn unmapped_identifier_gets_sentinel() {
        let normalizer = IssueNormalizer::new(mapper());
        let issue = normalizer.normalize_one(&axe("landmark-one-main", Some("moderate"), "x"));
        assert!(issue.clause_references.is_empty());
        assert_eq!(issue.explanation, "No mapping found");
    }

    #[test]
    fn batches_are_concatenated_not_interleaved() {
        let normalizer = IssueNormalizer::new(mapper());
        let issues = normalizer.normalize_batches(vec![
            vec![axe("a1", Some("minor"), "x"), axe("a2", Some("minor"), "x")],
            vec![pa11y("p1", "notice", "x"), pa11y("p2", "notice", "x")],
        ]);
        let ids: Vec<_> = issues.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "p1", "p2"]);
    }
}
