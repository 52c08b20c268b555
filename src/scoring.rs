use crate::constants::{COMPLIANT_THRESHOLD, PARTIALLY_COMPLIANT_THRESHOLD};
use crate::types::{ComplianceStatus, Impact, NormalizedIssue};

/// Penalty weight an issue of the given impact costs before scaling
pub fn impact_weight(impact: Impact) -> f64 {
    match impact {
        Impact::Critical => 5.0,
        Impact::Serious => 3.0,
        Impact::Moderate => 2.0,
        Impact::Minor => 1.0,
        Impact::Notice => 0.5,
        Impact::Unknown => 1.0,
    }
}

/// Compliance score in [0, 100], rounded to two decimals.
///
/// Each issue subtracts a tenth of its impact weight from 100.
pub fn score(issues: &[NormalizedIssue]) -> f64 {
    let total: f64 = issues.iter().map(|issue| impact_weight(issue.impact)).sum();
    let penalty = total / 10.0;
    round2((100.0 - penalty).clamp(0.0, 100.0))
}

/// Band an (average) score into a compliance status
pub fn classify(score: f64) -> ComplianceStatus {
    if score >= COMPLIANT_THRESHOLD {
        ComplianceStatus::Compliant
    } else if score >= PARTIALLY_COMPLIANT_THRESHOLD {
        ComplianceStatus::PartiallyCompliant
    } else {
        ComplianceStatus::NonCompliant
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IssueSource;

    fn issue(impact: Impact) -> NormalizedIssue {
        NormalizedIssue {
            source: IssueSource::Axe,
            id: "test-rule".into(),
            impact,
            description: "test".into(),
            clause_references: Vec::new(),
            explanation: String::new(),
        }
    }

    #[test]
    fn no_issues_scores_100() {
        assert_eq!(score(&[]), 100.0);
    }

    #[test]
    fn weights_are_scaled_by_a_tenth() {
        assert_eq!(score(&[issue(Impact::Critical)]), 99.5);
        assert_eq!(score(&[issue(Impact::Serious), issue(Impact::Moderate)]), 99.5);
        assert_eq!(score(&[issue(Impact::Notice)]), 99.95);
        assert_eq!(score(&[issue(Impact::Unknown)]), 99.9);
    }

    #[test]
    fn score_never_drops_below_zero() {
        let issues: Vec<_> = (0..500).map(|_| issue(Impact::Critical)).collect();
        assert_eq!(score(&issues), 0.0);
    }

    #[test]
    fn adding_an_issue_never_raises_the_score() {
        let impacts = [
            Impact::Critical,
            Impact::Serious,
            Impact::Moderate,
            Impact::Minor,
            Impact::Notice,
            Impact::Unknown,
        ];
        let mut issues = Vec::new();
        let mut previous = score(&issues);
        for round in 0..60 {
            issues.push(issue(impacts[round % impacts.len()]));
            let current = score(&issues);
            assert!(current <= previous, "{} > {} after {} issues", current, previous, round + 1);
            assert!((0.0..=100.0).contains(&current));
            previous = current;
        }
    }

    #[test]
    fn classification_bands_include_their_lower_bound() {
        assert_eq!(classify(100.0), ComplianceStatus::Compliant);
        assert_eq!(classify(85.0), ComplianceStatus::Compliant);
        assert_eq!(classify(84.99), ComplianceStatus::PartiallyCompliant);
        assert_eq!(classify(60.0), ComplianceStatus::PartiallyCompliant);
        assert_eq!(classify(59.99), ComplianceStatus::NonCompliant);
        assert_eq!(classify(0.0), ComplianceStatus::NonCompliant);
    }
}
