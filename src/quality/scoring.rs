//! Quality score computation.
//!
//! Converts aggregate metrics into a 0-100 score with an itemized penalty
//! breakdown. Deductions apply in a fixed order so identical metrics always
//! produce an identical breakdown.

use crate::models::{ScoreBreakdown, ValidationMetrics};

/// Cap on the privacy deduction.
const MAX_PRIVACY_DEDUCTION: u64 = 30;

/// Points deducted per privacy finding.
const PRIVACY_POINTS_PER_FINDING: u64 = 3;

/// Computes the quality score and its penalty breakdown.
///
/// Starts at 100 and applies, in order: missing rate x 45, invalid rate
/// x 35, duplicate rate x 20, and min(30, findings x 3). The breakdown
/// records only non-zero deductions. The final score is clamped to 0-100.
pub fn compute_score(metrics: &ValidationMetrics) -> (u32, Vec<ScoreBreakdown>) {
    let mut score: i64 = 100;
    let mut breakdown: Vec<ScoreBreakdown> = Vec::new();

    let mut apply = |label: &str, deduction: u64, reason: String| {
        if deduction == 0 {
            return;
        }
        score -= deduction as i64;
        breakdown.push(ScoreBreakdown {
            label: label.to_string(),
            deduction: u32::try_from(deduction).unwrap_or(u32::MAX),
            reason,
        });
    };

    apply(
        "missing fields",
        rate_deduction(metrics.missing_rate, 45.0),
        format!("average missing rate {:.1}%", metrics.missing_rate * 100.0),
    );
    apply(
        "type errors",
        rate_deduction(metrics.invalid_rate, 35.0),
        format!("average invalid rate {:.1}%", metrics.invalid_rate * 100.0),
    );
    apply(
        "duplicate records",
        rate_deduction(metrics.duplicate_rate, 20.0),
        format!("duplicate rate {:.1}%", metrics.duplicate_rate * 100.0),
    );
    apply(
        "privacy risk",
        MAX_PRIVACY_DEDUCTION.min(metrics.privacy_findings * PRIVACY_POINTS_PER_FINDING),
        format!("{} potential privacy findings", metrics.privacy_findings),
    );

    (score.clamp(0, 100) as u32, breakdown)
}

/// Rounds a rate-weighted penalty to the nearest whole point.
fn rate_deduction(rate: f64, weight: f64) -> u64 {
    (rate * weight).round().max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn metrics(missing: f64, invalid: f64, duplicate: f64, privacy: u64) -> ValidationMetrics {
        ValidationMetrics {
            row_count: 100,
            missing_rate: missing,
            invalid_rate: invalid,
            duplicate_rate: duplicate,
            privacy_findings: privacy,
            field_stats: BTreeMap::new(),
        }
    }

    #[test]
    fn test_clean_metrics_score_100_empty_breakdown() {
        let (score, breakdown) = compute_score(&metrics(0.0, 0.0, 0.0, 0));
        assert_eq!(score, 100);
        assert!(breakdown.is_empty());
    }

    #[test]
    fn test_individual_deductions() {
        let (score, breakdown) = compute_score(&metrics(0.2, 0.0, 0.0, 0));
        assert_eq!(score, 91); // round(0.2 * 45) = 9
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].label, "missing fields");
        assert_eq!(breakdown[0].deduction, 9);
        assert!(breakdown[0].reason.contains("20.0%"));

        let (score, _) = compute_score(&metrics(0.0, 0.1, 0.0, 0));
        assert_eq!(score, 97); // round(0.1 * 35) = 4

        let (score, _) = compute_score(&metrics(0.0, 0.0, 0.5, 0));
        assert_eq!(score, 90); // round(0.5 * 20) = 10
    }

    #[test]
    fn test_privacy_deduction_capped_at_30() {
        let (score, breakdown) = compute_score(&metrics(0.0, 0.0, 0.0, 4));
        assert_eq!(score, 88); // 4 * 3 = 12
        assert_eq!(breakdown[0].label, "privacy risk");

        let (score, breakdown) = compute_score(&metrics(0.0, 0.0, 0.0, 50));
        assert_eq!(score, 70); // capped at 30
        assert_eq!(breakdown[0].deduction, 30);
    }

    #[test]
    fn test_breakdown_order_is_fixed() {
        let (_, breakdown) = compute_score(&metrics(0.5, 0.5, 0.5, 5));
        let labels: Vec<&str> = breakdown.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "missing fields",
                "type errors",
                "duplicate records",
                "privacy risk"
            ]
        );
    }

    #[test]
    fn test_score_clamped_to_zero() {
        let (score, _) = compute_score(&metrics(1.0, 1.0, 1.0, 100));
        assert_eq!(score, 0); // 45 + 35 + 20 + 30 = 130 deducted
    }

    #[test]
    fn test_score_always_in_range() {
        let cases = [
            (0.0, 0.0, 0.0, 0),
            (0.3, 0.1, 0.05, 2),
            (1.0, 1.0, 1.0, 1_000),
            (0.011, 0.014, 0.024, 1),
        ];
        for (m, i, d, p) in cases {
            let (score, _) = compute_score(&metrics(m, i, d, p));
            assert!(score <= 100, "score {score} out of range");
        }
    }
}
