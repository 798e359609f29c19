//! Risk classification
//!
//! Two pure functions live here: [`classify`] turns a monitored address's
//! status and score into a display tier, and [`assess_breaches`] derives the
//! cumulative score from a breach history.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scores at or above this are HIGH
pub const HIGH_THRESHOLD: f64 = 70.0;

/// Scores at or above this (and below HIGH) are MEDIUM
pub const MEDIUM_THRESHOLD: f64 = 40.0;

/// Upper bound of the score range
pub const MAX_SCORE: f64 = 100.0;

/// Monitoring status reported for an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    /// Backend marked the address safe; the score is ignored
    Safe,
    /// Address is actively exposed; tier follows the score
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown risk status '{0}' (expected 'safe' or 'active')")]
pub struct ParseRiskStatusError(String);

impl FromStr for RiskStatus {
    type Err = ParseRiskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(RiskStatus::Safe),
            "active" => Ok(RiskStatus::Active),
            other => Err(ParseRiskStatusError(other.to_string())),
        }
    }
}

/// Display tier derived from (status, score)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Safe,
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "SAFE"),
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Result of classifying a score, including the clamping that was applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub tier: RiskTier,
    /// Score actually used, after clamping into `[0, MAX_SCORE]`
    pub score: f64,
    /// Whether the input score was outside the valid range (or NaN)
    pub clamped: bool,
}

/// Clamp a score into `[0, MAX_SCORE]`, reporting whether it moved.
///
/// NaN maps to 0.
pub fn clamp_score(score: f64) -> (f64, bool) {
    if score.is_nan() {
        return (0.0, true);
    }
    let clamped = score.clamp(0.0, MAX_SCORE);
    (clamped, clamped != score)
}

/// Classify a status/score pair into a tier.
pub fn classify(status: RiskStatus, score: f64) -> RiskTier {
    evaluate(status, score).tier
}

/// Classify and report the effective score.
pub fn evaluate(status: RiskStatus, score: f64) -> Classification {
    let (effective, clamped) = clamp_score(score);
    if clamped {
        tracing::debug!(input = score, effective, "risk score out of range, clamped");
    }

    let tier = match status {
        RiskStatus::Safe => RiskTier::Safe,
        RiskStatus::Active if effective >= HIGH_THRESHOLD => RiskTier::High,
        RiskStatus::Active if effective >= MEDIUM_THRESHOLD => RiskTier::Medium,
        RiskStatus::Active => RiskTier::Low,
    };

    Classification {
        tier,
        score: effective,
        clamped,
    }
}

// ============================================================================
// Breach history scoring
// ============================================================================

/// Breach record as listed by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BreachRecord {
    pub breach_name: String,
    #[serde(default)]
    pub severity: Option<String>,
    /// Comma separated list of leaked data classes ("Password, Phone, ...")
    #[serde(default, alias = "data_types")]
    pub data_leaked: Option<String>,
    #[serde(default)]
    pub breach_date: Option<String>,
}

/// Overall exposure label for an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExposureStatus {
    #[serde(rename = "SAFE")]
    Safe,
    #[serde(rename = "AT RISK")]
    AtRisk,
    #[serde(rename = "COMPROMISED")]
    Compromised,
}

impl fmt::Display for ExposureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "SAFE"),
            Self::AtRisk => write!(f, "AT RISK"),
            Self::Compromised => write!(f, "COMPROMISED"),
        }
    }
}

/// Cumulative score plus its exposure label
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub status: ExposureStatus,
}

fn severity_weight(severity: Option<&str>) -> f64 {
    match severity.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("critical") => 50.0,
        Some("high") => 35.0,
        Some("medium") => 20.0,
        _ => 0.0,
    }
}

fn leaked_data_weight(data_leaked: Option<&str>) -> f64 {
    let leaked = data_leaked.unwrap_or_default();
    let mut weight = 0.0;
    if leaked.contains("Password") {
        weight += 20.0;
    }
    if leaked.contains("Phone") {
        weight += 10.0;
    }
    weight
}

/// Sum the per-breach weights, capped at `MAX_SCORE`.
pub fn breach_score(breaches: &[BreachRecord]) -> f64 {
    breaches
        .iter()
        .map(|b| severity_weight(b.severity.as_deref()) + leaked_data_weight(b.data_leaked.as_deref()))
        .sum::<f64>()
        .min(MAX_SCORE)
}

/// Map a score onto its exposure label.
pub fn exposure_status(score: f64) -> ExposureStatus {
    let (score, _) = clamp_score(score);
    if score >= HIGH_THRESHOLD {
        ExposureStatus::Compromised
    } else if score >= MEDIUM_THRESHOLD {
        ExposureStatus::AtRisk
    } else {
        ExposureStatus::Safe
    }
}

/// Score a breach history and label it.
pub fn assess_breaches(breaches: &[BreachRecord]) -> RiskAssessment {
    let score = breach_score(breaches);
    RiskAssessment {
        score,
        status: exposure_status(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breach(severity: &str, leaked: &str) -> BreachRecord {
        BreachRecord {
            breach_name: "Example".into(),
            severity: Some(severity.into()),
            data_leaked: Some(leaked.into()),
            breach_date: None,
        }
    }

    #[test]
    fn test_safe_status_overrides_score() {
        assert_eq!(classify(RiskStatus::Safe, 95.0), RiskTier::Safe);
        assert_eq!(classify(RiskStatus::Safe, 0.0), RiskTier::Safe);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(classify(RiskStatus::Active, 70.0), RiskTier::High);
        assert_eq!(classify(RiskStatus::Active, 69.9), RiskTier::Medium);
        assert_eq!(classify(RiskStatus::Active, 40.0), RiskTier::Medium);
        assert_eq!(classify(RiskStatus::Active, 39.0), RiskTier::Low);
        assert_eq!(classify(RiskStatus::Active, 0.0), RiskTier::Low);
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(classify(RiskStatus::Active, 150.0), RiskTier::High);

        let high = evaluate(RiskStatus::Active, 150.0);
        assert!(high.clamped);
        assert_eq!(high.score, 100.0);

        let low = evaluate(RiskStatus::Active, -12.0);
        assert!(low.clamped);
        assert_eq!(low.score, 0.0);
        assert_eq!(low.tier, RiskTier::Low);

        let in_range = evaluate(RiskStatus::Active, 55.0);
        assert!(!in_range.clamped);
        assert_eq!(in_range.score, 55.0);
    }

    #[test]
    fn test_non_finite_scores() {
        let nan = evaluate(RiskStatus::Active, f64::NAN);
        assert!(nan.clamped);
        assert_eq!(nan.tier, RiskTier::Low);

        let inf = evaluate(RiskStatus::Active, f64::INFINITY);
        assert!(inf.clamped);
        assert_eq!(inf.tier, RiskTier::High);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("safe".parse::<RiskStatus>().unwrap(), RiskStatus::Safe);
        assert_eq!(" Active ".parse::<RiskStatus>().unwrap(), RiskStatus::Active);
        assert!("compromised".parse::<RiskStatus>().is_err());
    }

    #[test]
    fn test_tier_display_and_serialization() {
        assert_eq!(RiskTier::Medium.to_string(), "MEDIUM");
        assert_eq!(serde_json::to_string(&RiskTier::High).unwrap(), "\"HIGH\"");
    }

    #[test]
    fn test_breach_score_weights() {
        assert_eq!(breach_score(&[]), 0.0);
        assert_eq!(breach_score(&[breach("critical", "")]), 50.0);
        assert_eq!(breach_score(&[breach("High", "Email, Password")]), 55.0);
        assert_eq!(breach_score(&[breach("medium", "Phone")]), 30.0);
        assert_eq!(breach_score(&[breach("low", "Email")]), 0.0);
    }

    #[test]
    fn test_breach_score_is_capped() {
        let history = vec![
            breach("critical", "Password, Phone"),
            breach("critical", "Password"),
        ];
        assert_eq!(breach_score(&history), 100.0);
    }

    #[test]
    fn test_assessment_labels() {
        assert_eq!(assess_breaches(&[]).status, ExposureStatus::Safe);
        assert_eq!(
            assess_breaches(&[breach("high", "Phone")]).status,
            ExposureStatus::AtRisk
        );
        assert_eq!(
            assess_breaches(&[breach("critical", "Password")]).status,
            ExposureStatus::Compromised
        );
        assert_eq!(ExposureStatus::AtRisk.to_string(), "AT RISK");
    }

    #[test]
    fn test_breach_record_accepts_both_field_names() {
        let a: BreachRecord =
            serde_json::from_str(r#"{"breach_name":"A","data_leaked":"Password"}"#).unwrap();
        let b: BreachRecord =
            serde_json::from_str(r#"{"breach_name":"B","data_types":"Password"}"#).unwrap();
        assert_eq!(a.data_leaked.as_deref(), Some("Password"));
        assert_eq!(b.data_leaked.as_deref(), Some("Password"));
    }
}
