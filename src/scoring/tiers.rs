use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Upper bound (inclusive) of the Low band
const LOW_MAX: u64 = 2;
/// Upper bound (inclusive) of the Medium band
const MEDIUM_MAX: u64 = 5;

/// How sure we are that a document has drifted.
///
/// Ordered from least to most confident, so `tier >= ConfidenceTier::High`
/// reads naturally.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum ConfidenceTier {
    #[default]
    Green,
    Low,
    Medium,
    High,
    Certain,
}

impl ConfidenceTier {
    pub const ALL: [ConfidenceTier; 5] = [
        ConfidenceTier::Green,
        ConfidenceTier::Low,
        ConfidenceTier::Medium,
        ConfidenceTier::High,
        ConfidenceTier::Certain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::Green => "Green",
            ConfidenceTier::Low => "Low",
            ConfidenceTier::Medium => "Medium",
            ConfidenceTier::High => "High",
            ConfidenceTier::Certain => "Certain",
        }
    }

    /// What a caller should do about a document in this tier
    pub fn action(&self) -> RecommendedAction {
        match self {
            ConfidenceTier::Green => RecommendedAction::None,
            ConfidenceTier::Low => RecommendedAction::ReportOnly,
            ConfidenceTier::Medium => RecommendedAction::SuggestRefresh,
            ConfidenceTier::High => RecommendedAction::AutoRefresh,
            ConfidenceTier::Certain => RecommendedAction::AutoRefreshSilent,
        }
    }
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfidenceTier::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown tier '{}'. Valid tiers: green, low, medium, high, certain",
                    s
                )
            })
    }
}

/// Remediation recommended for a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendedAction {
    None,
    ReportOnly,
    SuggestRefresh,
    AutoRefresh,
    AutoRefreshSilent,
}

impl RecommendedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedAction::None => "none",
            RecommendedAction::ReportOnly => "report-only",
            RecommendedAction::SuggestRefresh => "suggest-refresh",
            RecommendedAction::AutoRefresh => "auto-refresh",
            RecommendedAction::AutoRefreshSilent => "auto-refresh-silent",
        }
    }
}

impl std::fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a drift score to a confidence tier. First matching rule wins.
pub fn score_to_tier(score: u64, deterministic: bool, stale: bool) -> ConfidenceTier {
    if deterministic {
        return ConfidenceTier::Certain;
    }
    if stale {
        return ConfidenceTier::High;
    }
    match score {
        0 => ConfidenceTier::Green,
        s if s <= LOW_MAX => ConfidenceTier::Low,
        s if s <= MEDIUM_MAX => ConfidenceTier::Medium,
        _ => ConfidenceTier::High,
    }
}
