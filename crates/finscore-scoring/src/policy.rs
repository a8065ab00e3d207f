//! Composite weights and label thresholds.

use finscore_core::{Result, ScoreError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default valuation weight.
pub const VALUATION_WEIGHT: f64 = 0.20;
/// Default growth weight.
pub const GROWTH_WEIGHT: f64 = 0.20;
/// Default profitability weight.
pub const PROFITABILITY_WEIGHT: f64 = 0.25;
/// Default safety weight.
pub const SAFETY_WEIGHT: f64 = 0.20;
/// Default moat weight.
pub const MOAT_WEIGHT: f64 = 0.15;

/// Default minimum composite score for [`ScoreLabel::Elite`].
pub const ELITE_THRESHOLD: u8 = 85;
/// Default minimum composite score for [`ScoreLabel::Strong`].
pub const STRONG_THRESHOLD: u8 = 70;
/// Default minimum composite score for [`ScoreLabel::Watch`].
pub const WATCH_THRESHOLD: u8 = 50;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weight of each composite component. Must sum to 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Valuation weight.
    pub valuation: f64,
    /// Growth weight.
    pub growth: f64,
    /// Profitability weight.
    pub profitability: f64,
    /// Safety weight.
    pub safety: f64,
    /// Moat weight.
    pub moat: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            valuation: VALUATION_WEIGHT,
            growth: GROWTH_WEIGHT,
            profitability: PROFITABILITY_WEIGHT,
            safety: SAFETY_WEIGHT,
            moat: MOAT_WEIGHT,
        }
    }
}

impl ScoreWeights {
    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.valuation + self.growth + self.profitability + self.safety + self.moat
    }

    fn as_array(&self) -> [(&'static str, f64); 5] {
        [
            ("valuation", self.valuation),
            ("growth", self.growth),
            ("profitability", self.profitability),
            ("safety", self.safety),
            ("moat", self.moat),
        ]
    }
}

/// Qualitative band of a composite score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScoreLabel {
    /// At or above the elite threshold.
    Elite,
    /// At or above the strong threshold.
    Strong,
    /// At or above the watch threshold.
    Watch,
    /// Everything else.
    Risk,
}

impl ScoreLabel {
    /// Returns the label as an uppercase string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Elite => "ELITE",
            Self::Strong => "STRONG",
            Self::Watch => "WATCH",
            Self::Risk => "RISK",
        }
    }
}

impl fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum composite score of each label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelThresholds {
    /// Minimum for ELITE.
    pub elite: u8,
    /// Minimum for STRONG.
    pub strong: u8,
    /// Minimum for WATCH.
    pub watch: u8,
}

impl Default for LabelThresholds {
    fn default() -> Self {
        Self {
            elite: ELITE_THRESHOLD,
            strong: STRONG_THRESHOLD,
            watch: WATCH_THRESHOLD,
        }
    }
}

impl LabelThresholds {
    /// Maps a composite score to its label.
    #[must_use]
    pub const fn label(&self, score: u8) -> ScoreLabel {
        if score >= self.elite {
            ScoreLabel::Elite
        } else if score >= self.strong {
            ScoreLabel::Strong
        } else if score >= self.watch {
            ScoreLabel::Watch
        } else {
            ScoreLabel::Risk
        }
    }
}

/// Tunable composite scoring policy.
///
/// ```
/// use finscore_scoring::ScoringPolicy;
///
/// let policy = ScoringPolicy::from_json(r#"{"labels": {"elite": 90}}"#).unwrap();
/// assert_eq!(policy.labels.elite, 90);
/// assert_eq!(policy.labels.strong, 70);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Component weights.
    pub weights: ScoreWeights,
    /// Label thresholds.
    pub labels: LabelThresholds,
}

impl ScoringPolicy {
    /// Parses a policy from JSON and validates it. Missing fields take their
    /// defaults.
    ///
    /// # Errors
    /// Returns [`ScoreError::Parse`] on malformed JSON and
    /// [`ScoreError::InvalidParameter`] if validation fails.
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json)
            .map_err(|e| ScoreError::Parse(format!("Failed to parse scoring policy: {}", e)))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Checks that weights are finite, non-negative and sum to 1, and that
    /// label thresholds are ordered.
    ///
    /// # Errors
    /// Returns [`ScoreError::InvalidParameter`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in self.weights.as_array() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScoreError::InvalidParameter(format!(
                    "Weight '{}' must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }

        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoreError::InvalidParameter(format!(
                "Weights must sum to 1.0, got {}",
                sum
            )));
        }

        let labels = &self.labels;
        if labels.elite < labels.strong || labels.strong < labels.watch {
            return Err(ScoreError::InvalidParameter(format!(
                "Label thresholds must be ordered elite >= strong >= watch, got {}/{}/{}",
                labels.elite, labels.strong, labels.watch
            )));
        }

        Ok(())
    }
}
