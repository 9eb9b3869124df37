//! Per-feature z-scores against the baseline, and their magnitude tiers.

use driftwatch_core::constants::STD_DEV_FLOOR;
use driftwatch_core::types::analysis::Severity;
use driftwatch_core::types::features::{FeatureVector, FEATURE_NAMES};
use driftwatch_core::types::model::BaselineModel;

/// The deviation of one feature from its baseline statistics.
#[derive(Debug, Clone, Copy)]
pub struct FeatureDeviation {
    pub index: usize,
    pub name: &'static str,
    pub value: f64,
    pub mean: f64,
    pub z: f64,
}

impl FeatureDeviation {
    /// A deviation below |z| = 1.5 is noise and emits nothing.
    pub fn is_significant(&self) -> bool {
        self.z.abs() >= 1.5
    }
}

/// z-score magnitude tiers, driving severity and explanation phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagnitudeTier {
    Ignored,
    Minor,
    Moderate,
    Major,
    Dramatic,
}

impl MagnitudeTier {
    pub fn from_z(z: f64) -> Self {
        let magnitude = z.abs();
        if magnitude < 1.5 {
            Self::Ignored
        } else if magnitude < 2.5 {
            Self::Minor
        } else if magnitude < 3.5 {
            Self::Moderate
        } else if magnitude < 4.5 {
            Self::Major
        } else {
            Self::Dramatic
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Ignored | Self::Minor => Severity::Low,
            Self::Moderate => Severity::Medium,
            Self::Major => Severity::High,
            Self::Dramatic => Severity::Critical,
        }
    }

    pub fn adverb(&self) -> &'static str {
        match self {
            Self::Ignored => "negligibly",
            Self::Minor => "slightly",
            Self::Moderate => "moderately",
            Self::Major => "significantly",
            Self::Dramatic => "dramatically",
        }
    }
}

/// Compute all 17 deviations. σ is floored at training time; the residual
/// floor here guards hand-built models. A floored-σ feature whose value sits
/// within 0.01 of the mean is treated as unmoved.
pub fn feature_deviations(vector: &FeatureVector, model: &BaselineModel) -> Vec<FeatureDeviation> {
    FEATURE_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let value = vector.get(index);
            let (mean, std_dev) = model
                .stats(name)
                .map(|s| (s.mean, s.std_dev))
                .unwrap_or((0.0, STD_DEV_FLOOR));
            let z = if std_dev <= STD_DEV_FLOOR && (value - mean).abs() < 0.01 {
                0.0
            } else {
                (value - mean) / std_dev.max(STD_DEV_FLOOR)
            };
            FeatureDeviation { index, name, value, mean, z }
        })
        .collect()
}

/// Round to two decimals — scores and trend deltas are reported this way.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(MagnitudeTier::from_z(1.49), MagnitudeTier::Ignored);
        assert_eq!(MagnitudeTier::from_z(-1.5), MagnitudeTier::Minor);
        assert_eq!(MagnitudeTier::from_z(2.5), MagnitudeTier::Moderate);
        assert_eq!(MagnitudeTier::from_z(-3.5), MagnitudeTier::Major);
        assert_eq!(MagnitudeTier::from_z(4.5), MagnitudeTier::Dramatic);
    }

    #[test]
    fn severity_mapping() {
        assert_eq!(MagnitudeTier::Minor.severity(), Severity::Low);
        assert_eq!(MagnitudeTier::Moderate.severity(), Severity::Medium);
        assert_eq!(MagnitudeTier::Major.severity(), Severity::High);
        assert_eq!(MagnitudeTier::Dramatic.severity(), Severity::Critical);
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(12.346), 12.35);
        assert_eq!(round2(0.004), 0.0);
    }
}
