use crate::model::{InputAdjustment, MetricKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of comparing one metric value against one bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricEvaluation {
    pub met: bool,
    /// Achievement toward the bound, in [0, 100].
    pub progress: Decimal,
}

/// Letter grade on the fixed marketplace scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl LetterGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::APlus => "A+",
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PartialEq<&str> for LetterGrade {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// A single criterion's contribution to the grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionResult {
    pub metric: MetricKind,
    pub value: Decimal,
    pub threshold: Decimal,
    pub is_inverse: bool,
    pub weight: Decimal,
    pub met: bool,
    pub progress: Decimal,
    /// `progress * weight / 100`, the points this criterion adds to the score.
    pub contribution: Decimal,
}

/// Letter grade and breakdown, derived fresh from the current metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeResult {
    /// Weighted score in [0, 100].
    pub score: Decimal,
    pub letter_grade: LetterGrade,
    pub criteria: Vec<CriterionResult>,
}

impl GradeResult {
    /// Pass/fail per criterion, in criteria order.
    pub fn per_metric_pass(&self) -> Vec<(MetricKind, bool)> {
        self.criteria.iter().map(|c| (c.metric, c.met)).collect()
    }

    pub fn failed_metrics(&self) -> Vec<MetricKind> {
        self.criteria
            .iter()
            .filter(|c| !c.met)
            .map(|c| c.metric)
            .collect()
    }
}

/// Progress of one tier requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementProgress {
    pub metric: MetricKind,
    pub bound: Decimal,
    pub is_ceiling: bool,
    /// The vendor's value, absent when the input did not carry the metric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    pub met: bool,
    pub progress: Decimal,
    /// The metric was absent from the input.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub missing: bool,
}

/// Identity and terms of a tier, without its requirements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierSummary {
    pub index: usize,
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<Decimal>,
}

/// Where the vendor stands relative to the tier above.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextTierProgress {
    /// Working toward `tier`.
    Next {
        tier: TierSummary,
        /// Minimum progress across requirements: every requirement must be
        /// met to advance, so the slowest one binds.
        overall_progress: Decimal,
        requirements: Vec<RequirementProgress>,
        /// The requirement with the lowest progress, if any is still unmet.
        #[serde(skip_serializing_if = "Option::is_none")]
        binding: Option<MetricKind>,
    },
    /// Already at the top of the ladder.
    Terminal { tier: TierSummary },
}

impl NextTierProgress {
    pub fn is_terminal(&self) -> bool {
        matches!(self, NextTierProgress::Terminal { .. })
    }

    pub fn overall_progress(&self) -> Decimal {
        match self {
            NextTierProgress::Next {
                overall_progress, ..
            } => *overall_progress,
            NextTierProgress::Terminal { .. } => Decimal::ONE_HUNDRED,
        }
    }
}

/// Current tier plus progress toward the next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierStanding {
    /// `None` when the vendor does not meet the entry tier.
    pub current: Option<TierSummary>,
    pub next: NextTierProgress,
}

/// Full evaluation for one vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorReport {
    pub vendor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub grade: GradeResult,
    pub standing: TierStanding,
    /// Input values that were clamped or replaced before grading.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<InputAdjustment>,
}

/// Evaluation of a batch of vendors against one profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub profile_name: String,
    pub profile_version: String,
    pub vendors: Vec<VendorReport>,
}
