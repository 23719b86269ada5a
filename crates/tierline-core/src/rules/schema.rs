use crate::error::TierlineError;
use crate::model::MetricKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A grading profile: the weighted criteria behind the letter grade and the
/// tier ladder vendors climb.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingProfile {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub criteria: GradingCriteria,
    pub tiers: TierLadder,
}

/// One weighted, thresholded performance dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CriterionDef")]
pub struct Criterion {
    pub metric: MetricKind,
    /// Share of the total score, in percent.
    pub weight: Decimal,
    /// Pass/fail bound. Inclusive in both directions.
    pub threshold: Decimal,
    /// Lower values are better (e.g. return rate).
    pub is_inverse: bool,
}

impl Criterion {
    /// Criterion in the metric's natural direction.
    pub fn new(metric: MetricKind, weight: Decimal, threshold: Decimal) -> Self {
        Self {
            metric,
            weight,
            threshold,
            is_inverse: metric.is_inverse(),
        }
    }
}

#[derive(Deserialize)]
struct CriterionDef {
    metric: MetricKind,
    weight: Decimal,
    threshold: Decimal,
    #[serde(default)]
    is_inverse: Option<bool>,
}

impl From<CriterionDef> for Criterion {
    fn from(def: CriterionDef) -> Self {
        Criterion {
            metric: def.metric,
            weight: def.weight,
            threshold: def.threshold,
            is_inverse: def.is_inverse.unwrap_or_else(|| def.metric.is_inverse()),
        }
    }
}

/// Ordered criteria whose weights sum to exactly 100.
///
/// Only constructible through validation, so the engine can rely on the
/// weight invariant without re-checking it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Criterion>", into = "Vec<Criterion>")]
pub struct GradingCriteria(Vec<Criterion>);

impl GradingCriteria {
    pub fn new(criteria: Vec<Criterion>) -> Result<Self, TierlineError> {
        super::validate_criteria(&criteria)?;
        Ok(Self(criteria))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Criterion] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, metric: MetricKind) -> Option<&Criterion> {
        self.0.iter().find(|c| c.metric == metric)
    }
}

impl TryFrom<Vec<Criterion>> for GradingCriteria {
    type Error = TierlineError;

    fn try_from(criteria: Vec<Criterion>) -> Result<Self, Self::Error> {
        GradingCriteria::new(criteria)
    }
}

impl From<GradingCriteria> for Vec<Criterion> {
    fn from(criteria: GradingCriteria) -> Self {
        criteria.0
    }
}

impl<'a> IntoIterator for &'a GradingCriteria {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Minimum requirements for a tier. All must hold to qualify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRequirements {
    #[serde(default)]
    pub min_total_sales: Decimal,
    /// Compared against customer satisfaction.
    #[serde(default)]
    pub min_rating: Decimal,
    #[serde(default = "ceiling_default")]
    pub max_dispute_rate: Decimal,
    #[serde(default = "ceiling_default")]
    pub max_return_rate: Decimal,
    #[serde(default)]
    pub min_payment_compliance: Decimal,
}

fn ceiling_default() -> Decimal {
    Decimal::ONE_HUNDRED
}

impl Default for TierRequirements {
    fn default() -> Self {
        Self {
            min_total_sales: Decimal::ZERO,
            min_rating: Decimal::ZERO,
            max_dispute_rate: ceiling_default(),
            max_return_rate: ceiling_default(),
            min_payment_compliance: Decimal::ZERO,
        }
    }
}

/// A single bound within a tier's requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequirementBound {
    pub metric: MetricKind,
    pub bound: Decimal,
    /// The metric must stay at or below the bound instead of reaching it.
    pub is_ceiling: bool,
}

impl RequirementBound {
    /// Bounds every vendor satisfies regardless of their value.
    pub fn is_trivial(&self) -> bool {
        if self.is_ceiling {
            self.metric
                .scale()
                .max()
                .map_or(false, |max| self.bound >= max)
        } else {
            self.bound <= Decimal::ZERO
        }
    }
}

impl TierRequirements {
    pub fn bounds(&self) -> [RequirementBound; 5] {
        let floor = |metric, bound| RequirementBound {
            metric,
            bound,
            is_ceiling: false,
        };
        let ceiling = |metric, bound| RequirementBound {
            metric,
            bound,
            is_ceiling: true,
        };
        [
            floor(MetricKind::TotalSales, self.min_total_sales),
            floor(MetricKind::CustomerSatisfaction, self.min_rating),
            ceiling(MetricKind::DisputeRate, self.max_dispute_rate),
            ceiling(MetricKind::ReturnRate, self.max_return_rate),
            floor(MetricKind::PaymentCompliance, self.min_payment_compliance),
        ]
    }
}

/// A named vendor status level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDef {
    /// Stable identifier (e.g. "gold").
    pub id: String,
    /// Display name (e.g. "Gold Seller").
    pub name: String,
    /// Badge identifier used by the storefront.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default)]
    pub requirements: TierRequirements,
    /// Marketplace commission charged at this tier, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<String>,
}

/// Tiers ordered from entry level to the top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TierDef>", into = "Vec<TierDef>")]
pub struct TierLadder(Vec<TierDef>);

impl TierLadder {
    pub fn new(tiers: Vec<TierDef>) -> Result<Self, TierlineError> {
        super::validate_tiers(&tiers)?;
        Ok(Self(tiers))
    }

    pub fn get(&self, index: usize) -> Option<&TierDef> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TierDef> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.0.iter().position(|t| t.id.eq_ignore_ascii_case(id))
    }
}

impl TryFrom<Vec<TierDef>> for TierLadder {
    type Error = TierlineError;

    fn try_from(tiers: Vec<TierDef>) -> Result<Self, Self::Error> {
        TierLadder::new(tiers)
    }
}

impl From<TierLadder> for Vec<TierDef> {
    fn from(ladder: TierLadder) -> Self {
        ladder.0
    }
}
