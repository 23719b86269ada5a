use crate::grading::engine::{clamp_percent, percent_of};
use crate::grading::outcome::{NextTierProgress, RequirementProgress, TierStanding, TierSummary};
use crate::model::VendorMetrics;
use crate::rules::schema::{RequirementBound, TierDef, TierLadder, TierRequirements};
use rust_decimal::Decimal;

/// Progress of each requirement of a tier, in a fixed order
/// (sales, rating, disputes, returns, payment compliance).
///
/// A met requirement shows 100. An unmet floor shows `value / bound`; an unmet
/// ceiling shows `bound / value`, i.e. how close the vendor is to getting back
/// under it.
pub fn evaluate_requirements(
    requirements: &TierRequirements,
    metrics: &VendorMetrics,
) -> Vec<RequirementProgress> {
    requirements
        .bounds()
        .iter()
        .map(|bound| requirement_progress(bound, metrics))
        .collect()
}

fn requirement_progress(bound: &RequirementBound, metrics: &VendorMetrics) -> RequirementProgress {
    let Some(value) = metrics.get(bound.metric) else {
        let met = bound.is_trivial();
        return RequirementProgress {
            metric: bound.metric,
            bound: bound.bound,
            is_ceiling: bound.is_ceiling,
            value: None,
            met,
            progress: if met {
                Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            },
            missing: true,
        };
    };

    // Tier bounds are hard limits: a zero ceiling admits only zero.
    let met = if bound.is_ceiling {
        value <= bound.bound
    } else {
        value >= bound.bound
    };
    let progress = if met {
        Decimal::ONE_HUNDRED
    } else if bound.is_ceiling {
        clamp_percent(percent_of(bound.bound, value).unwrap_or(Decimal::ZERO))
    } else {
        clamp_percent(percent_of(value, bound.bound).unwrap_or(Decimal::ZERO))
    };

    RequirementProgress {
        metric: bound.metric,
        bound: bound.bound,
        is_ceiling: bound.is_ceiling,
        value: Some(value),
        met,
        progress,
        missing: false,
    }
}

/// True if every requirement of the tier is met.
pub fn meets_tier(tier: &TierDef, metrics: &VendorMetrics) -> bool {
    evaluate_requirements(&tier.requirements, metrics)
        .iter()
        .all(|r| r.met)
}

/// Index of the highest tier the vendor qualifies for.
///
/// Climbs from the entry tier and stops at the first tier not met, so a
/// vendor never skips a rung. `None` if even the entry tier is not met.
pub fn qualify_tier(metrics: &VendorMetrics, ladder: &TierLadder) -> Option<usize> {
    ladder
        .iter()
        .take_while(|tier| meets_tier(tier, metrics))
        .count()
        .checked_sub(1)
}

/// Progress toward the tier above `current` (`None` = unranked, aiming for
/// the entry tier).
///
/// Overall progress is the minimum across requirements: all of them must be
/// met to advance, so the slowest one is the binding constraint. At or past
/// the top of the ladder the result is terminal.
pub fn next_tier_progress(
    current: Option<usize>,
    ladder: &TierLadder,
    metrics: &VendorMetrics,
) -> NextTierProgress {
    let target = match current {
        None => 0,
        Some(index) if index >= ladder.last_index() => {
            let top = ladder.last_index();
            return NextTierProgress::Terminal {
                tier: summarize(top, ladder.get(top)),
            };
        }
        Some(index) => index + 1,
    };

    let tier = ladder.get(target);
    let requirements = tier
        .map(|t| evaluate_requirements(&t.requirements, metrics))
        .unwrap_or_default();

    let overall_progress = requirements
        .iter()
        .map(|r| r.progress)
        .min()
        .unwrap_or(Decimal::ONE_HUNDRED);

    let binding = requirements
        .iter()
        .filter(|r| !r.met)
        .min_by(|a, b| a.progress.cmp(&b.progress))
        .map(|r| r.metric);

    NextTierProgress::Next {
        tier: summarize(target, tier),
        overall_progress,
        requirements,
        binding,
    }
}

/// Current tier and progress toward the next, in one pass.
pub fn tier_standing(metrics: &VendorMetrics, ladder: &TierLadder) -> TierStanding {
    let current = qualify_tier(metrics, ladder);
    TierStanding {
        current: current.map(|i| summarize(i, ladder.get(i))),
        next: next_tier_progress(current, ladder, metrics),
    }
}

fn summarize(index: usize, tier: Option<&TierDef>) -> TierSummary {
    match tier {
        Some(t) => TierSummary {
            index,
            id: t.id.clone(),
            name: t.name.clone(),
            badge: t.badge.clone(),
            commission_rate: t.commission_rate,
        },
        // Ladders are validated non-empty; this only guards the type.
        None => TierSummary {
            index,
            id: String::new(),
            name: String::new(),
            badge: None,
            commission_rate: None,
        },
    }
}
