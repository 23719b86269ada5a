use crate::grading::outcome::{CriterionResult, GradeResult, LetterGrade, MetricEvaluation};
use crate::model::VendorMetrics;
use crate::rules::schema::{Criterion, GradingCriteria};
use rust_decimal::Decimal;

/// Lower score bound of each grade, highest first. Scores below the last
/// entry are an F.
pub const GRADE_SCALE: [(u32, LetterGrade); 7] = [
    (95, LetterGrade::APlus),
    (90, LetterGrade::A),
    (85, LetterGrade::BPlus),
    (75, LetterGrade::B),
    (70, LetterGrade::CPlus),
    (60, LetterGrade::C),
    (50, LetterGrade::D),
];

/// Compare a metric value against a criterion's threshold.
///
/// The bound is inclusive in both directions. Progress is the achievement
/// ratio toward the threshold, capped to [0, 100]. A zero threshold cannot be
/// divided by and is always met.
pub fn evaluate_metric(value: Decimal, criterion: &Criterion) -> MetricEvaluation {
    let threshold = criterion.threshold;

    if threshold.is_zero() {
        return MetricEvaluation {
            met: true,
            progress: Decimal::ONE_HUNDRED,
        };
    }

    if criterion.is_inverse {
        let progress = threshold
            .checked_sub(value)
            .and_then(|headroom| percent_of(headroom, threshold))
            .unwrap_or(Decimal::ZERO);
        MetricEvaluation {
            met: value <= threshold,
            progress: clamp_percent(progress),
        }
    } else {
        // Overflow only happens far above the threshold.
        let progress = percent_of(value, threshold).unwrap_or(Decimal::ONE_HUNDRED);
        MetricEvaluation {
            met: value >= threshold,
            progress: clamp_percent(progress),
        }
    }
}

/// Evaluate every criterion against the metrics, in criteria order.
pub fn evaluate_criteria(metrics: &VendorMetrics, criteria: &GradingCriteria) -> Vec<CriterionResult> {
    criteria
        .iter()
        .map(|criterion| {
            let (value, eval) = match metrics.get(criterion.metric) {
                Some(value) => (value, evaluate_metric(value, criterion)),
                None => {
                    tracing::debug!(
                        metric = criterion.metric.key(),
                        "graded metric missing from input, scoring as unmet"
                    );
                    (
                        Decimal::ZERO,
                        MetricEvaluation {
                            met: false,
                            progress: Decimal::ZERO,
                        },
                    )
                }
            };
            CriterionResult {
                metric: criterion.metric,
                value,
                threshold: criterion.threshold,
                is_inverse: criterion.is_inverse,
                weight: criterion.weight,
                met: eval.met,
                progress: eval.progress,
                contribution: eval.progress * criterion.weight / Decimal::ONE_HUNDRED,
            }
        })
        .collect()
}

/// Weighted score in [0, 100].
pub fn compute_score(metrics: &VendorMetrics, criteria: &GradingCriteria) -> Decimal {
    total_score(&evaluate_criteria(metrics, criteria))
}

/// Map a score to its letter grade. A score exactly on a breakpoint gets the
/// higher grade.
pub fn score_to_grade(score: Decimal) -> LetterGrade {
    GRADE_SCALE
        .iter()
        .find(|(bound, _)| score >= Decimal::from(*bound))
        .map(|(_, grade)| *grade)
        .unwrap_or(LetterGrade::F)
}

/// Score, letter grade and per-criterion breakdown.
pub fn grade_metrics(metrics: &VendorMetrics, criteria: &GradingCriteria) -> GradeResult {
    let results = evaluate_criteria(metrics, criteria);
    let score = total_score(&results);
    GradeResult {
        score,
        letter_grade: score_to_grade(score),
        criteria: results,
    }
}

fn total_score(results: &[CriterionResult]) -> Decimal {
    let sum: Decimal = results.iter().map(|r| r.contribution).sum();
    // Rounding in the last decimal place can push a perfect sum past 100.
    clamp_percent(sum)
}

/// `part / whole * 100`, or `None` on overflow.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)?.checked_mul(Decimal::ONE_HUNDRED)
}

pub(crate) fn clamp_percent(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED)
}
