use rust_decimal::Decimal;
use tierline_core::error::TierlineError;
use tierline_core::grading::evaluate_metric;
use tierline_core::model::MetricKind;
use tierline_core::rules::schema::Criterion;

pub fn run(
    value: Decimal,
    metric: &str,
    threshold: Decimal,
    inverse: bool,
) -> Result<(), TierlineError> {
    let kind = MetricKind::from_str_loose(metric).ok_or_else(|| {
        TierlineError::ParseError(format!(
            "unknown metric '{}'. Known metrics: {}",
            metric,
            MetricKind::ALL
                .iter()
                .map(|k| k.key())
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })?;

    let criterion = Criterion {
        metric: kind,
        weight: Decimal::ONE_HUNDRED,
        threshold,
        is_inverse: inverse || kind.is_inverse(),
    };
    let eval = evaluate_metric(value, &criterion);

    let comparison = if criterion.is_inverse { "<=" } else { ">=" };
    println!(
        "{}: {} {} {} -> {} ({}% progress)",
        kind,
        value,
        comparison,
        threshold,
        if eval.met { "met" } else { "not met" },
        eval.progress.round_dp(2)
    );

    Ok(())
}
