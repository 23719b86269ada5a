pub mod builtin;
pub mod schema;

use crate::error::TierlineError;
use crate::model::MetricKind;
use rust_decimal::Decimal;
use schema::{Criterion, GradingProfile, TierDef};
use std::collections::HashSet;
use std::path::Path;

/// Load a grading profile from a JSON file.
pub fn load_profile(path: &Path) -> Result<GradingProfile, TierlineError> {
    let content = std::fs::read_to_string(path).map_err(|e| TierlineError::ProfileLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_profile(&content, path)
}

/// Parse a grading profile from a JSON string.
pub fn parse_profile(json: &str, source: &Path) -> Result<GradingProfile, TierlineError> {
    let profile: GradingProfile =
        serde_json::from_str(json).map_err(|e| TierlineError::ProfileLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_profile(&profile)?;
    tracing::info!(
        profile = %profile.name,
        version = %profile.version,
        source = %source.display(),
        "loaded grading profile"
    );
    Ok(profile)
}

/// Parse a grading profile from a JSON string with no file behind it.
pub fn parse_profile_str(json: &str) -> Result<GradingProfile, TierlineError> {
    parse_profile(json, Path::new("<inline>"))
}

/// Validate the profile-level fields.
///
/// Criteria and tiers validate themselves on construction.
pub fn validate_profile(profile: &GradingProfile) -> Result<(), TierlineError> {
    if profile.name.trim().is_empty() {
        return Err(TierlineError::ProfileInvalid(
            "profile name must not be empty".into(),
        ));
    }
    if profile.version.trim().is_empty() {
        return Err(TierlineError::ProfileInvalid(format!(
            "profile '{}' has an empty version",
            profile.name
        )));
    }
    Ok(())
}

/// Validate a criteria list: non-empty, no duplicate metrics, sane bounds and
/// weights summing to exactly 100.
pub fn validate_criteria(criteria: &[Criterion]) -> Result<(), TierlineError> {
    if criteria.is_empty() {
        return Err(TierlineError::ProfileInvalid(
            "criteria must not be empty".into(),
        ));
    }

    let mut seen = HashSet::new();
    for criterion in criteria {
        let key = criterion.metric.key();

        if !seen.insert(criterion.metric) {
            return Err(TierlineError::ProfileInvalid(format!(
                "metric '{}' appears in more than one criterion",
                key
            )));
        }

        if criterion.weight < Decimal::ZERO {
            return Err(TierlineError::ProfileInvalid(format!(
                "criterion '{}' has negative weight {}",
                key, criterion.weight
            )));
        }

        check_bound(key, "threshold", criterion.metric, criterion.threshold)?;

        if criterion.metric == MetricKind::TotalSales && criterion.is_inverse {
            return Err(TierlineError::ProfileInvalid(
                "criterion 'total_sales' cannot be inverse".into(),
            ));
        }
    }

    let total: Decimal = criteria.iter().map(|c| c.weight).sum();
    if total != Decimal::ONE_HUNDRED {
        return Err(TierlineError::ProfileInvalid(format!(
            "criteria weights sum to {}, expected exactly 100",
            total.normalize()
        )));
    }

    Ok(())
}

/// Validate a tier ladder: non-empty, unique ids, bounds in range, and each
/// tier at least as demanding as the one below it.
pub fn validate_tiers(tiers: &[TierDef]) -> Result<(), TierlineError> {
    if tiers.is_empty() {
        return Err(TierlineError::ProfileInvalid(
            "tiers must not be empty".into(),
        ));
    }

    let mut ids = HashSet::new();
    for tier in tiers {
        if tier.id.trim().is_empty() {
            return Err(TierlineError::ProfileInvalid(
                "tier id must not be empty".into(),
            ));
        }
        if !ids.insert(tier.id.to_lowercase()) {
            return Err(TierlineError::ProfileInvalid(format!(
                "duplicate tier id '{}'",
                tier.id
            )));
        }
        if tier.name.trim().is_empty() {
            return Err(TierlineError::ProfileInvalid(format!(
                "tier '{}' has an empty name",
                tier.id
            )));
        }
        if let Some(rate) = tier.commission_rate {
            if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
                return Err(TierlineError::ProfileInvalid(format!(
                    "tier '{}' has commission rate {} outside 0..=100",
                    tier.id, rate
                )));
            }
        }
        for req in tier.requirements.bounds() {
            check_bound(&tier.id, req.metric.key(), req.metric, req.bound)?;
        }
    }

    for pair in tiers.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        let below = lower.requirements.bounds();
        let above = upper.requirements.bounds();
        for (b, a) in below.iter().zip(above.iter()) {
            let looser = if a.is_ceiling {
                a.bound > b.bound
            } else {
                a.bound < b.bound
            };
            if looser {
                return Err(TierlineError::ProfileInvalid(format!(
                    "tier '{}' is easier to reach than '{}' below it: {} {} vs {}",
                    upper.id,
                    lower.id,
                    a.metric.key(),
                    a.bound,
                    b.bound
                )));
            }
        }
    }

    Ok(())
}

fn check_bound(
    owner: &str,
    field: &str,
    metric: MetricKind,
    value: Decimal,
) -> Result<(), TierlineError> {
    if !metric.scale().contains(value) {
        let range = match metric.scale().max() {
            Some(max) => format!("0..={}", max),
            None => "a non-negative amount".to_string(),
        };
        return Err(TierlineError::ProfileInvalid(format!(
            "'{}' has {} {} outside {} for {}",
            owner,
            field,
            value,
            range,
            metric.key()
        )));
    }
    Ok(())
}
