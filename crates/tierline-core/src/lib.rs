pub mod error;
pub mod grading;
pub mod model;
pub mod parsing;
pub mod rules;
pub mod trace;

use grading::outcome::{EvaluationResult, VendorReport};
use model::VendorRecord;
use rules::schema::GradingProfile;

/// Main API entry point: grade and place a batch of vendors.
///
/// Each vendor is evaluated independently; the result is in input order.
pub fn evaluate_vendors(vendors: &[VendorRecord], profile: &GradingProfile) -> EvaluationResult {
    EvaluationResult {
        profile_name: profile.name.clone(),
        profile_version: profile.version.clone(),
        vendors: vendors
            .iter()
            .map(|v| evaluate_vendor(v, profile))
            .collect(),
    }
}

/// Grade a single vendor and place them on the tier ladder.
///
/// Never fails: out-of-range metrics are clamped and reported in
/// `VendorReport::adjustments`.
pub fn evaluate_vendor(vendor: &VendorRecord, profile: &GradingProfile) -> VendorReport {
    let (metrics, clamped) = vendor.metrics.sanitize();

    let grade = grading::grade_metrics(&metrics, &profile.criteria);
    let standing = grading::tier_standing(&metrics, &profile.tiers);

    tracing::debug!(
        vendor = %vendor.vendor_id,
        score = %grade.score.round_dp(2),
        grade = %grade.letter_grade,
        tier = standing.current.as_ref().map(|t| t.id.as_str()).unwrap_or("unranked"),
        next_progress = %standing.next.overall_progress().round_dp(1),
        "evaluated vendor"
    );

    let mut adjustments = vendor.adjustments.clone();
    adjustments.extend(clamped);

    VendorReport {
        vendor_id: vendor.vendor_id.clone(),
        name: vendor.name.clone(),
        grade,
        standing,
        adjustments,
    }
}
