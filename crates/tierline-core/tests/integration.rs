//! Integration tests for evaluate_vendors() over the built-in presets.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tierline_core::error::TierlineError;
use tierline_core::grading::outcome::{LetterGrade, NextTierProgress};
use tierline_core::model::{AdjustmentReason, MetricKind, VendorMetrics, VendorRecord};
use tierline_core::parsing::parse_vendors_csv;
use tierline_core::rules::builtin::load_preset;
use tierline_core::rules::load_profile;
use tierline_core::trace::build_trace;
use tierline_core::{evaluate_vendor, evaluate_vendors};

fn vendor(id: &str, metrics: VendorMetrics) -> VendorRecord {
    VendorRecord {
        vendor_id: id.into(),
        name: None,
        metrics,
        adjustments: vec![],
    }
}

#[allow(clippy::too_many_arguments)]
fn metrics(
    response: Decimal,
    on_time: Decimal,
    satisfaction: Decimal,
    returns: Decimal,
    accuracy: Decimal,
    communication: Decimal,
    sales: Decimal,
    disputes: Option<Decimal>,
    compliance: Option<Decimal>,
) -> VendorMetrics {
    VendorMetrics {
        response_rate: response,
        on_time_delivery: on_time,
        customer_satisfaction: satisfaction,
        return_rate: returns,
        order_accuracy: accuracy,
        communication,
        total_sales: sales,
        dispute_rate: disputes,
        payment_compliance: compliance,
    }
}

// ---------------------------------------------------------------------------
// Test 1: Reference vendor grades A on the marketplace preset
// ---------------------------------------------------------------------------
#[test]
fn reference_vendor_grades_a() {
    let profile = load_preset("marketplace").unwrap();
    let v = vendor(
        "v-ref",
        metrics(
            dec!(98),
            dec!(96),
            dec!(4.8),
            dec!(2.5),
            dec!(97),
            dec!(4.9),
            dec!(0),
            None,
            None,
        ),
    );

    let report = evaluate_vendor(&v, &profile);

    assert_eq!(report.grade.score, dec!(92.5));
    assert_eq!(report.grade.letter_grade, LetterGrade::A);
    assert!(report.adjustments.is_empty());
    // Bronze has no requirements.
    assert_eq!(report.standing.current.as_ref().unwrap().id, "bronze");
}

// ---------------------------------------------------------------------------
// Test 2: Gold vendor progressing toward Platinum, sales is the binding constraint
// ---------------------------------------------------------------------------
#[test]
fn gold_vendor_progress_toward_platinum() {
    let profile = load_preset("marketplace").unwrap();
    let v = vendor(
        "v-gold",
        metrics(
            dec!(95),
            dec!(92),
            dec!(4.5),
            dec!(4),
            dec!(96),
            dec!(4.6),
            dec!(30000),
            Some(dec!(2)),
            Some(dec!(96)),
        ),
    );

    let report = evaluate_vendor(&v, &profile);
    let current = report.standing.current.as_ref().unwrap();
    assert_eq!(current.id, "gold");
    assert_eq!(current.commission_rate, Some(dec!(10)));

    match &report.standing.next {
        NextTierProgress::Next {
            tier,
            overall_progress,
            binding,
            requirements,
        } => {
            assert_eq!(tier.id, "platinum");
            // 30000 / 100000
            assert_eq!(*overall_progress, dec!(30));
            assert_eq!(*binding, Some(MetricKind::TotalSales));
            let disputes = requirements
                .iter()
                .find(|r| r.metric == MetricKind::DisputeRate)
                .unwrap();
            // Exactly at the ceiling counts as met.
            assert!(disputes.met);
        }
        NextTierProgress::Terminal { .. } => panic!("gold is not the top tier"),
    }
}

// ---------------------------------------------------------------------------
// Test 3: Diamond vendor has no next tier
// ---------------------------------------------------------------------------
#[test]
fn diamond_vendor_is_terminal() {
    let profile = load_preset("marketplace").unwrap();
    let v = vendor(
        "v-diamond",
        metrics(
            dec!(99),
            dec!(99),
            dec!(4.9),
            dec!(1),
            dec!(99),
            dec!(4.9),
            dec!(750000),
            Some(dec!(0.4)),
            Some(dec!(99.9)),
        ),
    );

    let report = evaluate_vendor(&v, &profile);
    assert_eq!(report.standing.current.as_ref().unwrap().id, "diamond");
    assert!(report.standing.next.is_terminal());
    assert_eq!(report.grade.letter_grade, LetterGrade::APlus);
}

// ---------------------------------------------------------------------------
// Test 4: Out-of-range inputs are clamped and reported, not rejected
// ---------------------------------------------------------------------------
#[test]
fn out_of_range_inputs_are_clamped() {
    let profile = load_preset("marketplace").unwrap();
    let v = vendor(
        "v-bad",
        metrics(
            dec!(120),
            dec!(96),
            dec!(4.8),
            dec!(-2),
            dec!(97),
            dec!(4.9),
            dec!(100),
            None,
            None,
        ),
    );

    let report = evaluate_vendor(&v, &profile);
    assert_eq!(report.adjustments.len(), 2);
    let returns = report
        .adjustments
        .iter()
        .find(|a| a.metric == MetricKind::ReturnRate)
        .unwrap();
    assert_eq!(returns.adjusted, dec!(0));
    assert_eq!(returns.reason, AdjustmentReason::BelowRange);

    // Return rate clamped to 0 earns the full 15 points.
    assert_eq!(report.grade.score, dec!(100));
}

// ---------------------------------------------------------------------------
// Test 5: Batch keeps input order and evaluations are repeatable
// ---------------------------------------------------------------------------
#[test]
fn batch_is_ordered_and_repeatable() {
    let profile = load_preset("strict").unwrap();
    let vendors = vec![
        vendor(
            "v-1",
            metrics(
                dec!(80),
                dec!(70),
                dec!(3.9),
                dec!(9),
                dec!(88),
                dec!(3.5),
                dec!(1000),
                None,
                Some(dec!(90)),
            ),
        ),
        vendor(
            "v-2",
            metrics(
                dec!(99),
                dec!(97),
                dec!(4.7),
                dec!(1.5),
                dec!(99),
                dec!(4.8),
                dec!(40000),
                Some(dec!(1)),
                Some(dec!(99)),
            ),
        ),
    ];

    let first = evaluate_vendors(&vendors, &profile);
    let second = evaluate_vendors(&vendors, &profile);

    assert_eq!(first.profile_name, "Curated storefront");
    let ids: Vec<_> = first.vendors.iter().map(|r| r.vendor_id.as_str()).collect();
    assert_eq!(ids, vec!["v-1", "v-2"]);
    assert!(first.vendors[0].standing.current.is_none());
    assert_eq!(
        first.vendors[1].standing.current.as_ref().unwrap().id,
        "preferred"
    );

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Test 6: CSV export with a NaN cell flows through to the report
// ---------------------------------------------------------------------------
#[test]
fn csv_export_end_to_end() {
    let profile = load_preset("marketplace").unwrap();
    let csv = "vendor_id,name,response_rate,on_time_delivery,customer_satisfaction,return_rate,order_accuracy,communication,total_sales,dispute_rate,payment_compliance\n\
               v-10,North Shop,98%,96%,4.8,2.5%,97%,4.9,\"$8,200\",1.2,97\n\
               v-11,South Shop,NaN,90,4.1,6,91,4.2,900,,\n";

    let vendors = parse_vendors_csv(csv).unwrap();
    let result = evaluate_vendors(&vendors, &profile);

    let north = &result.vendors[0];
    assert_eq!(north.name.as_deref(), Some("North Shop"));
    assert_eq!(north.standing.current.as_ref().unwrap().id, "silver");

    let south = &result.vendors[1];
    assert_eq!(south.adjustments.len(), 1);
    assert_eq!(south.adjustments[0].reason, AdjustmentReason::NonFinite);
    let response = &south.grade.criteria[0];
    assert_eq!(response.metric, MetricKind::ResponseRate);
    assert!(!response.met);
}

// ---------------------------------------------------------------------------
// Test 7: Trace explains every criterion plus grade and tier decisions
// ---------------------------------------------------------------------------
#[test]
fn trace_covers_all_decisions() {
    let profile = load_preset("marketplace").unwrap();
    let mut m = metrics(
        dec!(98),
        dec!(96),
        dec!(4.8),
        dec!(2.5),
        dec!(97),
        dec!(4.9),
        dec!(6000),
        Some(dec!(1)),
        Some(dec!(92)),
    );
    m.communication = dec!(6);
    let result = evaluate_vendors(&[vendor("v-t", m)], &profile);
    let trace = build_trace(&result.profile_name, &result.vendors);

    assert_eq!(trace.decisions.len(), profile.criteria.len() + 3);
    assert_eq!(trace.warnings.len(), 1);
    assert!(trace.warnings[0].message.contains("Communication"));

    let json = serde_json::to_value(&trace).unwrap();
    assert_eq!(json["trace_schema_version"], "1.0");
    assert_eq!(json["decisions"][0]["target"], "criterion");
}

// ---------------------------------------------------------------------------
// Test 8: Misconfigured profile fails at load time
// ---------------------------------------------------------------------------
#[test]
fn misconfigured_profile_fails_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{
            "name": "Bad weights",
            "version": "1",
            "criteria": [
                { "metric": "response_rate", "weight": "50", "threshold": "90" },
                { "metric": "order_accuracy", "weight": "45", "threshold": "90" }
            ],
            "tiers": [{ "id": "bronze", "name": "Bronze" }]
        }"#,
    )
    .unwrap();

    let err = load_profile(&path).unwrap_err();
    assert!(matches!(err, TierlineError::ProfileLoad { .. }));
    assert!(err.to_string().contains("sum to 95"), "{err}");
}
