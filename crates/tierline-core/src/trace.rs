use crate::grading::outcome::{NextTierProgress, VendorReport};
use serde::{Deserialize, Serialize};

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceSeverity {
    Critical,
    Important,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceVisibility {
    Always,
    Auto,
    OnDemand,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStepType {
    ThresholdCompare,
    WeightedContribution,
    GradeLookup,
    TierQualification,
    TierProgress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStep {
    pub step_type: TraceStepType,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceDecisionTarget {
    Criterion,
    Grade,
    CurrentTier,
    NextTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceDecision {
    pub decision_id: String,
    pub vendor_id: String,
    pub target: TraceDecisionTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    pub outcome: String,
    pub severity: TraceSeverity,
    pub visibility: TraceVisibility,
    pub steps: Vec<TraceStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceWarning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    pub message: String,
    pub severity: TraceSeverity,
    pub visibility: TraceVisibility,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceBundle {
    pub trace_schema_version: String,
    pub profile_name: String,
    pub decisions: Vec<TraceDecision>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TraceWarning>,
}

impl TraceBundle {
    pub fn new(profile_name: &str) -> Self {
        Self {
            trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
            profile_name: profile_name.to_string(),
            decisions: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// Build a trace explaining every decision in a batch of vendor reports.
pub fn build_trace(profile_name: &str, reports: &[VendorReport]) -> TraceBundle {
    let mut bundle = TraceBundle::new(profile_name);
    for report in reports {
        bundle.decisions.extend(build_vendor_decisions(report));
        bundle
            .warnings
            .extend(report.adjustments.iter().map(|adj| TraceWarning {
                vendor_id: Some(report.vendor_id.clone()),
                message: format!("input adjusted: {adj}"),
                severity: TraceSeverity::Important,
                visibility: TraceVisibility::Always,
            }));
    }
    bundle
}

pub fn build_vendor_decisions(report: &VendorReport) -> Vec<TraceDecision> {
    let vendor_id = &report.vendor_id;
    let mut decisions = Vec::new();
    let grade = &report.grade;

    for (idx, cr) in grade.criteria.iter().enumerate() {
        let comparison = match (cr.is_inverse, cr.met) {
            (true, true) => "<=",
            (true, false) => ">",
            (false, true) => ">=",
            (false, false) => "<",
        };
        decisions.push(TraceDecision {
            decision_id: format!("dec_{}_crit_{}", vendor_id, idx),
            vendor_id: vendor_id.clone(),
            target: TraceDecisionTarget::Criterion,
            metric: Some(cr.metric.key().to_string()),
            outcome: if cr.met { "met" } else { "not met" }.to_string(),
            severity: if cr.met {
                TraceSeverity::Info
            } else {
                TraceSeverity::Important
            },
            visibility: TraceVisibility::Auto,
            steps: vec![
                TraceStep {
                    step_type: TraceStepType::ThresholdCompare,
                    message: format!(
                        "{} {} {} {} ({}% progress)",
                        cr.metric,
                        cr.value,
                        comparison,
                        cr.threshold,
                        cr.progress.round_dp(2)
                    ),
                },
                TraceStep {
                    step_type: TraceStepType::WeightedContribution,
                    message: format!(
                        "{}% x weight {} = {} points",
                        cr.progress.round_dp(2),
                        cr.weight,
                        cr.contribution.round_dp(2)
                    ),
                },
            ],
        });
    }

    decisions.push(TraceDecision {
        decision_id: format!("dec_{}_grade", vendor_id),
        vendor_id: vendor_id.clone(),
        target: TraceDecisionTarget::Grade,
        metric: None,
        outcome: grade.letter_grade.to_string(),
        severity: TraceSeverity::Important,
        visibility: TraceVisibility::Always,
        steps: vec![TraceStep {
            step_type: TraceStepType::GradeLookup,
            message: format!(
                "score {} -> {}",
                grade.score.round_dp(2),
                grade.letter_grade
            ),
        }],
    });

    let current = match &report.standing.current {
        Some(tier) => tier.name.clone(),
        None => "unranked".to_string(),
    };
    decisions.push(TraceDecision {
        decision_id: format!("dec_{}_tier", vendor_id),
        vendor_id: vendor_id.clone(),
        target: TraceDecisionTarget::CurrentTier,
        metric: None,
        outcome: current.clone(),
        severity: TraceSeverity::Important,
        visibility: TraceVisibility::Always,
        steps: vec![TraceStep {
            step_type: TraceStepType::TierQualification,
            message: format!("all requirements met up to {}", current),
        }],
    });

    let (outcome, message) = match &report.standing.next {
        NextTierProgress::Terminal { tier } => (
            "terminal".to_string(),
            format!("{} is the top tier", tier.name),
        ),
        NextTierProgress::Next {
            tier,
            overall_progress,
            binding,
            ..
        } => (
            tier.name.clone(),
            match binding {
                Some(metric) => format!(
                    "{}% toward {}, limited by {}",
                    overall_progress.round_dp(1),
                    tier.name,
                    metric
                ),
                None => format!("all requirements for {} met", tier.name),
            },
        ),
    };
    decisions.push(TraceDecision {
        decision_id: format!("dec_{}_next", vendor_id),
        vendor_id: vendor_id.clone(),
        target: TraceDecisionTarget::NextTier,
        metric: None,
        outcome,
        severity: TraceSeverity::Info,
        visibility: TraceVisibility::OnDemand,
        steps: vec![TraceStep {
            step_type: TraceStepType::TierProgress,
            message,
        }],
    });

    decisions
}
