pub mod engine;
pub mod outcome;
pub mod tier;

pub use engine::{compute_score, evaluate_metric, grade_metrics, score_to_grade};
pub use outcome::{
    EvaluationResult, GradeResult, LetterGrade, MetricEvaluation, NextTierProgress, TierStanding,
    VendorReport,
};
pub use tier::{next_tier_progress, qualify_tier, tier_standing};
