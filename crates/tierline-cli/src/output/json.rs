use tierline_core::error::TierlineError;
use tierline_core::grading::outcome::EvaluationResult;

pub fn print(result: &EvaluationResult) -> Result<(), TierlineError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
