use std::path::PathBuf;
use tierline_core::error::TierlineError;
use tierline_core::rules::builtin;
use tierline_core::rules::schema::GradingProfile;

use crate::output::{self, OutputFormat};

pub fn run(
    input_file: PathBuf,
    profile_file: Option<PathBuf>,
    preset: Option<String>,
    output_format: OutputFormat,
    verbose: bool,
    trace_file: Option<PathBuf>,
) -> Result<(), TierlineError> {
    let profile: GradingProfile = match profile_file {
        Some(path) => tierline_core::rules::load_profile(&path)?,
        None => builtin::load_preset(preset.as_deref().unwrap_or(builtin::DEFAULT_PRESET))?,
    };

    let vendors = tierline_core::parsing::load_vendors(&input_file)?;
    if vendors.is_empty() {
        return Err(TierlineError::ParseError(format!(
            "no vendor records in {}",
            input_file.display()
        )));
    }

    let result = tierline_core::evaluate_vendors(&vendors, &profile);

    if let Some(path) = trace_file {
        let trace = tierline_core::trace::build_trace(&result.profile_name, &result.vendors);
        std::fs::write(&path, serde_json::to_string_pretty(&trace)?)?;
        eprintln!(
            "Trace with {} decision(s) written to {}",
            trace.decisions.len(),
            path.display()
        );
    }

    match output_format {
        OutputFormat::Json => output::json::print(&result)?,
        OutputFormat::Table => output::table::print(&result, verbose),
    }

    Ok(())
}
