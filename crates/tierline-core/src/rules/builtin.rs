use crate::error::TierlineError;
use crate::rules::schema::GradingProfile;
use std::path::PathBuf;

const MARKETPLACE_JSON: &str = include_str!("../../../../rules/marketplace.json");
const STRICT_JSON: &str = include_str!("../../../../rules/strict.json");

/// Available predefined grading profiles.
pub const PRESETS: &[&str] = &["marketplace", "strict"];

/// Preset used when no profile is given.
pub const DEFAULT_PRESET: &str = "marketplace";

/// Load a predefined grading profile by name.
pub fn load_preset(name: &str) -> Result<GradingProfile, TierlineError> {
    let json = match name {
        "marketplace" => MARKETPLACE_JSON,
        "strict" => STRICT_JSON,
        _ => {
            return Err(TierlineError::UnknownPreset {
                name: name.to_string(),
                available: PRESETS.join(", "),
            })
        }
    };
    let source = PathBuf::from(format!("<preset:{name}>"));
    crate::rules::parse_profile(json, &source)
}
