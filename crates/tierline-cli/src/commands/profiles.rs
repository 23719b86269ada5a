use rust_decimal::Decimal;
use std::path::Path;
use tierline_core::error::TierlineError;
use tierline_core::grading::engine::GRADE_SCALE;
use tierline_core::rules::builtin;
use tierline_core::rules::schema::GradingProfile;

pub fn list() -> Result<(), TierlineError> {
    println!("Available predefined profiles:\n");
    for name in builtin::PRESETS {
        let profile = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!(
            "  {:<12} {} (v{}){}",
            name, profile.name, profile.version, default_marker
        );
        if let Some(ref desc) = profile.description {
            println!("               {}", desc);
        }
        let tiers: Vec<&str> = profile.tiers.iter().map(|t| t.name.as_str()).collect();
        println!("               Tiers: {}", tiers.join(" -> "));
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), TierlineError> {
    let profile = builtin::load_preset(preset)?;
    print_explanation(&profile);
    Ok(())
}

fn print_explanation(profile: &GradingProfile) {
    println!("{} (version {})\n", profile.name, profile.version);

    if let Some(ref desc) = profile.description {
        println!("{}\n", desc);
    }

    println!(
        "Vendors are scored on {} weighted criteria. Each criterion earns its",
        profile.criteria.len()
    );
    println!("weight in points scaled by progress toward the threshold (capped at 100%).");
    println!("Inverse criteria earn points for headroom below the threshold.\n");

    let max_name_len = profile
        .criteria
        .iter()
        .map(|c| c.metric.to_string().len())
        .max()
        .unwrap_or(20);

    println!(
        "  {:<width$}  {:<8}  {:<10}  Direction",
        "Criterion",
        "Weight",
        "Threshold",
        width = max_name_len
    );
    println!("  {}", "-".repeat(max_name_len + 36));
    for c in &profile.criteria {
        let threshold = format!("{} {}", c.threshold, c.metric.scale().unit());
        println!(
            "  {:<width$}  {:<8}  {:<10}  {}",
            c.metric.to_string(),
            format!("{}%", c.weight),
            threshold.trim(),
            if c.is_inverse { "lower is better" } else { "higher is better" },
            width = max_name_len
        );
    }
    println!();

    println!("Grade scale (score at or above the bound):\n");
    for (bound, grade) in GRADE_SCALE {
        println!("  {:<3} >= {}", grade.as_str(), bound);
    }
    println!("  F   <  {}\n", GRADE_SCALE[GRADE_SCALE.len() - 1].0);

    println!(
        "Tiers (all requirements must be met; vendors climb one rung at a time):\n"
    );
    for tier in profile.tiers.iter() {
        print!("  {}", tier.name);
        if let Some(rate) = tier.commission_rate {
            print!("  [commission {}%]", rate);
        }
        println!();

        let reqs: Vec<String> = tier
            .requirements
            .bounds()
            .iter()
            .filter(|b| !b.is_trivial())
            .map(|b| {
                let op = if b.is_ceiling { "<=" } else { ">=" };
                format!("{} {} {}", b.metric, op, b.bound)
            })
            .collect();
        if reqs.is_empty() {
            println!("    no requirements");
        } else {
            for r in &reqs {
                println!("    {}", r);
            }
        }
        if !tier.benefits.is_empty() {
            println!("    benefits: {}", tier.benefits.join(", "));
        }
        println!();
    }
}

pub fn schema() -> Result<(), TierlineError> {
    print!(
        r#"JSON Profile Schema
===================

A grading profile defines how vendor metrics become a letter grade and
where a vendor sits on the tier ladder. `tierline grade` evaluates every
vendor in the input against one profile.

Top-level fields:
  name          (string, required)  Human-readable name of the profile
  description   (string, optional)  What this profile is for
  version       (string, required)  Version identifier (e.g., "2025.1")
  criteria      (array, required)   Weighted grading criteria (see below).
                                    Weights must sum to exactly 100.
  tiers         (array, required)   Tier ladder, entry tier first (see below)

Each entry in "criteria":
  metric        (string, required)  One of: response_rate, on_time_delivery,
                                    customer_satisfaction, return_rate,
                                    order_accuracy, communication,
                                    total_sales, dispute_rate,
                                    payment_compliance
  weight        (string, required)  Share of the score in percent
  threshold     (string, required)  Pass/fail bound (inclusive)
  is_inverse    (bool, optional)    Lower is better. Defaults to true for
                                    return_rate and dispute_rate.

Each entry in "tiers":
  id            (string, required)  Stable identifier (e.g., "gold")
  name          (string, required)  Display name
  badge         (string, optional)  Storefront badge identifier
  commission_rate
                (string, optional)  Commission at this tier, in percent
  benefits      (array, optional)   Benefit descriptions
  requirements  (object, optional)  All must be met to qualify:
    min_total_sales         default "0"
    min_rating              default "0" (customer satisfaction, 0-5)
    max_dispute_rate        default "100"
    max_return_rate         default "100"
    min_payment_compliance  default "0"

Each tier must be at least as demanding as the tier below it.

Example:
{{
  "name": "Handmade goods",
  "version": "1.0",
  "criteria": [
    {{ "metric": "on_time_delivery", "weight": "40", "threshold": "90" }},
    {{ "metric": "customer_satisfaction", "weight": "40", "threshold": "4.5" }},
    {{ "metric": "return_rate", "weight": "20", "threshold": "4" }}
  ],
  "tiers": [
    {{ "id": "maker", "name": "Maker" }},
    {{
      "id": "artisan",
      "name": "Artisan",
      "commission_rate": "9",
      "requirements": {{ "min_total_sales": "10000", "min_rating": "4.5" }}
    }}
  ]
}}

Note: numeric values must be quoted strings, not bare numbers,
to preserve exact decimal precision (e.g., "4.5" not 4.5).
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), TierlineError> {
    let profile = tierline_core::rules::load_profile(file)?;

    println!("Profile '{}' (v{}) is valid.", profile.name, profile.version);
    println!(
        "  Criteria: {}",
        profile
            .criteria
            .iter()
            .map(|c| format!("{} ({}%)", c.metric.key(), c.weight))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  Tiers: {}",
        profile
            .tiers
            .iter()
            .map(|t| t.id.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );

    // Potential issues (warnings, not errors)
    let mut warnings = Vec::new();
    for c in &profile.criteria {
        if c.weight.is_zero() {
            warnings.push(format!(
                "criterion '{}' has zero weight and never affects the score",
                c.metric.key()
            ));
        }
        if c.is_inverse && c.threshold.is_zero() {
            warnings.push(format!(
                "inverse criterion '{}' has threshold 0 and is always met",
                c.metric.key()
            ));
        }
        if c.is_inverse != c.metric.is_inverse() {
            warnings.push(format!(
                "criterion '{}' overrides the metric's natural direction",
                c.metric.key()
            ));
        }
    }
    for pair in profile.tiers.iter().collect::<Vec<_>>().windows(2) {
        if pair[0].requirements == pair[1].requirements {
            warnings.push(format!(
                "tiers '{}' and '{}' have identical requirements",
                pair[0].id, pair[1].id
            ));
        }
    }
    if let Some(top) = profile.tiers.get(profile.tiers.last_index()) {
        if top.commission_rate.is_some_and(|r| r == Decimal::ZERO) {
            warnings.push(format!("top tier '{}' charges no commission", top.id));
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
