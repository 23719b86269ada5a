use tierline_core::grading::outcome::{
    EvaluationResult, NextTierProgress, RequirementProgress, VendorReport,
};

pub fn print(result: &EvaluationResult, verbose: bool) {
    println!(
        "=== {} (v{}) ===\n",
        result.profile_name, result.profile_version
    );

    for (i, report) in result.vendors.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_vendor(report, verbose);
    }

    if result.vendors.len() > 1 {
        print_summary(result);
    }
}

fn print_vendor(report: &VendorReport, verbose: bool) {
    match &report.name {
        Some(name) => println!("--- Vendor: {} ({}) ---\n", report.vendor_id, name),
        None => println!("--- Vendor: {} ---\n", report.vendor_id),
    }

    let grade = &report.grade;
    println!(
        "  Grade: {} ({})",
        grade.letter_grade,
        grade.score.round_dp(1)
    );

    match &report.standing.current {
        Some(tier) => {
            let commission = tier
                .commission_rate
                .map(|r| format!("  [commission {}%]", r))
                .unwrap_or_default();
            println!("  Tier:  {}{}", tier.name, commission);
        }
        None => println!("  Tier:  unranked"),
    }

    match &report.standing.next {
        NextTierProgress::Terminal { .. } => println!("  Next:  top tier reached"),
        NextTierProgress::Next {
            tier,
            overall_progress,
            binding,
            ..
        } => {
            let limit = binding
                .map(|m| format!(" (limited by {})", m))
                .unwrap_or_default();
            println!(
                "  Next:  {} {}%{}",
                tier.name,
                overall_progress.round_dp(1),
                limit
            );
        }
    }
    println!();

    if verbose {
        let max_name = grade
            .criteria
            .iter()
            .map(|c| c.metric.to_string().len())
            .max()
            .unwrap_or(10);

        println!("  Criteria:");
        for c in &grade.criteria {
            let op = match (c.is_inverse, c.met) {
                (true, true) => "<=",
                (true, false) => "> ",
                (false, true) => ">=",
                (false, false) => "< ",
            };
            let marker = if c.met { "" } else { "  ***" };
            println!(
                "    {:<width$}  {:>8} {} {:<8}  {:>6}%  +{:.2} / {}{}",
                c.metric.to_string(),
                c.value.to_string(),
                op,
                c.threshold.to_string(),
                c.progress.round_dp(1).to_string(),
                c.contribution,
                c.weight,
                marker,
                width = max_name
            );
        }
        println!();

        if let NextTierProgress::Next {
            tier, requirements, ..
        } = &report.standing.next
        {
            println!("  Requirements for {}:", tier.name);
            for r in requirements {
                println!("    {}", format_requirement(r));
            }
            println!();
        }
    } else {
        let failed = grade.failed_metrics();
        if !failed.is_empty() {
            let names: Vec<String> = failed.iter().map(|m| m.to_string()).collect();
            println!("  Below threshold: {}\n", names.join(", "));
        }
    }

    if !report.adjustments.is_empty() {
        println!("  Input adjustments:");
        for adj in &report.adjustments {
            println!("    {}", adj);
        }
        println!();
    }
}

fn format_requirement(r: &RequirementProgress) -> String {
    let op = if r.is_ceiling { "<=" } else { ">=" };
    let value = match r.value {
        Some(v) => v.to_string(),
        None => "missing".to_string(),
    };
    let status = if r.met { "ok" } else { "not met" };
    format!(
        "{} {} {}: {} -> {} ({}%)",
        r.metric,
        op,
        r.bound,
        value,
        status,
        r.progress.round_dp(1)
    )
}

fn print_summary(result: &EvaluationResult) {
    println!("=== Summary ===\n");
    let max_id = result
        .vendors
        .iter()
        .map(|v| v.vendor_id.len())
        .max()
        .unwrap_or(10);
    for report in &result.vendors {
        let tier = report
            .standing
            .current
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or("unranked");
        println!(
            "  {:<width$}  {:<3} {:>6}  {}",
            report.vendor_id,
            report.grade.letter_grade.as_str(),
            report.grade.score.round_dp(1).to_string(),
            tier,
            width = max_id
        );
    }
    println!();
}
