use crate::output;
use std::path::Path;
use svcforge_core::diagnose::diagnose;

pub fn run(path: &Path, deep: bool, json: bool) -> anyhow::Result<()> {
    let report = diagnose(path, deep);

    if json {
        return output::print_json(&report);
    }

    println!("Diagnosis of {}:", path.display());
    output::print_section("Errors", &report.errors);
    output::print_section("Warnings", &report.warnings);
    output::print_section("Recommendations", &report.recommendations);
    if report.errors.is_empty() && report.warnings.is_empty() && report.recommendations.is_empty() {
        println!("  nothing to report");
    }
    Ok(())
}
