use crate::output;
use std::path::Path;
use svcforge_core::assess::assess;
use svcforge_core::discover::discover;

pub fn run(path: &Path, json: bool) -> anyhow::Result<()> {
    let model = discover(path);
    let result = assess(&model);

    if json {
        return output::print_json(&result);
    }

    println!("Assessment of {}:", path.display());
    println!("  completeness: {}%", result.completeness);
    println!("  maturity:     {}", result.maturity);
    if !result.missing_capabilities.is_empty() {
        let missing: Vec<String> = result
            .missing_capabilities
            .iter()
            .map(|s| s.to_string())
            .collect();
        println!("  missing:      {}", missing.join(", "));
    }

    if !result.recommendations.is_empty() {
        println!();
        let rows: Vec<Vec<String>> = result
            .recommendations
            .iter()
            .map(|r| {
                vec![
                    r.priority.to_string(),
                    r.slot.to_string(),
                    r.message.clone(),
                ]
            })
            .collect();
        output::print_table(&["priority", "capability", "recommendation"], &rows);
    }
    Ok(())
}
