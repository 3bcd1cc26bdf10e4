use crate::output;
use std::path::Path;
use svcforge_core::discover::discover;

pub fn run(path: &Path, json: bool) -> anyhow::Result<()> {
    let model = discover(path);

    if json {
        return output::print_json(&model);
    }

    println!("Capabilities of {}:", path.display());
    let rows: Vec<Vec<String>> = model
        .iter()
        .map(|(slot, cap)| {
            vec![
                slot.to_string(),
                output::yes_no(cap.configured).to_string(),
                cap.provider.clone().unwrap_or_else(|| "-".to_string()),
                cap.quantity.map(|q| q.to_string()).unwrap_or_else(|| "-".to_string()),
                output::yes_no(cap.possible).to_string(),
            ]
        })
        .collect();
    output::print_table(
        &["capability", "configured", "provider", "quantity", "possible"],
        &rows,
    );
    Ok(())
}
