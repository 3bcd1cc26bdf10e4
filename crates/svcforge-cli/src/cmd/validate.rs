use crate::output;
use std::path::Path;
use svcforge_core::diagnose::validate;

pub fn run(path: &Path, json: bool) -> anyhow::Result<()> {
    let report = validate(path);

    if json {
        output::print_json(&report)?;
    } else if report.valid {
        println!("{} is valid", path.display());
    } else {
        output::print_section(&format!("Issues in {}", path.display()), &report.issues);
    }

    if report.valid {
        Ok(())
    } else {
        anyhow::bail!("validation failed with {} issue(s)", report.issues.len())
    }
}
