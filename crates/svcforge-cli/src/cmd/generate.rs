use crate::output;
use crate::session::StdioSession;
use anyhow::Context;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use svcforge_core::collect::{collect_core_inputs, confirm_derived, PromptSession};
use svcforge_core::derive::derive;
use svcforge_core::generate::{generate, GenerateOptions};
use svcforge_core::inputs::RawCoreInputs;

#[derive(Args)]
pub struct GenerateArgs {
    /// Target directory for the generated project
    #[arg(long, default_value = ".")]
    pub target: PathBuf,

    /// Service slug (e.g. billing-api)
    #[arg(long)]
    pub service_name: Option<String>,

    /// data-service, auth-service, content-service, api-gateway, or generic
    #[arg(long)]
    pub service_type: Option<String>,

    /// Zone apex the service deploys under (e.g. example.com)
    #[arg(long)]
    pub domain_name: Option<String>,

    /// Platform API token; prefer the env var so it stays out of shell history
    #[arg(long, env = "SVCFORGE_API_TOKEN", hide_env_values = true)]
    pub api_credential: Option<String>,

    /// Platform account identifier (32 hex chars)
    #[arg(long)]
    pub account_id: Option<String>,

    /// Zone identifier (32 hex chars)
    #[arg(long)]
    pub zone_id: Option<String>,

    /// development, staging, or production
    #[arg(long)]
    pub environment: Option<String>,

    /// Overwrite files that already exist in the target
    #[arg(long)]
    pub overwrite: bool,

    /// Accept every derived default without confirmation prompts
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Fail on missing or invalid inputs instead of prompting
    #[arg(long)]
    pub non_interactive: bool,
}

impl GenerateArgs {
    fn raw_inputs(&self) -> RawCoreInputs {
        RawCoreInputs {
            service_name: self.service_name.clone().unwrap_or_default(),
            service_type: self.service_type.clone().unwrap_or_default(),
            domain_name: self.domain_name.clone().unwrap_or_default(),
            api_credential: self.api_credential.clone().unwrap_or_default(),
            account_id: self.account_id.clone().unwrap_or_default(),
            zone_id: self.zone_id.clone().unwrap_or_default(),
            environment: self.environment.clone().unwrap_or_default(),
        }
    }
}

pub fn run(args: &GenerateArgs, json: bool) -> anyhow::Result<()> {
    let raw = args.raw_inputs();

    // Flags that already validate skip prompting entirely; otherwise the
    // prompt session fills the gaps field by field.
    let interactive = !args.non_interactive && !raw.violations().is_empty();

    let (inputs, derived, rejections) = if interactive {
        let mut session = StdioSession::new();
        let inputs = collect_core_inputs(&mut session, raw)?;
        let mut derived = derive(&inputs);
        let rejections = if args.yes {
            Vec::new()
        } else {
            println!("Confirm derived values (empty answer keeps the default):");
            confirm_derived(&mut session, &mut derived)?
        };
        session.close();
        (inputs, derived, rejections)
    } else {
        let inputs = raw.build().context("input validation failed")?;
        let derived = derive(&inputs);
        (inputs, derived, Vec::new())
    };

    for rejection in &rejections {
        eprintln!("  kept default: {rejection}");
    }

    let options = GenerateOptions {
        overwrite: args.overwrite,
        timestamp: None,
    };
    let outcome = generate(&inputs, &derived, &args.target, &options)
        .with_context(|| format!("generation into {} failed", args.target.display()))?;

    if json {
        return output::print_json(&json!({
            "target": args.target,
            "service": inputs.service_name,
            "written": outcome.written,
            "skipped": outcome.skipped,
            "checksum": outcome.manifest.checksum,
            "files": outcome.manifest.files,
        }));
    }

    println!(
        "Generated '{}' ({}) into {}",
        inputs.service_name,
        inputs.service_type,
        args.target.display()
    );
    for path in &outcome.written {
        println!("  created: {path}");
    }
    for path in &outcome.skipped {
        println!("  skipped: {path} (exists; use --overwrite to replace)");
    }
    for m in derived.modifications() {
        println!("  note: {} overridden ({} -> {})", m.field, m.assumed, m.chosen);
    }
    println!("Manifest: .svcforge/manifest.yaml (checksum {})", &outcome.manifest.checksum[..12]);
    Ok(())
}
