mod cmd;
mod output;
mod root;
mod session;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use svcforge_core::classify::{classify, ErrorContext};

#[derive(Parser)]
#[command(
    name = "svcforge",
    about = "Scaffold edge services from a handful of facts, and assess what existing projects already configure",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root for discovery commands (default: auto-detect from wrangler.toml or .git)
    #[arg(long, global = true, env = "SVCFORGE_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect inputs, derive configuration, and generate a service project
    Generate(cmd::generate::GenerateArgs),

    /// Infer the configured capabilities of an existing project
    Discover {
        /// Project directory (default: resolved root)
        path: Option<PathBuf>,
    },

    /// Score completeness and maturity of an existing project
    Assess {
        path: Option<PathBuf>,
    },

    /// Check required files, manifests, and drift against discovery
    Validate {
        path: Option<PathBuf>,
    },

    /// Validation plus warnings and best-practice recommendations
    Diagnose {
        path: Option<PathBuf>,

        /// Append deep-scan best-practice recommendations
        #[arg(long)]
        deep: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root_flag = cli.root.clone();
    let resolve = move |explicit: Option<PathBuf>| -> PathBuf {
        explicit
            .or_else(|| root_flag.clone())
            .unwrap_or_else(|| root::resolve_root(None))
    };

    let (result, operation) = match &cli.command {
        Commands::Generate(args) => (cmd::generate::run(args, cli.json), "generate"),
        Commands::Discover { path } => {
            (cmd::discover::run(&resolve(path.clone()), cli.json), "discover")
        }
        Commands::Assess { path } => {
            (cmd::assess::run(&resolve(path.clone()), cli.json), "assess")
        }
        Commands::Validate { path } => {
            (cmd::validate::run(&resolve(path.clone()), cli.json), "validate")
        }
        Commands::Diagnose { path, deep } => (
            cmd::diagnose::run(&resolve(path.clone()), *deep, cli.json),
            "diagnose",
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        let classified = classify(&format!("{e:#}"), &ErrorContext::for_operation(operation));
        for suggestion in &classified.suggestions {
            eprintln!("  hint: {suggestion}");
        }
        std::process::exit(1);
    }
}
