use crate::error::Result;
use crate::inputs::ServiceType;
use crate::paths;
use crate::registry::{Category, GenContext, GenOutput, Generator, GeneratorDescriptor};
use serde_json::json;

const TSCONFIG: &str = r#"{
  "compilerOptions": {
    "target": "ES2022",
    "module": "ES2022",
    "moduleResolution": "Bundler",
    "strict": true,
    "noEmit": true,
    "types": ["@cloudflare/workers-types"]
  },
  "include": ["src/**/*.ts", "test/**/*.ts"]
}
"#;

/// Dependency manifest generator. The framework and tooling pins here are
/// what the discovery engine later reads back as the framework capability.
pub struct PackageManifest;

const DESCRIPTOR: GeneratorDescriptor = GeneratorDescriptor {
    name: "package-manifest",
    category: Category::Core,
    depends_on: &[],
};

impl Generator for PackageManifest {
    fn descriptor(&self) -> &GeneratorDescriptor {
        &DESCRIPTOR
    }

    fn generate(&self, ctx: &GenContext) -> Result<GenOutput> {
        let mut dependencies = json!({
            "hono": "^4.6.0",
        });
        if ctx.inputs.service_type == ServiceType::AuthService {
            dependencies["jose"] = json!("^5.9.0");
        }

        let manifest = json!({
            "name": ctx.inputs.service_name,
            "version": "0.1.0",
            "private": true,
            "scripts": {
                "dev": "wrangler dev",
                "deploy": "wrangler deploy",
                "test": "vitest run",
                "typecheck": "tsc --noEmit",
            },
            "dependencies": dependencies,
            "devDependencies": {
                "@cloudflare/workers-types": "^4.20240925.0",
                "typescript": "^5.6.0",
                "vitest": "^2.1.0",
                "wrangler": "^3.80.0",
            },
        });

        let mut out = GenOutput::default();
        let rendered = format!("{}\n", serde_json::to_string_pretty(&manifest)?);
        ctx.write_text(&mut out, paths::PACKAGE_JSON, &rendered)?;
        ctx.write_text(&mut out, paths::TSCONFIG_JSON, TSCONFIG)?;
        Ok(out)
    }
}
