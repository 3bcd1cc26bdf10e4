use super::fill;
use crate::derive::DerivedId;
use crate::error::Result;
use crate::paths;
use crate::registry::{Category, GenContext, GenOutput, Generator, GeneratorDescriptor};

const INDEX_TEMPLATE: &str = r#"import { Hono } from "hono";
import { cors } from "hono/cors";
import { config } from "./config";

type Bindings = {
  SERVICE_NAME: string;
  ENVIRONMENT: string;
  LOG_LEVEL: string;
};

const app = new Hono<{ Bindings: Bindings }>();

app.use("*", cors({ origin: config.corsOrigin }));

app.get("{{health_path}}", (c) =>
  c.json({ service: config.serviceName, status: "ok" })
);

app.get("{{api_base_path}}", (c) =>
  c.json({ service: config.serviceName, version: "0.1.0" })
);

export default app;
"#;

const CONFIG_TEMPLATE: &str = r#"export const config = {
  serviceName: "{{service_name}}",
  displayName: "{{display_name}}",
  environment: "{{environment}}",
  apiBasePath: "{{api_base_path}}",
  healthPath: "{{health_path}}",
  corsOrigin: "{{cors_origin}}",
  logLevel: "{{log_level}}",
} as const;
"#;

/// Runtime skeleton generator: entry point and the domain config module it
/// imports. Ordered after the core descriptors so the skeleton always lands
/// in a project whose build config exists, though it reads none of it.
pub struct ServiceEntry;

const DESCRIPTOR: GeneratorDescriptor = GeneratorDescriptor {
    name: "entry-point",
    category: Category::Service,
    depends_on: &["wrangler-config", "package-manifest"],
};

impl Generator for ServiceEntry {
    fn descriptor(&self) -> &GeneratorDescriptor {
        &DESCRIPTOR
    }

    fn generate(&self, ctx: &GenContext) -> Result<GenOutput> {
        let d = ctx.derived;
        let index = fill(
            INDEX_TEMPLATE,
            &[
                ("health_path", d.value(DerivedId::HealthPath)),
                ("api_base_path", d.value(DerivedId::ApiBasePath)),
            ],
        );
        let config = fill(
            CONFIG_TEMPLATE,
            &[
                ("service_name", &ctx.inputs.service_name),
                ("display_name", d.value(DerivedId::DisplayName)),
                ("environment", ctx.inputs.environment.as_str()),
                ("api_base_path", d.value(DerivedId::ApiBasePath)),
                ("health_path", d.value(DerivedId::HealthPath)),
                ("cors_origin", d.value(DerivedId::CorsOrigin)),
                ("log_level", d.value(DerivedId::LogLevel)),
            ],
        );

        let mut out = GenOutput::default();
        ctx.write_text(&mut out, paths::CONFIG_MODULE, &config)?;
        ctx.write_text(&mut out, paths::ENTRY_POINT, &index)?;
        Ok(out)
    }
}
