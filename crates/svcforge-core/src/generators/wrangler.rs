use super::fill;
use crate::derive::DerivedId;
use crate::error::Result;
use crate::inputs::ServiceType;
use crate::paths;
use crate::registry::{Category, GenContext, GenOutput, Generator, GeneratorDescriptor};

/// Placeholder for binding ids that only exist after the platform resource
/// is created (`wrangler kv namespace create`, `wrangler d1 create`).
const PLACEHOLDER_ID: &str = "00000000000000000000000000000000";

/// Pinned runtime compatibility date for generated workers. Fixed rather
/// than "today" so generation stays deterministic.
const COMPATIBILITY_DATE: &str = "2024-09-23";

const HEADER_TEMPLATE: &str = r#"name = "{{worker_name}}"
main = "src/index.ts"
compatibility_date = "{{compatibility_date}}"
account_id = "{{account_id}}"

[observability]
enabled = true

[vars]
SERVICE_NAME = "{{service_name}}"
ENVIRONMENT = "{{environment}}"
LOG_LEVEL = "{{log_level}}"
API_BASE_PATH = "{{api_base_path}}"
CORS_ORIGIN = "{{cors_origin}}"
"#;

const ROUTE_TEMPLATE: &str = r#"
[[routes]]
pattern = "{{route_pattern}}"
zone_id = "{{zone_id}}"
"#;

const KV_TEMPLATE: &str = r#"
[[kv_namespaces]]
binding = "{{kv_namespace}}"
id = "{{placeholder}}"
"#;

const D1_TEMPLATE: &str = r#"
[[d1_databases]]
binding = "DB"
database_name = "{{d1_database}}"
database_id = "{{placeholder}}"
"#;

const R2_TEMPLATE: &str = r#"
[[r2_buckets]]
binding = "ASSETS"
bucket_name = "{{r2_bucket}}"
"#;

const QUEUE_TEMPLATE: &str = r#"
[[queues.producers]]
binding = "JOBS"
queue = "{{queue_name}}"
"#;

/// Deployment descriptor generator. Bindings follow the service type:
/// data services get a D1 database, content services an R2 bucket,
/// gateways a queue producer; every service gets a KV cache namespace.
pub struct WranglerConfig;

const DESCRIPTOR: GeneratorDescriptor = GeneratorDescriptor {
    name: "wrangler-config",
    category: Category::Core,
    depends_on: &[],
};

impl Generator for WranglerConfig {
    fn descriptor(&self) -> &GeneratorDescriptor {
        &DESCRIPTOR
    }

    fn generate(&self, ctx: &GenContext) -> Result<GenOutput> {
        let d = ctx.derived;
        let mut content = fill(
            HEADER_TEMPLATE,
            &[
                ("worker_name", d.value(DerivedId::WorkerName)),
                ("compatibility_date", COMPATIBILITY_DATE),
                ("account_id", &ctx.inputs.account_id),
                ("service_name", &ctx.inputs.service_name),
                ("environment", ctx.inputs.environment.as_str()),
                ("log_level", d.value(DerivedId::LogLevel)),
                ("api_base_path", d.value(DerivedId::ApiBasePath)),
                ("cors_origin", d.value(DerivedId::CorsOrigin)),
            ],
        );

        if ctx.inputs.service_type == ServiceType::AuthService {
            content.push_str(&fill(
                "AUTH_ISSUER = \"{{auth_issuer}}\"\n",
                &[("auth_issuer", d.value(DerivedId::AuthIssuer))],
            ));
        }

        content.push_str(&fill(
            ROUTE_TEMPLATE,
            &[
                ("route_pattern", d.value(DerivedId::RoutePattern)),
                ("zone_id", &ctx.inputs.zone_id),
            ],
        ));

        content.push_str(&fill(
            KV_TEMPLATE,
            &[
                ("kv_namespace", d.value(DerivedId::KvNamespace)),
                ("placeholder", PLACEHOLDER_ID),
            ],
        ));

        match ctx.inputs.service_type {
            ServiceType::DataService => content.push_str(&fill(
                D1_TEMPLATE,
                &[
                    ("d1_database", d.value(DerivedId::D1Database)),
                    ("placeholder", PLACEHOLDER_ID),
                ],
            )),
            ServiceType::ContentService => content.push_str(&fill(
                R2_TEMPLATE,
                &[("r2_bucket", d.value(DerivedId::R2Bucket))],
            )),
            ServiceType::ApiGateway => content.push_str(&fill(
                QUEUE_TEMPLATE,
                &[("queue_name", d.value(DerivedId::QueueName))],
            )),
            ServiceType::AuthService | ServiceType::Generic => {}
        }

        let mut out = GenOutput::default();
        ctx.write_text(&mut out, paths::WRANGLER_TOML, &content)?;
        Ok(out)
    }
}
