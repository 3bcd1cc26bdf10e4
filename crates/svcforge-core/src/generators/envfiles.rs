use super::fill;
use crate::derive::DerivedId;
use crate::error::Result;
use crate::paths;
use crate::registry::{Category, GenContext, GenOutput, Generator, GeneratorDescriptor};

const DEV_VARS_TEMPLATE: &str = r#"# Local development variables. Never commit this file.
SERVICE_NAME={{service_name}}
ENVIRONMENT=development
LOG_LEVEL=debug
API_BASE_PATH={{api_base_path}}
CORS_ORIGIN=http://localhost:8787
# Set your own token before running credential-backed commands.
CLOUDFLARE_API_TOKEN=
"#;

const ENV_EXAMPLE_TEMPLATE: &str = r#"# Variables the service expects per environment. Copy to .dev.vars for
# local development; production values live in the platform dashboard.
SERVICE_NAME={{service_name}}
ENVIRONMENT={{environment}}
LOG_LEVEL={{log_level}}
API_BASE_PATH={{api_base_path}}
CORS_ORIGIN={{cors_origin}}
CLOUDFLARE_API_TOKEN=
"#;

const GITIGNORE: &str = r#"node_modules/
dist/
.dev.vars
.wrangler/
"#;

/// Environment file generator. Credential values are never written —
/// only the variable names the operator must fill in.
pub struct EnvFiles;

const DESCRIPTOR: GeneratorDescriptor = GeneratorDescriptor {
    name: "env-files",
    category: Category::Environment,
    depends_on: &["wrangler-config"],
};

impl Generator for EnvFiles {
    fn descriptor(&self) -> &GeneratorDescriptor {
        &DESCRIPTOR
    }

    fn generate(&self, ctx: &GenContext) -> Result<GenOutput> {
        let d = ctx.derived;
        let dev_vars = fill(
            DEV_VARS_TEMPLATE,
            &[
                ("service_name", ctx.inputs.service_name.as_str()),
                ("api_base_path", d.value(DerivedId::ApiBasePath)),
            ],
        );
        let env_example = fill(
            ENV_EXAMPLE_TEMPLATE,
            &[
                ("service_name", ctx.inputs.service_name.as_str()),
                ("environment", ctx.inputs.environment.as_str()),
                ("log_level", d.value(DerivedId::LogLevel)),
                ("api_base_path", d.value(DerivedId::ApiBasePath)),
                ("cors_origin", d.value(DerivedId::CorsOrigin)),
            ],
        );

        let mut out = GenOutput::default();
        ctx.write_text(&mut out, paths::DEV_VARS, &dev_vars)?;
        ctx.write_text(&mut out, paths::ENV_EXAMPLE, &env_example)?;
        ctx.write_text(&mut out, paths::GITIGNORE, GITIGNORE)?;
        Ok(out)
    }
}
