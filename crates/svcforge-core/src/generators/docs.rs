use super::fill;
use crate::derive::DerivedId;
use crate::error::Result;
use crate::paths;
use crate::registry::{Category, GenContext, GenOutput, Generator, GeneratorDescriptor};

const README_TEMPLATE: &str = r#"# {{display_name}}

A {{service_type}} worker for `{{domain_name}}`, scaffolded with svcforge.

## Endpoints

| Environment | URL |
|---|---|
| Production | {{production_url}} |
| Staging | {{staging_url}} |
| Development | {{development_url}} |

Health check: `{{health_path}}` — API root: `{{api_base_path}}`

## Development

```sh
npm install
npm run dev        # local worker on {{development_url}}
npm test           # vitest
npm run deploy     # wrangler deploy
```

Copy `.env.example` to `.dev.vars` and fill in your own credentials before
running credential-backed commands. `.dev.vars` is gitignored.

## Layout

- `wrangler.toml` — deployment descriptor (routes, vars, bindings)
- `src/index.ts` — entry point
- `src/config.ts` — derived service configuration
- `.svcforge/manifest.yaml` — generation record; `svcforge validate` checks
  the project against it
"#;

pub struct Readme;

const DESCRIPTOR: GeneratorDescriptor = GeneratorDescriptor {
    name: "readme",
    category: Category::Documentation,
    depends_on: &[],
};

impl Generator for Readme {
    fn descriptor(&self) -> &GeneratorDescriptor {
        &DESCRIPTOR
    }

    fn generate(&self, ctx: &GenContext) -> Result<GenOutput> {
        let d = ctx.derived;
        let readme = fill(
            README_TEMPLATE,
            &[
                ("display_name", d.value(DerivedId::DisplayName)),
                ("service_type", ctx.inputs.service_type.as_str()),
                ("domain_name", ctx.inputs.domain_name.as_str()),
                ("production_url", d.value(DerivedId::ProductionUrl)),
                ("staging_url", d.value(DerivedId::StagingUrl)),
                ("development_url", d.value(DerivedId::DevelopmentUrl)),
                ("health_path", d.value(DerivedId::HealthPath)),
                ("api_base_path", d.value(DerivedId::ApiBasePath)),
            ],
        );

        let mut out = GenOutput::default();
        ctx.write_text(&mut out, paths::README_MD, &readme)?;
        Ok(out)
    }
}
