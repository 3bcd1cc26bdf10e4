use super::fill;
use crate::error::Result;
use crate::paths;
use crate::registry::{Category, GenContext, GenOutput, Generator, GeneratorDescriptor};

const WORKFLOW_TEMPLATE: &str = r#"name: deploy

on:
  push:
    branches: [main]

jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: actions/setup-node@v4
        with:
          node-version: 20
      - run: npm ci
      - run: npm run typecheck
      - run: npm test

  deploy:
    needs: test
    runs-on: ubuntu-latest
    if: github.ref == 'refs/heads/main'
    steps:
      - uses: actions/checkout@v4
      - uses: actions/setup-node@v4
        with:
          node-version: 20
      - run: npm ci
      - name: Deploy {{service_name}}
        run: npx wrangler deploy
        env:
          CLOUDFLARE_API_TOKEN: ${{ secrets.CLOUDFLARE_API_TOKEN }}
          CLOUDFLARE_ACCOUNT_ID: ${{ secrets.CLOUDFLARE_ACCOUNT_ID }}
"#;

pub struct CiPipeline;

const DESCRIPTOR: GeneratorDescriptor = GeneratorDescriptor {
    name: "ci-pipeline",
    category: Category::Automation,
    depends_on: &["package-manifest"],
};

impl Generator for CiPipeline {
    fn descriptor(&self) -> &GeneratorDescriptor {
        &DESCRIPTOR
    }

    fn generate(&self, ctx: &GenContext) -> Result<GenOutput> {
        let workflow = fill(
            WORKFLOW_TEMPLATE,
            &[("service_name", ctx.inputs.service_name.as_str())],
        );

        let mut out = GenOutput::default();
        ctx.write_text(&mut out, paths::DEPLOY_WORKFLOW, &workflow)?;
        Ok(out)
    }
}
