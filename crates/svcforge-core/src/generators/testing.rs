use super::fill;
use crate::derive::DerivedId;
use crate::error::Result;
use crate::paths;
use crate::registry::{Category, GenContext, GenOutput, Generator, GeneratorDescriptor};

const TEST_TEMPLATE: &str = r#"import { describe, expect, it } from "vitest";
import app from "../src/index";

describe("{{service_name}}", () => {
  it("answers the health check", async () => {
    const res = await app.request("{{health_path}}");
    expect(res.status).toBe(200);
    const body = await res.json();
    expect(body.status).toBe("ok");
  });

  it("serves the api root", async () => {
    const res = await app.request("{{api_base_path}}");
    expect(res.status).toBe(200);
  });
});
"#;

const VITEST_CONFIG: &str = r#"import { defineConfig } from "vitest/config";

export default defineConfig({
  test: {
    include: ["test/**/*.test.ts"],
  },
});
"#;

pub struct TestScaffold;

const DESCRIPTOR: GeneratorDescriptor = GeneratorDescriptor {
    name: "test-scaffold",
    category: Category::Testing,
    depends_on: &["entry-point"],
};

impl Generator for TestScaffold {
    fn descriptor(&self) -> &GeneratorDescriptor {
        &DESCRIPTOR
    }

    fn generate(&self, ctx: &GenContext) -> Result<GenOutput> {
        let d = ctx.derived;
        let test = fill(
            TEST_TEMPLATE,
            &[
                ("service_name", ctx.inputs.service_name.as_str()),
                ("health_path", d.value(DerivedId::HealthPath)),
                ("api_base_path", d.value(DerivedId::ApiBasePath)),
            ],
        );

        let mut out = GenOutput::default();
        ctx.write_text(&mut out, paths::TEST_ENTRY, &test)?;
        ctx.write_text(&mut out, paths::VITEST_CONFIG, VITEST_CONFIG)?;
        Ok(out)
    }
}
