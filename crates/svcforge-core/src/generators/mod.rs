//! Built-in artifact generators.
//!
//! Each module produces one artifact family through the `Generator`
//! contract. The coordinator only sees descriptors and returned paths;
//! the templated text lives entirely in here and can be swapped out by
//! registering a different generator set.

mod ci;
mod docs;
mod entry;
mod envfiles;
mod package;
mod testing;
mod wrangler;

use crate::registry::Generator;

pub use ci::CiPipeline;
pub use docs::Readme;
pub use entry::ServiceEntry;
pub use envfiles::EnvFiles;
pub use package::PackageManifest;
pub use testing::TestScaffold;
pub use wrangler::WranglerConfig;

/// The default generator set, in registration order.
pub fn builtin_generators() -> Vec<Box<dyn Generator>> {
    vec![
        Box::new(WranglerConfig),
        Box::new(PackageManifest),
        Box::new(ServiceEntry),
        Box::new(EnvFiles),
        Box::new(TestScaffold),
        Box::new(Readme),
        Box::new(CiPipeline),
    ]
}

/// Substitute `{{key}}` tokens in a template. Unknown tokens are left
/// intact so a broken template shows up in the output, not as a panic.
pub(crate) fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in vars {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
