//! The generator contract and registry.
//!
//! Generators are the seam between the coordinator and the templated-text
//! producers: each one turns `(CoreInputs, DerivedValues, target)` into
//! written files and reports paths back. Dependencies between generators
//! are ordering-only — a generator never reads another's on-disk output.

use crate::derive::DerivedValues;
use crate::error::{ForgeError, Result};
use crate::inputs::CoreInputs;
use crate::io::{self, WriteDisposition};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Core,
    Service,
    Environment,
    Testing,
    Documentation,
    Automation,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Core,
            Category::Service,
            Category::Environment,
            Category::Testing,
            Category::Documentation,
            Category::Automation,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Core => "core",
            Category::Service => "service",
            Category::Environment => "environment",
            Category::Testing => "testing",
            Category::Documentation => "documentation",
            Category::Automation => "automation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GeneratorDescriptor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GeneratorDescriptor {
    pub name: &'static str,
    pub category: Category,
    /// Names of generators that must run first. Ordering-only: the
    /// dependency is on shared in-memory values, never on file contents.
    pub depends_on: &'static [&'static str],
}

// ---------------------------------------------------------------------------
// GenContext / GenOutput
// ---------------------------------------------------------------------------

pub struct GenContext<'a> {
    pub inputs: &'a CoreInputs,
    pub derived: &'a DerivedValues,
    pub target: &'a Path,
    pub overwrite: bool,
}

impl GenContext<'_> {
    /// Write `content` at `rel` under the target root, honoring the
    /// per-file overwrite guard, and record the outcome in `out`.
    pub fn write_text(&self, out: &mut GenOutput, rel: &str, content: &str) -> Result<()> {
        let path = self.target.join(rel);
        match io::write_guarded(&path, content.as_bytes(), self.overwrite)? {
            WriteDisposition::Written => out.written.push(rel.to_string()),
            WriteDisposition::SkippedExisting => out.skipped.push(rel.to_string()),
        }
        Ok(())
    }
}

/// Paths a generator produced (or found already present and refused to
/// clobber), relative to the target root.
#[derive(Debug, Clone, Default)]
pub struct GenOutput {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

impl GenOutput {
    /// All paths the generator owns after the run, written or not.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.written
            .iter()
            .chain(self.skipped.iter())
            .map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Generator
// ---------------------------------------------------------------------------

pub trait Generator {
    fn descriptor(&self) -> &GeneratorDescriptor;
    fn generate(&self, ctx: &GenContext) -> Result<GenOutput>;
}

// ---------------------------------------------------------------------------
// GeneratorRegistry
// ---------------------------------------------------------------------------

pub struct GeneratorRegistry {
    generators: Vec<Box<dyn Generator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self {
            generators: Vec::new(),
        }
    }

    /// Registry pre-loaded with the built-in artifact producers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for g in crate::generators::builtin_generators() {
            registry
                .register(g)
                .expect("built-in generators have unique names");
        }
        registry
    }

    pub fn register(&mut self, generator: Box<dyn Generator>) -> Result<()> {
        let name = generator.descriptor().name;
        if self.generators.iter().any(|g| g.descriptor().name == name) {
            return Err(ForgeError::DuplicateGenerator(name.to_string()));
        }
        self.generators.push(generator);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn get(&self, index: usize) -> &dyn Generator {
        self.generators[index].as_ref()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &GeneratorDescriptor> {
        self.generators.iter().map(|g| g.descriptor())
    }

    pub fn categories(&self) -> BTreeMap<Category, Vec<&'static str>> {
        let mut out: BTreeMap<Category, Vec<&'static str>> = BTreeMap::new();
        for d in self.descriptors() {
            out.entry(d.category).or_default().push(d.name);
        }
        out
    }

    /// Dependency-respecting execution order, stable over registration
    /// order (Kahn's algorithm, ready set visited in declared order).
    pub fn execution_order(&self) -> Result<Vec<usize>> {
        let index_of: HashMap<&str, usize> = self
            .generators
            .iter()
            .enumerate()
            .map(|(i, g)| (g.descriptor().name, i))
            .collect();

        let mut pending: Vec<usize> = Vec::new();
        let mut remaining: Vec<Vec<usize>> = Vec::with_capacity(self.generators.len());
        for g in &self.generators {
            let deps = g
                .descriptor()
                .depends_on
                .iter()
                .map(|d| {
                    index_of
                        .get(d)
                        .copied()
                        .ok_or_else(|| ForgeError::UnknownGenerator((*d).to_string()))
                })
                .collect::<Result<Vec<usize>>>()?;
            remaining.push(deps);
        }

        let mut order = Vec::with_capacity(self.generators.len());
        let mut placed = vec![false; self.generators.len()];
        while order.len() < self.generators.len() {
            pending.clear();
            for (i, deps) in remaining.iter().enumerate() {
                if !placed[i] && deps.iter().all(|d| placed[*d]) {
                    pending.push(i);
                }
            }
            if pending.is_empty() {
                let stuck = self
                    .generators
                    .iter()
                    .enumerate()
                    .find(|(i, _)| !placed[*i])
                    .map(|(_, g)| g.descriptor().name)
                    .unwrap_or("unknown");
                return Err(ForgeError::GeneratorCycle(stuck.to_string()));
            }
            for &i in &pending {
                placed[i] = true;
                order.push(i);
            }
        }
        Ok(order)
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        descriptor: GeneratorDescriptor,
    }

    impl Stub {
        fn boxed(
            name: &'static str,
            category: Category,
            depends_on: &'static [&'static str],
        ) -> Box<dyn Generator> {
            Box::new(Stub {
                descriptor: GeneratorDescriptor {
                    name,
                    category,
                    depends_on,
                },
            })
        }
    }

    impl Generator for Stub {
        fn descriptor(&self) -> &GeneratorDescriptor {
            &self.descriptor
        }

        fn generate(&self, _ctx: &GenContext) -> Result<GenOutput> {
            Ok(GenOutput::default())
        }
    }

    fn names(registry: &GeneratorRegistry, order: &[usize]) -> Vec<&'static str> {
        order
            .iter()
            .map(|&i| registry.get(i).descriptor().name)
            .collect()
    }

    #[test]
    fn order_respects_dependencies() {
        let mut r = GeneratorRegistry::new();
        r.register(Stub::boxed("entry", Category::Service, &["config"]))
            .unwrap();
        r.register(Stub::boxed("config", Category::Core, &[])).unwrap();
        r.register(Stub::boxed("docs", Category::Documentation, &[]))
            .unwrap();

        let order = r.execution_order().unwrap();
        let ns = names(&r, &order);
        let entry = ns.iter().position(|n| *n == "entry").unwrap();
        let config = ns.iter().position(|n| *n == "config").unwrap();
        assert!(config < entry);
    }

    #[test]
    fn order_is_stable_for_independent_generators() {
        let mut r = GeneratorRegistry::new();
        r.register(Stub::boxed("b", Category::Core, &[])).unwrap();
        r.register(Stub::boxed("a", Category::Core, &[])).unwrap();

        let order = r.execution_order().unwrap();
        assert_eq!(names(&r, &order), vec!["b", "a"]);
    }

    #[test]
    fn unknown_dependency_rejected() {
        let mut r = GeneratorRegistry::new();
        r.register(Stub::boxed("entry", Category::Service, &["missing"]))
            .unwrap();
        assert!(matches!(
            r.execution_order(),
            Err(ForgeError::UnknownGenerator(n)) if n == "missing"
        ));
    }

    #[test]
    fn cycle_rejected() {
        let mut r = GeneratorRegistry::new();
        r.register(Stub::boxed("a", Category::Core, &["b"])).unwrap();
        r.register(Stub::boxed("b", Category::Core, &["a"])).unwrap();
        assert!(matches!(
            r.execution_order(),
            Err(ForgeError::GeneratorCycle(_))
        ));
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut r = GeneratorRegistry::new();
        r.register(Stub::boxed("a", Category::Core, &[])).unwrap();
        assert!(matches!(
            r.register(Stub::boxed("a", Category::Core, &[])),
            Err(ForgeError::DuplicateGenerator(_))
        ));
    }

    #[test]
    fn defaults_cover_every_category() {
        let r = GeneratorRegistry::with_defaults();
        let categories = r.categories();
        for &c in Category::all() {
            assert!(categories.contains_key(&c), "no generator for {c}");
        }
        r.execution_order().unwrap();
    }
}
