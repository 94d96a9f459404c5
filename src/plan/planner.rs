//! Parallel compilation of a module set into a [`BuildPlan`].

use std::collections::HashSet;

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, warn};

use super::{ActionSink, BuildPlan, ModuleError, ModuleResult, emit};
use crate::ast::ModuleDescriptor;
use crate::modules::{CompileContext, compile_module};

/// Compiles modules independently and merges their results in manifest
/// order.
///
/// # Examples
///
/// ```
/// use modgraph::ast::{BundleModule, ModuleDescriptor};
/// use modgraph::layout::OutputLayout;
/// use modgraph::modules::CompileContext;
/// use modgraph::plan::Planner;
/// use modgraph::rules::RuleCatalog;
/// use modgraph::sources::{MemoryTree, SourceResolver, TestFileConvention};
///
/// let tree = MemoryTree::new(["app.js"]);
/// let (catalog, layout) = (RuleCatalog::standard(), OutputLayout::default());
/// let convention = TestFileConvention::default();
/// let ctx = CompileContext {
///     catalog: &catalog,
///     layout: &layout,
///     resolver: SourceResolver::new(&tree, &convention),
/// };
/// let modules = [ModuleDescriptor::JsBundle(BundleModule::new("app", &["app.js"]))];
/// let plan = Planner::new(ctx).plan(&modules);
/// assert_eq!(plan.actions().len(), 1);
/// ```
#[derive(Clone, Copy)]
pub struct Planner<'a> {
    ctx: CompileContext<'a>,
    jobs: Option<usize>,
}

impl<'a> Planner<'a> {
    /// Plan with the global rayon pool.
    #[must_use]
    pub const fn new(ctx: CompileContext<'a>) -> Self {
        Self { ctx, jobs: None }
    }

    /// Limit compilation to `jobs` worker threads. `1` compiles on the
    /// calling thread.
    #[must_use]
    pub const fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Compile `modules` and collect the outcome.
    #[must_use]
    pub fn plan(&self, modules: &[ModuleDescriptor]) -> BuildPlan {
        let mut plan = BuildPlan::default();
        self.plan_into(modules, &mut plan);
        let collisions = plan.colliding_outputs();
        if !collisions.is_empty() {
            warn!(count = collisions.len(), "build has outputs written by several actions");
        }
        plan
    }

    /// Compile `modules` and forward each result to `sink` in manifest
    /// order.
    pub fn plan_into(&self, modules: &[ModuleDescriptor], sink: &mut dyn ActionSink) {
        let duplicates = duplicate_positions(modules);
        let results = self.compile_all(modules, &duplicates);
        for (module, result) in modules.iter().zip(results) {
            emit(sink, module.name(), result);
        }
    }

    fn compile_all(
        &self,
        modules: &[ModuleDescriptor],
        duplicates: &HashSet<usize>,
    ) -> Vec<ModuleResult> {
        match self.jobs {
            Some(1) => {
                debug!(modules = modules.len(), "compiling sequentially");
                modules
                    .iter()
                    .enumerate()
                    .map(|(i, m)| self.compile_one(i, m, duplicates))
                    .collect()
            }
            Some(jobs) => match ThreadPoolBuilder::new().num_threads(jobs).build() {
                Ok(pool) => {
                    debug!(modules = modules.len(), jobs, "compiling in dedicated pool");
                    pool.install(|| self.compile_parallel(modules, duplicates))
                }
                Err(err) => {
                    warn!(error = %err, "cannot build worker pool; using the global pool");
                    self.compile_parallel(modules, duplicates)
                }
            },
            None => self.compile_parallel(modules, duplicates),
        }
    }

    fn compile_parallel(
        &self,
        modules: &[ModuleDescriptor],
        duplicates: &HashSet<usize>,
    ) -> Vec<ModuleResult> {
        modules
            .par_iter()
            .enumerate()
            .map(|(i, m)| self.compile_one(i, m, duplicates))
            .collect()
    }

    fn compile_one(
        &self,
        index: usize,
        module: &ModuleDescriptor,
        duplicates: &HashSet<usize>,
    ) -> ModuleResult {
        if duplicates.contains(&index) {
            return Err(vec![ModuleError::configuration(
                module.name(),
                "name",
                "already declared by an earlier module",
            )]);
        }
        compile_module(&self.ctx, module)
    }
}

/// Positions of modules whose name was already used earlier in the list.
fn duplicate_positions(modules: &[ModuleDescriptor]) -> HashSet<usize> {
    let mut seen = HashSet::new();
    modules
        .iter()
        .enumerate()
        .filter(|(_, m)| !seen.insert(m.name()))
        .map(|(i, _)| i)
        .collect()
}
