//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! loads the manifest, plans the build and hands the result to the selected
//! command.

mod error;

pub use error::RunnerError;

use crate::ast::Manifest;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::modules::CompileContext;
use crate::plan::{BuildAction, BuildPlan, Planner};
use crate::rules::RuleCatalog;
use crate::sources::{FsWalker, SourceResolver};
use crate::{manifest, ninja_gen};
use anyhow::{Context, Result};
use camino::Utf8Path;
use indexmap::IndexSet;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use tracing::{debug, error, info};

/// Path argument that selects stdout.
pub const STDOUT_PATH: &str = "-";

/// Execute the parsed [`Cli`] command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded, if output cannot be
/// written, or with [`RunnerError::ModulesFailed`] when any module failed.
pub fn run(cli: &Cli) -> Result<()> {
    let config = Config::from_cli(cli);
    let catalog = RuleCatalog::standard();
    let manifest = load_manifest(&config)?;
    let plan = plan_build(&config, &catalog, &manifest)?;
    let outcome = report_module_errors(&plan, manifest.modules.len());

    match cli.command.clone().unwrap_or(Commands::Generate { file: None }) {
        Commands::Generate { file } => {
            if outcome.is_err() && !config.keep_going {
                return outcome;
            }
            let ninja = ninja_gen::generate(&plan, &catalog);
            match file {
                Some(path) if path == STDOUT_PATH => write_stdout(&ninja)?,
                Some(path) => write_file(&config.resolve(&path), &ninja)?,
                None => write_file(&config.default_ninja_path(), &ninja)?,
            }
        }
        Commands::Plan => {
            let json = serde_json::to_string_pretty(&PlanReport::new(&plan))
                .context("failed to serialise build plan")?;
            write_stdout(&format!("{json}\n"))?;
        }
        Commands::Check => {
            if outcome.is_ok() {
                info!(
                    modules = manifest.modules.len(),
                    actions = plan.actions().len(),
                    "all modules compiled"
                );
            }
        }
    }
    outcome
}

fn load_manifest(config: &Config) -> Result<Manifest> {
    if !config.manifest.is_file() {
        return Err(RunnerError::ManifestNotFound {
            path: config.manifest.clone(),
        }
        .into());
    }
    let manifest = manifest::from_path(&config.manifest)
        .with_context(|| format!("loading manifest {}", config.manifest))?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        let ast_json = serde_json::to_string_pretty(&manifest)
            .context("failed to serialise manifest")?;
        debug!("AST:\n{ast_json}");
    }
    Ok(manifest)
}

fn plan_build(config: &Config, catalog: &RuleCatalog, manifest: &Manifest) -> Result<BuildPlan> {
    let walker = FsWalker::open(config.workspace.clone())
        .with_context(|| format!("failed to open workspace {}", config.workspace))?;
    let ctx = CompileContext {
        catalog,
        layout: &config.layout,
        resolver: SourceResolver::new(&walker, &config.convention),
    };
    Ok(Planner::new(ctx)
        .with_jobs(config.jobs)
        .plan(&manifest.modules))
}

/// Log every module error and summarise them as one failure.
fn report_module_errors(plan: &BuildPlan, total: usize) -> Result<()> {
    for err in plan.errors() {
        error!(module = err.module(), error = %err, "module failed");
    }
    let failed: IndexSet<_> = plan.errors().iter().map(|e| e.module()).collect();
    if failed.is_empty() {
        Ok(())
    } else {
        Err(RunnerError::ModulesFailed {
            failed: failed.len(),
            total,
        }
        .into())
    }
}

fn write_stdout(content: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(content.as_bytes())
        .and_then(|()| out.flush())
        .context("failed to write to stdout")
}

/// Write `content` to `path` and log the file's location.
fn write_file(path: &Utf8Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent directory {parent}"))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write Ninja file to {path}"))?;
    info!("Generated Ninja file at {path}");
    Ok(())
}

/// JSON view of a plan; errors are rendered to their messages.
#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    actions: &'a [BuildAction],
    errors: Vec<ErrorReport<'a>>,
    colliding_outputs: Vec<camino::Utf8PathBuf>,
}

#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    module: &'a str,
    message: String,
}

impl<'a> PlanReport<'a> {
    fn new(plan: &'a BuildPlan) -> Self {
        Self {
            actions: plan.actions(),
            errors: plan
                .errors()
                .iter()
                .map(|e| ErrorReport {
                    module: e.module(),
                    message: e.to_string(),
                })
                .collect(),
            colliding_outputs: plan.colliding_outputs(),
        }
    }
}
