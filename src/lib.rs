//! Modgraph core library.
//!
//! Compiles declarative module descriptors (Go binaries and JavaScript
//! bundles) into a graph of build actions and writes it as a Ninja file.
//!
//! - [`manifest`] loads a `Modfile` into the [`ast`] types.
//! - [`sources`] resolves glob patterns and classifies test files.
//! - [`modules`] compiles one descriptor into [`plan::BuildAction`]s using
//!   the [`rules`] catalog and the [`layout`] output paths.
//! - [`plan`] runs the module compilers in parallel and aggregates results.
//! - [`ninja_gen`] renders a plan; [`cli`], [`config`] and [`runner`] drive
//!   the binary.

pub mod ast;
pub mod cli;
pub mod config;
pub mod layout;
pub mod manifest;
pub mod modules;
pub mod ninja_gen;
pub mod plan;
pub mod rules;
pub mod runner;
pub mod sources;
