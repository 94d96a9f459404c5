//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

use crate::layout::{DEFAULT_BASE_DIR, DEFAULT_NAMESPACE};
use crate::manifest::DEFAULT_MANIFEST;
use crate::sources::DEFAULT_TEST_MARKER;

mod parsing;

use parsing::{parse_jobs, parse_marker, parse_segment};

/// Maximum number of jobs accepted by the CLI.
const MAX_JOBS: usize = 64;

/// Compile module descriptors into a Ninja build graph.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the manifest file to use.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_MANIFEST)]
    pub file: Utf8PathBuf,

    /// Run as if started in this directory.
    ///
    /// Source patterns, the manifest path and output paths are resolved
    /// against it.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<Utf8PathBuf>,

    /// Base directory for build outputs, relative to the workspace.
    #[arg(short, long = "out-dir", value_name = "DIR", default_value = DEFAULT_BASE_DIR)]
    pub out_dir: Utf8PathBuf,

    /// Namespace segment inserted below each output category.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_NAMESPACE, value_parser = parse_segment)]
    pub namespace: String,

    /// Suffix of a file stem that marks it as a test file.
    #[arg(long, value_name = "SUFFIX", default_value = DEFAULT_TEST_MARKER, value_parser = parse_marker)]
    pub test_marker: String,

    /// Set the number of modules compiled in parallel.
    ///
    /// Values must be between 1 and 64.
    #[arg(short, long, value_name = "N", value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Write the Ninja file for the modules that compiled even when others
    /// failed. The exit status still reports the failure.
    #[arg(short, long)]
    pub keep_going: bool,

    /// Enable verbose diagnostic logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `generate` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Generate { file: None });
        }
        self
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            file: Utf8PathBuf::from(DEFAULT_MANIFEST),
            directory: None,
            out_dir: Utf8PathBuf::from(DEFAULT_BASE_DIR),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            test_marker: DEFAULT_TEST_MARKER.to_owned(),
            jobs: None,
            keep_going: false,
            verbose: false,
            command: None,
        }
        .with_default_command()
    }
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Write the Ninja file.
    Generate {
        /// Output path for the generated Ninja file; `<out-dir>/build.ninja`
        /// when omitted.
        ///
        /// Use `-` to write to stdout.
        #[arg(value_name = "FILE")]
        file: Option<Utf8PathBuf>,
    },

    /// Print the build plan as JSON.
    Plan,

    /// Resolve every module and report errors without writing anything.
    Check,
}
