//! Manifest loading.
//!
//! A `Modfile` is parsed with `serde-saphyr` into a JSON value and then
//! bound to [`Manifest`] by serde, so unknown keys and wrong types surface as
//! structure errors before any module is compiled. Syntax diagnostics quote
//! the text through a [`ManifestSource`] named by a [`ManifestName`].

use anyhow::{Context, Result};
use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use tracing::debug;

use crate::ast::Manifest;

mod diagnostics;
mod hints;

pub use diagnostics::{
    ManifestError, ManifestName, ManifestSource, map_data_error, map_yaml_error,
};

/// Default manifest file name.
pub const DEFAULT_MANIFEST: &str = "Modfile";

/// Highest manifest format major version understood.
pub const SUPPORTED_MAJOR: u64 = 1;

/// Parse manifest text reported under `name`.
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] for malformed YAML or schema mismatches
/// and [`ManifestError::UnsupportedVersion`] for other format versions.
pub fn from_str_named(yaml: &str, name: &ManifestName) -> Result<Manifest, ManifestError> {
    let doc: serde_json::Value =
        serde_saphyr::from_str(yaml).map_err(|e| ManifestError::Parse {
            source: map_yaml_error(e, ManifestSource::new(name, yaml)),
        })?;
    let manifest: Manifest = serde_json::from_value(doc).map_err(|e| ManifestError::Parse {
        source: map_data_error(e, name),
    })?;
    if manifest.modgraph_version.major != SUPPORTED_MAJOR {
        return Err(ManifestError::UnsupportedVersion {
            name: name.to_string(),
            found: manifest.modgraph_version,
        });
    }
    debug!(manifest = %name, modules = manifest.modules.len(), "parsed manifest");
    Ok(manifest)
}

/// Parse manifest text.
///
/// # Errors
///
/// See [`from_str_named`].
pub fn from_str(yaml: &str) -> Result<Manifest, ManifestError> {
    from_str_named(yaml, &ManifestName::new(DEFAULT_MANIFEST))
}

/// Load a manifest from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to parse.
pub fn from_path(path: &Utf8Path) -> Result<Manifest> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file = path.file_name().unwrap_or(path.as_str());
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .with_context(|| format!("failed to open manifest directory {parent}"))?;
    let data = dir
        .read_to_string(file)
        .with_context(|| format!("failed to read manifest {path}"))?;
    Ok(from_str_named(&data, &ManifestName::new(path))?)
}

#[cfg(test)]
mod tests;
