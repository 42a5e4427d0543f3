//! # File I/O Module
//!
//! Handles project file operations with safety features:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility before use
//!
//! ## File Format
//!
//! Projects are saved as `.beam` files containing pretty-printed JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use beam_core::beam::Beam;
//! use beam_core::file_io::{load_project, save_project};
//! use beam_core::project::Project;
//! use std::path::Path;
//!
//! let project = Project::new("B-1", "Engineer", Beam::simply_supported(8.0));
//! let path = Path::new("b1.beam");
//!
//! save_project(&project, path)?;
//! let loaded = load_project(path)?;
//! assert_eq!(loaded.meta.name, "B-1");
//! # Ok::<(), beam_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use semver::Version;

use crate::errors::{CalcError, CalcResult};
use crate::project::{Project, FILE_EXTENSION, SCHEMA_VERSION};

/// Temporary path used while saving `path`
fn temp_path_for(path: &Path) -> PathBuf {
    let extension = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    path.with_extension(extension)
}

/// Append the `.beam` extension if `path` has none.
pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(FILE_EXTENSION)
    }
}

/// Write `contents` to `path` through a synced `.tmp` sibling.
///
/// The temporary file is removed whenever a step fails, so a failed save
/// leaves neither a partial `.beam` nor a stray `.beam.tmp` behind.
fn write_atomic(path: &Path, contents: &[u8]) -> CalcResult<()> {
    let tmp_path = temp_path_for(path);
    let fail = |operation: &str, target: &Path, e: std::io::Error| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error(operation, target.display().to_string(), e.to_string())
    };

    let mut tmp_file =
        File::create(&tmp_path).map_err(|e| fail("create temp file", &tmp_path, e))?;
    tmp_file
        .write_all(contents)
        .and_then(|()| tmp_file.sync_all())
        .map_err(|e| fail("write temp file", &tmp_path, e))?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| fail("replace", path, e))
}

/// Save a project as a `.beam` document.
///
/// The JSON is written to `<path>.tmp`, synced and renamed over `path`, so an
/// interrupted save keeps any previous version of the beam intact. Projects
/// are saved even when their beam is not yet solvable.
pub fn save_project(project: &Project, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project)?;
    write_atomic(path, json.as_bytes())?;

    tracing::info!(
        path = %path.display(),
        length = project.beam.length,
        loads = project.loads.len(),
        "saved beam project"
    );
    Ok(())
}

/// Load a `.beam` document.
///
/// # Returns
///
/// * `Ok(Project)` - Successfully loaded project
/// * `Err(CalcError::VersionMismatch)` - Written by an incompatible schema
/// * `Err(CalcError::SerializationError)` - Not a beam project document
/// * `Err(CalcError::FileError)` - I/O error
///
/// A beam that is unstable or has loads off the span still loads, so that it
/// can be fixed; the problem is logged and [`Project::analyze`] reports it.
pub fn load_project(path: &Path) -> CalcResult<Project> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let project: Project =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("{} is not a beam project: {}", path.display(), e),
        })?;

    validate_version(&project.meta.version)?;

    if let Err(problem) = project.validate() {
        tracing::warn!(
            path = %path.display(),
            error = %problem,
            "loaded beam project cannot be analyzed as saved"
        );
    }

    tracing::info!(
        path = %path.display(),
        version = %project.meta.version,
        length = project.beam.length,
        loads = project.loads.len(),
        "loaded beam project"
    );
    Ok(project)
}

/// Validate that a file version is compatible with the current schema.
///
/// The major version must match. While the schema is 0.x, a file written by
/// a newer minor version is rejected as well.
pub fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file = Version::parse(file_version).map_err(|_| mismatch())?;
    let current = Version::parse(SCHEMA_VERSION).map_err(|_| mismatch())?;

    if file.major != current.major {
        return Err(mismatch());
    }
    if current.major == 0 && file.minor > current.minor {
        tracing::warn!(
            file_version,
            expected = SCHEMA_VERSION,
            "project file written by a newer schema"
        );
        return Err(mismatch());
    }
    Ok(())
}
