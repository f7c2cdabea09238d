//! # File I/O Module
//!
//! Reads beam input documents and writes design reports, both JSON.
//! Reports are saved atomically: written to a `.tmp` sibling, synced, then
//! renamed over the destination so an interrupted save never leaves a
//! truncated file behind.
//!
//! ## Example
//!
//! ```rust,no_run
//! use compbeam_core::calculations::{CompositeSteelBeam, DesignReport};
//! use compbeam_core::file_io::{load_input, save_report};
//! use compbeam_core::materials::builtin_w_shapes;
//! use std::path::Path;
//!
//! let input = load_input(Path::new("b1.json"))?;
//! let mut beam = CompositeSteelBeam::new(input, &builtin_w_shapes())?;
//! beam.analyze()?;
//! save_report(&DesignReport::new(&beam)?, Path::new("b1.report.json"))?;
//! # Ok::<(), compbeam_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::calculations::{CompositeBeamInput, DesignReport};
use crate::errors::{CalcError, CalcResult};

/// Read and validate a beam input document.
///
/// # Returns
///
/// * `Err(CalcError::FileError)` - I/O error
/// * `Err(CalcError::SerializationError)` - Invalid JSON or invalid material record
/// * `Err(CalcError::InvalidInput)` - Parsed, but out of range
pub fn load_input(path: &Path) -> CalcResult<CompositeBeamInput> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let input: CompositeBeamInput =
        serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    input.validate()?;
    debug!("Loaded beam '{}' from {}", input.name, path.display());
    Ok(input)
}

/// Save a design report with atomic write semantics.
pub fn save_report(report: &DesignReport, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(report)?;

    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!("Saved report for '{}' to {}", report.summary.beam, path.display());
    Ok(())
}

/// Read a report written by [`save_report`].
pub fn load_report(path: &Path) -> CalcResult<DesignReport> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}
