//! Reporting: formatted terminal output and the written business report.

pub mod format;

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::AppError;

/// Write the business report produced by [`format::format_business_report`].
pub fn write_business_report(path: &Path, body: &str) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::io(format!("Failed to create report '{}': {e}", path.display()))
    })?;
    file.write_all(body.as_bytes())
        .map_err(|e| AppError::io(format!("Failed to write report '{}': {e}", path.display())))
}
