//! Persisted column mapping.
//!
//! The resolved mapping is saved as a flat `role -> column` JSON object so a
//! re-run on the same dataset skips interactive resolution.

use std::fs::File;
use std::path::Path;

use crate::domain::ColumnMapping;
use crate::error::AppError;

pub fn write_mapping(path: &Path, mapping: &ColumnMapping) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create mapping file '{}': {e}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, mapping)
        .map_err(|e| AppError::io(format!("Failed to write column mapping: {e}")))
}

/// Load a previously saved mapping. Returns `Ok(None)` when the file does not
/// exist; a malformed file is an error rather than a silent re-prompt.
pub fn read_mapping(path: &Path) -> Result<Option<ColumnMapping>, AppError> {
    if !path.exists() {
        return Ok(None);
    }
    let file = File::open(path).map_err(|e| {
        AppError::io(format!(
            "Failed to open mapping file '{}': {e}",
            path.display()
        ))
    })?;
    let mapping = serde_json::from_reader(file).map_err(|e| {
        AppError::io(format!(
            "Malformed mapping file '{}': {e}",
            path.display()
        ))
    })?;
    Ok(Some(mapping))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_serializes_as_flat_map() {
        let mapping = ColumnMapping {
            date: "Order Date".to_string(),
            sales: "Sales".to_string(),
            category: Some("Category".to_string()),
            region: None,
        };
        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(json["date"], "Order Date");
        assert_eq!(json["sales"], "Sales");
        assert_eq!(json["category"], "Category");
        // Unresolved optional roles are omitted, keeping the file flat.
        assert!(json.get("region").is_none());
    }

    #[test]
    fn mapping_round_trips() {
        let mapping = ColumnMapping {
            date: "ds".to_string(),
            sales: "amount".to_string(),
            category: None,
            region: Some("State".to_string()),
        };
        let json = serde_json::to_string(&mapping).unwrap();
        let back: ColumnMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mapping);
    }
}
