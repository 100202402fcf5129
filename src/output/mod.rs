//! Output writers for edge lists, domain inventories, and JSON reports.

pub mod csv;
pub mod json;

pub use csv::{read_edges, write_domains, write_edge_slice, write_edges, write_user_stats, EdgeFile};
pub use json::{read_report, write_node_stats, write_report};

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Validate that an output path is usable
///
/// **Private** - shared by the CSV and JSON writers
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create missing parent directories for an output path
///
/// **Private** - shared by the CSV and JSON writers
fn prepare_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() && !parent.as_os_str().is_empty() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

/// File size in bytes, zero when unreadable
///
/// **Private** - for post-write log lines
fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_validate_output_path_new_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("edges.csv");
        assert!(validate_output_path(&path).is_ok());
    }
}
