use crate::provider::ScanError;

/// Normalize a repository-relative path reported by a provider tree listing.
///
/// Provider paths are always `/`-separated regardless of host OS, so this
/// works on the raw string rather than `std::path`. Backslashes and colons
/// are ordinary filename characters in a git tree and pass through; the
/// request path is percent-encoded later. Rejects:
/// - empty paths
/// - a leading `/`
/// - parent directory traversal (`..`)
/// - NUL bytes
///
/// `.` segments and repeated slashes are dropped.
pub fn sanitize_tree_path(raw_path: &str) -> Result<String, ScanError> {
    if raw_path.is_empty() {
        return Err(ScanError::InvalidPath("Empty path".to_string()));
    }

    if raw_path.starts_with('/') {
        return Err(ScanError::InvalidPath(format!(
            "Absolute path not allowed: {}",
            raw_path
        )));
    }

    if raw_path.contains('\0') {
        return Err(ScanError::InvalidPath(format!(
            "Illegal character in path: {:?}",
            raw_path
        )));
    }

    let mut components = Vec::new();
    for segment in raw_path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(ScanError::InvalidPath(format!(
                    "Parent directory traversal not allowed: {}",
                    raw_path
                )));
            }
            part => components.push(part),
        }
    }

    if components.is_empty() {
        return Err(ScanError::InvalidPath(format!(
            "No valid components: {}",
            raw_path
        )));
    }

    Ok(components.join("/"))
}
