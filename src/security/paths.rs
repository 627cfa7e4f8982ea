//! Request path normalization for filesystem lookups.
//!
//! Raw request paths are percent-decoded and reduced to plain relative
//! components. Anything that could climb out of the served roots (`..`,
//! drive prefixes) is rejected before the filesystem is touched.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Why a request path was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("request path is not valid UTF-8")]
    Utf8,
    #[error("request path escapes the served root")]
    Traversal,
}

/// Normalize a raw URI path into a relative path.
///
/// `/` and `` both normalize to an empty path.
pub fn normalize_request_path(raw: &str) -> Result<PathBuf, PathError> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| PathError::Utf8)?;
    let trimmed = decoded.trim_start_matches('/');

    let mut normalized = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::Normal(segment) => normalized.push(segment),
            Component::ParentDir | Component::Prefix(_) => return Err(PathError::Traversal),
        }
    }

    Ok(normalized)
}
