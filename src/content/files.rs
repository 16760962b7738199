//! File access for the content server.
//!
//! Request paths are resolved under a root directory; only regular files
//! are read or written.

use std::path::{Component, Path, PathBuf};

use tokio::fs;

use crate::error::{CacheError, Result};

/// Page served for the root path.
pub const INDEX_FILE: &str = "index.html";

// == Resolve ==
/// Maps a request path onto a file under `root`.
///
/// `/` resolves to the index page. Paths containing `..` or other
/// non-normal components are rejected so requests cannot leave `root`.
pub fn resolve(root: &Path, request_path: &str) -> Result<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    let relative = if relative.is_empty() { INDEX_FILE } else { relative };

    let mut resolved = root.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            _ => {
                return Err(CacheError::InvalidArgument(format!(
                    "illegal request path: {}",
                    request_path
                )))
            }
        }
    }

    Ok(resolved)
}

// == Load ==
/// Reads a regular file into memory.
///
/// Missing files and non-regular files (directories, sockets) are reported
/// as `NotFound`.
pub async fn load(path: &Path) -> Result<Vec<u8>> {
    let metadata = match fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(CacheError::NotFound(path.display().to_string()))
        }
        Err(err) => return Err(err.into()),
    };

    if !metadata.is_file() {
        return Err(CacheError::NotFound(path.display().to_string()));
    }

    Ok(fs::read(path).await?)
}

// == Save ==
/// Overwrites an existing regular file with `data`.
///
/// New files are never created; a missing target is `NotFound`.
pub async fn save(path: &Path, data: &[u8]) -> Result<()> {
    match fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => {}
        Ok(_) => return Err(CacheError::NotFound(path.display().to_string())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(CacheError::NotFound(path.display().to_string()))
        }
        Err(err) => return Err(err.into()),
    }

    fs::write(path, data).await?;
    Ok(())
}
