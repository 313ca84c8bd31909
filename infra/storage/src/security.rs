use crate::error::StorageError;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

fn traversal(path: &Path, reason: &'static str) -> StorageError {
    StorageError::PathTraversalAttempt {
        message: path.display().to_string().into(),
        context: Some(reason.into()),
    }
}

/// Folds `.` and `..` lexically; fails if the key climbs above its base.
fn normalize_relative(path: &Path) -> Result<PathBuf, StorageError> {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::Normal(segment) => out.push(segment),
            Component::ParentDir => {
                if !out.pop() {
                    return Err(traversal(path, "Key climbs above the storage root"));
                }
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(traversal(path, "Absolute keys are not allowed"));
            },
        }
    }

    if out.as_os_str().is_empty() {
        return Err(traversal(path, "Key does not name a file"));
    }

    Ok(out)
}

/// Joins `key` onto the canonical `root`, refusing anything that lands outside it.
///
/// Existing targets are canonicalized so symlinks cannot smuggle a key out; for
/// targets that do not exist yet the nearest existing ancestor is checked instead.
pub(crate) fn resolve_path(root: &Path, key: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
    let key = key.as_ref();
    let joined = root.join(normalize_relative(key)?);

    match joined.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Ok(canonical),
        Ok(canonical) => Err(traversal(&canonical, "Resolved path is outside the storage root")),
        Err(err) if err.kind() == ErrorKind::NotFound => check_ancestors(root, joined),
        Err(err) => Err(StorageError::Io {
            source: err,
            context: Some(format!("Failed to resolve {}", joined.display()).into()),
        }),
    }
}

fn check_ancestors(root: &Path, joined: PathBuf) -> Result<PathBuf, StorageError> {
    let mut current = joined.parent();

    while let Some(path) = current {
        if path == root {
            return Ok(joined);
        }
        if path.exists() {
            let canonical = path.canonicalize().map_err(|err| StorageError::Io {
                source: err,
                context: Some("Failed to verify parent directory".into()),
            })?;
            return if canonical.starts_with(root) {
                Ok(joined)
            } else {
                Err(traversal(&canonical, "Parent directory links outside the storage root"))
            };
        }
        current = path.parent();
    }

    Err(traversal(&joined, "No ancestor inside the storage root"))
}
