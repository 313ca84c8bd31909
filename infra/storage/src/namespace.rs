use crate::engine::Storage;
use crate::error::StorageError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};

/// Validated directory name for a [`NamespacedStorage`]: lowercase `[a-z0-9_]+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceName(String);

impl TryFrom<&str> for NamespaceName {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        let name = value.trim().to_lowercase();

        if name.is_empty() {
            return Err(StorageError::PathTraversalAttempt {
                message: "<empty>".into(),
                context: Some("Namespace cannot be empty".into()),
            });
        }

        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StorageError::PathTraversalAttempt {
                message: name.into(),
                context: Some("Namespace contains illegal characters".into()),
            });
        }

        Ok(Self(name))
    }
}

impl TryFrom<String> for NamespaceName {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl AsRef<str> for NamespaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A view of [`Storage`] whose keys live under `<root>/<namespace>/`.
///
/// Inherits compression and sandboxing from the parent handle. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct NamespacedStorage {
    storage: Storage,
    namespace: NamespaceName,
}

impl NamespacedStorage {
    pub(crate) const fn new(storage: Storage, namespace: NamespaceName) -> Self {
        Self { storage, namespace }
    }

    #[must_use]
    pub const fn name(&self) -> &NamespaceName {
        &self.namespace
    }

    /// Physical location of `key` inside this namespace.
    ///
    /// # Errors
    /// [`StorageError::PathTraversalAttempt`] if the key escapes the namespace root.
    pub fn resolve(&self, key: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
        self.storage.resolve_in(Some(&self.namespace), key)
    }

    /// # Errors
    /// See [`Storage::read`].
    pub async fn read(&self, key: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
        self.storage.read_in(Some(&self.namespace), key).await
    }

    /// # Errors
    /// See [`Storage::write`].
    pub async fn write(&self, key: impl AsRef<Path>, data: &[u8]) -> Result<(), StorageError> {
        self.storage.write_in(Some(&self.namespace), key, data).await
    }

    /// # Errors
    /// See [`Storage::put_record`].
    pub async fn put_record<T: Serialize>(
        &self,
        key: impl AsRef<Path>,
        record: &T,
    ) -> Result<(), StorageError> {
        self.storage.put_record_in(Some(&self.namespace), key, record).await
    }

    /// # Errors
    /// See [`Storage::get_record`].
    pub async fn get_record<T: DeserializeOwned>(
        &self,
        key: impl AsRef<Path>,
    ) -> Result<Option<T>, StorageError> {
        self.storage.get_record_in(Some(&self.namespace), key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_lowercased() {
        let ns = NamespaceName::try_from("Facilities").unwrap();
        assert_eq!(ns.as_ref(), "facilities");
        assert_eq!(ns.to_string(), "facilities");
    }

    #[test]
    fn illegal_names_are_rejected() {
        for bad in ["", "  ", "../etc", "a/b", "dot.name", "sp ace"] {
            assert!(
                matches!(
                    NamespaceName::try_from(bad),
                    Err(StorageError::PathTraversalAttempt { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }
}
