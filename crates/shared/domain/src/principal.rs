use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest identity accepted, in bytes.
pub const MAX_PRINCIPAL_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrincipalError {
    #[error("principal must not be empty")]
    Empty,
    #[error("principal is {0} characters long, the limit is {max}", max = MAX_PRINCIPAL_LEN)]
    TooLong(usize),
    #[error("principal contains invalid character {0:?}")]
    InvalidChar(char),
}

/// Identity of a caller, as supplied by the execution environment.
///
/// Printable ASCII without whitespace, 1 to [`MAX_PRINCIPAL_LEN`] characters.
/// Comparison is exact; `Alice` and `alice` are different principals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// # Errors
    /// Returns a [`PrincipalError`] describing the first rule the input breaks.
    pub fn parse(value: impl Into<String>) -> Result<Self, PrincipalError> {
        let value = value.into();

        if value.is_empty() {
            return Err(PrincipalError::Empty);
        }
        if value.len() > MAX_PRINCIPAL_LEN {
            return Err(PrincipalError::TooLong(value.len()));
        }
        if let Some(bad) = value.chars().find(|c| !c.is_ascii_graphic()) {
            return Err(PrincipalError::InvalidChar(bad));
        }

        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Principal {
    type Err = PrincipalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Principal {
    type Error = PrincipalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Principal> for String {
    fn from(value: Principal) -> Self {
        value.0
    }
}

impl AsRef<str> for Principal {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
