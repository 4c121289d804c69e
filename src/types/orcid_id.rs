//! ORCID iD type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated ORCID iD.
///
/// ORCID iDs are 16-character identifiers written as four hyphen-separated
/// groups of four, where the final character is an ISO 7064 11-2 check
/// digit (`0`-`9` or `X`).
///
/// # Example
///
/// ```
/// use orcid::OrcidId;
///
/// let id = OrcidId::new("0000-0002-3874-0894").unwrap();
/// assert_eq!(id.as_str(), "0000-0002-3874-0894");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrcidId(String);

impl OrcidId {
    /// Create a new ORCID iD from a string, validating format and checksum.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a well-formed ORCID iD or the
    /// check digit does not match.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the full ORCID iD string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        let invalid = |reason: &str| {
            Error::InvalidInput(InvalidInputError::OrcidId {
                value: s.to_string(),
                reason: reason.to_string(),
            })
        };

        let groups: Vec<&str> = s.split('-').collect();
        if groups.len() != 4 || groups.iter().any(|g| g.len() != 4) {
            return Err(invalid("must be four hyphen-separated groups of four"));
        }

        let chars: Vec<char> = groups.concat().chars().collect();
        for (i, c) in chars.iter().enumerate() {
            let is_check_position = i == 15;
            if !c.is_ascii_digit() && !(is_check_position && *c == 'X') {
                return Err(invalid("must contain digits with an optional trailing 'X'"));
            }
        }

        // ISO 7064 11-2 check digit over the first 15 digits.
        let mut total: u32 = 0;
        for c in &chars[..15] {
            total = (total + c.to_digit(10).unwrap()) * 2;
        }
        let result = (12 - total % 11) % 11;
        let expected = if result == 10 {
            'X'
        } else {
            char::from_digit(result, 10).unwrap()
        };

        if chars[15] != expected {
            return Err(invalid("check digit does not match"));
        }

        Ok(())
    }
}

impl fmt::Display for OrcidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrcidId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OrcidId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<OrcidId> for String {
    fn from(id: OrcidId) -> Self {
        id.0
    }
}

impl AsRef<str> for OrcidId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_orcid_id() {
        let id = OrcidId::new("0000-0002-3874-0894").unwrap();
        assert_eq!(id.as_str(), "0000-0002-3874-0894");
    }

    #[test]
    fn valid_orcid_id_with_digit_check() {
        assert!(OrcidId::new("0000-0002-1825-0097").is_ok());
    }

    #[test]
    fn invalid_check_digit() {
        assert!(OrcidId::new("0000-0002-3874-0895").is_err());
    }

    #[test]
    fn invalid_group_structure() {
        assert!(OrcidId::new("0000-0002-3874").is_err());
        assert!(OrcidId::new("000000023874-0894").is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(OrcidId::new("0000-00X2-3874-0894").is_err());
    }

    #[test]
    fn deserializes_with_validation() {
        let id: OrcidId = serde_json::from_str("\"0000-0002-3874-0894\"").unwrap();
        assert_eq!(id.as_str(), "0000-0002-3874-0894");

        let bad: Result<OrcidId, _> = serde_json::from_str("\"0000-0002-3874-0000\"");
        assert!(bad.is_err());
    }
}
