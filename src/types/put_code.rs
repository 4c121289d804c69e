//! Put-code types.
//!
//! A put-code is ORCID's per-record identifier, used to address a specific
//! entry within a collection (for example one work among many).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated put-code.
///
/// Put-codes are non-empty numeric strings assigned by the ORCID registry
/// when a record is created.
///
/// # Example
///
/// ```
/// use orcid::PutCode;
///
/// let code = PutCode::new("477441").unwrap();
/// assert_eq!(code.as_str(), "477441");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PutCode(String);

impl PutCode {
    /// Create a new put-code from a string, validating the format.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(InvalidInputError::PutCode {
                value: s,
                reason: "must be a non-empty string of digits".to_string(),
            }
            .into());
        }
        Ok(Self(s))
    }

    /// Returns the put-code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PutCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PutCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PutCode {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PutCode> for String {
    fn from(code: PutCode) -> Self {
        code.0
    }
}

impl AsRef<str> for PutCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A put-code selector for read requests.
///
/// Singular resource types address one record with [`PutCodes::One`];
/// the `works` collection addresses several records at once with
/// [`PutCodes::Many`], joined by commas in the request path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PutCodes {
    /// A single put-code.
    One(PutCode),
    /// An ordered list of put-codes.
    Many(Vec<PutCode>),
}

impl PutCodes {
    /// Render the path segment for this selector.
    pub fn path_segment(&self) -> String {
        match self {
            PutCodes::One(code) => code.as_str().to_string(),
            PutCodes::Many(codes) => codes
                .iter()
                .map(PutCode::as_str)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl From<PutCode> for PutCodes {
    fn from(code: PutCode) -> Self {
        PutCodes::One(code)
    }
}

impl From<Vec<PutCode>> for PutCodes {
    fn from(codes: Vec<PutCode>) -> Self {
        PutCodes::Many(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_put_code() {
        let code = PutCode::new("477441").unwrap();
        assert_eq!(code.as_str(), "477441");
    }

    #[test]
    fn invalid_empty() {
        assert!(PutCode::new("").is_err());
    }

    #[test]
    fn invalid_non_numeric() {
        assert!(PutCode::new("47a441").is_err());
    }

    #[test]
    fn single_path_segment() {
        let codes = PutCodes::from(PutCode::new("477441").unwrap());
        assert_eq!(codes.path_segment(), "477441");
    }

    #[test]
    fn many_path_segment_joins_with_commas() {
        let codes = PutCodes::from(vec![
            PutCode::new("1").unwrap(),
            PutCode::new("2").unwrap(),
            PutCode::new("3").unwrap(),
        ]);
        assert_eq!(codes.path_segment(), "1,2,3");
    }
}
