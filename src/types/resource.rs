//! Resource types of the ORCID record model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// The category of profile data being read or written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    Activities,
    Address,
    Education,
    Email,
    Employment,
    ExternalIdentifiers,
    Funding,
    Keywords,
    OtherNames,
    PeerReview,
    Person,
    Record,
    ResearcherUrls,
    Work,
    Works,
}

/// How a resource type is addressed by put-codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PutCodeClass {
    /// Requires exactly one put-code to address one record.
    Single,
    /// Addressed by one or more put-codes joined by commas.
    Multiple,
    /// A summary; addressed with no put-code.
    Summary,
}

impl ResourceType {
    /// Returns the put-code class of this resource type.
    pub fn put_code_class(self) -> PutCodeClass {
        use ResourceType::*;
        match self {
            Address | Education | Email | Employment | ExternalIdentifiers | Funding
            | Keywords | OtherNames | PeerReview | ResearcherUrls | Work => PutCodeClass::Single,
            Works => PutCodeClass::Multiple,
            Activities | Person | Record => PutCodeClass::Summary,
        }
    }

    /// Returns the path segment for this resource type.
    pub fn as_str(self) -> &'static str {
        use ResourceType::*;
        match self {
            Activities => "activities",
            Address => "address",
            Education => "education",
            Email => "email",
            Employment => "employment",
            ExternalIdentifiers => "external-identifiers",
            Funding => "funding",
            Keywords => "keywords",
            OtherNames => "other-names",
            PeerReview => "peer-review",
            Person => "person",
            Record => "record",
            ResearcherUrls => "researcher-urls",
            Work => "work",
            Works => "works",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ResourceType::*;
        Ok(match s {
            "activities" => Activities,
            "address" => Address,
            "education" => Education,
            "email" => Email,
            "employment" => Employment,
            "external-identifiers" => ExternalIdentifiers,
            "funding" => Funding,
            "keywords" => Keywords,
            "other-names" => OtherNames,
            "peer-review" => PeerReview,
            "person" => Person,
            "record" => Record,
            "researcher-urls" => ResearcherUrls,
            "work" => Work,
            "works" => Works,
            other => {
                return Err(InvalidInputError::Other {
                    message: format!("unknown resource type '{}'", other),
                }
                .into());
            }
        })
    }
}
