//! Record read/write dispatch.
//!
//! Every operation follows the same degenerate state machine: validate the
//! put-code combination, build the target URL, attach auth, send one
//! request, interpret the response. No retries, no caching between calls.

use reqwest::Method;
use reqwest::header::LOCATION;
use tracing::{debug, instrument};

use crate::client::Core;
use crate::error::{Error, PutCodeUsageError};
use crate::record::{ContentType, RecordBody, codec};
use crate::types::{OrcidId, PutCode, PutCodeClass, PutCodes, ResourceType};

impl Core {
    /// Read a record or summary.
    #[instrument(skip(self, token), fields(orcid_id = %orcid_id, %resource_type))]
    pub(crate) async fn read_record(
        &self,
        orcid_id: &OrcidId,
        resource_type: ResourceType,
        token: &str,
        put_code: Option<PutCodes>,
        accept: ContentType,
    ) -> Result<RecordBody, Error> {
        validate_put_codes(resource_type, put_code.as_ref())?;

        let mut url = self.endpoints.record_url(orcid_id, resource_type);
        if let Some(codes) = &put_code {
            url.push('/');
            url.push_str(&codes.path_segment());
        }

        debug!("reading record");
        let bytes = self.http.get_record(&url, accept, token).await?;
        codec::deserialize(&bytes, accept)
    }

    /// Create a record; returns the new put-code when the registry
    /// communicates it via the `Location` header.
    #[instrument(skip(self, token, body), fields(orcid_id = %orcid_id, %resource_type))]
    pub(crate) async fn add_record(
        &self,
        orcid_id: &OrcidId,
        token: &str,
        resource_type: ResourceType,
        body: &RecordBody,
        content_type: ContentType,
    ) -> Result<Option<PutCode>, Error> {
        let bytes = codec::serialize(body, content_type)?;
        let url = self.endpoints.record_url(orcid_id, resource_type);

        debug!("creating record");
        let response = self
            .http
            .write_record(Method::POST, &url, bytes, content_type, token)
            .await?;

        // Not guaranteed across resource types; absence means the caller
        // must re-read to discover the put-code.
        Ok(put_code_from_location(&response))
    }

    /// Update an existing record in place.
    #[instrument(skip(self, token, body), fields(orcid_id = %orcid_id, %resource_type, %put_code))]
    pub(crate) async fn update_record(
        &self,
        orcid_id: &OrcidId,
        token: &str,
        resource_type: ResourceType,
        mut body: RecordBody,
        put_code: &PutCode,
        content_type: ContentType,
    ) -> Result<(), Error> {
        codec::inject_put_code(&mut body, put_code)?;
        let bytes = codec::serialize(&body, content_type)?;
        let url = format!(
            "{}/{}",
            self.endpoints.record_url(orcid_id, resource_type),
            put_code
        );

        debug!("updating record");
        self.http
            .write_record(Method::PUT, &url, bytes, content_type, token)
            .await?;
        Ok(())
    }

    /// Delete a record.
    #[instrument(skip(self, token), fields(orcid_id = %orcid_id, %resource_type, %put_code))]
    pub(crate) async fn remove_record(
        &self,
        orcid_id: &OrcidId,
        token: &str,
        resource_type: ResourceType,
        put_code: &PutCode,
    ) -> Result<(), Error> {
        let url = format!(
            "{}/{}",
            self.endpoints.record_url(orcid_id, resource_type),
            put_code
        );
        debug!("deleting record");
        self.http.delete(&url, token).await
    }
}

/// Enforce the put-code requirement of the resource type before any
/// network call.
fn validate_put_codes(
    resource_type: ResourceType,
    put_code: Option<&PutCodes>,
) -> Result<(), Error> {
    let rule = |err: PutCodeUsageError| Error::InvalidInput(err.into());
    let name = || resource_type.to_string();

    match (resource_type.put_code_class(), put_code) {
        (PutCodeClass::Single, None) | (PutCodeClass::Multiple, None) => {
            Err(rule(PutCodeUsageError::MissingWhenRequired {
                resource_type: name(),
            }))
        }
        (PutCodeClass::Single, Some(PutCodes::Many(_))) => {
            Err(rule(PutCodeUsageError::MustBeSingle {
                resource_type: name(),
            }))
        }
        (PutCodeClass::Multiple, Some(PutCodes::One(_))) => {
            Err(rule(PutCodeUsageError::MustBeListForCollection {
                resource_type: name(),
            }))
        }
        (PutCodeClass::Summary, Some(_)) => {
            Err(rule(PutCodeUsageError::RedundantWhenForbidden {
                resource_type: name(),
            }))
        }
        _ => Ok(()),
    }
}

/// Extract the created put-code from the final path segment of the
/// `Location` header.
fn put_code_from_location(response: &reqwest::Response) -> Option<PutCode> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    let segment = location.trim_end_matches('/').rsplit('/').next()?;
    PutCode::new(segment).ok()
}
