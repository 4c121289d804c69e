//! Registry search and pagination.

use futures_util::Stream;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::auth::AccessToken;
use crate::client::Core;
use crate::error::Error;

/// The query parser applied by the search engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchMethod {
    #[default]
    Lucene,
    Edismax,
    Dismax,
}

impl SearchMethod {
    /// Returns the `defType` query value.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMethod::Lucene => "lucene",
            SearchMethod::Edismax => "edismax",
            SearchMethod::Dismax => "dismax",
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    /// The records on this page. The registry sends `null` for an empty
    /// result set.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub result: Vec<Value>,

    /// Total number of matches across all pages.
    #[serde(rename = "num-found", default)]
    pub num_found: u64,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Core {
    /// Run a single search query.
    ///
    /// `start` and `rows` are appended only when provided; the server
    /// default applies otherwise.
    #[instrument(skip(self, token))]
    pub(crate) async fn search(
        &self,
        query: &str,
        method: SearchMethod,
        start: Option<u32>,
        rows: Option<u32>,
        token: &AccessToken,
    ) -> Result<SearchResults, Error> {
        let mut params = vec![
            ("defType", method.as_str().to_string()),
            ("q", query.to_string()),
        ];
        if let Some(start) = start {
            params.push(("start", start.to_string()));
        }
        if let Some(rows) = rows {
            params.push(("rows", rows.to_string()));
        }

        debug!(query, "searching");
        self.http
            .get_json(&self.endpoints.search_url(), &params, token.as_str())
            .await
    }

    /// Lazily yield every search result, page by page.
    ///
    /// Pages of `page_size` are fetched with an increasing `start` offset;
    /// the stream ends at the first empty page. Nothing is fetched beyond
    /// the page currently being consumed, and any HTTP error is yielded to
    /// the consumer and terminates the stream.
    pub(crate) fn search_all<'a>(
        &'a self,
        query: &'a str,
        method: SearchMethod,
        page_size: u32,
        token: &'a AccessToken,
    ) -> impl Stream<Item = Result<Value, Error>> + 'a {
        async_stream::stream! {
            let mut start = 0u32;
            loop {
                let page = match self
                    .search(query, method, Some(start), Some(page_size), token)
                    .await
                {
                    Ok(page) => page,
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                };

                if page.result.is_empty() {
                    break;
                }
                for item in page.result {
                    yield Ok(item);
                }
                start += page_size;
            }
        }
    }
}
