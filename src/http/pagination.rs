//! Cursor pagination over list endpoints.
//!
//! List responses carry a `list_cursor` marker; [`Paginator`] wraps one page
//! and knows how to fetch the next through the same transport.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::SdkError;
use crate::http::ZaboHttp;

/// Cursor block attached to paginated responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ListCursor {
    #[serde(default)]
    pub limit: Option<u32>,
    pub has_more: bool,
    #[serde(default)]
    pub self_uri: Option<String>,
    #[serde(default)]
    pub next_uri: Option<String>,
}

/// Wire shape of a list response.
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub list_cursor: Option<ListCursor>,
}

/// One page of results plus the means to fetch the next.
pub struct Paginator<T> {
    http: ZaboHttp,
    /// The items on this page.
    pub data: Vec<T>,
    cursor: Option<ListCursor>,
}

impl<T: DeserializeOwned> Paginator<T> {
    pub(crate) fn new(http: ZaboHttp, envelope: ListEnvelope<T>) -> Self {
        Self {
            http,
            data: envelope.data,
            cursor: envelope.list_cursor,
        }
    }

    /// Whether the server reported more results past this page.
    pub fn has_more(&self) -> bool {
        self.cursor.as_ref().map(|c| c.has_more).unwrap_or(false)
    }

    /// Fetch the next page, or `None` when this page is the last.
    pub async fn next_page(&self) -> Result<Option<Paginator<T>>, SdkError> {
        let Some(cursor) = &self.cursor else {
            return Ok(None);
        };
        if !cursor.has_more {
            return Ok(None);
        }
        let Some(next_uri) = &cursor.next_uri else {
            return Ok(None);
        };

        // next_uri is rooted at the API host and already version-prefixed.
        let envelope = self.http.get_envelope(next_uri, false).await?;
        Ok(Some(Paginator::new(self.http.clone(), envelope)))
    }
}
