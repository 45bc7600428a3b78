// src/api/pagination.rs
//! Cursor pagination over the retrying client.
//!
//! Pages are fetched strictly one after another because each cursor is
//! only valid for the request that follows it. A walk either returns every
//! item in server order or fails as a whole.

use super::monday_client::MondayClient;
use super::types::{GraphqlRequest, GraphqlResponse};
use super::GraphqlTransport;
use crate::error::ClassifiedError;
use crate::types::PageSize;
use serde_json::Value;

/// One page of results. Records are passed through unparsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub cursor: Option<String>,
    pub has_more: bool,
}

/// How to ask for a page and where to find the `{items, cursor, has_more}`
/// envelope in the response.
///
/// `limit` and `cursor` variables are bound per page. When a continuation
/// request is configured it is used whenever a cursor is in hand, matching
/// services that serve follow-up pages from a separate root field.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    request: GraphqlRequest,
    envelope: String,
    continuation: Option<(GraphqlRequest, String)>,
}

impl PageTemplate {
    /// `envelope` is a JSON pointer into `data`, e.g. `/boards/0/items_page`.
    pub fn new(request: GraphqlRequest, envelope: impl Into<String>) -> Self {
        Self {
            request,
            envelope: envelope.into(),
            continuation: None,
        }
    }

    pub fn with_continuation(
        mut self,
        request: GraphqlRequest,
        envelope: impl Into<String>,
    ) -> Self {
        self.continuation = Some((request, envelope.into()));
        self
    }

    /// The concrete request for one page, plus its envelope pointer.
    fn bind(&self, page_size: PageSize, cursor: Option<&str>) -> (GraphqlRequest, &str) {
        let (request, envelope) = match (&self.continuation, cursor) {
            (Some((request, envelope)), Some(_)) => (request, envelope.as_str()),
            _ => (&self.request, self.envelope.as_str()),
        };
        let bound = request
            .clone()
            .with_variable("limit", page_size.get())
            .with_variable("cursor", cursor.map_or(Value::Null, Value::from));
        (bound, envelope)
    }
}

/// Walks cursor pages through a `MondayClient`.
pub struct Paginator<'a, T> {
    client: &'a MondayClient<T>,
}

impl<'a, T: GraphqlTransport> Paginator<'a, T> {
    pub fn new(client: &'a MondayClient<T>) -> Self {
        Self { client }
    }

    /// Fetches a single page starting at `cursor`.
    pub async fn fetch_page(
        &self,
        template: &PageTemplate,
        page_size: PageSize,
        cursor: Option<&str>,
    ) -> Result<Page, ClassifiedError> {
        let (request, envelope) = template.bind(page_size, cursor);
        let response = self.client.execute(&request).await?;
        extract_page(&response, envelope)
    }

    /// Fetches pages until the service reports no more, the cursor runs out,
    /// or `stop_after_pages` pages have been read.
    ///
    /// Any failure discards the items gathered so far; a truncated listing
    /// is never returned as if it were complete.
    pub async fn fetch_all(
        &self,
        template: &PageTemplate,
        page_size: PageSize,
        start_cursor: Option<String>,
        stop_after_pages: Option<u32>,
    ) -> Result<Vec<Value>, ClassifiedError> {
        let mut all_items = Vec::new();
        let mut cursor = start_cursor;
        let mut pages_fetched = 0u32;

        loop {
            // Check if we've reached the page limit
            if let Some(max) = stop_after_pages {
                if pages_fetched >= max {
                    log::debug!("Reached maximum page limit: {}", max);
                    break;
                }
            }

            let page = self
                .fetch_page(template, page_size, cursor.as_deref())
                .await?;
            pages_fetched += 1;
            log::debug!(
                "Fetched page {} with {} item(s), has_more={}",
                pages_fetched,
                page.items.len(),
                page.has_more
            );

            all_items.extend(page.items);
            cursor = page.cursor;

            if !page.has_more || cursor.is_none() {
                break;
            }
        }

        log::info!(
            "Fetched {} item(s) across {} page(s)",
            all_items.len(),
            pages_fetched
        );
        Ok(all_items)
    }
}

/// Reads the pagination envelope at `pointer`. A missing `has_more` means
/// "more pages exist while a cursor is returned".
fn extract_page(response: &GraphqlResponse, pointer: &str) -> Result<Page, ClassifiedError> {
    let malformed = |what: &str| ClassifiedError::Unknown {
        detail: format!("pagination envelope at '{}' {}", pointer, what),
    };

    let envelope = response
        .pointer(pointer)
        .filter(|value| value.is_object())
        .ok_or_else(|| malformed("is missing"))?;

    let items = envelope
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| malformed("has no items array"))?;

    let cursor = match envelope.get("cursor") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(malformed("has a non-string cursor")),
    };

    let has_more = match envelope.get("has_more") {
        None | Some(Value::Null) => cursor.is_some(),
        Some(Value::Bool(flag)) => *flag,
        Some(_) => return Err(malformed("has a non-boolean has_more")),
    };

    Ok(Page {
        items,
        cursor,
        has_more,
    })
}
