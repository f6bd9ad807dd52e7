//! Pagination walker for collection endpoints.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::future::Future;
use tracing::debug;

use crate::error::Result;

/// The `meta.pagination` block of a collection response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of entities across all pages
    #[serde(default)]
    pub total: u64,
    /// Number of entities on this page
    #[serde(default)]
    pub count: u64,
    /// Page size
    #[serde(default)]
    pub per_page: u64,
    /// 1-based number of this page
    #[serde(default = "first_page")]
    pub current_page: u32,
    /// Number of pages
    #[serde(default = "first_page")]
    pub total_pages: u32,
    /// Neighbouring page links
    #[serde(default, deserialize_with = "lenient_links")]
    pub links: PaginationLinks,
}

const fn first_page() -> u32 {
    1
}

/// Links to neighbouring pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    /// URL of the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// URL of the previous page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

// The panel serializes an empty link set as `[]`.
fn lenient_links<'de, D>(deserializer: D) -> std::result::Result<PaginationLinks, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => {
            serde_json::from_value(Value::Object(map)).map_err(serde::de::Error::custom)
        }
        _ => Ok(PaginationLinks::default()),
    }
}

/// One decoded page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Entities in panel order
    pub items: Vec<T>,
    /// Pagination block, if the panel sent one
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    /// Number of pages the collection spans, `1` when unpaginated.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.pagination.as_ref().map_or(1, |p| p.total_pages)
    }
}

/// Collect every page of a collection into one ordered list.
///
/// `fetch_page` is called with page `1` first. When the first page reports
/// `total_pages <= 1` its entities are returned as-is; otherwise pages `2..=total_pages`
/// are fetched one after another and appended in page order. The first failing page
/// aborts the walk and its error is returned; entities already collected are dropped.
///
/// # Errors
///
/// Returns the error of the first page fetch that fails.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let first = fetch_page(1).await?;
    let total_pages = first.total_pages();
    let mut items = first.items;

    debug!(total_pages, count = items.len(), "fetched page 1");

    if total_pages <= 1 {
        return Ok(items);
    }

    for page_number in 2..=total_pages {
        let page = fetch_page(page_number).await?;
        debug!(page = page_number, total_pages, count = page.items.len(), "fetched page");
        items.extend(page.items);
    }

    Ok(items)
}
