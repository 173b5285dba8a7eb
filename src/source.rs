use async_trait::async_trait;

use crate::error::FetchResult;
use crate::types::{Character, Locator, Page};

/// Where character pages come from. The production implementation talks to
/// the directory API over HTTP; tests swap in scripted sources.
#[async_trait]
pub trait CharacterSource: Send + Sync + std::fmt::Debug {
    /// Locator for the first page of `query`. An empty query means the
    /// unfiltered collection.
    fn first_page(&self, query: &str) -> Locator;

    /// Fetch a single page. One attempt, no retries, no state.
    async fn fetch_page(&self, locator: &Locator) -> FetchResult<Page>;

    /// Fetch a single character by id.
    async fn fetch_character(&self, id: u64) -> FetchResult<Character>;
}
