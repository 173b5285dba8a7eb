use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterStatus {
    Alive,
    Dead,
    Unknown,
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterStatus::Alive => write!(f, "Alive"),
            CharacterStatus::Dead => write!(f, "Dead"),
            CharacterStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A character from the directory. Identity is `id`; everything else is
/// display data.
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub status: CharacterStatus,
    pub species: String,
    pub gender: String,
    pub image: String,
    pub origin: String,
    pub location: String,
    pub created: DateTime<Utc>,
}

/// Opaque reference to a fetchable page. Holds a full request URL; callers
/// only ever ask whether one is present, never what is inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator(String);

impl Locator {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of results plus where the next one lives. `next: None` means
/// the collection is exhausted for the query that produced this page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub characters: Vec<Character>,
    pub next: Option<Locator>,
    pub total: Option<u64>,
}

/// Which fetch a load belongs to: a fresh list or a page appended to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Reset,
    Append,
}

/// Where the list stands with respect to the network.
#[derive(Debug, Clone, PartialEq)]
pub enum ListStatus {
    Idle,
    LoadingInitial,
    LoadingMore,
    Error { error: FetchError, phase: LoadKind },
}

impl ListStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, ListStatus::LoadingInitial | ListStatus::LoadingMore)
    }
}
