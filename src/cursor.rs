use crate::types::Locator;

/// Tracks where the next page of the current query lives.
///
/// "Has more data" is this struct's business; "is currently loading" is the
/// controller's. A fresh cursor is exhausted so nothing fetches before the
/// first reset points it somewhere.
#[derive(Debug, Clone)]
pub struct PageCursor {
    current: Option<Locator>,
    exhausted: bool,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            current: None,
            exhausted: true,
        }
    }
}

impl PageCursor {
    /// Point the cursor at the first page of a new query.
    pub fn reset(&mut self, locator: Locator) {
        self.current = Some(locator);
        self.exhausted = false;
    }

    /// Record the outcome of a successful fetch. A missing `next` marks the
    /// collection exhausted until the next reset.
    pub fn advance(&mut self, next: Option<Locator>) {
        self.exhausted = next.is_none();
        self.current = next;
    }

    pub fn can_load_more(&self) -> bool {
        !self.exhausted
    }

    pub fn current(&self) -> Option<&Locator> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(s: &str) -> Locator {
        Locator::new(s)
    }

    #[test]
    fn fresh_cursor_has_nothing_to_load() {
        let cursor = PageCursor::default();
        assert!(!cursor.can_load_more());
        assert!(cursor.current().is_none());
    }

    #[test]
    fn reset_arms_the_cursor() {
        let mut cursor = PageCursor::default();
        cursor.reset(loc("https://example.test/character?page=1"));
        assert!(cursor.can_load_more());
        assert!(cursor.current().is_some());
    }

    #[test]
    fn advance_to_next_page_keeps_loading_possible() {
        let mut cursor = PageCursor::default();
        cursor.reset(loc("https://example.test/character?page=1"));
        cursor.advance(Some(loc("https://example.test/character?page=2")));
        assert!(cursor.can_load_more());
        assert_eq!(
            cursor.current().map(Locator::as_str),
            Some("https://example.test/character?page=2")
        );
    }

    #[test]
    fn advance_to_none_exhausts() {
        let mut cursor = PageCursor::default();
        cursor.reset(loc("https://example.test/character?page=1"));
        cursor.advance(None);
        assert!(!cursor.can_load_more());
        assert!(cursor.current().is_none());
    }

    #[test]
    fn reset_revives_an_exhausted_cursor() {
        let mut cursor = PageCursor::default();
        cursor.reset(loc("https://example.test/character?page=1"));
        cursor.advance(None);
        cursor.reset(loc("https://example.test/character?name=rick"));
        assert!(cursor.can_load_more());
    }
}
