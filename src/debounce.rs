use std::time::{Duration, Instant};

/// Collapses a burst of query edits into a single delayed commit.
///
/// Every `schedule` replaces the pending text and pushes the deadline out by
/// the quiet period. The owner polls `deadline()` to know when to wake up and
/// calls `fire` to collect the commit. Time comes in as an argument so this
/// stays testable without timers; the actual sleeping happens in the main
/// loop.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
    pending: Option<String>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
            pending: None,
        }
    }

    /// Record `text` as the pending commit and restart the quiet period.
    pub fn schedule(&mut self, text: String, now: Instant) {
        self.pending = Some(text);
        self.deadline = Some(now + self.quiet);
    }

    /// Collect the pending commit if the quiet period has elapsed.
    pub fn fire(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Take the pending commit immediately, without waiting out the quiet
    /// period. Used when the user confirms the query by hand.
    pub fn take_pending(&mut self) -> Option<String> {
        self.deadline = None;
        self.pending.take()
    }

    /// Drop any pending commit without firing it.
    pub fn cancel_pending(&mut self) {
        self.deadline = None;
        self.pending = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(500);

    #[test]
    fn idle_debouncer_has_no_deadline_and_never_fires() {
        let mut debouncer = Debouncer::new(QUIET);
        assert!(debouncer.deadline().is_none());
        assert_eq!(debouncer.fire(Instant::now()), None);
    }

    #[test]
    fn burst_of_edits_yields_one_commit_with_the_latest_text() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.schedule("a".into(), t0);
        debouncer.schedule("ab".into(), t0 + Duration::from_millis(100));
        debouncer.schedule("abc".into(), t0 + Duration::from_millis(200));

        // Still inside the quiet period measured from the last edit.
        assert_eq!(debouncer.fire(t0 + Duration::from_millis(400)), None);
        assert_eq!(
            debouncer.fire(t0 + Duration::from_millis(700)),
            Some("abc".to_string())
        );
        // One commit per burst.
        assert_eq!(debouncer.fire(t0 + Duration::from_millis(800)), None);
        assert!(debouncer.deadline().is_none());
    }

    #[test]
    fn each_edit_pushes_the_deadline_out() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.schedule("r".into(), t0);
        assert_eq!(debouncer.deadline(), Some(t0 + QUIET));

        debouncer.schedule("ri".into(), t0 + Duration::from_millis(300));
        assert_eq!(
            debouncer.deadline(),
            Some(t0 + Duration::from_millis(300) + QUIET)
        );

        // The original deadline passing means nothing now.
        assert_eq!(debouncer.fire(t0 + Duration::from_millis(600)), None);
    }

    #[test]
    fn clearing_the_query_commits_the_empty_text() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.schedule("rick".into(), t0);
        debouncer.schedule(String::new(), t0 + Duration::from_millis(200));

        assert_eq!(
            debouncer.fire(t0 + Duration::from_millis(700)),
            Some(String::new())
        );
    }

    #[test]
    fn cancel_discards_the_pending_commit() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.schedule("morty".into(), t0);
        debouncer.cancel_pending();

        assert!(debouncer.deadline().is_none());
        assert_eq!(debouncer.fire(t0 + QUIET + QUIET), None);
    }

    #[test]
    fn take_pending_skips_the_wait() {
        let mut debouncer = Debouncer::new(QUIET);
        let t0 = Instant::now();

        debouncer.schedule("summer".into(), t0);
        assert_eq!(debouncer.take_pending(), Some("summer".to_string()));
        assert!(debouncer.deadline().is_none());
        assert_eq!(debouncer.take_pending(), None);
    }
}
