use std::time::{Duration, Instant};

/// Deferred "fit the viewport" request. Scheduling again before the delay
/// has elapsed pushes the deadline out, so only the last call fires.
#[derive(Debug, Clone)]
pub struct RefitScheduler {
    delay: Duration,
    deadline: Option<Instant>,
}

impl RefitScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once per pending request, when its deadline has
    /// passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn fires_once_after_delay() {
        let start = Instant::now();
        let mut refit = RefitScheduler::new(DELAY);
        assert!(!refit.poll(start + DELAY));
        refit.schedule(start);
        assert!(refit.is_pending());
        assert!(!refit.poll(start + Duration::from_millis(299)));
        assert!(refit.poll(start + DELAY));
        assert!(!refit.poll(start + DELAY * 2));
    }

    #[test]
    fn last_call_wins() {
        let start = Instant::now();
        let mut refit = RefitScheduler::new(DELAY);
        refit.schedule(start);
        refit.schedule(start + Duration::from_millis(200));
        assert!(!refit.poll(start + DELAY));
        assert!(refit.poll(start + Duration::from_millis(500)));
    }

    #[test]
    fn cancel_drops_pending_request() {
        let start = Instant::now();
        let mut refit = RefitScheduler::new(DELAY);
        refit.schedule(start);
        refit.cancel();
        assert!(!refit.is_pending());
        assert!(!refit.poll(start + DELAY * 2));
    }
}
