use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn update(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let settled = self
            .pending
            .as_ref()
            .is_some_and(|(_, changed)| now.saturating_duration_since(*changed) >= self.delay);
        if settled {
            return self.pending.take().map(|(value, _)| value);
        }
        None
    }

    pub fn flush(&mut self, value: T) -> T {
        self.pending = None;
        value
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T: Clone + PartialEq> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
