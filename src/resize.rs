//! Container resize notifications.
//!
//! Hosts that observe their container report every change and the gauge
//! re-lays out immediately. Hosts that only see coarse window resizes get the
//! notifications coalesced behind a short trailing debounce.

use std::fmt;
use std::time::{Duration, Instant};

use crate::surface::Container;

/// Quiet period before a debounced resize is handled.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(66);

pub trait ResizeSource: fmt::Debug {
    /// Starts accepting notifications.
    fn attach(&mut self);

    /// Stops accepting notifications and drops any pending one.
    fn detach(&mut self);

    fn is_attached(&self) -> bool;

    /// Records that the container changed size at `now`.
    fn notify(&mut self, now: Instant);

    /// Returns `true` once when a recorded change is due for handling.
    fn poll(&mut self, now: Instant) -> bool;
}

/// Picks the provider matching what the container can report.
pub fn detect(container: &dyn Container) -> Box<dyn ResizeSource> {
    if container.observes_resize() {
        Box::new(ObservedResize::default())
    } else {
        Box::new(DebouncedResize::new(RESIZE_DEBOUNCE))
    }
}

/// Every notification is handled on the next poll.
#[derive(Debug, Default)]
pub struct ObservedResize {
    attached: bool,
    pending: bool,
}

impl ResizeSource for ObservedResize {
    fn attach(&mut self) {
        self.attached = true;
    }

    fn detach(&mut self) {
        self.attached = false;
        self.pending = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn notify(&mut self, _now: Instant) {
        if self.attached {
            self.pending = true;
        }
    }

    fn poll(&mut self, _now: Instant) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// A burst of notifications is handled once, `wait` after the last one.
#[derive(Debug)]
pub struct DebouncedResize {
    attached: bool,
    wait: Duration,
    deadline: Option<Instant>,
}

impl DebouncedResize {
    pub fn new(wait: Duration) -> Self {
        Self {
            attached: false,
            wait,
            deadline: None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl ResizeSource for DebouncedResize {
    fn attach(&mut self) {
        self.attached = true;
    }

    fn detach(&mut self) {
        self.attached = false;
        self.deadline = None;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn notify(&mut self, now: Instant) {
        if self.attached {
            self.deadline = Some(now + self.wait);
        }
    }

    fn poll(&mut self, now: Instant) -> bool {
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
    use crate::geometry::Size;

    struct Host {
        observes: bool,
    }

    impl Container for Host {
        fn measure(&self) -> Size {
            Size::new(100.0, 100.0)
        }

        fn observes_resize(&self) -> bool {
            self.observes
        }
    }

    #[test]
    fn observed_fires_on_next_poll_once() {
        let now = Instant::now();
        let mut source = ObservedResize::default();
        source.attach();
        assert!(!source.poll(now));
        source.notify(now);
        source.notify(now);
        assert!(source.poll(now));
        assert!(!source.poll(now));
    }

    #[test]
    fn debounced_waits_for_quiet_period() {
        let start = Instant::now();
        let mut source = DebouncedResize::new(RESIZE_DEBOUNCE);
        source.attach();
        source.notify(start);
        source.notify(start + Duration::from_millis(40));
        assert!(!source.poll(start + Duration::from_millis(70)));
        assert!(source.poll(start + Duration::from_millis(106)));
        assert!(!source.poll(start + Duration::from_millis(500)));
    }

    #[test]
    fn detached_sources_ignore_notifications() {
        let now = Instant::now();
        let mut observed = ObservedResize::default();
        observed.notify(now);
        assert!(!observed.poll(now));

        let mut debounced = DebouncedResize::new(RESIZE_DEBOUNCE);
        debounced.attach();
        debounced.notify(now);
        debounced.detach();
        assert!(!debounced.is_attached());
        assert!(!debounced.poll(now + RESIZE_DEBOUNCE));
    }

    #[test]
    fn detect_follows_container_capability() {
        let mut observed = detect(&Host { observes: true });
        observed.attach();
        observed.notify(Instant::now());
        assert!(observed.poll(Instant::now()));

        let mut debounced = detect(&Host { observes: false });
        let now = Instant::now();
        debounced.attach();
        debounced.notify(now);
        assert!(!debounced.poll(now));
        assert!(debounced.poll(now + RESIZE_DEBOUNCE));
    }
}
