//! Frame-rate throttle.
//!
//! Invalidations mark a render as pending. With a frame interval, a pending
//! render waits until the interval since the last render has passed, so any
//! number of invalidations inside one interval produce a single render.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub(crate) struct FrameThrottle {
    interval: Option<Duration>,
    last_render: Option<Instant>,
    pending: bool,
}

impl FrameThrottle {
    /// `max_fps` of `None` or zero disables throttling.
    pub(crate) fn new(max_fps: Option<u32>) -> Self {
        let interval = max_fps
            .filter(|fps| *fps > 0)
            .map(|fps| Duration::from_secs(1) / fps);
        Self {
            interval,
            last_render: None,
            pending: false,
        }
    }

    #[inline]
    pub(crate) fn invalidate(&mut self) {
        self.pending = true;
    }

    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.pending
    }

    /// Drop a pending render.
    #[inline]
    pub(crate) fn cancel(&mut self) {
        self.pending = false;
    }

    /// Time left before a pending render may run. `None` when nothing is
    /// pending, zero when it may run now.
    pub(crate) fn wait(&self, now: Instant) -> Option<Duration> {
        if !self.pending {
            return None;
        }
        match (self.interval, self.last_render) {
            (Some(interval), Some(last)) => {
                Some(interval.saturating_sub(now.saturating_duration_since(last)))
            }
            _ => Some(Duration::ZERO),
        }
    }

    pub(crate) fn ready(&self, now: Instant) -> bool {
        self.wait(now) == Some(Duration::ZERO)
    }

    pub(crate) fn rendered(&mut self, now: Instant) {
        self.pending = false;
        self.last_render = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unthrottled_renders_on_next_tick() {
        let mut throttle = FrameThrottle::new(None);
        let now = Instant::now();
        assert!(!throttle.ready(now));
        throttle.invalidate();
        assert!(throttle.ready(now));
        throttle.rendered(now);
        throttle.invalidate();
        assert!(throttle.ready(now));
    }

    #[test]
    fn test_invalidations_coalesce_within_interval() {
        let mut throttle = FrameThrottle::new(Some(10));
        let start = Instant::now();
        throttle.rendered(start);

        throttle.invalidate();
        throttle.invalidate();
        let soon = start + Duration::from_millis(40);
        assert!(!throttle.ready(soon));
        assert_eq!(throttle.wait(soon), Some(Duration::from_millis(60)));

        let later = start + Duration::from_millis(100);
        assert!(throttle.ready(later));
        throttle.rendered(later);
        assert!(!throttle.is_pending());
    }

    #[test]
    fn test_cancel_and_zero_fps() {
        let mut throttle = FrameThrottle::new(Some(0));
        throttle.invalidate();
        throttle.cancel();
        assert_eq!(throttle.wait(Instant::now()), None);
    }
}
