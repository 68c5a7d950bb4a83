use std::time::{Duration, Instant};

/// Paces redraws to a target frame rate.
///
/// The runtime asks [`FrameLimiter::is_due`] before requesting a redraw and
/// sleeps the event loop until [`FrameLimiter::deadline`] otherwise. Deadlines
/// advance by whole intervals so the average rate does not drift; after a
/// stall longer than one interval the schedule restarts from the stalled
/// frame instead of bursting to catch up.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    interval: Option<Duration>,
    next: Option<Instant>,
}

impl FrameLimiter {
    /// `target_fps == 0` disables pacing.
    pub fn new(target_fps: u32) -> Self {
        let interval = (target_fps > 0).then(|| Duration::from_secs(1) / target_fps);
        Self { interval, next: None }
    }

    pub fn unlimited() -> Self {
        Self::new(0)
    }

    #[inline]
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Earliest instant the next frame may start. `None` means "now".
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.interval.and(self.next)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline().is_none_or(|d| now >= d)
    }

    /// Records that a frame started at `now` and schedules the next one.
    pub fn mark_frame(&mut self, now: Instant) {
        let Some(interval) = self.interval else { return };

        let next = match self.next {
            Some(prev) if now.saturating_duration_since(prev) < interval => prev + interval,
            _ => now + interval,
        };
        self.next = Some(next);
    }
}

impl Default for FrameLimiter {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_fps_interval() {
        let l = FrameLimiter::new(60);
        assert_eq!(l.interval(), Some(Duration::from_secs(1) / 60));
    }

    #[test]
    fn first_frame_is_due_immediately() {
        let l = FrameLimiter::new(60);
        assert!(l.deadline().is_none());
        assert!(l.is_due(Instant::now()));
    }

    #[test]
    fn next_frame_waits_one_interval() {
        let t0 = Instant::now();
        let mut l = FrameLimiter::new(50); // 20 ms
        l.mark_frame(t0);

        assert_eq!(l.deadline(), Some(t0 + Duration::from_millis(20)));
        assert!(!l.is_due(t0 + Duration::from_millis(5)));
        assert!(l.is_due(t0 + Duration::from_millis(20)));
    }

    #[test]
    fn late_frames_keep_the_cadence() {
        let t0 = Instant::now();
        let mut l = FrameLimiter::new(50);
        l.mark_frame(t0);
        // Woken 3 ms late: the next deadline stays on the 20 ms grid.
        l.mark_frame(t0 + Duration::from_millis(23));
        assert_eq!(l.deadline(), Some(t0 + Duration::from_millis(40)));
    }

    #[test]
    fn long_stall_restarts_schedule() {
        let t0 = Instant::now();
        let mut l = FrameLimiter::new(50);
        l.mark_frame(t0);
        let resumed = t0 + Duration::from_millis(500);
        l.mark_frame(resumed);
        assert_eq!(l.deadline(), Some(resumed + Duration::from_millis(20)));
    }

    #[test]
    fn unlimited_is_always_due() {
        let t0 = Instant::now();
        let mut l = FrameLimiter::unlimited();
        l.mark_frame(t0);
        assert!(l.deadline().is_none());
        assert!(l.is_due(t0));
    }
}
