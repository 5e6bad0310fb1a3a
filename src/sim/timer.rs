//! Drift-corrected countdown / reverse timer
//!
//! The TimeKeeper never decrements a counter per driver firing: each poll
//! recomputes the current value from elapsed real time minus accumulated
//! pause time, so driver jitter and drift cannot skew it. The periodic
//! driver is external (the host polls at whatever cadence it likes).

/// Timer operating mode. `Reverse` behaves identically to `Countdown`
/// inside the TimeKeeper; the game layer adds seconds per apple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerMode {
    #[default]
    None,
    Countdown,
    Reverse,
}

/// Observable timer transitions, reported from `poll`/`add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The displayed value changed (seconds remaining).
    Changed(u32),
    /// The timer reached zero. Fires exactly once per run.
    Ended,
}

#[derive(Debug, Clone, Default)]
pub struct TimeKeeper {
    mode: TimerMode,
    /// Starting value in seconds. `add` shifts this so the
    /// elapsed-time recomputation preserves the adjustment.
    start_value: i64,
    /// Last reported value (seconds).
    value: u32,
    started_at: u64,
    accum_pause_ms: u64,
    paused_at: Option<u64>,
}

impl TimeKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_countdown(&mut self, seconds: u32, now: u64) {
        self.setup(TimerMode::Countdown, seconds, now);
    }

    pub fn start_reverse(&mut self, seconds: u32, now: u64) {
        self.setup(TimerMode::Reverse, seconds, now);
    }

    fn setup(&mut self, mode: TimerMode, seconds: u32, now: u64) {
        self.stop();
        self.mode = mode;
        self.start_value = seconds as i64;
        self.value = seconds;
        self.started_at = now;
    }

    /// Stop completely. No event ever fires after a stop.
    pub fn stop(&mut self) {
        *self = Self::default();
    }

    /// Freeze (true) / resume (false) elapsed-time accounting. Resuming
    /// folds the paused span into the accumulated pause duration.
    pub fn set_paused(&mut self, paused: bool, now: u64) {
        if self.mode == TimerMode::None {
            return;
        }
        match (paused, self.paused_at) {
            (true, None) => self.paused_at = Some(now),
            (false, Some(at)) => {
                self.accum_pause_ms += now.saturating_sub(at);
                self.paused_at = None;
            }
            _ => {}
        }
    }

    /// Add (or remove, if negative) seconds to the running timer. The
    /// new value is reported immediately; dropping to zero ends the run.
    pub fn add(&mut self, delta_secs: i64, now: u64) -> Option<TimerEvent> {
        if self.mode == TimerMode::None {
            return None;
        }
        self.start_value += delta_secs;
        let next = self.compute(now);
        self.value = next;
        if next == 0 {
            return Some(self.end());
        }
        Some(TimerEvent::Changed(next))
    }

    /// Recompute the value from wall-clock elapsed time. Call from a
    /// periodic driver; the cadence only affects notification latency.
    pub fn poll(&mut self, now: u64) -> Option<TimerEvent> {
        if self.mode == TimerMode::None || self.paused_at.is_some() {
            return None;
        }
        let next = self.compute(now);
        if next == 0 {
            self.value = 0;
            return Some(self.end());
        }
        if next != self.value {
            self.value = next;
            return Some(TimerEvent::Changed(next));
        }
        None
    }

    /// Current value in seconds.
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode != TimerMode::None
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    fn compute(&self, now: u64) -> u32 {
        let effective_now = self.paused_at.unwrap_or(now);
        let elapsed_ms = effective_now
            .saturating_sub(self.started_at)
            .saturating_sub(self.accum_pause_ms);
        let elapsed_secs = (elapsed_ms / 1000) as i64;
        (self.start_value - elapsed_secs).max(0) as u32
    }

    fn end(&mut self) -> TimerEvent {
        self.stop();
        TimerEvent::Ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_tracks_elapsed_time() {
        let mut t = TimeKeeper::new();
        t.start_countdown(120, 1_000);
        assert_eq!(t.value(), 120);

        assert_eq!(t.poll(1_500), None);
        assert_eq!(t.poll(2_000), Some(TimerEvent::Changed(119)));
        // Jittery driver: a late poll still lands on the right value
        assert_eq!(t.poll(11_300), Some(TimerEvent::Changed(109)));
    }

    #[test]
    fn test_pause_excludes_paused_span() {
        let mut t = TimeKeeper::new();
        t.start_countdown(120, 0);
        assert_eq!(t.poll(5_000), Some(TimerEvent::Changed(115)));

        t.set_paused(true, 5_000);
        // Paused: polls report nothing, value frozen
        assert_eq!(t.poll(9_000), None);
        assert_eq!(t.value(), 115);

        // 10 real seconds of pause do not count as elapsed time
        t.set_paused(false, 15_000);
        assert_eq!(t.poll(15_000), None);
        assert_eq!(t.value(), 115);
        assert_eq!(t.poll(16_000), Some(TimerEvent::Changed(114)));
    }

    #[test]
    fn test_add_is_preserved_by_later_polls() {
        let mut t = TimeKeeper::new();
        t.start_reverse(60, 0);
        assert_eq!(t.poll(3_000), Some(TimerEvent::Changed(57)));

        assert_eq!(t.add(5, 3_000), Some(TimerEvent::Changed(62)));
        // The drift-corrected recomputation keeps the bonus
        assert_eq!(t.poll(4_000), Some(TimerEvent::Changed(61)));
    }

    #[test]
    fn test_add_floor_and_end() {
        let mut t = TimeKeeper::new();
        t.start_reverse(10, 0);
        assert_eq!(t.add(-30, 0), Some(TimerEvent::Ended));
        assert!(!t.is_running());
        // No further events after the end
        assert_eq!(t.add(5, 0), None);
        assert_eq!(t.poll(1_000), None);
    }

    #[test]
    fn test_end_fires_exactly_once() {
        let mut t = TimeKeeper::new();
        t.start_countdown(2, 0);
        assert_eq!(t.poll(1_000), Some(TimerEvent::Changed(1)));
        assert_eq!(t.poll(2_000), Some(TimerEvent::Ended));
        assert_eq!(t.poll(3_000), None);
        assert_eq!(t.mode(), TimerMode::None);
    }

    #[test]
    fn test_stop_silences_callbacks() {
        let mut t = TimeKeeper::new();
        t.start_countdown(60, 0);
        t.stop();
        assert_eq!(t.poll(120_000), None);
        assert!(!t.is_running());
    }

    #[test]
    fn test_restart_resets_prior_run() {
        let mut t = TimeKeeper::new();
        t.start_countdown(60, 0);
        t.set_paused(true, 1_000);
        t.start_reverse(30, 2_000);
        assert!(!t.is_paused());
        assert_eq!(t.value(), 30);
        assert_eq!(t.poll(3_000), Some(TimerEvent::Changed(29)));
    }
}
