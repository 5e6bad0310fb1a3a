//! Temporary effect scheduling
//!
//! Three independent effect slots (apple multiplier, tick interval,
//! control polarity), each holding at most one pending restore deadline.
//! Applying a slot that is already active replaces the deadline
//! (cancel-then-reschedule, no stacking), so only one restore ever fires
//! per apply cycle. The scheduler tracks *when* to restore; the
//! orchestrator computes the baseline at restore time, because the speed
//! baseline is score-dependent and may have changed during the effect
//! window.

/// One active modifier per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectSlot {
    AppleMultiplier,
    TickInterval,
    ControlPolarity,
}

const SLOT_COUNT: usize = 3;

const ALL_SLOTS: [EffectSlot; SLOT_COUNT] = [
    EffectSlot::AppleMultiplier,
    EffectSlot::TickInterval,
    EffectSlot::ControlPolarity,
];

#[derive(Debug, Clone, Default)]
pub struct EffectScheduler {
    deadlines: [Option<u64>; SLOT_COUNT],
}

impl EffectScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn idx(slot: EffectSlot) -> usize {
        match slot {
            EffectSlot::AppleMultiplier => 0,
            EffectSlot::TickInterval => 1,
            EffectSlot::ControlPolarity => 2,
        }
    }

    /// Schedule (or reschedule) the slot's restore. A pending deadline
    /// for the same slot is overwritten.
    pub fn schedule(&mut self, slot: EffectSlot, now: u64, duration_ms: u64) {
        self.deadlines[Self::idx(slot)] = Some(now + duration_ms);
    }

    /// Drop the pending restore for one slot without firing it.
    pub fn cancel(&mut self, slot: EffectSlot) {
        self.deadlines[Self::idx(slot)] = None;
    }

    /// Drop all pending restores (mode restart, back to menu, game over).
    pub fn clear(&mut self) {
        self.deadlines = [None; SLOT_COUNT];
    }

    pub fn is_active(&self, slot: EffectSlot) -> bool {
        self.deadlines[Self::idx(slot)].is_some()
    }

    /// Slots whose deadline has passed, drained in slot order. Each
    /// expired slot fires exactly once.
    pub fn take_expired(&mut self, now: u64) -> Vec<EffectSlot> {
        let mut expired = Vec::new();
        for slot in ALL_SLOTS {
            let i = Self::idx(slot);
            if let Some(deadline) = self.deadlines[i]
                && deadline <= now
            {
                self.deadlines[i] = None;
                expired.push(slot);
            }
        }
        expired
    }
}
