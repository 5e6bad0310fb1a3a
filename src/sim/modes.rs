//! Static game mode catalog
//!
//! Each mode bundles a boundary policy, speed policy, life policy, timer
//! policy and a pickup probability table. Consumed read-only by the game
//! orchestrator; menu shells read the titles and rule strings.

use serde::{Deserialize, Serialize};

use crate::consts::{
    CHRONO_DURATION_SECS, DEFAULT_SPEED_MS, HARDCORE_SPEED_MS, REVERSE_TIMER_BONUS_SECS,
    REVERSE_TIMER_DURATION_SECS, START_LIVES,
};

use super::bonus::PickupKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    Classic,
    Chrono,
    Lives,
    Hardcore,
    ReverseTimer,
}

/// What happens when the head leaves the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Teleport to the opposite edge
    Wrap,
    /// Leaving the board ends the game
    Lethal,
}

/// How the tick interval is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedPolicy {
    /// Score-driven speed law starting from `base_ms`
    Scaling { base_ms: u64 },
    /// Constant interval, no scaling
    Fixed(u64),
}

impl SpeedPolicy {
    pub fn base_ms(&self) -> u64 {
        match *self {
            SpeedPolicy::Scaling { base_ms } => base_ms,
            SpeedPolicy::Fixed(ms) => ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifePolicy {
    /// First self-collision ends the game
    SingleLife,
    /// N lives; self-collision soft-respawns until they run out
    Lives(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPolicy {
    None,
    /// Fixed time budget; game ends at zero
    Countdown { start_secs: u32 },
    /// Time drains but each apple adds seconds back
    Reverse { start_secs: u32, bonus_secs: i64 },
}

pub struct ModeSpec {
    pub title: &'static str,
    pub rules: &'static [&'static str],
    pub boundary: BoundaryPolicy,
    pub speed: SpeedPolicy,
    pub lives: LifePolicy,
    pub timer: TimerPolicy,
    pub pickup_weights: &'static [(PickupKind, f64)],
}

/// Shared table for classic/chrono/lives/reverse-timer.
const DEFAULT_WEIGHTS: &[(PickupKind, f64)] = &[
    (PickupKind::Gold, 0.10),
    (PickupKind::Exp, 0.25),
    (PickupKind::Malus, 0.25),
    (PickupKind::Freeze, 0.40),
];

/// Hardcore skews heavily toward malus kinds.
const HARDCORE_WEIGHTS: &[(PickupKind, f64)] = &[
    (PickupKind::Malus, 0.40),
    (PickupKind::Poison, 0.20),
    (PickupKind::Freeze, 0.15),
    (PickupKind::Reverse, 0.15),
    (PickupKind::Exp, 0.08),
    (PickupKind::Gold, 0.02),
];

static CLASSIC: ModeSpec = ModeSpec {
    title: "Classic",
    rules: &[
        "Each apple is worth 10 points",
        "Standard bonuses and maluses",
        "Any collision is fatal",
    ],
    boundary: BoundaryPolicy::Wrap,
    speed: SpeedPolicy::Scaling {
        base_ms: DEFAULT_SPEED_MS,
    },
    lives: LifePolicy::SingleLife,
    timer: TimerPolicy::None,
    pickup_weights: DEFAULT_WEIGHTS,
};

static CHRONO: ModeSpec = ModeSpec {
    title: "Chrono",
    rules: &[
        "120 seconds on the clock",
        "Each apple is worth 10 points",
        "Game ends when time runs out",
    ],
    boundary: BoundaryPolicy::Wrap,
    speed: SpeedPolicy::Scaling {
        base_ms: DEFAULT_SPEED_MS,
    },
    lives: LifePolicy::SingleLife,
    timer: TimerPolicy::Countdown {
        start_secs: CHRONO_DURATION_SECS,
    },
    pickup_weights: DEFAULT_WEIGHTS,
};

static LIVES: ModeSpec = ModeSpec {
    title: "Lives",
    rules: &[
        "3 lives available",
        "Each apple is worth 10 points",
        "Self-collision costs one life",
    ],
    boundary: BoundaryPolicy::Wrap,
    speed: SpeedPolicy::Scaling {
        base_ms: DEFAULT_SPEED_MS,
    },
    lives: LifePolicy::Lives(START_LIVES),
    timer: TimerPolicy::None,
    pickup_weights: DEFAULT_WEIGHTS,
};

static HARDCORE: ModeSpec = ModeSpec {
    title: "Hardcore",
    rules: &[
        "Faster fixed speed (70 ms)",
        "Board edges are lethal",
        "Rare bonuses, frequent maluses",
    ],
    boundary: BoundaryPolicy::Lethal,
    speed: SpeedPolicy::Fixed(HARDCORE_SPEED_MS),
    lives: LifePolicy::SingleLife,
    timer: TimerPolicy::None,
    pickup_weights: HARDCORE_WEIGHTS,
};

static REVERSE_TIMER: ModeSpec = ModeSpec {
    title: "Reverse Timer",
    rules: &[
        "60 seconds that keep draining",
        "Each apple is worth 10 points and +5 seconds",
        "Game ends when time runs out",
    ],
    boundary: BoundaryPolicy::Wrap,
    speed: SpeedPolicy::Scaling {
        base_ms: DEFAULT_SPEED_MS,
    },
    lives: LifePolicy::SingleLife,
    timer: TimerPolicy::Reverse {
        start_secs: REVERSE_TIMER_DURATION_SECS,
        bonus_secs: REVERSE_TIMER_BONUS_SECS,
    },
    pickup_weights: DEFAULT_WEIGHTS,
};

impl GameMode {
    pub const ALL: [GameMode; 5] = [
        GameMode::Classic,
        GameMode::Chrono,
        GameMode::Lives,
        GameMode::Hardcore,
        GameMode::ReverseTimer,
    ];

    pub fn spec(self) -> &'static ModeSpec {
        match self {
            GameMode::Classic => &CLASSIC,
            GameMode::Chrono => &CHRONO,
            GameMode::Lives => &LIVES,
            GameMode::Hardcore => &HARDCORE,
            GameMode::ReverseTimer => &REVERSE_TIMER,
        }
    }

    /// Stable identifier, also the leaderboard file key.
    pub fn key(self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Chrono => "chrono",
            GameMode::Lives => "lives",
            GameMode::Hardcore => "hardcore",
            GameMode::ReverseTimer => "reverse-timer",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "classic" => Some(GameMode::Classic),
            "chrono" => Some(GameMode::Chrono),
            "lives" => Some(GameMode::Lives),
            "hardcore" => Some(GameMode::Hardcore),
            "reverse-timer" => Some(GameMode::ReverseTimer),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for mode in GameMode::ALL {
            assert_eq!(GameMode::from_key(mode.key()), Some(mode));
        }
        assert_eq!(GameMode::from_key("bogus"), None);
    }

    #[test]
    fn test_mode_policies() {
        assert_eq!(GameMode::Classic.spec().boundary, BoundaryPolicy::Wrap);
        assert_eq!(GameMode::Hardcore.spec().boundary, BoundaryPolicy::Lethal);
        assert_eq!(GameMode::Hardcore.spec().speed, SpeedPolicy::Fixed(70));
        assert_eq!(GameMode::Lives.spec().lives, LifePolicy::Lives(3));
        assert_eq!(
            GameMode::Chrono.spec().timer,
            TimerPolicy::Countdown { start_secs: 120 }
        );
        assert_eq!(
            GameMode::ReverseTimer.spec().timer,
            TimerPolicy::Reverse {
                start_secs: 60,
                bonus_secs: 5
            }
        );
    }

    #[test]
    fn test_weight_tables_are_positive() {
        for mode in GameMode::ALL {
            let weights = mode.spec().pickup_weights;
            assert!(!weights.is_empty());
            let total: f64 = weights.iter().map(|(_, w)| w).sum();
            assert!(total > 0.0);
        }
    }
}
