//! Snake Arena - a grid-based snake arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, snake, food, pickups, modes, game loop)
//! - `highscores`: Per-mode, per-user score store with JSON persistence
//!
//! The simulation is pure and host-agnostic: randomness comes from a seeded
//! RNG, time comes in as millisecond timestamps, and rendering/audio hosts
//! consume the per-tick `Frame` snapshot and the drained `GameEvent`s.

pub mod highscores;
pub mod sim;

pub use highscores::{Leaderboard, ScoreStore};
pub use sim::{Direction, Frame, Game, GameConfig, GameMode, GamePhase};

/// Game configuration constants
pub mod consts {
    /// Size of one grid cell (px)
    pub const CELL: i32 = 20;
    /// Board dimensions (px), multiples of CELL
    pub const BOARD_WIDTH: i32 = 400;
    pub const BOARD_HEIGHT: i32 = 400;

    /// Base tick interval (ms)
    pub const DEFAULT_SPEED_MS: u64 = 100;
    /// Fixed tick interval for hardcore mode (ms)
    pub const HARDCORE_SPEED_MS: u64 = 70;
    /// Speed-law lower bound (ms)
    pub const MIN_SPEED_MS: u64 = 50;
    /// Slow-effect interval floor (ms), tunable
    pub const SLOW_FLOOR_MS: u64 = 200;

    /// Points per apple
    pub const APPLE_BASE_POINTS: u32 = 10;
    /// Score step that shortens the tick interval by SPEED_STEP_MS
    pub const SPEED_SCORE_STEP: u32 = 50;
    /// Interval reduction per speed step (ms)
    pub const SPEED_STEP_MS: u64 = 10;

    /// Chrono mode duration (s)
    pub const CHRONO_DURATION_SECS: u32 = 120;
    /// Reverse-timer mode starting value (s)
    pub const REVERSE_TIMER_DURATION_SECS: u32 = 60;
    /// Seconds gained per apple in reverse-timer mode
    pub const REVERSE_TIMER_BONUS_SECS: i64 = 5;

    /// Starting lives (lives mode)
    pub const START_LIVES: u32 = 3;

    /// Chance per eligible tick to attempt a pickup spawn
    pub const PICKUP_SPAWN_CHANCE: f64 = 0.3;
    /// Radius (cells) for near-food pickup placement
    pub const PICKUP_NEAR_RADIUS: i32 = 3;

    /// Snake spawn cell (in grid cells)
    pub const START_COL: i32 = 9;
    pub const START_ROW: i32 = 10;
}
