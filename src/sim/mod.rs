//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-driven only, time arrives as millisecond timestamps
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod bonus;
pub mod effects;
pub mod food;
pub mod game;
pub mod grid;
pub mod modes;
pub mod snake;
pub mod timer;

pub use bonus::{BonusSpawner, Pickup, PickupEffect, PickupKind, weighted_pick};
pub use effects::{EffectScheduler, EffectSlot};
pub use food::Food;
pub use game::{Frame, Game, GameConfig, GameEvent, GameOverSummary, GamePhase, Hud, TimeInfo};
pub use grid::{Cell, Grid, occupancy};
pub use modes::{BoundaryPolicy, GameMode, LifePolicy, ModeSpec, SpeedPolicy, TimerPolicy};
pub use snake::{Direction, Snake};
pub use timer::{TimeKeeper, TimerEvent, TimerMode};
