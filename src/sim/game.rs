//! Game orchestrator
//!
//! Ties grid, snake, food, pickups, effects and timer into a fixed tick
//! cycle. The host drives `tick(now)` at `tick_interval_ms()` cadence;
//! speed changes take effect by the host re-reading the interval, so a
//! cadence change can never tear the cycle mid-step. Effect restores and
//! the timer are deadline-based on the same wall clock, independent of
//! the driver's identity.

use std::collections::HashSet;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{
    APPLE_BASE_POINTS, BOARD_HEIGHT, BOARD_WIDTH, CELL, MIN_SPEED_MS, SPEED_SCORE_STEP,
    SPEED_STEP_MS, START_COL, START_ROW,
};
use crate::highscores::ScoreStore;

use super::bonus::{BonusSpawner, Pickup, PickupEffect, PickupKind};
use super::effects::{EffectScheduler, EffectSlot};
use super::food::Food;
use super::grid::{Cell, Grid, occupancy};
use super::modes::{BoundaryPolicy, GameMode, LifePolicy, SpeedPolicy, TimerPolicy};
use super::snake::{Direction, Snake};
use super::timer::{TimeKeeper, TimerEvent};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No game running
    Menu,
    /// Active gameplay
    Running,
    /// Game frozen, timer accounting suspended
    Paused,
    /// Run ended
    GameOver,
}

/// Notable transitions, drained by the host after each tick. This is the
/// seam where audio and HUD shells hang.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    FoodEaten { points: u32 },
    PickupSpawned { kind: PickupKind },
    PickupCollected { kind: PickupKind },
    LifeLost { remaining: u32 },
    NewHighscore { score: u32 },
    TimerChanged { seconds: u32 },
    GameOver,
}

/// Mode-dependent time figure on the game-over screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInfo {
    /// Chrono: seconds played
    Elapsed(u32),
    /// Reverse timer: seconds left
    Remaining(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOverSummary {
    pub mode: GameMode,
    pub score: u32,
    pub highscore: u32,
    pub time: Option<TimeInfo>,
}

/// HUD numbers for the presentation shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub mode_title: &'static str,
    pub user: String,
    pub score: u32,
    pub highscore: u32,
    pub lives: Option<u32>,
    pub timer_secs: Option<u32>,
    pub interval_ms: u64,
    pub length: usize,
    pub apples: u32,
}

/// Render-relevant state, produced once per tick (including the tick
/// that ends the game, after the terminal transition).
#[derive(Debug, Clone)]
pub struct Frame {
    pub phase: GamePhase,
    pub segments: Vec<Cell>,
    pub heading: Direction,
    pub food: Cell,
    pub pickups: Vec<Pickup>,
    pub hud: Hud,
}

#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub cell: i32,
    pub seed: u64,
    /// Chance per eligible tick to attempt a pickup spawn
    pub pickup_spawn_chance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            cell: CELL,
            seed: 0,
            pickup_spawn_chance: crate::consts::PICKUP_SPAWN_CHANCE,
        }
    }
}

/// The single owner of all simulation state. All entry points (tick
/// driver, input events, menu actions) funnel through its methods, so no
/// other mutation can interleave with a running cycle.
pub struct Game<S: ScoreStore> {
    grid: Grid,
    start_cell: Cell,

    mode: GameMode,
    user: String,
    phase: GamePhase,

    score: u32,
    apples: u32,
    lives: u32,
    apple_multiplier: u32,
    interval_ms: u64,
    controls_reversed: bool,

    snake: Snake,
    food: Food,
    bonus: BonusSpawner,
    effects: EffectScheduler,
    timer: TimeKeeper,
    rng: Pcg32,

    scores: S,
    events: Vec<GameEvent>,
    summary: Option<GameOverSummary>,
}

impl<S: ScoreStore> Game<S> {
    pub fn new(config: GameConfig, scores: S) -> Self {
        let grid = Grid::new(config.width, config.height, config.cell);
        let start_cell = grid.cell_at(START_COL, START_ROW);
        Self {
            grid,
            start_cell,
            mode: GameMode::Classic,
            user: String::new(),
            phase: GamePhase::Menu,
            score: 0,
            apples: 0,
            lives: 0,
            apple_multiplier: 1,
            interval_ms: GameMode::Classic.spec().speed.base_ms(),
            controls_reversed: false,
            snake: Snake::new(start_cell, config.cell, Direction::Right),
            food: Food::new(),
            bonus: BonusSpawner::with_spawn_chance(config.pickup_spawn_chance),
            effects: EffectScheduler::new(),
            timer: TimeKeeper::new(),
            rng: Pcg32::seed_from_u64(config.seed),
            scores,
            events: Vec::new(),
            summary: None,
        }
    }

    /* ========== Lifecycle ========== */

    /// Start a run in the given mode. Resets all per-run state.
    pub fn start(&mut self, mode: GameMode, user: &str, now: u64) {
        let spec = mode.spec();
        self.mode = mode;
        self.user = user.to_string();

        self.score = 0;
        self.apples = 0;
        self.apple_multiplier = 1;
        self.controls_reversed = false;
        self.interval_ms = spec.speed.base_ms();
        self.lives = match spec.lives {
            LifePolicy::SingleLife => 1,
            LifePolicy::Lives(n) => n,
        };

        self.effects.clear();
        self.bonus.clear();
        self.snake.reset_to(self.start_cell, Direction::Right);

        self.timer.stop();
        match spec.timer {
            TimerPolicy::None => {}
            TimerPolicy::Countdown { start_secs } => self.timer.start_countdown(start_secs, now),
            TimerPolicy::Reverse { start_secs, .. } => self.timer.start_reverse(start_secs, now),
        }

        self.respawn_food();
        self.events.clear();
        self.summary = None;
        self.phase = GamePhase::Running;
        log::info!("starting {} for {user}", mode.key());
    }

    /// Replay the current mode with the current user.
    pub fn restart(&mut self, now: u64) {
        let mode = self.mode;
        let user = self.user.clone();
        self.start(mode, &user, now);
    }

    /// Back to the menu: stops the run, the timer and every pending
    /// restore, so nothing can fire into the next game.
    pub fn to_menu(&mut self) {
        self.phase = GamePhase::Menu;
        self.timer.stop();
        self.effects.clear();
        self.bonus.clear();
        self.controls_reversed = false;
        self.summary = None;
    }

    /// Pause / resume. No-op once the game is over.
    pub fn pause_toggle(&mut self, now: u64) {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                self.timer.set_paused(true, now);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                self.timer.set_paused(false, now);
            }
            _ => {}
        }
    }

    /* ========== Input ========== */

    /// One discrete directional command. Control inversion is applied
    /// here, before the snake's direction-lock and 180° checks.
    pub fn queue_direction(&mut self, dir: Direction) {
        if self.phase != GamePhase::Running {
            return;
        }
        let dir = if self.controls_reversed {
            dir.opposite()
        } else {
            dir
        };
        self.snake.set_direction(dir);
    }

    /* ========== Tick cycle ========== */

    /// Advance one simulation step. Returns the frame to render; a frame
    /// is produced even on the tick that ends the game.
    pub fn tick(&mut self, now: u64) -> Frame {
        if self.phase == GamePhase::Running {
            self.cycle(now);
            // Direction lock is released whatever path the cycle took,
            // so the next tick can always accept a new heading.
            self.snake.unlock_direction();
        }
        self.frame()
    }

    fn cycle(&mut self, now: u64) {
        // Timer driver (drift-corrected; cadence only affects latency)
        match self.timer.poll(now) {
            Some(TimerEvent::Changed(secs)) => {
                self.events.push(GameEvent::TimerChanged { seconds: secs });
            }
            Some(TimerEvent::Ended) => {
                self.game_over();
                return;
            }
            None => {}
        }

        // Expired effect restores. Baselines are recomputed here, at
        // restore time: the speed baseline is score-dependent and may
        // have moved during the effect window.
        for slot in self.effects.take_expired(now) {
            match slot {
                EffectSlot::AppleMultiplier => self.apple_multiplier = 1,
                EffectSlot::TickInterval => self.interval_ms = self.speed_law(),
                EffectSlot::ControlPolarity => self.controls_reversed = false,
            }
        }

        // 1. Pickup maintenance
        let occ = self.occupied_with_food();
        if let Some(kind) = self.bonus.tick(
            now,
            &self.grid,
            self.mode.spec().pickup_weights,
            self.food.pos(),
            &occ,
            &mut self.rng,
        ) {
            self.events.push(GameEvent::PickupSpawned { kind });
        }

        // 2. Move
        let prev_tail = self.snake.tail();
        self.snake.advance(false);

        // 3. Boundary resolution
        match self.mode.spec().boundary {
            BoundaryPolicy::Lethal => {
                if self
                    .snake
                    .is_out_of_bounds(self.grid.width, self.grid.height)
                {
                    self.game_over();
                    return;
                }
            }
            BoundaryPolicy::Wrap => self.snake.apply_wrap(self.grid.width, self.grid.height),
        }

        // 4. Self-collision
        if self.snake.hit_self() {
            match self.mode.spec().lives {
                LifePolicy::Lives(_) => {
                    self.lives -= 1;
                    self.events.push(GameEvent::LifeLost {
                        remaining: self.lives,
                    });
                    if self.lives == 0 {
                        self.game_over();
                        return;
                    }
                    self.soft_respawn();
                }
                LifePolicy::SingleLife => {
                    self.game_over();
                    return;
                }
            }
        }

        // 5. Food consumption
        if self.food.is_eaten_by(self.snake.head()) {
            let points = APPLE_BASE_POINTS * self.apple_multiplier;
            self.add_score(points as i64);
            self.apples += 1;
            self.events.push(GameEvent::FoodEaten { points });
            self.snake.push_tail(prev_tail);

            if let TimerPolicy::Reverse { bonus_secs, .. } = self.mode.spec().timer {
                match self.timer.add(bonus_secs, now) {
                    Some(TimerEvent::Changed(secs)) => {
                        self.events.push(GameEvent::TimerChanged { seconds: secs });
                    }
                    Some(TimerEvent::Ended) => {
                        self.game_over();
                        return;
                    }
                    None => {}
                }
            }

            if self.scores.save_if_highscore(self.mode, &self.user, self.score) {
                self.events.push(GameEvent::NewHighscore { score: self.score });
            }
            self.update_speed();
            self.respawn_food();
        }

        // 6. Pickup collision against the (possibly grown) head
        if let Some((kind, effect)) = self.bonus.apply_if_collision(self.snake.head()) {
            self.events.push(GameEvent::PickupCollected { kind });
            self.apply_pickup_effect(effect, now);
        }
    }

    fn apply_pickup_effect(&mut self, effect: PickupEffect, now: u64) {
        match effect {
            PickupEffect::Score(delta) => self.add_score(delta),
            PickupEffect::AppleMultiplier {
                factor,
                duration_ms,
            } => {
                self.apple_multiplier = factor;
                self.effects
                    .schedule(EffectSlot::AppleMultiplier, now, duration_ms);
            }
            PickupEffect::ScoreAndShrink { delta, segments } => {
                self.add_score(delta);
                self.snake.shrink(segments);
            }
            PickupEffect::Slow {
                floor_ms,
                duration_ms,
            } => {
                self.interval_ms = self.interval_ms.max(floor_ms);
                self.effects
                    .schedule(EffectSlot::TickInterval, now, duration_ms);
            }
            PickupEffect::ReverseControls { duration_ms } => {
                self.controls_reversed = true;
                self.effects
                    .schedule(EffectSlot::ControlPolarity, now, duration_ms);
            }
        }
    }

    /// Lives mode: reset the snake to its start cell and heading, clear
    /// control inversion, reposition the food. Score and pickups stay.
    fn soft_respawn(&mut self) {
        self.snake.reset_to(self.start_cell, Direction::Right);
        self.controls_reversed = false;
        self.effects.cancel(EffectSlot::ControlPolarity);
        self.respawn_food();
    }

    /// Idempotent terminal transition.
    fn game_over(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;

        let time = match self.mode.spec().timer {
            TimerPolicy::None => None,
            TimerPolicy::Countdown { start_secs } => {
                Some(TimeInfo::Elapsed(start_secs - self.timer.value()))
            }
            TimerPolicy::Reverse { .. } => Some(TimeInfo::Remaining(self.timer.value())),
        };
        self.timer.stop();
        self.effects.clear();

        if self.scores.save_if_highscore(self.mode, &self.user, self.score) {
            self.events.push(GameEvent::NewHighscore { score: self.score });
        }
        self.summary = Some(GameOverSummary {
            mode: self.mode,
            score: self.score,
            highscore: self.scores.get_highscore(self.mode, &self.user),
            time,
        });
        self.events.push(GameEvent::GameOver);
        log::info!(
            "game over: {} scored {} in {}",
            self.user,
            self.score,
            self.mode.key()
        );
    }

    /* ========== Core helpers ========== */

    fn occupied_with_food(&self) -> HashSet<Cell> {
        occupancy(
            self.snake
                .segments()
                .iter()
                .copied()
                .chain(std::iter::once(self.food.pos())),
        )
    }

    fn respawn_food(&mut self) {
        let occ = occupancy(
            self.snake
                .segments()
                .iter()
                .copied()
                .chain(self.bonus.positions()),
        );
        self.food.respawn(&self.grid, &occ, &mut self.rng);
    }

    fn add_score(&mut self, delta: i64) {
        self.score = (self.score as i64 + delta).max(0) as u32;
    }

    /// Score-derived tick interval; the baseline every interval restore
    /// lands on.
    fn speed_law(&self) -> u64 {
        match self.mode.spec().speed {
            SpeedPolicy::Fixed(ms) => ms,
            SpeedPolicy::Scaling { base_ms } => {
                let steps = (self.score / SPEED_SCORE_STEP) as u64;
                base_ms
                    .saturating_sub(steps * SPEED_STEP_MS)
                    .max(MIN_SPEED_MS)
            }
        }
    }

    fn update_speed(&mut self) {
        let next = self.speed_law();
        if next != self.interval_ms {
            log::debug!("tick interval {} -> {} ms", self.interval_ms, next);
            self.interval_ms = next;
        }
    }

    /* ========== Observers ========== */

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Current tick cadence. The host re-reads this after every tick;
    /// the speed law and slow effect change it here.
    pub fn tick_interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn summary(&self) -> Option<&GameOverSummary> {
        self.summary.as_ref()
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }

    /// Take all events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Render-relevant snapshot of the current state.
    pub fn frame(&self) -> Frame {
        let spec = self.mode.spec();
        Frame {
            phase: self.phase,
            segments: self.snake.segments().to_vec(),
            heading: self.snake.direction(),
            food: self.food.pos(),
            pickups: self.bonus.items().to_vec(),
            hud: Hud {
                mode_title: spec.title,
                user: self.user.clone(),
                score: self.score,
                highscore: self.scores.get_highscore(self.mode, &self.user),
                lives: match spec.lives {
                    LifePolicy::Lives(_) => Some(self.lives),
                    LifePolicy::SingleLife => None,
                },
                timer_secs: self.timer.is_running().then(|| self.timer.value()),
                interval_ms: self.interval_ms,
                length: self.snake.len(),
                apples: self.apples,
            },
        }
    }
}
