//! Snake Arena entry point
//!
//! Headless demo driver: runs a game with a greedy autopilot at the
//! simulation's own cadence and logs events as they happen. Useful for
//! exercising the simulation end to end without a presentation shell.
//!
//! Usage: snake-arena [--mode KEY] [--seed N] [--user NAME] [--ticks N]

use std::time::Instant;

use snake_arena::consts::CELL;
use snake_arena::highscores::{Leaderboard, ScoreStore};
use snake_arena::sim::{Cell, GameEvent, GameMode};
use snake_arena::{Direction, Frame, Game, GameConfig, GamePhase};

struct Args {
    mode: GameMode,
    seed: u64,
    user: String,
    max_ticks: u64,
}

fn parse_args() -> Args {
    let mut args = Args {
        mode: GameMode::Classic,
        seed: 0xC0FFEE,
        user: "demo".to_string(),
        max_ticks: 3000,
    };
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        match (flag.as_str(), it.next()) {
            ("--mode", Some(v)) => match GameMode::from_key(&v) {
                Some(m) => args.mode = m,
                None => {
                    let keys: Vec<&str> = GameMode::ALL.iter().map(|m| m.key()).collect();
                    log::warn!("unknown mode {:?}, expected one of {:?}", v, keys);
                }
            },
            ("--seed", Some(v)) => match v.parse() {
                Ok(n) => args.seed = n,
                Err(_) => log::warn!("invalid seed {:?}, using default", v),
            },
            ("--user", Some(v)) => args.user = v,
            ("--ticks", Some(v)) => match v.parse() {
                Ok(n) => args.max_ticks = n,
                Err(_) => log::warn!("invalid tick count {:?}, using default", v),
            },
            (other, _) => log::warn!("ignoring argument {:?}", other),
        }
    }
    args
}

/// Greedy steering: close the gap to the food on whichever axis is
/// longer, vetoing moves that would immediately end the run.
fn autopilot(frame: &Frame) -> Option<Direction> {
    let head = frame.segments[0];
    let food = frame.food;

    let mut prefs: Vec<Direction> = Vec::with_capacity(4);
    let (dx, dy) = (food.x - head.x, food.y - head.y);
    let horiz = if dx < 0 { Direction::Left } else { Direction::Right };
    let vert = if dy < 0 { Direction::Up } else { Direction::Down };
    if dx.abs() >= dy.abs() {
        prefs.extend([horiz, vert]);
    } else {
        prefs.extend([vert, horiz]);
    }
    for d in [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ] {
        if !prefs.contains(&d) {
            prefs.push(d);
        }
    }

    prefs
        .into_iter()
        .filter(|&d| d != frame.heading.opposite())
        .find(|&d| {
            let next = step(head, d);
            !frame.segments.contains(&next)
        })
}

fn step(c: Cell, d: Direction) -> Cell {
    match d {
        Direction::Up => Cell::new(c.x, c.y - CELL),
        Direction::Down => Cell::new(c.x, c.y + CELL),
        Direction::Left => Cell::new(c.x - CELL, c.y),
        Direction::Right => Cell::new(c.x + CELL, c.y),
    }
}

fn log_events(events: &[GameEvent]) {
    for ev in events {
        match ev {
            GameEvent::FoodEaten { points } => log::info!("ate food for {points} points"),
            GameEvent::PickupSpawned { kind } => log::debug!("pickup spawned: {}", kind.label()),
            GameEvent::PickupCollected { kind } => {
                log::info!("pickup collected: {}", kind.label())
            }
            GameEvent::LifeLost { remaining } => log::info!("life lost, {remaining} remaining"),
            GameEvent::NewHighscore { score } => log::info!("new highscore: {score}"),
            GameEvent::TimerChanged { seconds } => log::debug!("timer: {seconds}s"),
            GameEvent::GameOver => log::info!("game over"),
        }
    }
}

fn main() {
    env_logger::init();
    let args = parse_args();

    let scores = Leaderboard::load("highscores.json");
    let config = GameConfig {
        seed: args.seed,
        ..GameConfig::default()
    };
    let mut game = Game::new(config, scores);

    let epoch = Instant::now();
    game.start(args.mode, &args.user, 0);
    log::info!(
        "demo run: mode={} seed={} user={}",
        args.mode.key(),
        args.seed,
        args.user
    );

    let mut ticks = 0u64;
    loop {
        std::thread::sleep(std::time::Duration::from_millis(game.tick_interval_ms()));
        let now = epoch.elapsed().as_millis() as u64;

        let frame = game.frame();
        if let Some(dir) = autopilot(&frame) {
            game.queue_direction(dir);
        }

        let frame = game.tick(now);
        log_events(&game.drain_events());

        ticks += 1;
        if frame.phase == GamePhase::GameOver || ticks >= args.max_ticks {
            break;
        }
    }

    match game.summary() {
        Some(s) => println!(
            "{}: score {} (best {}) after {} ticks",
            args.mode.key(),
            s.score,
            s.highscore,
            ticks
        ),
        None => println!(
            "{}: score {} after {} ticks (run still going)",
            args.mode.key(),
            game.score(),
            ticks
        ),
    }

    println!("top scores ({}):", args.mode.key());
    for (user, score) in game.scores().top_n(args.mode, 5) {
        println!("  {user:<16} {score}");
    }
}
