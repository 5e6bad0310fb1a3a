//! Timed bonus/malus pickups
//!
//! The spawner owns the live pickups: it expires stale items, decides
//! spawn attempts per tick via a weighted draw from the mode's
//! probability table, and resolves head collisions into a typed effect
//! outcome. Current spawn policy: at most one live pickup at a time.

use std::collections::HashSet;

use rand::Rng;

use crate::consts::{PICKUP_NEAR_RADIUS, PICKUP_SPAWN_CHANCE, SLOW_FLOOR_MS};

use super::grid::{Cell, Grid};

/// Closed pickup catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    /// +50 points, instant
    Gold,
    /// Apple score x2 for a limited time
    Exp,
    /// -30 points and shrink by 1 segment, instant
    Malus,
    /// -50 points and shrink by 2 segments, instant
    Poison,
    /// Tick interval raised to a floor for a limited time
    Freeze,
    /// Directional mapping inverted for a limited time
    Reverse,
}

impl PickupKind {
    /// How long the item stays on the board before expiring (ms).
    pub fn lifetime_ms(self) -> u64 {
        5000
    }

    /// Duration of the applied effect (ms); 0 for instant effects.
    pub fn effect_ms(self) -> u64 {
        match self {
            PickupKind::Gold | PickupKind::Malus | PickupKind::Poison => 0,
            PickupKind::Exp | PickupKind::Reverse => 5000,
            PickupKind::Freeze => 4000,
        }
    }

    pub fn is_malus(self) -> bool {
        matches!(
            self,
            PickupKind::Malus | PickupKind::Poison | PickupKind::Freeze | PickupKind::Reverse
        )
    }

    /// Malus kinds ambush the player next to the food; bonuses spawn
    /// anywhere. A catalog attribute so extending the catalog cannot
    /// silently miss the placement policy.
    pub fn spawns_near_food(self) -> bool {
        self.is_malus()
    }

    pub fn label(self) -> &'static str {
        match self {
            PickupKind::Gold => "golden apple",
            PickupKind::Exp => "xp boost",
            PickupKind::Malus => "malus",
            PickupKind::Poison => "poison",
            PickupKind::Freeze => "freeze",
            PickupKind::Reverse => "reversed controls",
        }
    }

    /// The effect this kind dispatches on head collision.
    pub fn effect(self) -> PickupEffect {
        match self {
            PickupKind::Gold => PickupEffect::Score(50),
            PickupKind::Exp => PickupEffect::AppleMultiplier {
                factor: 2,
                duration_ms: self.effect_ms(),
            },
            PickupKind::Malus => PickupEffect::ScoreAndShrink {
                delta: -30,
                segments: 1,
            },
            PickupKind::Poison => PickupEffect::ScoreAndShrink {
                delta: -50,
                segments: 2,
            },
            PickupKind::Freeze => PickupEffect::Slow {
                floor_ms: SLOW_FLOOR_MS,
                duration_ms: self.effect_ms(),
            },
            PickupKind::Reverse => PickupEffect::ReverseControls {
                duration_ms: self.effect_ms(),
            },
        }
    }
}

/// Typed outcome of consuming a pickup. The orchestrator applies it;
/// the spawner never mutates game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupEffect {
    Score(i64),
    AppleMultiplier { factor: u32, duration_ms: u64 },
    ScoreAndShrink { delta: i64, segments: usize },
    Slow { floor_ms: u64, duration_ms: u64 },
    ReverseControls { duration_ms: u64 },
}

/// A live pickup on the board.
#[derive(Debug, Clone, Copy)]
pub struct Pickup {
    pub kind: PickupKind,
    pub pos: Cell,
    pub expires_at: u64,
}

/// Weighted draw over `(kind, weight)` pairs. Weights need not sum to 1;
/// each kind is picked with probability `weight / total`. A non-positive
/// total yields `None` (spawn attempt becomes a no-op). An exact
/// boundary hit falls through to the last entry, so ties break by
/// insertion order.
pub fn weighted_pick(weights: &[(PickupKind, f64)], rng: &mut impl Rng) -> Option<PickupKind> {
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return None;
    }
    let r = rng.random::<f64>() * total;
    let mut acc = 0.0;
    for &(kind, w) in weights {
        acc += w;
        if r < acc {
            return Some(kind);
        }
    }
    weights.last().map(|&(kind, _)| kind)
}

#[derive(Debug, Clone)]
pub struct BonusSpawner {
    items: Vec<Pickup>,
    spawn_chance: f64,
    near_radius: i32,
}

impl BonusSpawner {
    pub fn new() -> Self {
        Self::with_spawn_chance(PICKUP_SPAWN_CHANCE)
    }

    pub fn with_spawn_chance(spawn_chance: f64) -> Self {
        Self {
            items: Vec::new(),
            spawn_chance,
            near_radius: PICKUP_NEAR_RADIUS,
        }
    }

    pub fn items(&self) -> &[Pickup] {
        &self.items
    }

    /// Cells currently covered by pickups (kept out of food placement).
    pub fn positions(&self) -> impl Iterator<Item = Cell> + '_ {
        self.items.iter().map(|it| it.pos)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Per-tick maintenance: expire stale items, then maybe spawn one.
    /// Returns the kind spawned this tick, if any.
    pub fn tick(
        &mut self,
        now: u64,
        grid: &Grid,
        weights: &[(PickupKind, f64)],
        food_pos: Cell,
        occupied: &HashSet<Cell>,
        rng: &mut impl Rng,
    ) -> Option<PickupKind> {
        self.items.retain(|it| it.expires_at > now);

        // Single-pickup policy: no spawn while one is live
        if !self.items.is_empty() {
            return None;
        }
        if rng.random::<f64>() >= self.spawn_chance {
            return None;
        }
        let kind = weighted_pick(weights, rng)?;

        let pos = if kind.spawns_near_food() {
            self.random_near(grid, food_pos, occupied, rng)
        } else {
            self.random_free(grid, occupied, rng)
        };
        self.items.push(Pickup {
            kind,
            pos,
            expires_at: now + kind.lifetime_ms(),
        });
        log::debug!("spawned {} at {:?}", kind.label(), pos);
        Some(kind)
    }

    /// Linear scan for a pickup under `head`. On match the item is
    /// removed and its kind + effect returned; otherwise state is
    /// untouched. Collision always consumes the item, whether or not
    /// the effect ends up meaningful.
    pub fn apply_if_collision(&mut self, head: Cell) -> Option<(PickupKind, PickupEffect)> {
        let idx = self.items.iter().position(|it| it.pos == head)?;
        let kind = self.items.remove(idx).kind;
        Some((kind, kind.effect()))
    }

    fn random_free(&self, grid: &Grid, occupied: &HashSet<Cell>, rng: &mut impl Rng) -> Cell {
        // Saturated board: fall back to the center cell
        grid.random_free_cell(occupied, rng)
            .unwrap_or_else(|| grid.center())
    }

    fn random_near(
        &self,
        grid: &Grid,
        center: Cell,
        occupied: &HashSet<Cell>,
        rng: &mut impl Rng,
    ) -> Cell {
        let candidates: Vec<Cell> = grid
            .cells_within_radius(center, self.near_radius)
            .into_iter()
            .filter(|c| !occupied.contains(c))
            .collect();
        if candidates.is_empty() {
            return self.random_free(grid, occupied, rng);
        }
        candidates[rng.random_range(0..candidates.len())]
    }
}

impl Default for BonusSpawner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn grid() -> Grid {
        Grid::new(400, 400, 20)
    }

    const TEST_WEIGHTS: &[(PickupKind, f64)] = &[(PickupKind::Gold, 1.0)];

    fn spawn_one(spawner: &mut BonusSpawner, now: u64, rng: &mut impl Rng) {
        let g = grid();
        let occ = HashSet::new();
        // Spawn chance is 0.3 per tick; a handful of tries is plenty
        for _ in 0..200 {
            if spawner
                .tick(now, &g, TEST_WEIGHTS, Cell::new(200, 200), &occ, rng)
                .is_some()
            {
                return;
            }
        }
        panic!("no spawn in 200 attempts");
    }

    #[test]
    fn test_weighted_pick_distribution() {
        // Weights 1:3 should converge to a 25/75 split
        let weights = [(PickupKind::Gold, 1.0), (PickupKind::Freeze, 3.0)];
        let mut rng = Pcg32::seed_from_u64(99);
        let n = 10_000;
        let mut gold = 0;
        for _ in 0..n {
            if weighted_pick(&weights, &mut rng) == Some(PickupKind::Gold) {
                gold += 1;
            }
        }
        let freq = gold as f64 / n as f64;
        assert!((freq - 0.25).abs() < 0.02, "gold frequency {freq}");
    }

    #[test]
    fn test_weighted_pick_zero_total_is_none() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(weighted_pick(&[], &mut rng), None);
        assert_eq!(
            weighted_pick(&[(PickupKind::Gold, 0.0), (PickupKind::Exp, 0.0)], &mut rng),
            None
        );
    }

    #[test]
    fn test_single_pickup_policy() {
        let mut spawner = BonusSpawner::new();
        let mut rng = Pcg32::seed_from_u64(5);
        spawn_one(&mut spawner, 1000, &mut rng);
        assert_eq!(spawner.items().len(), 1);

        // While one is live, no further spawn can happen
        let g = grid();
        let occ = HashSet::new();
        for _ in 0..200 {
            let spawned = spawner.tick(2000, &g, TEST_WEIGHTS, Cell::new(200, 200), &occ, &mut rng);
            assert_eq!(spawned, None);
        }
        assert_eq!(spawner.items().len(), 1);
    }

    #[test]
    fn test_expiry_drops_stale_items() {
        let mut spawner = BonusSpawner::new();
        let mut rng = Pcg32::seed_from_u64(5);
        spawn_one(&mut spawner, 1000, &mut rng);
        let expires_at = spawner.items()[0].expires_at;
        assert_eq!(expires_at, 1000 + 5000);

        // Not expired one ms before the deadline
        let g = grid();
        let occ = HashSet::new();
        spawner.tick(expires_at - 1, &g, &[], Cell::new(0, 0), &occ, &mut rng);
        assert_eq!(spawner.items().len(), 1);

        // expires_at <= now drops it
        spawner.tick(expires_at, &g, &[], Cell::new(0, 0), &occ, &mut rng);
        assert!(spawner.items().is_empty());
    }

    #[test]
    fn test_near_food_placement_for_malus_kinds() {
        let g = grid();
        let mut rng = Pcg32::seed_from_u64(11);
        let food = Cell::new(200, 200);
        let weights = [(PickupKind::Freeze, 1.0)];
        let occ = HashSet::new();

        let mut spawner = BonusSpawner::new();
        for tick_no in 0..200u64 {
            if spawner
                .tick(tick_no * 100, &g, &weights, food, &occ, &mut rng)
                .is_some()
            {
                let it = spawner.items()[0];
                assert!((it.pos.x - food.x).abs() <= 3 * 20);
                assert!((it.pos.y - food.y).abs() <= 3 * 20);
                spawner.clear();
            }
        }
    }

    #[test]
    fn test_spawn_falls_back_to_center_on_saturated_board() {
        let g = grid();
        let mut rng = Pcg32::seed_from_u64(3);
        let all: HashSet<Cell> = (0..g.cols())
            .flat_map(|c| (0..g.rows()).map(move |r| g.cell_at(c, r)))
            .collect();

        // Anywhere-placement kind: free-cell sampling exhausts, center wins
        let mut spawner = BonusSpawner::with_spawn_chance(1.0);
        let spawned = spawner.tick(1000, &g, TEST_WEIGHTS, Cell::new(200, 200), &all, &mut rng);
        assert_eq!(spawned, Some(PickupKind::Gold));
        assert_eq!(spawner.items()[0].pos, g.center());

        // Near-food kind: every radius candidate occupied, same fallback
        let weights = [(PickupKind::Freeze, 1.0)];
        let mut spawner = BonusSpawner::with_spawn_chance(1.0);
        let spawned = spawner.tick(1000, &g, &weights, Cell::new(200, 200), &all, &mut rng);
        assert_eq!(spawned, Some(PickupKind::Freeze));
        assert_eq!(spawner.items()[0].pos, g.center());
    }

    #[test]
    fn test_collision_consumes_and_returns_effect() {
        let mut spawner = BonusSpawner::new();
        let mut rng = Pcg32::seed_from_u64(5);
        spawn_one(&mut spawner, 1000, &mut rng);
        let pos = spawner.items()[0].pos;

        assert_eq!(spawner.apply_if_collision(Cell::new(-20, -20)), None);
        assert_eq!(spawner.items().len(), 1);

        assert_eq!(
            spawner.apply_if_collision(pos),
            Some((PickupKind::Gold, PickupEffect::Score(50)))
        );
        assert!(spawner.items().is_empty());
        assert_eq!(spawner.apply_if_collision(pos), None);
    }

    #[test]
    fn test_effect_table() {
        assert_eq!(PickupKind::Gold.effect(), PickupEffect::Score(50));
        assert_eq!(
            PickupKind::Exp.effect(),
            PickupEffect::AppleMultiplier {
                factor: 2,
                duration_ms: 5000
            }
        );
        assert_eq!(
            PickupKind::Malus.effect(),
            PickupEffect::ScoreAndShrink {
                delta: -30,
                segments: 1
            }
        );
        assert_eq!(
            PickupKind::Poison.effect(),
            PickupEffect::ScoreAndShrink {
                delta: -50,
                segments: 2
            }
        );
        assert_eq!(
            PickupKind::Freeze.effect(),
            PickupEffect::Slow {
                floor_ms: 200,
                duration_ms: 4000
            }
        );
        assert_eq!(
            PickupKind::Reverse.effect(),
            PickupEffect::ReverseControls { duration_ms: 5000 }
        );
    }
}
