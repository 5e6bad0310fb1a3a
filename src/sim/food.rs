//! Food placement and consumption
//!
//! One food instance per running game, repositioned on consumption.
//! Placement is best-effort: after the sampling budget is exhausted on a
//! saturated board, the food keeps its current position. Degraded but
//! defined, never a crash.

use std::collections::HashSet;

use rand::Rng;

use super::grid::{Cell, Grid};

#[derive(Debug, Clone)]
pub struct Food {
    pos: Cell,
}

impl Food {
    pub fn new() -> Self {
        Self {
            pos: Cell::default(),
        }
    }

    pub fn pos(&self) -> Cell {
        self.pos
    }

    /// Place the food at an exact cell (test scaffolding).
    #[cfg(test)]
    pub(crate) fn place_at(&mut self, cell: Cell) {
        self.pos = cell;
    }

    /// Move to a uniformly sampled cell absent from `occupied`. On
    /// exhaustion the current position is kept.
    pub fn respawn(&mut self, grid: &Grid, occupied: &HashSet<Cell>, rng: &mut impl Rng) -> Cell {
        if let Some(c) = grid.random_free_cell(occupied, rng) {
            self.pos = c;
        } else {
            log::debug!("food respawn exhausted sampling budget, keeping {:?}", self.pos);
        }
        self.pos
    }

    /// Move to a free cell within a square radius of `target`, falling
    /// back to a board-wide respawn when no candidate remains.
    pub fn respawn_near(
        &mut self,
        grid: &Grid,
        target: Cell,
        radius: i32,
        occupied: &HashSet<Cell>,
        rng: &mut impl Rng,
    ) -> Cell {
        let candidates: Vec<Cell> = grid
            .cells_within_radius(target, radius)
            .into_iter()
            .filter(|c| !occupied.contains(c))
            .collect();
        if candidates.is_empty() {
            return self.respawn(grid, occupied, rng);
        }
        self.pos = candidates[rng.random_range(0..candidates.len())];
        self.pos
    }

    /// Exact coordinate equality with the snake head.
    pub fn is_eaten_by(&self, head: Cell) -> bool {
        head == self.pos
    }
}

impl Default for Food {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::occupancy;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn grid() -> Grid {
        Grid::new(400, 400, 20)
    }

    #[test]
    fn test_respawn_avoids_occupied() {
        let g = grid();
        let mut rng = Pcg32::seed_from_u64(42);
        let occ = occupancy([Cell::new(200, 200), Cell::new(180, 200)]);
        let mut food = Food::new();
        for _ in 0..50 {
            let c = food.respawn(&g, &occ, &mut rng);
            assert!(!occ.contains(&c));
            assert!(g.contains(c));
        }
    }

    #[test]
    fn test_respawn_keeps_position_on_saturation() {
        let g = grid();
        let mut rng = Pcg32::seed_from_u64(42);
        let all: HashSet<Cell> = (0..g.cols())
            .flat_map(|c| (0..g.rows()).map(move |r| g.cell_at(c, r)))
            .collect();
        let mut food = Food::new();
        let before = food.pos();
        assert_eq!(food.respawn(&g, &all, &mut rng), before);
    }

    #[test]
    fn test_respawn_near_stays_in_radius() {
        let g = grid();
        let mut rng = Pcg32::seed_from_u64(42);
        let target = Cell::new(200, 200);
        let mut food = Food::new();
        for _ in 0..50 {
            let c = food.respawn_near(&g, target, 3, &HashSet::new(), &mut rng);
            assert!((c.x - target.x).abs() <= 3 * 20);
            assert!((c.y - target.y).abs() <= 3 * 20);
        }
    }

    #[test]
    fn test_respawn_near_falls_back_when_blocked() {
        let g = grid();
        let mut rng = Pcg32::seed_from_u64(42);
        let target = Cell::new(200, 200);
        // Occupy the whole radius-1 square around the target
        let occ: HashSet<Cell> = g.cells_within_radius(target, 1).into_iter().collect();
        let mut food = Food::new();
        let c = food.respawn_near(&g, target, 1, &occ, &mut rng);
        assert!(!occ.contains(&c));
        assert!(g.contains(c));
    }

    #[test]
    fn test_is_eaten_by() {
        let g = grid();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut food = Food::new();
        let c = food.respawn(&g, &HashSet::new(), &mut rng);
        assert!(food.is_eaten_by(c));
        assert!(!food.is_eaten_by(Cell::new(c.x + 20, c.y)));
    }
}
