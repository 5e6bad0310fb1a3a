//! Grid coordinates and occupancy queries
//!
//! Cells are pixel coordinates snapped to multiples of the cell size,
//! matching how every other component addresses the board.

use std::collections::HashSet;

use rand::Rng;

/// A board cell. Coordinates are pixel positions, always multiples of the
/// grid cell size; equality is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Board geometry and cell sampling.
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub cell: i32,
}

impl Grid {
    pub const fn new(width: i32, height: i32, cell: i32) -> Self {
        Self {
            width,
            height,
            cell,
        }
    }

    pub fn cols(&self) -> i32 {
        self.width / self.cell
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell
    }

    /// Cell at the given grid coordinates (col, row).
    pub fn cell_at(&self, col: i32, row: i32) -> Cell {
        Cell::new(col * self.cell, row * self.cell)
    }

    /// Center cell, used as the spawn fallback on a saturated board.
    pub fn center(&self) -> Cell {
        self.cell_at(self.cols() / 2, self.rows() / 2)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// Uniformly random cell anywhere on the board.
    pub fn random_cell(&self, rng: &mut impl Rng) -> Cell {
        let col = rng.random_range(0..self.cols());
        let row = rng.random_range(0..self.rows());
        self.cell_at(col, row)
    }

    /// Sampling budget for free-cell searches. Bounded so a saturated
    /// board degrades instead of looping forever.
    pub fn max_sample_attempts(&self) -> u32 {
        200.max(self.cols() * self.rows()) as u32
    }

    /// Uniformly random cell absent from `occupied`, or `None` once the
    /// attempt budget is exhausted.
    pub fn random_free_cell(&self, occupied: &HashSet<Cell>, rng: &mut impl Rng) -> Option<Cell> {
        for _ in 0..self.max_sample_attempts() {
            let c = self.random_cell(rng);
            if !occupied.contains(&c) {
                return Some(c);
            }
        }
        None
    }

    /// All on-board cells within a square radius (in cells) of `center`,
    /// including `center` itself.
    pub fn cells_within_radius(&self, center: Cell, radius: i32) -> Vec<Cell> {
        let mut cells = Vec::new();
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                let c = Cell::new(center.x + dx * self.cell, center.y + dy * self.cell);
                if self.contains(c) {
                    cells.push(c);
                }
            }
        }
        cells
    }
}

/// Collect an occupancy set for membership tests.
pub fn occupancy(cells: impl IntoIterator<Item = Cell>) -> HashSet<Cell> {
    cells.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn grid() -> Grid {
        Grid::new(400, 400, 20)
    }

    #[test]
    fn test_dimensions() {
        let g = grid();
        assert_eq!(g.cols(), 20);
        assert_eq!(g.rows(), 20);
        assert_eq!(g.center(), Cell::new(200, 200));
    }

    #[test]
    fn test_random_free_cell_avoids_occupied() {
        let g = grid();
        let mut rng = Pcg32::seed_from_u64(7);
        let occ = occupancy([Cell::new(0, 0), Cell::new(20, 0)]);
        for _ in 0..100 {
            let c = g.random_free_cell(&occ, &mut rng).unwrap();
            assert!(!occ.contains(&c));
            assert!(g.contains(c));
        }
    }

    #[test]
    fn test_random_free_cell_exhausts_on_full_board() {
        let g = grid();
        let mut rng = Pcg32::seed_from_u64(7);
        let all: HashSet<Cell> = (0..g.cols())
            .flat_map(|c| (0..g.rows()).map(move |r| g.cell_at(c, r)))
            .collect();
        assert_eq!(g.random_free_cell(&all, &mut rng), None);
    }

    #[test]
    fn test_cells_within_radius_clips_to_board() {
        let g = grid();
        // Corner: only the inward quadrant survives clipping
        let cells = g.cells_within_radius(Cell::new(0, 0), 1);
        assert_eq!(cells.len(), 4);
        assert!(cells.iter().all(|c| g.contains(*c)));

        // Interior: full square
        let cells = g.cells_within_radius(Cell::new(200, 200), 3);
        assert_eq!(cells.len(), 49);
    }

    proptest! {
        #[test]
        fn prop_random_cell_on_board(seed in 0u64..1000) {
            let g = grid();
            let mut rng = Pcg32::seed_from_u64(seed);
            let c = g.random_cell(&mut rng);
            prop_assert!(g.contains(c));
            prop_assert_eq!(c.x % g.cell, 0);
            prop_assert_eq!(c.y % g.cell, 0);
        }
    }
}
