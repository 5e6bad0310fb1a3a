//! Snake body, heading and movement
//!
//! The body is an ordered list of cells, head first. Self-overlap is a
//! query (`hit_self`), not a structural invariant: a post-move duplicate
//! head is the defeated condition, not corruption. None of these
//! operations error; invalid direction input is a silent no-op, which is
//! a UX debounce rather than a fault.

use super::grid::Cell;

/// Snake heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Snake {
    segments: Vec<Cell>,
    dir: Direction,
    cell: i32,
    /// One accepted heading change per tick; released by the orchestrator
    /// at the end of every cycle.
    direction_locked: bool,
}

impl Snake {
    pub fn new(start: Cell, cell: i32, dir: Direction) -> Self {
        Self {
            segments: vec![start],
            dir,
            cell,
            direction_locked: false,
        }
    }

    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    pub fn segments(&self) -> &[Cell] {
        &self.segments
    }

    /// Accepts `next` unless it reverses the current heading 180° or a
    /// change was already accepted this tick. Rejections are silent.
    pub fn set_direction(&mut self, next: Direction) {
        if self.direction_locked || next == self.dir.opposite() {
            return;
        }
        self.dir = next;
        self.direction_locked = true;
    }

    /// Re-allow a heading change. Called unconditionally at the end of
    /// each tick cycle, including ticks that end the game.
    pub fn unlock_direction(&mut self) {
        self.direction_locked = false;
    }

    /// Next head position for the current heading. Pure, no mutation.
    pub fn next_head(&self) -> Cell {
        let Cell { x, y } = self.head();
        match self.dir {
            Direction::Left => Cell::new(x - self.cell, y),
            Direction::Right => Cell::new(x + self.cell, y),
            Direction::Up => Cell::new(x, y - self.cell),
            Direction::Down => Cell::new(x, y + self.cell),
        }
    }

    /// Advance one cell: prepend the next head, drop the tail unless
    /// growing.
    pub fn advance(&mut self, grow: bool) {
        let nh = self.next_head();
        self.segments.insert(0, nh);
        if !grow {
            self.segments.pop();
        }
    }

    /// Current tail cell. The body always holds at least one segment.
    pub fn tail(&self) -> Cell {
        self.segments[self.segments.len() - 1]
    }

    /// Re-append a tail cell dropped by a non-growing advance. Food
    /// consumption grows the snake from the tail end, leaving the head
    /// where the advance put it.
    pub fn push_tail(&mut self, cell: Cell) {
        self.segments.push(cell);
    }

    /// Teleport the head to the opposite edge if it left the board.
    /// X and Y are substituted independently.
    pub fn apply_wrap(&mut self, width: i32, height: i32) {
        let h = &mut self.segments[0];
        if h.x < 0 {
            h.x = width - self.cell;
        } else if h.x >= width {
            h.x = 0;
        }
        if h.y < 0 {
            h.y = height - self.cell;
        } else if h.y >= height {
            h.y = 0;
        }
    }

    /// Head left the board (lethal-boundary modes only).
    pub fn is_out_of_bounds(&self, width: i32, height: i32) -> bool {
        let h = self.head();
        h.x < 0 || h.x >= width || h.y < 0 || h.y >= height
    }

    /// True iff the head overlaps any *other* segment.
    pub fn hit_self(&self) -> bool {
        let h = self.head();
        self.segments[1..].iter().any(|&s| s == h)
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }

    /// Remove up to `n` tail segments, never shrinking below one.
    pub fn shrink(&mut self, n: usize) {
        let removable = self.segments.len().saturating_sub(1).min(n);
        self.segments.truncate(self.segments.len() - removable);
    }

    /// Reset to a single segment at `start` with the given heading.
    pub fn reset_to(&mut self, start: Cell, dir: Direction) {
        self.segments.clear();
        self.segments.push(start);
        self.dir = dir;
        self.direction_locked = false;
    }
}
