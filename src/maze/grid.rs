use rand::rngs::StdRng;

use super::cell::{Cell, Direction};
use super::random::RandomSource;

/// What a single call to [`Grid::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A passage was carved from the frontier cell `from` into the unvisited cell `to`,
    /// which becomes the new tail of the carving path.
    Carved { from: (u16, u16), to: (u16, u16) },
    /// `from` had no unvisited neighbors and was dropped from the carving path.
    Backtracked { from: (u16, u16) },
    /// The grid was already finished; nothing changed.
    Idle,
}

impl Step {
    /// The cell to highlight as the active frontier for this tick, if any.
    pub fn frontier(&self) -> Option<(u16, u16)> {
        match *self {
            Step::Carved { from, .. } | Step::Backtracked { from } => Some(from),
            Step::Idle => None,
        }
    }
}

/// Rectangular grid of cells carved into a perfect maze by a randomized
/// depth-first backtracker, one step at a time.
///
/// Cells are stored column-major (`index = col * rows + row`). The carving path
/// is a stack of indices into that array, starting at `(0, 0)`.
pub struct Grid<R: RandomSource = StdRng> {
    cells: Box<[Cell]>,
    cols: u16,
    rows: u16,
    stack: Vec<usize>,
    finished: bool,
    rng: R,
}

impl<R: RandomSource> Grid<R> {
    /// Creates a grid of `cols x rows` closed cells, seeded with the start cell.
    ///
    /// # Panics
    /// If `cols` or `rows` is zero.
    pub fn new(cols: u16, rows: u16, rng: R) -> Self {
        if cols == 0 || rows == 0 {
            panic!("Grid dimensions must be at least 1x1, got {}x{}", cols, rows);
        }
        let mut grid = Grid {
            cells: Box::default(),
            cols,
            rows,
            stack: Vec::with_capacity(cols as usize * rows as usize),
            finished: false,
            rng,
        };
        grid.reset();
        grid
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false, a grid holds at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// All cells in column-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The current carving path, from the start cell to the frontier, as cell indices.
    pub fn path(&self) -> &[usize] {
        &self.stack
    }

    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_visited()).count()
    }

    pub fn is_in_bounds(&self, coord: (u16, u16)) -> bool {
        coord.0 < self.cols && coord.1 < self.rows
    }

    /// Index of `coord` in [`Grid::cells`], or `None` if it is out of bounds.
    pub fn index_of(&self, coord: (u16, u16)) -> Option<usize> {
        self.is_in_bounds(coord).then(|| self.ravel_index(coord.0, coord.1))
    }

    pub fn cell(&self, coord: (u16, u16)) -> Option<&Cell> {
        self.index_of(coord).map(|idx| &self.cells[idx])
    }

    /// Whether a wall stands between two grid-adjacent cells.
    /// Returns `None` if the cells are out of bounds or not adjacent.
    pub fn has_wall_between(&self, a: (u16, u16), b: (u16, u16)) -> Option<bool> {
        let direction = direction_towards(a, b)?;
        self.index_of(b)?;
        Some(self.cell(a)?.walls().get(direction))
    }

    /// Throws away the current maze and starts a new one from `(0, 0)`.
    pub fn reset(&mut self) {
        let rows = self.rows;
        self.cells = (0..self.cols)
            .flat_map(|col| (0..rows).map(move |row| Cell::new(col, row)))
            .collect();
        self.stack.clear();
        self.cells[0].mark_visited();
        self.stack.push(0);
        self.finished = false;
    }

    /// Advances the carver by one move.
    ///
    /// Pops the frontier cell; if it has unvisited neighbors, one is picked at
    /// random, the wall between them is removed, and both are pushed back so the
    /// path continues from the neighbor. Otherwise the path retreats by one cell.
    /// The call that empties the path marks the grid finished, after which every
    /// call is a no-op returning [`Step::Idle`].
    pub fn step(&mut self) -> Step {
        let Some(current) = self.stack.pop() else {
            self.finished = true;
            return Step::Idle;
        };
        let from = self.cells[current].coord();

        let unvisited = self
            .neighbors(current)
            .filter(|&idx| !self.cells[idx].is_visited())
            .collect::<Vec<_>>();

        let step = if unvisited.is_empty() {
            Step::Backtracked { from }
        } else {
            let next = unvisited[self.rng.choose(unvisited.len())];
            self.stack.push(current);
            self.remove_walls_between(current, next);
            self.cells[next].mark_visited();
            self.stack.push(next);
            Step::Carved {
                from,
                to: self.cells[next].coord(),
            }
        };

        if self.stack.is_empty() {
            self.finished = true;
        }
        step
    }

    fn ravel_index(&self, col: u16, row: u16) -> usize {
        col as usize * self.rows as usize + row as usize
    }

    /// Indices of the in-bounds neighbors of the cell at `idx`, in
    /// top, right, bottom, left order.
    fn neighbors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let (col, row) = self.cells[idx].coord();
        Direction::ALL.into_iter().filter_map(move |direction| {
            let coord = match direction {
                Direction::Top => (col, row.checked_sub(1)?),
                Direction::Right => (col.checked_add(1)?, row),
                Direction::Bottom => (col, row.checked_add(1)?),
                Direction::Left => (col.checked_sub(1)?, row),
            };
            self.index_of(coord)
        })
    }

    /// Clears the wall shared by two adjacent cells on both sides.
    fn remove_walls_between(&mut self, a: usize, b: usize) {
        let (a_coord, b_coord) = (self.cells[a].coord(), self.cells[b].coord());
        let Some(direction) = direction_towards(a_coord, b_coord) else {
            unreachable!("cells {:?} and {:?} are not adjacent", a_coord, b_coord);
        };
        self.cells[a].remove_wall(direction);
        self.cells[b].remove_wall(direction.opposite());
    }
}

/// Side of `a` that faces `b`, if the two are grid-adjacent.
fn direction_towards(a: (u16, u16), b: (u16, u16)) -> Option<Direction> {
    let di = a.0 as i32 - b.0 as i32;
    let dj = a.1 as i32 - b.1 as i32;
    match (di, dj) {
        (1, 0) => Some(Direction::Left),
        (-1, 0) => Some(Direction::Right),
        (0, 1) => Some(Direction::Top),
        (0, -1) => Some(Direction::Bottom),
        _ => None,
    }
}

impl<R: RandomSource> std::ops::Index<(u16, u16)> for Grid<R> {
    type Output = Cell;

    fn index(&self, index: (u16, u16)) -> &Self::Output {
        debug_assert!(
            self.is_in_bounds(index),
            "cell {:?} is outside a {}x{} grid",
            index,
            self.cols,
            self.rows
        );
        &self.cells[self.ravel_index(index.0, index.1)]
    }
}
