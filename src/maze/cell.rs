/// One side of a cell. `ALL` lists them in the fixed enumeration order used when
/// collecting neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Right => Direction::Left,
            Direction::Bottom => Direction::Top,
            Direction::Left => Direction::Right,
        }
    }

    fn index(self) -> usize {
        match self {
            Direction::Top => 0,
            Direction::Right => 1,
            Direction::Bottom => 2,
            Direction::Left => 3,
        }
    }
}

/// Wall flags of a cell, `true` meaning the wall is standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls([bool; 4]);

impl Default for Walls {
    fn default() -> Self {
        Walls([true; 4])
    }
}

impl Walls {
    pub fn get(&self, direction: Direction) -> bool {
        self.0[direction.index()]
    }

    pub fn top(&self) -> bool {
        self.get(Direction::Top)
    }

    pub fn right(&self) -> bool {
        self.get(Direction::Right)
    }

    pub fn bottom(&self) -> bool {
        self.get(Direction::Bottom)
    }

    pub fn left(&self) -> bool {
        self.get(Direction::Left)
    }

    /// Whether all four walls are still standing.
    pub fn is_closed(&self) -> bool {
        self.0.iter().all(|&w| w)
    }
}

/// A single unit of the maze grid.
///
/// Cells are only created by [`Grid`](super::Grid), which also guarantees that
/// a wall shared by two neighbors is always removed from both sides at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    col: u16,
    row: u16,
    walls: Walls,
    visited: bool,
}

impl Cell {
    pub(crate) fn new(col: u16, row: u16) -> Self {
        Cell {
            col,
            row,
            walls: Walls::default(),
            visited: false,
        }
    }

    /// Coordinates of the cell as `(col, row)`.
    pub fn coord(&self) -> (u16, u16) {
        (self.col, self.row)
    }

    pub fn walls(&self) -> Walls {
        self.walls
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn mark_visited(&mut self) {
        self.visited = true;
    }

    pub fn remove_wall(&mut self, direction: Direction) {
        self.walls.0[direction.index()] = false;
    }
}
