pub mod cell;
pub mod grid;
pub mod random;

pub use cell::{Cell, Direction, Walls};
pub use grid::{Grid, Step};
pub use random::{RandomSource, seeded_rng};
