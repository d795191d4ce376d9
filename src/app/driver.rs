use crate::maze::{Grid, RandomSource, Step};

/// Outcome of one driver tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The grid advanced by one step.
    Stepped(Step),
    /// The maze is complete and waits for a reset trigger.
    ReadyToReset,
    /// The maze was complete and has been replaced by a fresh one.
    Reset,
}

/// Calls [`Grid::step`] once per tick until the maze is complete.
/// Holds no maze state of its own beyond counters for display.
pub struct Driver<R: RandomSource> {
    grid: Grid<R>,
    auto_reset: bool,
    /// Steps taken in the current generation
    steps: usize,
    /// Number of mazes started, including the current one
    generation: usize,
}

impl<R: RandomSource> Driver<R> {
    pub fn new(grid: Grid<R>, auto_reset: bool) -> Self {
        tracing::info!(
            "[driver] new {}x{} grid, auto reset: {}",
            grid.cols(),
            grid.rows(),
            auto_reset
        );
        Driver {
            grid,
            auto_reset,
            steps: 0,
            generation: 1,
        }
    }

    pub fn grid(&self) -> &Grid<R> {
        &self.grid
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.grid.is_finished()
    }

    pub fn tick(&mut self) -> Tick {
        if !self.grid.is_finished() {
            let step = self.grid.step();
            self.steps += 1;
            tracing::trace!("[driver] step {}: {:?}", self.steps, step);
            if self.grid.is_finished() {
                tracing::info!(
                    "[driver] generation {} finished after {} steps",
                    self.generation,
                    self.steps
                );
            }
            return Tick::Stepped(step);
        }

        if self.auto_reset {
            self.reset();
            Tick::Reset
        } else {
            Tick::ReadyToReset
        }
    }

    /// Replace the maze with a fresh one, whatever state it is in.
    pub fn reset(&mut self) {
        tracing::debug!(
            "[driver] reset during generation {} after {} steps (finished: {})",
            self.generation,
            self.steps,
            self.grid.is_finished()
        );
        self.grid.reset();
        self.steps = 0;
        self.generation += 1;
    }

    /// Tick until the maze is complete. Returns the number of steps taken.
    pub fn run_to_completion(&mut self) -> usize {
        while !self.grid.is_finished() {
            self.tick();
        }
        self.steps
    }
}
