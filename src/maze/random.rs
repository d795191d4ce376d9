use rand::{Rng, SeedableRng, rngs::StdRng};

/// Source of the one random decision the carver makes: which unvisited
/// neighbor to move into next.
pub trait RandomSource {
    /// Returns an index uniformly distributed in `0..len`. `len` is never zero.
    fn choose(&mut self, len: usize) -> usize;
}

impl RandomSource for StdRng {
    fn choose(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Get a random number generator, optionally seeded for reproducibility.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Replays a fixed list of choices, clamped into range. Falls back to the first
/// candidate once the script runs out.
#[cfg(test)]
pub(crate) struct ScriptedSource {
    choices: std::collections::VecDeque<usize>,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(choices: impl IntoIterator<Item = usize>) -> Self {
        ScriptedSource {
            choices: choices.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedSource {
    fn choose(&mut self, len: usize) -> usize {
        self.choices.pop_front().map_or(0, |c| c.min(len - 1))
    }
}
