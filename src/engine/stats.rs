/// Running statistics of a simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Number of generations advanced since the last reset
    pub generation: u64,
    /// Live cells in the current generation
    pub living: usize,
    /// Live cells when the run was started
    pub living_start: usize,
    /// Highest live-cell count observed so far
    pub living_max: usize,
    /// First generation at which `living_max` was reached
    pub living_max_gen: u64,
}

impl Statistics {
    /// Records the live-cell count of the current generation
    ///
    /// Before the first advance the maximum follows the pattern being edited,
    /// afterwards it only grows and ties keep the earlier generation.
    pub(crate) fn observe(&mut self, living: usize) {
        self.living = living;
        if self.generation == 0 {
            self.living_max = living;
            self.living_max_gen = 0;
        } else if living > self.living_max {
            self.living_max = living;
            self.living_max_gen = self.generation;
        }
    }

    /// Moves to the next generation and records its live-cell count
    pub(crate) fn advance(&mut self, living: usize) {
        self.generation += 1;
        self.observe(living);
    }

    pub(crate) fn record_run_start(&mut self) {
        self.living_start = self.living;
    }
}

impl std::fmt::Display for Statistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "gens:{}, living:{} (start:{}, max:{} @ gen {})",
            self.generation, self.living, self.living_start, self.living_max, self.living_max_gen
        )
    }
}
