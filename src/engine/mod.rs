mod next;
mod stats;
mod store;
mod window;

use self::next::NextGen;
pub use self::{stats::Statistics, store::CellStore, window::Viewport};
use crate::{
    enc::{Pattern, PatternCodec, RunLengthEncoded},
    error::Result,
    pos::{Pos2, Size2},
    rule::RuleSet,
};

/// A Life-like automaton on a fixed-size grid
///
/// The engine is synchronous: every call runs to completion, and stepping
/// continuously is up to the caller calling [`Engine::advance`] repeatedly.
/// Callers sharing an engine between threads must serialize access.
#[derive(Debug, Clone)]
pub struct Engine {
    store: CellStore,
    rules: RuleSet,
    stats: Statistics,
}

impl Engine {
    /// Creates an empty `width` x `height` grid running Conway's rules
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            store: CellStore::new(Size2::new(width, height)),
            rules: RuleSet::conway(),
            stats: Statistics::default(),
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    #[inline]
    pub fn size(&self) -> Size2 {
        self.store.size()
    }
    #[inline]
    pub fn store(&self) -> &CellStore {
        &self.store
    }
    #[inline]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    fn observe(&mut self) {
        self.stats.observe(self.store.living_count());
    }

    pub fn set_cell(&mut self, pos: Pos2) -> Result<()> {
        self.store.set_cell(pos)?;
        self.observe();
        Ok(())
    }

    pub fn kill_cell(&mut self, pos: Pos2) -> Result<()> {
        self.store.kill_cell(pos)?;
        self.observe();
        Ok(())
    }

    /// Flips a single cell, returning its new state
    pub fn toggle_cell(&mut self, pos: Pos2) -> Result<bool> {
        let alive = self.store.toggle_cell(pos)?;
        self.observe();
        Ok(alive)
    }

    #[inline]
    pub fn is_alive(&self, pos: Pos2) -> bool {
        self.store.is_alive(pos)
    }

    #[inline]
    pub fn live_neighbor_count(&self, pos: Pos2) -> u8 {
        self.store.live_neighbor_count(pos)
    }

    /// Live cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Pos2> + '_ {
        self.store.iter()
    }

    /// Replaces every cell, dropping the ones outside of the grid
    ///
    /// Returns the number of dropped cells.
    pub fn set_cells<I: IntoIterator<Item = Pos2>>(&mut self, cells: I) -> usize {
        let dropped = self.store.set_all(cells);
        self.observe();
        dropped
    }

    /// Computes the next generation
    pub fn advance(&mut self) {
        let next = NextGen::new(&self.store, &self.rules);
        let next = CellStore::from_cells(self.store.size(), next);
        self.replace_generation(next);
    }

    /// Computes the next generation across the rayon thread pool
    ///
    /// Produces the same generation as [`Engine::advance`].
    pub fn advance_parallel(&mut self) {
        let next = next::next_gen_parallel(&self.store, &self.rules, rayon::current_num_threads());
        let next = CellStore::from_cells(self.store.size(), next);
        self.replace_generation(next);
    }

    fn replace_generation(&mut self, next: CellStore) {
        self.store = next;
        self.stats.advance(self.store.living_count());
        tracing::debug!(
            generation = self.stats.generation,
            living = self.stats.living,
            "advanced generation"
        );
    }

    /// Kills every cell and returns to generation 0
    pub fn reset(&mut self) {
        self.store.clear();
        self.stats = Statistics::default();
        tracing::info!("engine reset");
    }

    /// Kills every cell, keeping the generation count and statistics history
    pub fn clear(&mut self) {
        self.store.clear();
        self.observe();
    }

    /// Snapshots the live-cell count as the start of a run
    ///
    /// Only meaningful at generation 0, deciding when a run starts is up to
    /// the caller.
    pub fn record_run_start(&mut self) {
        self.stats.record_run_start();
    }

    /// Parses and applies new rules, keeping the current ones on failure
    pub fn set_rules(&mut self, rule: &str) -> Result<()> {
        match RuleSet::parse(rule) {
            Ok(rules) => {
                self.set_rule_set(rules);
                Ok(())
            }
            Err(err) => {
                tracing::warn!("keeping {} rules: {}", self.rules, err);
                Err(err)
            }
        }
    }

    pub fn set_rule_set(&mut self, rules: RuleSet) {
        tracing::info!("rules changed from {} to {}", self.rules, rules);
        self.rules = rules;
    }

    /// Replaces the grid with a decoded pattern and returns to generation 0
    ///
    /// An embedded rule replaces the current one; cells outside the grid are
    /// dropped.
    pub fn load_pattern(&mut self, pattern: &Pattern) {
        if let Some(rules) = pattern.rule {
            self.set_rule_set(rules);
        }
        self.stats = Statistics::default();
        let dropped = self.set_cells(pattern.cells.iter().copied());
        tracing::info!(
            name = pattern.name.as_deref().unwrap_or_default(),
            living = self.stats.living,
            dropped,
            "loaded pattern"
        );
    }

    /// Decodes `value` with `codec` and loads it, leaving the engine
    /// untouched on failure
    pub fn decode<C: PatternCodec>(&mut self, codec: &C, value: &str) -> Result<Pattern> {
        let pattern = codec.decode(value).inspect_err(|err| {
            tracing::warn!("rejected pattern: {}", err);
        })?;
        self.load_pattern(&pattern);
        Ok(pattern)
    }

    /// Loads an RLE pattern, see [`Engine::decode`]
    ///
    /// Runs reaching outside of the grid are clipped while decoding.
    pub fn read_pattern(&mut self, value: &str) -> Result<Pattern> {
        let codec = RunLengthEncoded::default().with_bounds(self.size());
        self.decode(&codec, value)
    }

    /// The current generation as a pattern, with the active rules embedded
    pub fn to_pattern(&self) -> Pattern {
        Pattern::from_cells(self.store.iter(), Some(self.rules))
    }

    pub fn encode<C: PatternCodec>(&self, codec: &C) -> String {
        codec.encode(&self.to_pattern())
    }

    /// The current generation as RLE text
    pub fn to_pattern_string(&self) -> String {
        self.encode(&RunLengthEncoded::default())
    }

    pub fn viewport(&self, top_left: Pos2, bottom_right: Pos2) -> Viewport<'_> {
        Viewport::new(&self.store, top_left, bottom_right)
    }

    #[inline]
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }
    #[inline]
    pub fn generation(&self) -> u64 {
        self.stats.generation
    }
    #[inline]
    pub fn living(&self) -> usize {
        self.stats.living
    }
    #[inline]
    pub fn living_start(&self) -> usize {
        self.stats.living_start
    }
    #[inline]
    pub fn living_max(&self) -> usize {
        self.stats.living_max
    }
    #[inline]
    pub fn living_max_gen(&self) -> u64 {
        self.stats.living_max_gen
    }
}
