//! Core library for Life-like cellular automata on a bounded grid.

pub mod enc;
pub mod engine;
pub mod error;
pub mod pos;
pub mod rule;

pub use enc::{Pattern, PatternCodec, RunLengthEncoded};
pub use engine::{CellStore, Engine, Statistics, Viewport};
pub use error::{LifeError, Result};
pub use pos::{Pos2, Size2};
pub use rule::RuleSet;
