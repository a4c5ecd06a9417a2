//! Birth/survival rules for two-state Life-like automata.

use crate::error::{LifeError, Result};
use std::{fmt, str::FromStr};

/// One bit per neighbor count, bit `n` is set when `n` neighbors trigger the rule
type NeighborMask = u16;

const MAX_NEIGHBORS: u8 = 8;

/// A totalistic Moore-neighborhood rule, e.g. Conway's `B3/S23`
///
/// Rules are immutable once built; changing the rules of an engine replaces
/// the whole [`RuleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleSet {
    birth: NeighborMask,
    survival: NeighborMask,
}

impl RuleSet {
    /// Conway's Game of Life, `B3/S23`
    pub const CONWAY: RuleSet = RuleSet {
        birth: 0b0_0000_1000,
        survival: 0b0_0000_1100,
    };

    /// Builds a rule from neighbor counts, duplicates are ignored
    pub fn new(birth: &[u8], survival: &[u8]) -> Result<Self> {
        let mask = |counts: &[u8]| -> Result<NeighborMask> {
            counts.iter().try_fold(0, |acc, &n| {
                if n > MAX_NEIGHBORS {
                    return Err(LifeError::rule(
                        format!("{:?}/{:?}", birth, survival),
                        format!("neighbor count {} is outside of 0-8", n),
                    ));
                }
                Ok(acc | 1 << n)
            })
        };
        Ok(Self {
            birth: mask(birth)?,
            survival: mask(survival)?,
        })
    }

    #[inline]
    pub fn conway() -> Self {
        Self::CONWAY
    }

    /// Parses `B<digits>/S<digits>` or the bare-digit `<birth>/<survival>` form
    ///
    /// Surrounding whitespace is ignored and an empty string yields
    /// [`RuleSet::CONWAY`]. A group that is missing is an empty set.
    pub fn parse(rule: &str) -> Result<Self> {
        rule.parse()
    }

    /// Whether a cell is alive in the next generation
    #[inline]
    pub fn next_state(&self, is_alive: bool, live_neighbors: u8) -> bool {
        let mask = if is_alive { self.survival } else { self.birth };
        live_neighbors <= MAX_NEIGHBORS && mask >> live_neighbors & 1 != 0
    }

    /// Neighbor counts bringing a dead cell to life, ascending
    pub fn birth(&self) -> impl Iterator<Item = u8> {
        counts(self.birth)
    }
    /// Neighbor counts keeping a live cell alive, ascending
    pub fn survival(&self) -> impl Iterator<Item = u8> {
        counts(self.survival)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::CONWAY
    }
}

fn counts(mask: NeighborMask) -> impl Iterator<Item = u8> {
    (0..=MAX_NEIGHBORS).filter(move |&n| mask >> n & 1 != 0)
}

fn parse_counts(rule: &str, digits: &str) -> Result<NeighborMask> {
    digits.chars().try_fold(0, |mask, c| {
        let n = c
            .to_digit(10)
            .ok_or_else(|| LifeError::rule(rule, format!("unexpected {:?} in a count group", c)))?;
        if n > MAX_NEIGHBORS as u32 {
            return Err(LifeError::rule(
                rule,
                format!("neighbor count {} is outside of 0-8", n),
            ));
        }
        Ok(mask | 1 << n)
    })
}

impl FromStr for RuleSet {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self> {
        let rule = s.trim();
        if rule.is_empty() {
            return Ok(Self::CONWAY);
        }
        if let Some(c) = rule
            .chars()
            .find(|c| !matches!(c, 'B' | 'S' | 'b' | 's' | '0'..='9' | '/'))
        {
            return Err(LifeError::rule(rule, format!("unexpected character {:?}", c)));
        }

        let groups: Vec<&str> = rule.split('/').collect();
        if groups.len() > 2 {
            return Err(LifeError::rule(rule, "more than one '/'"));
        }

        if !rule.contains(|c: char| c.is_ascii_alphabetic()) {
            // bare digits, birth group first
            let birth = parse_counts(rule, groups[0])?;
            let survival = match groups.get(1) {
                Some(digits) => parse_counts(rule, digits)?,
                None => 0,
            };
            return Ok(Self { birth, survival });
        }

        let mut birth = None;
        let mut survival = None;
        for group in groups.into_iter().filter(|g| !g.is_empty()) {
            let mut chars = group.chars();
            let slot = match chars.next() {
                Some('B' | 'b') => &mut birth,
                Some('S' | 's') => &mut survival,
                _ => {
                    return Err(LifeError::rule(
                        rule,
                        format!("group {:?} does not start with B or S", group),
                    ));
                }
            };
            if slot.is_some() {
                return Err(LifeError::rule(rule, format!("group {:?} repeats", group)));
            }
            *slot = Some(parse_counts(rule, chars.as_str())?);
        }

        Ok(Self {
            birth: birth.unwrap_or(0),
            survival: survival.unwrap_or(0),
        })
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B")?;
        for n in self.birth() {
            write!(f, "{}", n)?;
        }
        write!(f, "/S")?;
        for n in self.survival() {
            write!(f, "{}", n)?;
        }
        Ok(())
    }
}
