//! Pattern interchange in the run-length encoded (RLE) text format.
//!
//! ```text
//! #N Glider
//! #C The smallest spaceship.
//! x = 3, y = 3, rule = B3/S23
//! bob$2bo$3o!
//! ```

use crate::{
    error::{LifeError, Result},
    pos::{Pos2, Size2},
    rule::RuleSet,
};
use regex::Regex;
use std::sync::OnceLock;

/// A decoded pattern, detached from any grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    /// The `#N` line
    pub name: Option<String>,
    /// `#C` lines, in order
    pub comments: Vec<String>,
    /// Declared width and height of the header, informational only
    pub width: i32,
    pub height: i32,
    /// Embedded rule, the header's `rule =` wins over a `#r` line
    pub rule: Option<RuleSet>,
    /// Live cells, row-major
    pub cells: Vec<Pos2>,
}

impl Pattern {
    /// Creates a pattern from live cells, sized to their bounding box
    pub fn from_cells<I: IntoIterator<Item = Pos2>>(cells: I, rule: Option<RuleSet>) -> Self {
        let mut cells: Vec<Pos2> = cells.into_iter().collect();
        cells.sort();
        cells.dedup();
        let (width, height) = match bounding_box(&cells) {
            Some((tl, br)) => (br.x - tl.x + 1, br.y - tl.y + 1),
            None => (0, 0),
        };
        Self {
            name: None,
            comments: Vec::new(),
            width,
            height,
            rule,
            cells,
        }
    }

    pub fn with_name<T: AsRef<str>>(mut self, name: T) -> Self {
        self.name = Some(name.as_ref().to_owned());
        self
    }
}

/// Inclusive corners of a row-major sorted list of cells
fn bounding_box(sorted: &[Pos2]) -> Option<(Pos2, Pos2)> {
    let top = sorted.first()?.y;
    let bottom = sorted.last()?.y;
    let left = sorted.iter().map(|p| p.x).min()?;
    let right = sorted.iter().map(|p| p.x).max()?;
    Some((Pos2::new(left, top), Pos2::new(right, bottom)))
}

fn overflow(line_no: usize) -> LifeError {
    LifeError::pattern(line_no, "pattern coordinates overflow")
}

/// `at + run`, failing instead of wrapping
fn checked_run(at: i32, run: i32, line_no: usize) -> Result<i32> {
    at.checked_add(run).ok_or_else(|| overflow(line_no))
}

/// `offset + cursor`, failing instead of wrapping
fn checked_pos(offset: Pos2, cursor: Pos2, line_no: usize) -> Result<Pos2> {
    match (offset.x.checked_add(cursor.x), offset.y.checked_add(cursor.y)) {
        (Some(x), Some(y)) => Ok(Pos2 { x, y }),
        _ => Err(overflow(line_no)),
    }
}

pub trait PatternCodec {
    fn encode(&self, pattern: &Pattern) -> String;
    fn decode(&self, value: &str) -> Result<Pattern>;
}

struct RunEncoder {
    sequence: String,
    line_len: usize,
    max_line_len: usize,
}
impl RunEncoder {
    fn new(max_line_len: usize) -> Self {
        Self {
            sequence: String::new(),
            line_len: 0,
            max_line_len,
        }
    }

    fn push_run(&mut self, run: i32, c: char) {
        let append = match run {
            n if n <= 0 => return,
            1 => c.to_string(),
            n => format!("{}{}", n, c),
        };
        if self.line_len > 0 && self.line_len + append.len() > self.max_line_len {
            self.sequence.push('\n');
            self.line_len = 0;
        }
        self.line_len += append.len();
        self.sequence.push_str(&append);
    }

    fn end(mut self) -> String {
        if self.line_len >= self.max_line_len {
            self.sequence.push('\n');
        }
        self.sequence.push('!');
        self.sequence
    }
}

/// Where the decoder is within the text
#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Body,
    Done,
}

/// The RLE codec, body lines are wrapped at 70 characters by default
pub struct RunLengthEncoded {
    max_line_len: usize,
    bounds: Option<Size2>,
}
impl RunLengthEncoded {
    pub fn set_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len.max(1);
        self
    }

    /// Only keeps decoded cells inside `bounds`, runs reaching past it are
    /// clipped instead of materialized
    pub fn with_bounds(mut self, bounds: Size2) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Appends the cells of a live run starting at `start`, clipped to the bounds
    fn push_live_run(&self, cells: &mut Vec<Pos2>, start: Pos2, run: i32) {
        let Some(bounds) = self.bounds else {
            cells.extend((0..run).map(|i| Pos2 { x: start.x + i, y: start.y }));
            return;
        };
        if !bounds.contains_y(start.y) {
            return;
        }
        let first = start.x.max(0);
        let last = (start.x as i64 + run as i64).min(bounds.width as i64) as i32;
        cells.extend((first..last).map(|x| Pos2 { x, y: start.y }));
    }

    fn header_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| {
            Regex::new(r"^x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)\s*(?:,\s*rule\s*=\s*(.*?))?\s*$")
                .expect("header regex is valid")
        })
    }
    fn token_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"(\d*)([bo$!])").expect("token regex is valid"))
    }

    fn encode_header(&self, pattern: &Pattern, bbox: Option<(Pos2, Pos2)>) -> String {
        let mut header = String::new();
        if let Some(name) = &pattern.name {
            header.push_str(&format!("#N {}\n", name));
        }
        for comment in &pattern.comments {
            header.push_str(&format!("#C {}\n", comment));
        }
        let (w, h) = match bbox {
            Some((tl, br)) => {
                if tl != Pos2::zero() {
                    header.push_str(&format!("#R {} {}\n", tl.x, tl.y));
                }
                (br.x - tl.x + 1, br.y - tl.y + 1)
            }
            None => (0, 0),
        };
        header.push_str(&format!("x = {}, y = {}", w, h));
        if let Some(rule) = &pattern.rule {
            header.push_str(&format!(", rule = {}", rule));
        }
        header
    }

    fn encode_cells(&self, alive_cells: &[Pos2], tl: Pos2) -> String {
        let mut last = tl - Pos2 { x: 1, y: 0 };
        let mut alive_run = 0;
        let mut seq = RunEncoder::new(self.max_line_len);
        for &pos in alive_cells {
            // if we're one ahead of the last, then only increment the run
            if last.y == pos.y && (last.x + 1) == pos.x {
                alive_run += 1;
                last = pos;
                continue;
            }

            let lines_run = pos.y - last.y;
            let dead_run = match lines_run {
                0 => pos.x - last.x - 1,
                _ => pos.x - tl.x,
            };
            // NOTE: order matters!
            seq.push_run(alive_run, 'o');
            seq.push_run(lines_run, '$');
            seq.push_run(dead_run, 'b');

            alive_run = 1;
            last = pos;
        }

        seq.push_run(alive_run, 'o');
        seq.end()
    }

    /// Reads a `#` line into `pattern`, or into `meta_rule` and `offset` for
    /// `#r` and `#R`/`#P` lines
    fn decode_meta(line: &str, pattern: &mut Pattern, meta_rule: &mut Option<String>, offset: &mut Pos2) {
        let mut chars = line[1..].chars();
        let kind = chars.next();
        let rest = chars.as_str().trim();
        match kind {
            Some('N') => pattern.name = Some(rest.to_owned()),
            Some('C' | 'c') => pattern.comments.push(rest.to_owned()),
            Some('r') => *meta_rule = Some(rest.to_owned()),
            Some('R' | 'P') => {
                let coords: Vec<i32> = rest.split_whitespace().filter_map(|v| v.parse().ok()).collect();
                if let [x, y] = coords[..] {
                    *offset = Pos2 { x, y };
                }
            }
            _ => {}
        }
    }
}
impl Default for RunLengthEncoded {
    fn default() -> Self {
        Self {
            max_line_len: 70,
            bounds: None,
        }
    }
}

impl PatternCodec for RunLengthEncoded {
    fn encode(&self, pattern: &Pattern) -> String {
        let mut cells = pattern.cells.clone();
        cells.sort();
        cells.dedup();
        let bbox = bounding_box(&cells);
        let tl = bbox.map_or(Pos2::zero(), |(tl, _)| tl);

        format!(
            "{}\n{}\n",
            self.encode_header(pattern, bbox),
            self.encode_cells(&cells, tl)
        )
    }

    fn decode(&self, value: &str) -> Result<Pattern> {
        let mut pattern = Pattern::default();
        let mut header_rule = None;
        let mut meta_rule = None;
        let mut offset = Pos2::zero();
        let mut cursor = Pos2::zero();
        let mut section = Section::Header;
        let mut line_no = 0;

        'lines_loop: for (i, raw) in value.lines().enumerate() {
            line_no = i + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('#') {
                Self::decode_meta(line, &mut pattern, &mut meta_rule, &mut offset);
                continue;
            }

            match section {
                Section::Header => {
                    let caps = Self::header_regex()
                        .captures(line)
                        .ok_or_else(|| LifeError::pattern(line_no, "expected `x = <int>, y = <int>` header"))?;
                    let dimension = |i: usize| -> Result<i32> {
                        caps[i]
                            .parse()
                            .map_err(|_| LifeError::pattern(line_no, "header dimension is too large"))
                    };
                    pattern.width = dimension(1)?;
                    pattern.height = dimension(2)?;
                    header_rule = caps.get(3).map(|m| m.as_str().to_owned());
                    section = Section::Body;
                }
                Section::Body => {
                    let body: String = line.chars().filter(|c| !c.is_whitespace()).collect();
                    let mut end = 0;
                    for caps in Self::token_regex().captures_iter(&body) {
                        let (whole, [run_str, state]) = caps.extract();
                        let start = caps.get(0).map_or(end, |m| m.start());
                        if start != end {
                            return Err(LifeError::pattern(
                                line_no,
                                format!("unexpected {:?}", &body[end..start]),
                            ));
                        }
                        end = start + whole.len();

                        let run = match run_str {
                            "" => 1,
                            digits => digits
                                .parse::<i32>()
                                .map_err(|_| LifeError::pattern(line_no, "run length is too large"))?,
                        };
                        match state {
                            "!" => {
                                section = Section::Done;
                                break 'lines_loop;
                            }
                            "o" => {
                                let start = checked_pos(offset, cursor, line_no)?;
                                let end = checked_run(cursor.x, run, line_no)?;
                                // the cell past the run must be representable too
                                checked_pos(offset, Pos2 { x: end, y: cursor.y }, line_no)?;
                                self.push_live_run(&mut pattern.cells, start, run);
                                cursor.x = end;
                            }
                            "b" => cursor.x = checked_run(cursor.x, run, line_no)?,
                            "$" => {
                                cursor.x = 0;
                                cursor.y = checked_run(cursor.y, run, line_no)?;
                            }
                            _ => unreachable!(),
                        }
                    }
                    if end != body.len() {
                        return Err(LifeError::pattern(
                            line_no,
                            format!("unexpected {:?}", &body[end..]),
                        ));
                    }
                }
                Section::Done => unreachable!(),
            }
        }

        match section {
            Section::Header => return Err(LifeError::pattern(line_no, "missing header")),
            Section::Body => return Err(LifeError::pattern(line_no, "missing terminating '!'")),
            Section::Done => {}
        }

        if let Some(rule) = header_rule.or(meta_rule) {
            pattern.rule = Some(RuleSet::parse(&rule)?);
        }
        pattern.cells.sort();
        pattern.cells.dedup();
        Ok(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLIDER: &str = "#N Glider\nx = 3, y = 3, rule = B3/S23\nbob$2bo$3o!\n";

    fn decode(value: &str) -> Result<Pattern> {
        RunLengthEncoded::default().decode(value)
    }

    fn encode(pattern: &Pattern) -> String {
        RunLengthEncoded::default().encode(pattern)
    }

    fn pos(x: i32, y: i32) -> Pos2 {
        Pos2 { x, y }
    }

    fn assert_malformed(value: &str) {
        match decode(value) {
            Err(LifeError::MalformedPattern { .. }) => {}
            other => panic!("expected MalformedPattern for {:?}, got {:?}", value, other),
        }
    }

    #[test]
    fn decodes_glider() {
        let pattern = decode(GLIDER).unwrap();

        assert_eq!(pattern.name.as_deref(), Some("Glider"));
        assert_eq!((pattern.width, pattern.height), (3, 3));
        assert_eq!(pattern.rule, Some(RuleSet::conway()));
        assert_eq!(
            pattern.cells,
            vec![pos(1, 0), pos(2, 1), pos(0, 2), pos(1, 2), pos(2, 2)]
        );
    }

    #[test]
    fn header_rule_wins_over_comment_rule() {
        let pattern = decode("#r B36/S23\nx = 1, y = 1, rule = B2/S\no!").unwrap();
        assert_eq!(pattern.rule, Some(RuleSet::parse("B2/S").unwrap()));

        let pattern = decode("#r B36/S23\nx = 1, y = 1\no!").unwrap();
        assert_eq!(pattern.rule, Some(RuleSet::parse("B36/S23").unwrap()));

        let pattern = decode("x = 1, y = 1\no!").unwrap();
        assert_eq!(pattern.rule, None);
    }

    #[test]
    fn skips_rows_and_ignores_trailing_text() {
        let pattern = decode("x = 3, y = 4\n2o$\n2$ b\n2o!garbage $$\n").unwrap();

        assert_eq!(pattern.cells, vec![pos(0, 0), pos(1, 0), pos(1, 3), pos(2, 3)]);
    }

    #[test]
    fn comment_offset_moves_pattern() {
        let pattern = decode("#C a comment\n#R 4 7\nx = 2, y = 1\nbo!").unwrap();

        assert_eq!(pattern.comments, vec!["a comment".to_owned()]);
        assert_eq!(pattern.cells, vec![pos(5, 7)]);
    }

    #[test]
    fn rejects_malformed_patterns() {
        assert_malformed("");
        assert_malformed("bob$2bo$3o!");
        assert_malformed("x = 3\nbob!");
        assert_malformed("x = 3, y = 3\nbob$2bo$3o");
        assert_malformed("x = 3, y = 3\nbqb$2bo$3o!");
        assert_malformed("x = 3, y = 3\nbo3x!");
    }

    #[test]
    fn coordinate_overflow_is_reported() {
        assert_malformed("x = 1, y = 1\n2147483647bo!");
        assert_malformed("#R 2147483647 0\nx = 1, y = 1\nbo!");
        assert_malformed("#P 0 2147483647\nx = 1, y = 1\n$o!");
        assert_malformed("x = 1, y = 1\n2147483647$2$o!");
    }

    #[test]
    fn bounded_decode_clips_runs() {
        let codec = RunLengthEncoded::default().with_bounds(Size2::new(3, 2));
        let pattern = codec
            .decode("x = 1, y = 1\n2000000000o$b2000000000o$2000000000o!")
            .unwrap();

        assert_eq!(
            pattern.cells,
            vec![pos(0, 0), pos(1, 0), pos(2, 0), pos(1, 1), pos(2, 1)]
        );
    }

    #[test]
    fn bounded_decode_clips_offset_runs() {
        let codec = RunLengthEncoded::default().with_bounds(Size2::new(4, 4));
        let pattern = codec.decode("#R -3 2\nx = 6, y = 1\n6o!").unwrap();

        assert_eq!(pattern.cells, vec![pos(0, 2), pos(1, 2), pos(2, 2)]);
    }

    #[test]
    fn invalid_embedded_rule_is_reported() {
        assert!(matches!(
            decode("x = 1, y = 1, rule = Bx/S3\no!"),
            Err(LifeError::InvalidRuleFormat { .. })
        ));
    }

    #[test]
    fn encodes_glider() {
        let pattern = decode(GLIDER).unwrap();

        assert_eq!(encode(&pattern), "#N Glider\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n");
    }

    #[test]
    fn encodes_empty_rows_and_offsets() {
        let pattern = Pattern::from_cells([pos(3, 2), pos(4, 2), pos(6, 5)], None);
        let encoded = encode(&pattern);

        assert_eq!(encoded, "#R 3 2\nx = 4, y = 4\n2o3$3bo!\n");
        assert_eq!(decode(&encoded).unwrap().cells, pattern.cells);
    }

    #[test]
    fn encodes_empty_pattern() {
        let pattern = Pattern::from_cells([], Some(RuleSet::conway()));
        let encoded = encode(&pattern);

        assert_eq!(encoded, "x = 0, y = 0, rule = B3/S23\n!\n");
        assert!(decode(&encoded).unwrap().cells.is_empty());
    }

    #[test]
    fn wraps_long_lines() {
        let cells: Vec<Pos2> = (0..200).filter(|x| x % 2 == 0).map(|x| pos(x, 0)).collect();
        let pattern = Pattern::from_cells(cells.clone(), None);
        let encoded = RunLengthEncoded::default().set_line_len(20).encode(&pattern);

        assert!(encoded.lines().all(|line| line.len() <= 20));
        assert_eq!(decode(&encoded).unwrap().cells, cells);
    }

    #[test]
    fn reencoding_keeps_cells() {
        let source = "x = 7, y = 5, rule = B36/S23\n2bo$b3o2$o5bo$7o!";
        let first = decode(source).unwrap();
        let second = decode(&encode(&first)).unwrap();

        assert_eq!(first.cells, second.cells);
        assert_eq!(first.rule, second.rule);
    }
}
