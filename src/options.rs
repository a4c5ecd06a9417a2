use std::time::Duration;

use lifelike::{Pos2, Size2};

pub struct Args {
    matches: getopts::Matches,
}

impl Args {
    fn new<T: AsRef<str>>(args: &[T]) -> Result<Option<Self>, String> {
        let mut opts = getopts::Options::new();
        opts.optflag("", "help", "print this help menu");
        opts.optflag("c", "console", "run in console mode");
        opts.optflag("t", "threads", "split each generation across threads");
        opts.optopt("o", "output", "write the last generation to a pattern file", "FILE");
        opts.optopt("i", "input", "read the first generation from a pattern file", "FILE");
        opts.optopt("", "name", "pattern name written to the output file", "NAME");
        opts.optopt("r", "rule", "birth/survival rule, e.g. B3/S23", "RULE");
        opts.optopt("w", "width", "set grid width", "WIDTH");
        opts.optopt("h", "height", "set grid height", "HEIGHT");
        opts.optopt("f", "fill", "set fill type", "random|alternating|all|empty");
        opts.optopt(
            "s",
            "sleep",
            "the amount of time to sleep between generations",
            "MILLIS",
        );
        opts.optopt("g", "gens", "max number of generations", "COUNT");
        opts.optopt("", "stats", "write stats csv to file", "FILE");

        let matches = opts
            .parse(args.iter().map(T::as_ref))
            .map_err(|err| err.to_string())?;
        if matches.opt_present("help") {
            println!("{}", opts.usage("usage: lifelike [options]"));
            return Ok(None);
        }

        let args = Self { matches };
        // surface malformed numbers up front instead of mid-run
        args.number::<u32>("width")?;
        args.number::<u32>("height")?;
        args.number::<u64>("sleep")?;
        args.number::<u64>("gens")?;
        FillMode::new(args.fill_str())
            .ok_or_else(|| format!("unknown fill mode {:?}", args.fill_str()))?;
        Ok(Some(args))
    }
    pub fn from_env() -> Result<Option<Self>, String> {
        let env = std::env::args().collect::<Vec<_>>();
        Self::new(&env[1..])
    }

    fn number<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, String> {
        self.matches
            .opt_get(name)
            .map_err(|_| format!("--{} expects a non-negative number", name))
    }

    pub fn console(&self) -> bool {
        self.matches.opt_present("console")
    }
    pub fn multithreading(&self) -> bool {
        self.matches.opt_present("threads")
    }

    pub fn generations(&self) -> u64 {
        self.number("gens").ok().flatten().unwrap_or(u64::MAX) // kinda hacky way of saying "infinity"
    }
    pub fn sleep(&self) -> Option<Duration> {
        match self.number("sleep").ok().flatten() {
            Some(millis) => Some(Duration::from_millis(millis)),
            None if self.console() => Some(Duration::from_millis(100)),
            None => None,
        }
    }

    pub fn grid_size(&self) -> Size2 {
        let default = match self.console() {
            true => crossterm::terminal::size()
                .map(|(cols, rows)| (cols as i32, rows.saturating_sub(1) as i32))
                .unwrap_or((80, 24)),
            false => (500, 500),
        };

        let dimension = |name: &str, default: i32| -> i32 {
            self.number::<u32>(name)
                .ok()
                .flatten()
                .map_or(default, |v| v.min(i32::MAX as u32) as i32)
        };
        Size2::new(dimension("width", default.0), dimension("height", default.1))
    }

    fn fill_str(&self) -> String {
        self.matches.opt_str("fill").unwrap_or_else(|| "random".to_owned())
    }
    pub fn fill_mode(&self) -> FillMode {
        FillMode::new(self.fill_str()).unwrap_or(FillMode::Random)
    }
    pub fn rule(&self) -> Option<String> {
        self.matches.opt_str("rule")
    }
    pub fn name(&self) -> Option<String> {
        self.matches.opt_str("name")
    }

    pub fn output_file(&self) -> Option<String> {
        self.matches.opt_str("output")
    }
    pub fn input_file(&self) -> Option<String> {
        self.matches.opt_str("input")
    }

    pub fn stats_file(&self) -> Option<String> {
        self.matches.opt_str("stats")
    }
}

pub enum FillMode {
    Random,
    Alternating,
    All,
    Empty,
}
impl FillMode {
    fn new<S: AsRef<str>>(s: S) -> Option<Self> {
        match s.as_ref() {
            "random" => Some(Self::Random),
            "alternating" => Some(Self::Alternating),
            "all" => Some(Self::All),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }

    fn reserve_size(&self, size: Size2) -> usize {
        let total = size.area();
        match self {
            Self::Random => total.div_ceil(2),
            Self::Alternating => total.div_ceil(2),
            Self::All => total,
            Self::Empty => 0,
        }
    }
    fn fill_cell<R: rand::Rng>(&self, cell: Pos2, rng: &mut R) -> bool {
        match self {
            Self::Random => rng.random_bool(0.5),
            Self::Alternating => (cell.x + cell.y) % 2 == 0,
            Self::All => true,
            Self::Empty => false,
        }
    }
    pub fn create_alive(self, size: Size2) -> Vec<Pos2> {
        let mut alive = Vec::new();
        let reserve_size = self.reserve_size(size);
        if reserve_size == 0 {
            // reserve_size indicates this will produce no alive cells
            return alive;
        }

        let mut rng = rand::rng();
        alive.reserve(reserve_size);
        for y in 0..size.height {
            for x in 0..size.width {
                let cell = Pos2 { x, y };
                if self.fill_cell(cell, &mut rng) {
                    alive.push(cell);
                }
            }
        }
        alive
    }
}
