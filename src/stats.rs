use lifelike::Statistics;
use std::time::Instant;

pub trait Recorder {
    type Str: AsRef<str>;

    fn record(&mut self, stats: &Statistics);

    fn has_report(&self) -> bool;
    fn report(&mut self) -> Self::Str;
}

pub struct SimpleRecord {
    stats: Statistics,
    gens_in_report: usize,
    last_report: Instant,
}
impl SimpleRecord {
    pub fn new(stats: &Statistics) -> Self {
        Self {
            stats: *stats,
            gens_in_report: 0,
            last_report: Instant::now(),
        }
    }
}
impl Recorder for SimpleRecord {
    type Str = String;

    fn record(&mut self, stats: &Statistics) {
        self.gens_in_report += 1;
        self.stats = *stats;
    }

    fn has_report(&self) -> bool {
        self.last_report.elapsed().as_millis() >= 500
    }
    fn report(&mut self) -> Self::Str {
        let gens_per_sec = self.gens_in_report as f64 / self.last_report.elapsed().as_secs_f64();
        // reset stats for next report
        self.last_report = Instant::now();
        self.gens_in_report = 0;

        format!("{:.02}gen/s {}", gens_per_sec, self.stats)
    }
}

/// Keeps one row per generation for a CSV dump
pub struct CsvRecord {
    inner: SimpleRecord,
    data: Vec<(u64, u128, usize, usize)>,
    last: Instant,
}
impl CsvRecord {
    pub fn new(stats: &Statistics) -> Self {
        Self {
            inner: SimpleRecord::new(stats),
            data: Vec::new(),
            last: Instant::now(),
        }
    }

    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        use std::{
            fs,
            io::{self, Write},
        };

        let file = fs::File::create(path)?;
        let mut file = io::BufWriter::new(file);

        file.write_all(b"gen,delta_us,living,living_max\n")?;
        for (generation, delta, living, living_max) in &self.data {
            writeln!(file, "{},{},{},{}", generation, delta, living, living_max)?;
        }
        file.flush()
    }
}
impl Recorder for CsvRecord {
    type Str = <SimpleRecord as Recorder>::Str;

    fn record(&mut self, stats: &Statistics) {
        let delta = self.last.elapsed().as_micros();
        self.last = Instant::now();

        self.data
            .push((stats.generation, delta, stats.living, stats.living_max));
        self.inner.record(stats);
    }

    fn has_report(&self) -> bool {
        self.inner.has_report()
    }
    fn report(&mut self) -> Self::Str {
        self.inner.report()
    }
}

pub enum SwitchRecorder {
    Csv(CsvRecord),
    Simple(SimpleRecord),
}
impl SwitchRecorder {
    pub fn new(stats: &Statistics, csv: bool) -> Self {
        if csv {
            Self::Csv(CsvRecord::new(stats))
        } else {
            Self::Simple(SimpleRecord::new(stats))
        }
    }

    /// Writes the CSV dump, a no-op unless created with `csv`
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        match self {
            Self::Csv(r) => r.save(path),
            Self::Simple(_) => Ok(()),
        }
    }
}
impl Recorder for SwitchRecorder {
    type Str = String;

    fn record(&mut self, stats: &Statistics) {
        match self {
            Self::Csv(r) => r.record(stats),
            Self::Simple(r) => r.record(stats),
        }
    }
    fn has_report(&self) -> bool {
        match self {
            Self::Csv(r) => r.has_report(),
            Self::Simple(r) => r.has_report(),
        }
    }
    fn report(&mut self) -> Self::Str {
        match self {
            Self::Csv(r) => r.report(),
            Self::Simple(r) => r.report(),
        }
    }
}
