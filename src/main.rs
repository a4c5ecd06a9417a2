use std::{error::Error, thread};

mod console;
mod options;
mod stats;

use lifelike::{Engine, PatternCodec, RunLengthEncoded};
use stats::Recorder;
use tracing_subscriber::EnvFilter;

/// Fills the first generation from the input pattern or the fill mode
fn load_first_generation(engine: &mut Engine, args: &options::Args) -> lifelike::Result<()> {
    if let Some(file_name) = args.input_file() {
        let encoded_str = std::fs::read_to_string(&file_name)?;
        let pattern = engine.read_pattern(&encoded_str)?;
        tracing::info!("read {} cells from {}", pattern.cells.len(), file_name);
    } else {
        let alive = args.fill_mode().create_alive(engine.size());
        engine.set_cells(alive);
    }

    // the command line rule wins over a rule embedded in the pattern
    if let Some(rule) = args.rule() {
        engine.set_rules(&rule)?;
    }
    Ok(())
}

fn init_tracing(console: bool) {
    // keep the console renderer's screen clean unless asked otherwise
    let default = if console { "lifelike=error" } else { "lifelike=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let Some(args) = options::Args::from_env()? else {
        return Ok(());
    };
    init_tracing(args.console());

    let size = args.grid_size();
    let mut engine = Engine::new(size.width, size.height);
    load_first_generation(&mut engine, &args)?;
    tracing::info!(
        "{} grid, rules {}, {} alive",
        engine.size(),
        engine.rules(),
        engine.living()
    );

    // setup the reporting metrics and optional console
    let mut console = if args.console() {
        Some(console::ConsoleRender::new()?)
    } else {
        None
    };
    let sleep = args.sleep();
    let parallel = args.multithreading();
    let mut recorder = stats::SwitchRecorder::new(engine.stats(), args.stats_file().is_some());
    let mut paused = false;

    engine.record_run_start();
    'generations: while engine.generation() < args.generations() {
        let mut step = !paused;
        // render the console if in console mode
        if let Some(ref mut console) = console {
            while let Some(cmd) = console.poll_events()? {
                match cmd {
                    console::ConsoleCommand::Exit => break 'generations,
                    console::ConsoleCommand::TogglePause => paused = !paused,
                    console::ConsoleCommand::Step => step = true,
                    console::ConsoleCommand::Handled => {}
                }
            }
            console.render(&engine)?;
        }

        // report metrics every 500ms or always if in console mode
        if console.is_some() || recorder.has_report() {
            let report = recorder.report();
            if let Some(ref mut console) = console {
                console.set_report(report);
            } else {
                println!("{}", report);
            }
        }

        // compute the next generation
        if step {
            if parallel {
                engine.advance_parallel();
            } else {
                engine.advance();
            }
            recorder.record(engine.stats());
        }
        if let Some(time) = sleep {
            thread::sleep(time);
        }
    }
    std::mem::drop(console);
    println!("{}", engine.stats());

    if let Some(file_name) = args.output_file() {
        let mut pattern = engine.to_pattern();
        if let Some(name) = args.name() {
            pattern = pattern.with_name(name);
        }
        let encoded: String = RunLengthEncoded::default().encode(&pattern);
        std::fs::write(&file_name, encoded)?;
        tracing::info!("wrote generation {} to {}", engine.generation(), file_name);
    }
    if let Some(file_name) = args.stats_file() {
        recorder.save(&file_name)?;
    }

    Ok(())
}
