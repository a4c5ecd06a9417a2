use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent, KeyModifiers},
    execute, queue, terminal,
};
use lifelike::{Engine, Pos2};
use std::io;

pub enum ConsoleCommand {
    Exit,
    TogglePause,
    Step,
    Handled,
}

pub struct ConsoleRender {
    tl: Pos2,
    report: String,
}
impl ConsoleRender {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), cursor::Hide)?;
        Ok(Self {
            tl: Pos2::default(),
            report: String::new(),
        })
    }

    pub fn render(&self, engine: &Engine) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        // the last row holds the report footer
        let br = self.tl
            + Pos2 {
                x: cols as i32,
                y: rows.saturating_sub(1) as i32,
            };
        let mut stdout = io::stdout();
        queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
        for cell in engine.viewport(self.tl, br).iter() {
            let cell = cell - self.tl;
            queue!(stdout, cursor::MoveTo(cell.x as u16, cell.y as u16))?;
            io::Write::write_all(&mut stdout, "█".as_bytes())?;
        }

        // write footer
        queue!(stdout, cursor::MoveTo(0, rows.saturating_sub(1)))?;
        io::Write::write_all(&mut stdout, self.report.as_bytes())?;

        io::Write::flush(&mut stdout)
    }

    pub fn poll_events(&mut self) -> io::Result<Option<ConsoleCommand>> {
        // make sure event is preset for us to take
        if !event::poll(std::time::Duration::from_secs(0))? {
            return Ok(None);
        }

        let command = match event::read()? {
            // CTRL+C or q
            event::Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            })
            | event::Event::Key(KeyEvent {
                code: KeyCode::Char('q'),
                ..
            }) => ConsoleCommand::Exit,
            event::Event::Key(KeyEvent {
                code: KeyCode::Char(' '),
                ..
            }) => ConsoleCommand::TogglePause,
            event::Event::Key(KeyEvent {
                code: KeyCode::Char('n'),
                ..
            }) => ConsoleCommand::Step,
            // arrows to move the view, never past the top-left of the grid
            event::Event::Key(KeyEvent { code, .. }) => {
                match code {
                    KeyCode::Up => self.tl.y = (self.tl.y - 1).max(0),
                    KeyCode::Down => self.tl.y += 1,
                    KeyCode::Left => self.tl.x = (self.tl.x - 1).max(0),
                    KeyCode::Right => self.tl.x += 1,
                    _ => {}
                }
                ConsoleCommand::Handled
            }
            _ => ConsoleCommand::Handled,
        };
        Ok(Some(command))
    }

    pub fn set_report(&mut self, report: String) {
        self.report = report;
    }
}
impl Drop for ConsoleRender {
    fn drop(&mut self) {
        // nothing sensible to do if the terminal cannot be restored while dropping
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), cursor::Show);
    }
}
