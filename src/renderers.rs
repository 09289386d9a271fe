use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use log::{debug, info};
use rand::Rng;
use std::convert::TryFrom;
use std::io::{self, Write};
use std::time::Duration;

use crate::errors::*;
use crate::grid_displays::{CarveProgressDisplay, CellBodyDisplay, PlainDisplay};
use crate::session::MazeSession;
use crate::snapshot::GridSnapshot;

const IDLE_POLL_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    animate: bool,
    step_delay: Duration,
    wall_colour: Color,
}

#[derive(Debug, Clone)]
pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    pub fn new() -> RenderOptionsBuilder {
        RenderOptionsBuilder {
            options: RenderOptions {
                animate: false,
                step_delay: Duration::from_millis(10),
                wall_colour: Color::White,
            },
        }
    }

    /// Redraw after every carve step instead of only once the maze is done.
    pub fn animate(mut self, on: bool) -> Self {
        self.options.animate = on;
        self
    }

    pub fn step_delay(mut self, delay: Duration) -> Self {
        self.options.step_delay = delay;
        self
    }

    pub fn wall_colour(mut self, colour: Color) -> Self {
        self.options.wall_colour = colour;
        self
    }

    pub fn build(self) -> RenderOptions {
        self.options
    }
}

impl Default for RenderOptionsBuilder {
    fn default() -> Self {
        RenderOptionsBuilder::new()
    }
}

impl RenderOptions {
    pub fn animate(&self) -> bool {
        self.animate
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyAction {
    Regenerate,
    Quit,
    Ignored,
}

pub fn key_action(code: KeyCode) -> KeyAction {
    match code {
        KeyCode::Enter => KeyAction::Regenerate,
        KeyCode::Esc | KeyCode::Char('q') => KeyAction::Quit,
        other => {
            debug!("key {:?} not supported", other);
            KeyAction::Ignored
        }
    }
}

/// Take over the terminal and keep carving mazes with the session until the user quits.
/// Enter throws the maze away and starts another, Escape or `q` quits.
///
/// The session must already hold a maze (see `MazeSession::generate`).
pub fn render_interactive<R: Rng>(session: &mut MazeSession<R>, options: &RenderOptions) -> Result<()> {
    let mut terminal = TerminalGuard::enter(io::stdout())?;
    run(&mut terminal.out, session, options)
}

/// Raw mode and the alternate screen for as long as it lives. Dropping it puts the terminal back,
/// whether the maze loop finished cleanly or bailed out with an error.
struct TerminalGuard<W: Write> {
    out: W,
    raw_mode: bool,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W) -> io::Result<TerminalGuard<W>> {
        terminal::enable_raw_mode()?;
        let mut guard = TerminalGuard { out, raw_mode: true };
        guard.out.execute(EnterAlternateScreen)?;
        guard.out.execute(Hide)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        // Nowhere left to report a failure, restore as much as possible.
        let _ = self.out.execute(Show);
        let _ = self.out.execute(LeaveAlternateScreen);
        if self.raw_mode {
            let _ = terminal::disable_raw_mode();
        }
    }
}

/// Columns and rows needed to draw a maze plus its status line, saturating for mazes no terminal
/// could hold.
fn required_terminal_size(side: usize) -> (u16, u16) {
    let cells = |per_cell: usize, extra: usize| {
        side.checked_mul(per_cell)
            .and_then(|n| n.checked_add(extra))
            .and_then(|n| u16::try_from(n).ok())
            .unwrap_or(u16::MAX)
    };
    (cells(4, 1), cells(2, 2))
}

fn run<R: Rng, W: Write>(stdout: &mut W, session: &mut MazeSession<R>, options: &RenderOptions) -> Result<()> {
    let signal = session.regenerate_signal();
    let mut needs_draw = true;

    loop {
        let carving = !session.is_done() || signal.is_requested();
        let wait = match (carving, options.animate) {
            (true, true) => options.step_delay,
            (true, false) => Duration::from_millis(0),
            (false, _) => Duration::from_millis(IDLE_POLL_MS),
        };

        if event::poll(wait)? {
            loop {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match key_action(key.code) {
                            KeyAction::Quit => {
                                info!("quit after {} mazes", session.generation());
                                return Ok(());
                            }
                            KeyAction::Regenerate => signal.request(),
                            KeyAction::Ignored => (),
                        }
                    }
                }
                if !event::poll(Duration::from_millis(0))? {
                    break;
                }
            }
        }

        if !session.is_done() || signal.is_requested() {
            if options.animate {
                let _ = session.step()?;
            } else {
                let _ = session.run_to_completion(|_, _| ())?;
            }
            needs_draw = true;
        }

        if needs_draw {
            let snapshot = session.snapshot()?;
            if options.animate {
                draw(stdout, &snapshot, &CarveProgressDisplay, session.generation(), options)?;
            } else {
                draw(stdout, &snapshot, &PlainDisplay, session.generation(), options)?;
            }
            needs_draw = false;
        }
    }
}

fn draw<W: Write, D: CellBodyDisplay>(stdout: &mut W,
                                      snapshot: &GridSnapshot,
                                      display: &D,
                                      generation: u64,
                                      options: &RenderOptions)
                                      -> io::Result<()> {
    let side = snapshot.side_length().0;
    let (needed_w, needed_h) = required_terminal_size(side);

    stdout.queue(MoveTo(0, 0))?;
    stdout.queue(Clear(ClearType::All))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        let msg = format!("Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                          needed_w, needed_h, term_w, term_h);
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        return Ok(());
    }

    // Raw mode: no implicit carriage returns, so place every line.
    stdout.queue(SetForegroundColor(options.wall_colour))?;
    for (row, line) in snapshot.render_text(display).lines().enumerate() {
        stdout.queue(MoveTo(0, row as u16))?;
        stdout.queue(Print(line))?;
    }
    stdout.queue(ResetColor)?;

    let status = if snapshot.is_complete() {
        format!("maze #{} {}x{}  [Enter] new maze  [Esc] quit", generation, side, side)
    } else {
        format!("maze #{} {}x{}  carving {}/{}", generation, side, side,
                snapshot.visited_count(), snapshot.size())
    };
    stdout.queue(MoveTo(0, needed_h - 1))?;
    stdout.queue(Print(status))?;
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_bindings() {
        assert_eq!(key_action(KeyCode::Enter), KeyAction::Regenerate);
        assert_eq!(key_action(KeyCode::Esc), KeyAction::Quit);
        assert_eq!(key_action(KeyCode::Char('q')), KeyAction::Quit);
        assert_eq!(key_action(KeyCode::Char('x')), KeyAction::Ignored);
        assert_eq!(key_action(KeyCode::Up), KeyAction::Ignored);
    }

    #[test]
    fn builder_defaults_and_overrides() {
        let defaults = RenderOptionsBuilder::new().build();
        assert!(!defaults.animate());
        assert_eq!(defaults.step_delay(), Duration::from_millis(10));

        let options = RenderOptionsBuilder::new()
            .animate(true)
            .step_delay(Duration::from_millis(3))
            .wall_colour(Color::Grey)
            .build();
        assert!(options.animate());
        assert_eq!(options.step_delay(), Duration::from_millis(3));
        assert_eq!(options.wall_colour, Color::Grey);
    }

    #[test]
    fn terminal_size_for_maze() {
        assert_eq!(required_terminal_size(1), (5, 4));
        assert_eq!(required_terminal_size(40), (161, 82));
        // too big to ever fit, never wraps round to a small size
        assert_eq!(required_terminal_size(16_384), (u16::MAX, 32_770));
        assert_eq!(required_terminal_size(40_000), (u16::MAX, u16::MAX));
        assert_eq!(required_terminal_size(usize::MAX), (u16::MAX, u16::MAX));
    }

    #[test]
    fn dropping_the_guard_restores_the_screen() {
        let mut written = Vec::new();
        {
            let _guard = TerminalGuard { out: &mut written, raw_mode: false };
        }
        let text = String::from_utf8(written).unwrap();
        assert!(text.contains("\x1b[?25h"), "cursor shown again: {:?}", text);
        assert!(text.contains("\x1b[?1049l"), "alternate screen left: {:?}", text);
    }
}
