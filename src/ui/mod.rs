// Terminal UI - the face of podpipe
// Built with ratatui; the player panel itself comes from crate::player

mod app;          // main application state and event loop
pub mod events;   // keyboard event handling
mod widgets;      // drawing the episode list and the player panel

pub use app::{App, Session};
pub use events::{AppEvent, EventHandler};

use anyhow::Result;
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

/// Raw mode and the alternate screen, held for as long as the app runs.
///
/// Mouse reporting stays off so text in the panel can still be selected.
pub struct Screen {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Screen {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, cursor::Hide) {
            restore();
            return Err(e.into());
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                restore();
                Err(e.into())
            }
        }
    }

    /// Draw one frame of the episode list and the player panel.
    pub fn draw(&mut self, session: &mut Session) -> Result<()> {
        self.terminal.draw(|f| session.render(f))?;
        Ok(())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        restore();
    }
}

// Best effort, the process may already be unwinding
fn restore() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}
