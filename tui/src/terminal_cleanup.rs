use std::io;
use std::io::Stdout;
use std::io::Write;

use crossterm::event::DisableBracketedPaste;
use crossterm::event::DisableFocusChange;
use crossterm::event::EnableBracketedPaste;
use crossterm::event::EnableFocusChange;
use crossterm::execute;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Owns the terminal while the UI runs and puts it back the way it was on drop, including when
/// the event loop bails out with an error.
pub struct TerminalGuard {
    terminal: AppTerminal,
    restored: bool,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let setup = execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableFocusChange,
            EnableBracketedPaste
        )
        .and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())));

        match setup {
            Ok(terminal) => Ok(Self {
                terminal,
                restored: false,
            }),
            Err(err) => {
                if let Err(undo_err) = undo_terminal_setup(&mut io::stdout()) {
                    tracing::warn!("failed to undo terminal setup: {undo_err}");
                }
                Err(err)
            }
        }
    }

    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }

    pub fn restore(mut self) -> io::Result<()> {
        self.restore_inner()
    }

    fn restore_inner(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        undo_terminal_setup(self.terminal.backend_mut())?;
        self.terminal.show_cursor()
    }
}

/// Leave every mode `TerminalGuard::enter` may have switched on. Safe to call when only some of
/// them were entered.
fn undo_terminal_setup(out: &mut impl Write) -> io::Result<()> {
    execute!(
        out,
        DisableBracketedPaste,
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    disable_raw_mode()
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = self.restore_inner() {
            tracing::warn!("failed to restore terminal: {err}");
        }
    }
}
