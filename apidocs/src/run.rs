use std::io::{self, Stdout};

use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::stream::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{data::AppData, ui};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive browser until the user quits.
///
/// The terminal is restored before returning, also when the event loop fails.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or an I/O error occurs
/// while reading input or drawing.
pub async fn run(app: &mut AppData) -> anyhow::Result<()> {
    let mut terminal = init_terminal()?;
    let result = event_loop(&mut terminal, app).await;
    restore_terminal(&mut terminal)?;
    info!("browser exited");
    result
}

fn init_terminal() -> anyhow::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Term) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn event_loop(terminal: &mut Term, app: &mut AppData) -> anyhow::Result<()> {
    let mut reader = EventStream::new();
    while !app.should_quit {
        terminal.draw(|frame| ui::draw(frame, app))?;
        match reader.next().await {
            Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.handle_key(key),
            Some(Err(e)) => return Err(e.into()),
            None => break,
            // resize and mouse events only need a redraw
            Some(Ok(_)) => {}
        }
    }
    Ok(())
}
