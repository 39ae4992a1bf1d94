use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use log::debug;

use crate::app::{App, AppEvent};

const TICK_RATE: Duration = Duration::from_millis(250);

/// Waits up to `timeout` for a key press; otherwise yields a tick.
pub fn poll(timeout: Duration) -> Result<Option<AppEvent>> {
    if event::poll(timeout)? {
        return match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Ok(Some(AppEvent::KeyPress(key.code)))
            }
            _ => Ok(None),
        };
    }
    Ok(Some(AppEvent::Tick))
}

/// Runs the draw/poll loop until the app stops.
pub fn run(app: &mut App, terminal: &mut crate::tui::Terminal) -> Result<()> {
    debug!("event=ui_loop_start module=event");
    while app.running {
        terminal.draw(|frame| crate::ui::draw(frame, app))?;

        if let Some(event) = poll(TICK_RATE)? {
            app.update(event);
        }
    }
    debug!("event=ui_loop_stop module=event");
    Ok(())
}
