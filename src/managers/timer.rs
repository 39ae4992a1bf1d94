use rusqlite::Connection;

use super::Manager;
use crate::error::{KronosError, Result};
use crate::types::{Record, Timer};

impl Manager<Timer> {
    pub fn add_timer(&mut self, timer: Timer, conn: &Connection) -> Result<&Record<Timer>> {
        if timer.hours < 0.0 {
            return Err(KronosError::NegativeDuration);
        }
        self.push(timer, conn)
    }
}
