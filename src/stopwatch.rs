//! A single running stopwatch per user. Stopping it yields a timer covering
//! the elapsed interval.
use chrono::{DateTime, Duration, Local};
use log::info;
use rusqlite::Connection;

use crate::dates;
use crate::error::{KronosError, Result};
use crate::managers::TimerManager;
use crate::store::preferences;
use crate::types::{Record, Timer, TimerTags, User};

const STOPWATCH_KEY: &str = "stopwatchStart";

pub fn start(user: &User, now: DateTime<Local>, conn: &Connection) -> Result<()> {
    if started_at(user, conn)?.is_some() {
        return Err(KronosError::StopwatchRunning);
    }
    preferences::set(
        &preferences::user_scope(&user.email),
        STOPWATCH_KEY,
        &now.to_rfc3339(),
        conn,
    )?;
    info!("event=stopwatch_start module=stopwatch user_id={}", user.id);
    Ok(())
}

pub fn started_at(user: &User, conn: &Connection) -> Result<Option<DateTime<Local>>> {
    let raw = preferences::get(&preferences::user_scope(&user.email), STOPWATCH_KEY, conn)?;
    Ok(raw.and_then(|value| {
        DateTime::parse_from_rfc3339(&value)
            .ok()
            .map(|dt| dt.with_timezone(&Local))
    }))
}

pub fn elapsed(user: &User, now: DateTime<Local>, conn: &Connection) -> Result<Option<Duration>> {
    Ok(started_at(user, conn)?.map(|start| now.signed_duration_since(start)))
}

/// Stops the stopwatch and returns the timer it measured. Times are kept to
/// the minute and `hours` follows from them. A run that crosses midnight is
/// refused and the stopwatch keeps running; `cancel` discards it.
pub fn stop(user: &User, tags: TimerTags, now: DateTime<Local>, conn: &Connection) -> Result<Timer> {
    let start = started_at(user, conn)?.ok_or(KronosError::StopwatchIdle)?;
    if now.date_naive() != start.date_naive() {
        return Err(KronosError::StopwatchOvernight);
    }
    let timer = Timer::from_times(
        tags,
        &dates::format_date(start.date_naive()),
        &dates::format_time(start.time()),
        &dates::format_time(now.time()),
    )?;
    clear(user, conn)?;
    info!(
        "event=stopwatch_stop module=stopwatch user_id={} hours={:.2}",
        user.id, timer.hours
    );
    Ok(timer)
}

/// Stops the stopwatch and stores its timer in one transaction, so a failed
/// write leaves the stopwatch running.
pub fn stop_and_save<'a>(
    user: &User,
    tags: TimerTags,
    now: DateTime<Local>,
    timers: &'a mut TimerManager,
    conn: &Connection,
) -> Result<&'a Record<Timer>> {
    let tx = conn.unchecked_transaction()?;
    let timer = stop(user, tags, now, &tx)?;
    let record = timers.add_timer(timer, &tx)?;
    tx.commit()?;
    Ok(record)
}

pub fn cancel(user: &User, conn: &Connection) -> Result<()> {
    if started_at(user, conn)?.is_none() {
        return Err(KronosError::StopwatchIdle);
    }
    clear(user, conn)?;
    info!("event=stopwatch_cancel module=stopwatch user_id={}", user.id);
    Ok(())
}

fn clear(user: &User, conn: &Connection) -> Result<()> {
    preferences::remove(&preferences::user_scope(&user.email), STOPWATCH_KEY, conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{auth, open_in_memory};
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        at_seconds(3, hour, minute, 0)
    }

    fn at_seconds(day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, day, hour, minute, second).unwrap()
    }

    #[test]
    fn stop_produces_timer_for_elapsed_time() {
        let conn = open_in_memory().unwrap();
        let user = auth::sign_up("vic@example.com", "pw", "pw", &conn).unwrap();
        start(&user, at(9, 0), &conn).unwrap();
        assert_eq!(
            elapsed(&user, at(9, 30), &conn).unwrap(),
            Some(Duration::minutes(30))
        );

        let timer = stop(
            &user,
            TimerTags {
                project: "Website".to_string(),
                ..TimerTags::default()
            },
            at(10, 30),
            &conn,
        )
        .unwrap();
        assert_eq!(timer.date, "3/6/2024");
        assert_eq!(timer.start_time, "09:00");
        assert_eq!(timer.end_time, "10:30");
        assert_eq!(timer.hours, 1.5);
        assert_eq!(started_at(&user, &conn).unwrap(), None);
    }

    #[test]
    fn double_start_and_idle_stop_are_errors() {
        let conn = open_in_memory().unwrap();
        let user = auth::sign_up("wes@example.com", "pw", "pw", &conn).unwrap();
        assert!(matches!(
            stop(&user, TimerTags::default(), at(9, 0), &conn),
            Err(KronosError::StopwatchIdle)
        ));
        start(&user, at(9, 0), &conn).unwrap();
        assert!(matches!(
            start(&user, at(9, 5), &conn),
            Err(KronosError::StopwatchRunning)
        ));
    }

    #[test]
    fn hours_match_the_stored_times() {
        let conn = open_in_memory().unwrap();
        let user = auth::sign_up("yan@example.com", "pw", "pw", &conn).unwrap();
        start(&user, at_seconds(3, 9, 0, 50), &conn).unwrap();
        let timer = stop(&user, TimerTags::default(), at_seconds(3, 9, 30, 10), &conn).unwrap();
        assert_eq!(timer.start_time, "09:00");
        assert_eq!(timer.end_time, "09:30");
        assert_eq!(timer.hours, 0.5);
        assert_eq!(
            timer.hours,
            dates::hours_between(&timer.start_time, &timer.end_time).unwrap()
        );
    }

    #[test]
    fn overnight_run_is_refused_and_keeps_running() {
        let conn = open_in_memory().unwrap();
        let user = auth::sign_up("zed@example.com", "pw", "pw", &conn).unwrap();
        start(&user, at_seconds(3, 23, 0, 0), &conn).unwrap();
        assert!(matches!(
            stop(&user, TimerTags::default(), at_seconds(4, 1, 0, 0), &conn),
            Err(KronosError::StopwatchOvernight)
        ));
        assert!(started_at(&user, &conn).unwrap().is_some());

        cancel(&user, &conn).unwrap();
        assert_eq!(started_at(&user, &conn).unwrap(), None);
        assert!(matches!(cancel(&user, &conn), Err(KronosError::StopwatchIdle)));
    }

    #[test]
    fn failed_save_leaves_stopwatch_running() {
        let conn = open_in_memory().unwrap();
        let user = auth::sign_up("abe@example.com", "pw", "pw", &conn).unwrap();
        start(&user, at(9, 0), &conn).unwrap();
        conn.execute_batch("DROP TABLE documents;").unwrap();

        let mut timers = TimerManager::new(Some(user.id));
        assert!(stop_and_save(&user, TimerTags::default(), at(10, 0), &mut timers, &conn).is_err());
        assert_eq!(started_at(&user, &conn).unwrap(), Some(at(9, 0)));
    }

    #[test]
    fn stop_and_save_stores_the_timer() {
        let conn = open_in_memory().unwrap();
        let user = auth::sign_up("bea@example.com", "pw", "pw", &conn).unwrap();
        start(&user, at(9, 0), &conn).unwrap();

        let mut timers = TimerManager::new(Some(user.id));
        let record = stop_and_save(&user, TimerTags::default(), at(9, 45), &mut timers, &conn).unwrap();
        assert!(record.id.is_some());
        assert_eq!(record.data.hours, 0.75);
        assert_eq!(started_at(&user, &conn).unwrap(), None);
    }
}
