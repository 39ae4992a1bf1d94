//! Scoped key-value preferences (session cache, per-user goals, stopwatch).
use rusqlite::Connection;

use crate::error::Result;

/// Scope name for preferences belonging to one account.
pub fn user_scope(email: &str) -> String {
    format!("AppPreferences_{email}")
}

pub fn get(scope: &str, key: &str, conn: &Connection) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM preferences WHERE scope = ?1 AND key = ?2")?;
    let mut rows = stmt.query([scope, key])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row.get(0)?))
    } else {
        Ok(None)
    }
}

pub fn set(scope: &str, key: &str, value: &str, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO preferences (scope, key, value) VALUES (?1, ?2, ?3)
         ON CONFLICT (scope, key) DO UPDATE SET value = excluded.value",
        [scope, key, value],
    )?;
    Ok(())
}

pub fn remove(scope: &str, key: &str, conn: &Connection) -> Result<()> {
    conn.execute(
        "DELETE FROM preferences WHERE scope = ?1 AND key = ?2",
        [scope, key],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_in_memory;

    #[test]
    fn set_overwrites_and_remove_clears() {
        let conn = open_in_memory().unwrap();
        let scope = user_scope("jo@example.com");
        assert_eq!(get(&scope, "minGoal", &conn).unwrap(), None);

        set(&scope, "minGoal", "4", &conn).unwrap();
        set(&scope, "minGoal", "5", &conn).unwrap();
        assert_eq!(get(&scope, "minGoal", &conn).unwrap().as_deref(), Some("5"));
        assert_eq!(get("AppPreferences_other", "minGoal", &conn).unwrap(), None);

        remove(&scope, "minGoal", &conn).unwrap();
        assert_eq!(get(&scope, "minGoal", &conn).unwrap(), None);
    }
}
