//! Persistence of the user's min/max daily-hour goals.
///
/// Goals live in two places: the per-user preference scope and the user's
/// profile document. Loading prefers the profile and falls back to the
/// preferences.
use log::info;
use rusqlite::Connection;

use crate::error::{KronosError, Result};
use crate::store::{auth, preferences};
use crate::types::{Goals, User};

const MIN_GOAL_KEY: &str = "minGoal";
const MAX_GOAL_KEY: &str = "maxGoal";

pub fn save_goals(user: &User, goals: &Goals, conn: &Connection) -> Result<()> {
    if goals.min_goal.trim().is_empty() || goals.max_goal.trim().is_empty() {
        return Err(KronosError::Validation(
            "You cannot save empty values as hours".to_string(),
        ));
    }
    let tx = conn.unchecked_transaction()?;
    let scope = preferences::user_scope(&user.email);
    preferences::set(&scope, MIN_GOAL_KEY, goals.min_goal.trim(), &tx)?;
    preferences::set(&scope, MAX_GOAL_KEY, goals.max_goal.trim(), &tx)?;

    let mut profile = auth::query_profile(user.id, &tx)?;
    if !profile.is_object() {
        profile = serde_json::json!({});
    }
    profile[MIN_GOAL_KEY] = goals.min_goal.trim().into();
    profile[MAX_GOAL_KEY] = goals.max_goal.trim().into();
    auth::set_profile(user.id, &profile, &tx)?;
    tx.commit()?;
    info!("event=save_goals module=goals status=ok user_id={}", user.id);
    Ok(())
}

pub fn load_goals(user: &User, conn: &Connection) -> Result<Goals> {
    let profile = auth::query_profile(user.id, conn)?;
    let scope = preferences::user_scope(&user.email);
    let read = |key: &str| -> Result<String> {
        if let Some(value) = profile.get(key).and_then(|v| v.as_str()) {
            return Ok(value.to_string());
        }
        Ok(preferences::get(&scope, key, conn)?.unwrap_or_default())
    };
    Ok(Goals {
        min_goal: read(MIN_GOAL_KEY)?,
        max_goal: read(MAX_GOAL_KEY)?,
    })
}
