//! Email/password accounts and the signed-in session.
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Local;
use log::{info, warn};
use pbkdf2::pbkdf2_hmac;
use rusqlite::Connection;
use sha2::Sha256;

use crate::error::{KronosError, Result};
use crate::store::preferences;
use crate::types::{User, UserId};
use crate::validation;

const PBKDF2_ITERATIONS: u32 = 100_000;
const CREDENTIALS_SCOPE: &str = "user_credentials";
const EMAIL_KEY: &str = "email";
const UID_KEY: &str = "uid";

pub fn sign_up(email: &str, password: &str, confirm_password: &str, conn: &Connection) -> Result<User> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(KronosError::Validation("Fields cannot be empty".to_string()));
    }
    check_email(email)?;
    if password != confirm_password {
        return Err(KronosError::PasswordMismatch);
    }
    if query_user_by_email(email, conn)?.is_some() {
        return Err(KronosError::EmailTaken(email.to_string()));
    }

    let salt: [u8; 16] = rand::random();
    let hash = derive_key(password, &salt);
    conn.execute(
        "INSERT INTO users (email, password_hash, salt, created_at) VALUES (?1, ?2, ?3, ?4)",
        (
            email,
            STANDARD.encode(hash),
            STANDARD.encode(salt),
            Local::now().to_rfc3339(),
        ),
    )?;
    let id = conn.last_insert_rowid() as UserId;
    info!("event=sign_up module=auth status=ok user_id={id}");
    Ok(User {
        id,
        email: email.to_string(),
    })
}

/// Verifies the credentials and remembers the user as signed in.
pub fn sign_in(email: &str, password: &str, conn: &Connection) -> Result<User> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(KronosError::Validation("Fields cannot be empty".to_string()));
    }
    check_email(email)?;
    let account = conn
        .prepare("SELECT id, password_hash, salt FROM users WHERE email = ?1")?
        .query_map([email], |row| {
            Ok((
                row.get::<_, UserId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?
        .next()
        .transpose()?;
    let Some((id, stored_hash, salt)) = account else {
        warn!("event=sign_in module=auth status=unknown_email");
        return Err(KronosError::InvalidCredentials);
    };
    let salt = STANDARD.decode(salt)?;

    if STANDARD.encode(derive_key(password, &salt)) != stored_hash {
        warn!("event=sign_in module=auth status=bad_password user_id={id}");
        return Err(KronosError::InvalidCredentials);
    }

    preferences::set(CREDENTIALS_SCOPE, EMAIL_KEY, email, conn)?;
    preferences::set(CREDENTIALS_SCOPE, UID_KEY, &id.to_string(), conn)?;
    info!("event=sign_in module=auth status=ok user_id={id}");
    Ok(User {
        id,
        email: email.to_string(),
    })
}

pub fn sign_out(conn: &Connection) -> Result<()> {
    preferences::remove(CREDENTIALS_SCOPE, EMAIL_KEY, conn)?;
    preferences::remove(CREDENTIALS_SCOPE, UID_KEY, conn)?;
    Ok(())
}

/// The signed-in user, if the cached session still matches an account.
pub fn current_user(conn: &Connection) -> Result<Option<User>> {
    let Some(uid) = preferences::get(CREDENTIALS_SCOPE, UID_KEY, conn)? else {
        return Ok(None);
    };
    let Ok(id) = uid.parse::<UserId>() else {
        return Ok(None);
    };
    let mut stmt = conn.prepare("SELECT id, email FROM users WHERE id = ?1")?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(User {
            id: row.get(0)?,
            email: row.get(1)?,
        }))
    } else {
        Ok(None)
    }
}

pub fn query_user_by_email(email: &str, conn: &Connection) -> Result<Option<User>> {
    let mut stmt = conn.prepare("SELECT id, email FROM users WHERE email = ?1")?;
    let mut rows = stmt.query([email])?;
    if let Some(row) = rows.next()? {
        Ok(Some(User {
            id: row.get(0)?,
            email: row.get(1)?,
        }))
    } else {
        Ok(None)
    }
}

/// Reads the user's profile document (a flat JSON object).
pub fn query_profile(user_id: UserId, conn: &Connection) -> Result<serde_json::Value> {
    let body: String = conn.query_row(
        "SELECT profile FROM users WHERE id = ?1",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(serde_json::from_str(&body)?)
}

/// Replaces the user's profile document.
pub fn set_profile(user_id: UserId, profile: &serde_json::Value, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE users SET profile = ?1 WHERE id = ?2",
        (serde_json::to_string(profile)?, user_id),
    )?;
    Ok(())
}

fn check_email(email: &str) -> Result<()> {
    if validation::is_valid_email(email) {
        Ok(())
    } else {
        Err(KronosError::Validation(
            "Invalid email: use only letters, digits, '@' or '.'".to_string(),
        ))
    }
}

fn derive_key(password: &str, salt: &[u8]) -> [u8; 32] {
    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_in_memory;

    #[test]
    fn sign_up_then_sign_in() {
        let conn = open_in_memory().unwrap();
        let created = sign_up("erin@example.com", "secret", "secret", &conn).unwrap();
        assert!(current_user(&conn).unwrap().is_none());

        let signed_in = sign_in("erin@example.com", "secret", &conn).unwrap();
        assert_eq!(created, signed_in);
        assert_eq!(current_user(&conn).unwrap(), Some(signed_in));
        assert_eq!(
            preferences::get(CREDENTIALS_SCOPE, EMAIL_KEY, &conn).unwrap().as_deref(),
            Some("erin@example.com")
        );
    }

    #[test]
    fn sign_up_validates_input() {
        let conn = open_in_memory().unwrap();
        assert!(matches!(
            sign_up("", "a", "a", &conn),
            Err(KronosError::Validation(_))
        ));
        assert!(matches!(
            sign_up("frank@example.com", "a", "b", &conn),
            Err(KronosError::PasswordMismatch)
        ));
        sign_up("frank@example.com", "a", "a", &conn).unwrap();
        assert!(matches!(
            sign_up("frank@example.com", "a", "a", &conn),
            Err(KronosError::EmailTaken(_))
        ));
    }

    #[test]
    fn email_characters_are_restricted() {
        let conn = open_in_memory().unwrap();
        assert!(matches!(
            sign_up("jo+work@example.com", "pw", "pw", &conn),
            Err(KronosError::Validation(_))
        ));
        assert!(query_user_by_email("jo+work@example.com", &conn).unwrap().is_none());
        assert!(matches!(
            sign_in("jo work@example.com", "pw", &conn),
            Err(KronosError::Validation(_))
        ));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let conn = open_in_memory().unwrap();
        sign_up("gina@example.com", "right", "right", &conn).unwrap();
        assert!(matches!(
            sign_in("gina@example.com", "wrong", &conn),
            Err(KronosError::InvalidCredentials)
        ));
        assert!(matches!(
            sign_in("nobody@example.com", "right", &conn),
            Err(KronosError::InvalidCredentials)
        ));
        assert!(current_user(&conn).unwrap().is_none());
    }

    #[test]
    fn sign_out_clears_session() {
        let conn = open_in_memory().unwrap();
        sign_up("hal@example.com", "pw", "pw", &conn).unwrap();
        sign_in("hal@example.com", "pw", &conn).unwrap();
        sign_out(&conn).unwrap();
        assert!(current_user(&conn).unwrap().is_none());
    }

    #[test]
    fn profile_defaults_to_empty_object() {
        let conn = open_in_memory().unwrap();
        let user = sign_up("ivy@example.com", "pw", "pw", &conn).unwrap();
        assert_eq!(query_profile(user.id, &conn).unwrap(), serde_json::json!({}));
        set_profile(user.id, &serde_json::json!({"minGoal": "4"}), &conn).unwrap();
        assert_eq!(query_profile(user.id, &conn).unwrap()["minGoal"], "4");
    }
}
