//! Local store: per-user document collections, accounts and preferences.
pub mod auth;
mod documents;
mod migrations;
pub mod preferences;

use std::path::Path;

use log::info;
use rusqlite::Connection;

use crate::error::Result;

pub use documents::{
    add_document, delete_document, query_document_by_id, query_documents,
    query_documents_by_field, update_document,
};

/// Opens (or creates) the SQLite database and runs migrations.
pub fn init(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    migrations::run_migrations(&conn)?;
    info!("event=store_open module=store status=ok path={}", db_path.display());
    Ok(conn)
}

/// Opens a private database, used by tests.
#[cfg(test)]
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Returns the default database path inside the user's data directory.
/// Falls back to `./kronos.db` when no data dir is found.
pub fn default_db_path() -> std::path::PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let kronos_dir = data_dir.join("kronos");
        std::fs::create_dir_all(&kronos_dir).ok();
        kronos_dir.join("kronos.db")
    } else {
        "kronos.db".into()
    }
}
