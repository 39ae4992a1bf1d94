//! Per-user document collections: create, list, query-by-field, update, delete.
use chrono::Local;
use rusqlite::Connection;

use crate::error::Result;
use crate::types::{Document, DocumentId, Record, UserId};

pub fn add_document<T: Document>(user_id: UserId, doc: &T, conn: &Connection) -> Result<DocumentId> {
    let body = serde_json::to_string(doc)?;
    conn.execute(
        "INSERT INTO documents (user_id, collection, body, created_at) VALUES (?1, ?2, ?3, ?4)",
        (user_id, T::COLLECTION, body, Local::now().to_rfc3339()),
    )?;
    Ok(conn.last_insert_rowid() as DocumentId)
}

pub fn query_documents<T: Document>(user_id: UserId, conn: &Connection) -> Result<Vec<Record<T>>> {
    let mut stmt = conn.prepare(
        "SELECT id, body FROM documents WHERE user_id = ?1 AND collection = ?2 ORDER BY id",
    )?;
    let rows = stmt.query_map((user_id, T::COLLECTION), |row| {
        Ok((row.get::<_, DocumentId>(0)?, row.get::<_, String>(1)?))
    })?;
    let mut records = Vec::new();
    for row in rows {
        let (id, body) = row?;
        records.push(Record {
            id: Some(id),
            data: serde_json::from_str(&body)?,
        });
    }
    Ok(records)
}

/// Documents whose top-level string `field` equals `value`.
pub fn query_documents_by_field<T: Document>(
    user_id: UserId,
    field: &str,
    value: &str,
    conn: &Connection,
) -> Result<Vec<Record<T>>> {
    let path = format!("$.{field}");
    let mut stmt = conn.prepare(
        "SELECT id, body FROM documents
         WHERE user_id = ?1 AND collection = ?2 AND json_extract(body, ?3) = ?4
         ORDER BY id",
    )?;
    let rows = stmt.query_map((user_id, T::COLLECTION, path, value), |row| {
        Ok((row.get::<_, DocumentId>(0)?, row.get::<_, String>(1)?))
    })?;
    let mut records = Vec::new();
    for row in rows {
        let (id, body) = row?;
        records.push(Record {
            id: Some(id),
            data: serde_json::from_str(&body)?,
        });
    }
    Ok(records)
}

pub fn query_document_by_id<T: Document>(
    user_id: UserId,
    id: DocumentId,
    conn: &Connection,
) -> Result<Option<Record<T>>> {
    let mut stmt = conn.prepare(
        "SELECT body FROM documents WHERE id = ?1 AND user_id = ?2 AND collection = ?3",
    )?;
    let mut rows = stmt.query((id, user_id, T::COLLECTION))?;
    if let Some(row) = rows.next()? {
        let body: String = row.get(0)?;
        Ok(Some(Record {
            id: Some(id),
            data: serde_json::from_str(&body)?,
        }))
    } else {
        Ok(None)
    }
}

pub fn update_document<T: Document>(
    user_id: UserId,
    id: DocumentId,
    doc: &T,
    conn: &Connection,
) -> Result<bool> {
    let body = serde_json::to_string(doc)?;
    let changed = conn.execute(
        "UPDATE documents SET body = ?1 WHERE id = ?2 AND user_id = ?3 AND collection = ?4",
        (body, id, user_id, T::COLLECTION),
    )?;
    Ok(changed > 0)
}

pub fn delete_document<T: Document>(user_id: UserId, id: DocumentId, conn: &Connection) -> Result<bool> {
    let changed = conn.execute(
        "DELETE FROM documents WHERE id = ?1 AND user_id = ?2 AND collection = ?3",
        (id, user_id, T::COLLECTION),
    )?;
    Ok(changed > 0)
}
