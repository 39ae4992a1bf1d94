//! In-memory collections mirrored to the signed-in user's store documents.
//!
//! Each manager keeps the records of one entity type. `fetch` replaces the
//! list wholesale from the store. Adds append locally first, then persist;
//! while signed out the persistence step is skipped.
mod category;
mod project;
mod task;
mod timer;

use log::{debug, info};
use rusqlite::Connection;

use crate::error::{KronosError, Result};
use crate::store;
use crate::types::{Category, Document, Project, Record, Task, Timer, UserId};

pub type CategoryManager = Manager<Category>;
pub type ProjectManager = Manager<Project>;
pub type TimerManager = Manager<Timer>;
pub type TaskManager = Manager<Task>;

#[derive(Clone, Debug)]
pub struct Manager<T> {
    user: Option<UserId>,
    items: Vec<Record<T>>,
}

impl<T: Document> Manager<T> {
    pub fn new(user: Option<UserId>) -> Self {
        Self {
            user,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Record<T>] {
        &self.items
    }

    /// Plain entity values, in list order.
    pub fn values(&self) -> Vec<T> {
        self.items.iter().map(|record| record.data.clone()).collect()
    }

    /// Replaces the list with the user's stored documents.
    pub fn fetch(&mut self, conn: &Connection) -> Result<()> {
        let user_id = self.user.ok_or(KronosError::NotSignedIn)?;
        self.items = store::query_documents(user_id, conn)?;
        debug!(
            "event=fetch module=managers collection={} count={}",
            T::COLLECTION,
            self.items.len()
        );
        Ok(())
    }

    /// Appends `data` and persists it. The local entry is kept even if the
    /// store write fails.
    fn push(&mut self, data: T, conn: &Connection) -> Result<&Record<T>> {
        self.items.push(Record { id: None, data });
        let index = self.items.len() - 1;
        match self.user {
            Some(user_id) => {
                let id = store::add_document(user_id, &self.items[index].data, conn)?;
                self.items[index].id = Some(id);
                info!(
                    "event=add module=managers collection={} id={id}",
                    T::COLLECTION
                );
            }
            None => debug!(
                "event=add module=managers collection={} status=local_only",
                T::COLLECTION
            ),
        }
        Ok(&self.items[index])
    }

    fn record_mut(&mut self, index: usize) -> Result<&mut Record<T>> {
        self.items
            .get_mut(index)
            .ok_or(KronosError::NoSuchRecord(index))
    }
}
