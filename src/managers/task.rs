use log::info;
use rusqlite::Connection;

use super::Manager;
use crate::error::{KronosError, Result};
use crate::store;
use crate::types::{Record, Task};

impl Manager<Task> {
    pub fn add_task(&mut self, task: Task, conn: &Connection) -> Result<&Record<Task>> {
        if task.title.trim().is_empty() || task.description.trim().is_empty() {
            return Err(KronosError::Validation(
                "All fields are required".to_string(),
            ));
        }
        self.push(task, conn)
    }

    /// Removes the task at `index` locally and deletes its document by id.
    pub fn remove_task(&mut self, index: usize, conn: &Connection) -> Result<Record<Task>> {
        if index >= self.items.len() {
            return Err(KronosError::NoSuchRecord(index));
        }
        let record = self.items.remove(index);
        if let (Some(user_id), Some(id)) = (self.user, record.id) {
            store::delete_document::<Task>(user_id, id, conn)?;
            info!("event=remove module=managers collection=tasks id={id}");
        }
        Ok(record)
    }

    pub fn set_completed(&mut self, index: usize, completed: bool, conn: &Connection) -> Result<()> {
        let user = self.user;
        let record = self.record_mut(index)?;
        record.data.is_completed = completed;
        if let (Some(user_id), Some(id)) = (user, record.id) {
            store::update_document(user_id, id, &record.data, conn)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::KronosError;
    use crate::managers::TaskManager;
    use crate::store::{auth, open_in_memory};
    use crate::types::Task;

    fn task(title: &str, description: &str) -> Task {
        Task {
            title: title.to_string(),
            description: description.to_string(),
            is_completed: false,
        }
    }

    #[test]
    fn blank_fields_are_rejected() {
        let conn = open_in_memory().unwrap();
        let mut manager = TaskManager::new(None);
        assert!(matches!(
            manager.add_task(task("Title", ""), &conn),
            Err(KronosError::Validation(_))
        ));
        assert!(manager.items().is_empty());
    }

    #[test]
    fn removing_one_of_two_identical_tasks_keeps_the_other() {
        let conn = open_in_memory().unwrap();
        let user = auth::sign_up("pat@example.com", "pw", "pw", &conn).unwrap();
        let mut manager = TaskManager::new(Some(user.id));
        manager.add_task(task("Standup", "Daily"), &conn).unwrap();
        let kept = manager.add_task(task("Standup", "Daily"), &conn).unwrap().id;

        manager.remove_task(0, &conn).unwrap();

        let mut reloaded = TaskManager::new(Some(user.id));
        reloaded.fetch(&conn).unwrap();
        assert_eq!(reloaded.items().len(), 1);
        assert_eq!(reloaded.items()[0].id, kept);
    }

    #[test]
    fn completion_is_persisted() {
        let conn = open_in_memory().unwrap();
        let user = auth::sign_up("quinn@example.com", "pw", "pw", &conn).unwrap();
        let mut manager = TaskManager::new(Some(user.id));
        manager.add_task(task("Ship", "v1"), &conn).unwrap();
        manager.set_completed(0, true, &conn).unwrap();
        assert!(matches!(
            manager.set_completed(3, true, &conn),
            Err(KronosError::NoSuchRecord(3))
        ));

        let mut reloaded = TaskManager::new(Some(user.id));
        reloaded.fetch(&conn).unwrap();
        assert!(reloaded.items()[0].data.is_completed);
    }
}
