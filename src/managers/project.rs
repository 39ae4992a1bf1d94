use rusqlite::Connection;

use super::Manager;
use crate::error::{KronosError, Result};
use crate::types::{Project, Record};
use crate::validation::{self, is_letters, is_plain_text};

impl Manager<Project> {
    /// Adds a project with a unique name. All three fields are required; the
    /// client is letters only, name and description letters, digits and spaces.
    pub fn add_project(&mut self, mut project: Project, conn: &Connection) -> Result<&Record<Project>> {
        project.project_name = project.project_name.trim().to_string();
        project.client = project.client.trim().to_string();
        project.description = project.description.trim().to_string();
        validation::require(
            "Project name",
            &project.project_name,
            is_plain_text,
            "letters, digits or spaces",
        )?;
        validation::require("Client", &project.client, is_letters, "letters")?;
        validation::require(
            "Description",
            &project.description,
            is_plain_text,
            "letters, digits or spaces",
        )?;
        if self.find_by_name(&project.project_name).is_some() {
            return Err(KronosError::Duplicate {
                kind: "Project",
                name: project.project_name,
            });
        }
        self.push(project, conn)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Project> {
        self.items
            .iter()
            .map(|record| &record.data)
            .find(|project| project.project_name == name)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::KronosError;
    use crate::managers::ProjectManager;
    use crate::store::{auth, open_in_memory};
    use crate::types::Project;

    fn project(name: &str) -> Project {
        Project {
            project_name: name.to_string(),
            client: "Acme".to_string(),
            description: "Marketing site".to_string(),
        }
    }

    #[test]
    fn blank_name_is_rejected_and_list_unchanged() {
        let conn = open_in_memory().unwrap();
        let user = auth::sign_up("max@example.com", "pw", "pw", &conn).unwrap();
        let mut manager = ProjectManager::new(Some(user.id));
        manager.add_project(project("Website"), &conn).unwrap();

        let err = manager.add_project(project("  "), &conn).unwrap_err();
        assert!(matches!(err, KronosError::Validation(_)));
        assert_eq!(manager.items().len(), 1);

        manager.fetch(&conn).unwrap();
        assert_eq!(manager.items().len(), 1);
    }

    #[test]
    fn every_field_is_required_and_checked() {
        let conn = open_in_memory().unwrap();
        let mut manager = ProjectManager::new(None);
        let rejected = [
            Project { client: String::new(), ..project("Website") },
            Project { description: " ".to_string(), ..project("Website") },
            Project { client: "Acme Corp".to_string(), ..project("Website") },
            Project { client: "Acme2".to_string(), ..project("Website") },
            project("Web-site"),
            Project { description: "Landing page!".to_string(), ..project("Website") },
        ];
        for candidate in rejected {
            assert!(matches!(
                manager.add_project(candidate, &conn),
                Err(KronosError::Validation(_))
            ));
        }
        assert!(manager.items().is_empty());

        manager.add_project(project("Website 2"), &conn).unwrap();
        assert_eq!(manager.items().len(), 1);
    }

    #[test]
    fn duplicate_name_is_rejected_after_fetch() {
        let conn = open_in_memory().unwrap();
        let user = auth::sign_up("nia@example.com", "pw", "pw", &conn).unwrap();
        ProjectManager::new(Some(user.id))
            .add_project(project("Website"), &conn)
            .unwrap();

        let mut manager = ProjectManager::new(Some(user.id));
        manager.fetch(&conn).unwrap();
        assert!(matches!(
            manager.add_project(project("Website"), &conn),
            Err(KronosError::Duplicate { .. })
        ));
        assert_eq!(manager.find_by_name("Website").unwrap().client, "Acme");
    }
}
