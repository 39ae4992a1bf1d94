use rusqlite::Connection;

use super::Manager;
use crate::color;
use crate::error::{KronosError, Result};
use crate::types::{Category, Record};
use crate::validation::{self, is_plain_text};

impl Manager<Category> {
    /// Adds a category with a unique, non-blank name. A missing color gets a
    /// random palette color.
    pub fn add_category(
        &mut self,
        name: &str,
        color: Option<String>,
        conn: &Connection,
    ) -> Result<&Record<Category>> {
        let name = name.trim();
        validation::require(
            "Category name",
            name,
            is_plain_text,
            "letters, digits or spaces",
        )?;
        if self.items.iter().any(|record| record.data.name == name) {
            return Err(KronosError::Duplicate {
                kind: "Category",
                name: name.to_string(),
            });
        }
        let color = match color {
            Some(c) if color::is_valid_hex(&c) => c,
            Some(c) => {
                return Err(KronosError::Validation(format!(
                    "Invalid color '{c}'. Please provide a hex code like #RRGGBB."
                )));
            }
            None => color::random_color(),
        };
        self.push(
            Category {
                name: name.to_string(),
                color,
                total_hours: 0.0,
            },
            conn,
        )
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Category> {
        self.items
            .iter()
            .map(|record| &record.data)
            .find(|category| category.name == name)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::KronosError;
    use crate::managers::CategoryManager;
    use crate::store::{auth, open_in_memory};

    #[test]
    fn rejects_blank_and_duplicate_names() {
        let conn = open_in_memory().unwrap();
        let user = auth::sign_up("lee@example.com", "pw", "pw", &conn).unwrap();
        let mut manager = CategoryManager::new(Some(user.id));

        assert!(matches!(
            manager.add_category("   ", None, &conn),
            Err(KronosError::Validation(_))
        ));
        manager
            .add_category("Design", Some("#FF5733".to_string()), &conn)
            .unwrap();
        assert!(matches!(
            manager.add_category("Design", None, &conn),
            Err(KronosError::Duplicate { .. })
        ));
        assert_eq!(manager.items().len(), 1);
    }

    #[test]
    fn rejects_bad_color_and_fills_missing_one() {
        let conn = open_in_memory().unwrap();
        let mut manager = CategoryManager::new(None);
        assert!(matches!(
            manager.add_category("Research", Some("red".to_string()), &conn),
            Err(KronosError::Validation(_))
        ));
        let record = manager.add_category("Research", None, &conn).unwrap();
        assert!(crate::color::is_valid_hex(&record.data.color));
        assert!(manager.find_by_name("Research").is_some());
    }

    #[test]
    fn name_limited_to_letters_digits_and_spaces() {
        let conn = open_in_memory().unwrap();
        let mut manager = CategoryManager::new(None);
        assert!(matches!(
            manager.add_category("R&D", None, &conn),
            Err(KronosError::Validation(_))
        ));
        assert!(manager.items().is_empty());
        manager.add_category("Deep work 2", None, &conn).unwrap();
    }
}
