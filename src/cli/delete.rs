use anyhow::{anyhow, Result};

use crate::db::Database;

/// Execute the delete command
pub fn run_delete(db: &Database, identifier: &str) -> Result<()> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(anyhow!("Identifier cannot be empty."));
    }

    match db.get_contact(identifier)? {
        Some(contact) => {
            db.delete_contact(identifier)?;
            println!("Deleted: {} <{}>", contact.name, contact.email);
        }
        None => {
            println!("No contact found with ID: {}", identifier);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contact;

    #[test]
    fn test_delete_removes_the_contact() {
        let db = Database::open_memory().unwrap();
        let contact = Contact::new("Ada".to_string(), "ada@example.com".to_string());
        db.insert_contact(&contact, &[]).unwrap();

        run_delete(&db, &contact.id).unwrap();
        assert!(db.get_contact(&contact.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_unknown_id_is_not_an_error() {
        let db = Database::open_memory().unwrap();
        assert!(run_delete(&db, "user-999").is_ok());
    }

    #[test]
    fn test_delete_rejects_empty_identifier() {
        let db = Database::open_memory().unwrap();
        assert!(run_delete(&db, "   ").is_err());
    }
}
