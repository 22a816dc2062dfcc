use anyhow::Result;

use crate::db::Database;
use crate::models::Contact;

/// Execute the show command. The identifier is tried as an id first,
/// then as an email address.
pub fn run_show(db: &Database, identifier: &str) -> Result<()> {
    let identifier = identifier.trim();

    let contact = match db.get_contact(identifier)? {
        Some(contact) => Some(contact),
        None => db.get_contact_by_email(identifier)?,
    };

    match contact {
        Some(contact) => print_contact(&contact),
        None => println!("No contact found: {}", identifier),
    }

    Ok(())
}

/// Print a full contact with clean formatting (only non-empty fields).
fn print_contact(contact: &Contact) {
    println!("{}\n", contact.name);

    match (&contact.role, &contact.company) {
        (Some(role), Some(company)) => println!("  {} at {}", role, company),
        (Some(role), None) => println!("  {}", role),
        (None, Some(company)) => println!("  {}", company),
        (None, None) => {}
    }

    println!("  {}", contact.email);
    if let Some(phone) = &contact.phone {
        println!("  {}", phone);
    }

    println!("  status: {}", contact.status);
    if !contact.labels.is_empty() {
        let labels = contact
            .labels
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  labels: {}", labels);
    }
    if let Some(last_contact) = &contact.last_contact {
        println!("  last contact: {}", last_contact);
    }

    if let Some(notes) = &contact.notes {
        if !notes.is_empty() {
            println!("\n  {}", notes);
        }
    }

    println!("\n  id: {}", contact.id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_resolves_by_id_and_email() {
        let db = Database::open_memory().unwrap();
        let contact = Contact::new("Ada".to_string(), "ada@example.com".to_string());
        db.insert_contact(&contact, &[]).unwrap();

        assert!(db.get_contact(&contact.id).unwrap().is_some());
        assert!(db.get_contact_by_email("ada@example.com").unwrap().is_some());
        assert!(run_show(&db, &contact.id).is_ok());
        assert!(run_show(&db, "ada@example.com").is_ok());
        assert!(run_show(&db, "nobody@example.com").is_ok());
    }
}
