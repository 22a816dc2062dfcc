use anyhow::{anyhow, Result};

use crate::cli::AddArgs;
use crate::db::Database;
use crate::models::Contact;

/// Execute the add command
pub fn run_add(db: &Database, args: AddArgs) -> Result<()> {
    let name = args.name.trim().to_string();
    let email = args.email.trim().to_string();
    if name.is_empty() || email.is_empty() {
        return Err(anyhow!("Name and email are required"));
    }

    let mut contact = Contact::new(name, email);
    contact.phone = args.phone;
    contact.company = args.company;
    contact.role = args.role;
    contact.status = args.status.unwrap_or_default();
    contact.last_contact = args.last_contact;
    contact.notes = args.notes;

    let label_ids = resolve_label_names(db, &args.label)?;
    db.insert_contact(&contact, &label_ids)?;

    println!("Created: {} <{}>", contact.name, contact.email);
    println!("  id: {}", contact.id);
    Ok(())
}

/// Map label names from the command line to catalog ids. Matching is
/// case-insensitive so `-l vip` finds the VIP label.
fn resolve_label_names(db: &Database, names: &[String]) -> Result<Vec<String>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let catalog = db.list_labels()?;
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let label = catalog
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| anyhow!("unknown label: {}", name))?;
        ids.push(label.id.clone());
    }
    Ok(ids)
}
