use anyhow::Result;

use crate::db::{ContactQuery, Database};
use crate::models::FilterCriteria;
use crate::workspace::Workspace;

/// Execute the search command. A plain search-only filter run over
/// the whole store.
pub fn run_search(db: &Database, query: &str) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        println!("No query.");
        return Ok(());
    }

    let mut workspace = Workspace::new();
    workspace.replace_contacts(db.list_contacts(&ContactQuery::default())?);
    workspace.replace_labels(db.list_labels()?);

    let criteria = FilterCriteria {
        search: query.to_string(),
        ..Default::default()
    };
    let matches = workspace.visible(&criteria);

    if matches.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    for contact in &matches {
        let company = contact.company.as_deref().unwrap_or("-");
        let labels = contact
            .labels
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if labels.is_empty() {
            println!("{} <{}>  {}", contact.name, contact.email, company);
        } else {
            println!("{} <{}>  {}  [{}]", contact.name, contact.email, company, labels);
        }
    }
    println!("\n{} match(es)", matches.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contact;

    fn seeded_db() -> Database {
        let db = Database::open_memory().unwrap();

        let mut sarah = Contact::new("Sarah Johnson".to_string(), "sarah@techcorp.com".to_string());
        sarah.company = Some("TechCorp Solutions".to_string());
        db.insert_contact(&sarah, &["label-1".to_string()]).unwrap();

        let michael = Contact::new("Michael Chen".to_string(), "michael@innovate.io".to_string());
        db.insert_contact(&michael, &[]).unwrap();

        db
    }

    #[test]
    fn test_search_spans_company() {
        let db = seeded_db();
        let mut workspace = Workspace::new();
        workspace.replace_contacts(db.list_contacts(&ContactQuery::default()).unwrap());

        let criteria = FilterCriteria {
            search: "techcorp".to_string(),
            ..Default::default()
        };
        let matches = workspace.visible(&criteria);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Sarah Johnson");
    }

    #[test]
    fn test_search_spans_label_names() {
        let db = seeded_db();
        let mut workspace = Workspace::new();
        workspace.replace_contacts(db.list_contacts(&ContactQuery::default()).unwrap());

        // label-1 is the VIP label.
        let criteria = FilterCriteria {
            search: "vip".to_string(),
            ..Default::default()
        };
        let matches = workspace.visible(&criteria);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Sarah Johnson");
    }

    #[test]
    fn test_blank_query_prints_no_query() {
        let db = seeded_db();
        assert!(run_search(&db, "   ").is_ok());
    }
}
