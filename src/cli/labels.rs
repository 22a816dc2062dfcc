use anyhow::Result;

use crate::cli::LabelsCommand;
use crate::db::Database;
use crate::models::Label;

/// Execute the labels subcommands
pub fn run_labels(db: &Database, command: LabelsCommand) -> Result<()> {
    match command {
        LabelsCommand::List => list_labels(db),
        LabelsCommand::Add(args) => {
            let label = Label::new(args.name, args.color);
            db.insert_label(&label)?;
            println!("Created label: {} ({})", label.name, label.color);
            Ok(())
        }
    }
}

fn list_labels(db: &Database) -> Result<()> {
    let labels = db.list_labels()?;
    if labels.is_empty() {
        println!("No labels.");
        return Ok(());
    }

    println!("{:<20}  {:<8}  ID", "NAME", "COLOR");
    for label in &labels {
        println!("{:<20}  {:<8}  {}", label.name, label.color.as_str(), label.id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::LabelAddArgs;
    use crate::models::LabelColor;

    #[test]
    fn test_list_shows_the_default_catalog() {
        let db = Database::open_memory().unwrap();
        let labels = db.list_labels().unwrap();
        assert_eq!(labels.len(), 5);
        assert!(run_labels(&db, LabelsCommand::List).is_ok());
    }

    #[test]
    fn test_add_creates_a_label() {
        let db = Database::open_memory().unwrap();
        let args = LabelAddArgs {
            name: "Investor".to_string(),
            color: LabelColor::Purple,
        };
        run_labels(&db, LabelsCommand::Add(args)).unwrap();

        let labels = db.list_labels().unwrap();
        assert!(labels.iter().any(|l| l.name == "Investor"));
    }

    #[test]
    fn test_add_rejects_a_duplicate_name() {
        let db = Database::open_memory().unwrap();
        let args = LabelAddArgs {
            name: "VIP".to_string(),
            color: LabelColor::Red,
        };
        let err = run_labels(&db, LabelsCommand::Add(args)).unwrap_err();
        assert!(err.to_string().contains("label name already in use"));
    }
}
