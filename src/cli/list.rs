use anyhow::{anyhow, Result};

use crate::cli::ListArgs;
use crate::db::{ContactQuery, Database};
use crate::models::{Contact, FilterCriteria};
use crate::workspace::Workspace;

const NAME_WIDTH: usize = 24;
const EMAIL_WIDTH: usize = 28;
const COMPANY_WIDTH: usize = 18;
const STATUS_WIDTH: usize = 8;

/// Execute the list command: load the whole store into a workspace,
/// filter in memory, print the surviving view.
pub fn run_list(db: &Database, args: ListArgs) -> Result<()> {
    let mut workspace = Workspace::new();
    workspace.replace_contacts(db.list_contacts(&ContactQuery::default())?);
    workspace.replace_labels(db.list_labels()?);

    let criteria = criteria_from_args(&workspace, &args)?;
    print_contacts(&workspace, &criteria);
    Ok(())
}

/// Translate list flags into filter criteria. Label names are
/// resolved against the catalog; an unknown name is an error rather
/// than a silently empty result.
fn criteria_from_args(workspace: &Workspace, args: &ListArgs) -> Result<FilterCriteria> {
    let mut criteria = FilterCriteria::default();

    if let Some(search) = &args.search {
        criteria.search = search.clone();
    }
    criteria.statuses = args.status.clone();
    for name in &args.label {
        let label = workspace
            .find_label(name)
            .ok_or_else(|| anyhow!("unknown label: {}", name))?;
        criteria.label_ids.push(label.id.clone());
    }
    if let Some(company) = &args.company {
        criteria.company = company.clone();
    }
    if let Some(role) = &args.role {
        criteria.role = role.clone();
    }
    criteria.date_from = args.from.clone();
    criteria.date_to = args.to.clone();

    Ok(criteria)
}

fn print_contacts(workspace: &Workspace, criteria: &FilterCriteria) {
    let total = workspace.total();
    if total == 0 {
        println!("No contacts.");
        return;
    }

    let visible = workspace.visible(criteria);

    print_table_header();
    for contact in &visible {
        print_contact_row(contact);
    }
    println!("\nShowing {} of {} contacts", visible.len(), total);
}

fn print_table_header() {
    println!(
        "{:<name_w$}  {:<email_w$}  {:<company_w$}  {:<status_w$}  LABELS",
        "NAME",
        "EMAIL",
        "COMPANY",
        "STATUS",
        name_w = NAME_WIDTH,
        email_w = EMAIL_WIDTH,
        company_w = COMPANY_WIDTH,
        status_w = STATUS_WIDTH
    );
}

fn print_contact_row(contact: &Contact) {
    let labels = contact
        .labels
        .iter()
        .map(|l| l.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    println!(
        "{:<name_w$}  {:<email_w$}  {:<company_w$}  {:<status_w$}  {}",
        truncate(&contact.name, NAME_WIDTH),
        truncate(&contact.email, EMAIL_WIDTH),
        truncate(contact.company.as_deref().unwrap_or(""), COMPANY_WIDTH),
        contact.status.as_str(),
        labels,
        name_w = NAME_WIDTH,
        email_w = EMAIL_WIDTH,
        company_w = COMPANY_WIDTH,
        status_w = STATUS_WIDTH
    );
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
