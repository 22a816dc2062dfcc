use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::{ContactStatus, LabelColor};

pub mod add;
pub mod delete;
pub mod labels;
pub mod list;
pub mod search;
pub mod seed;
pub mod serve;
pub mod show;

pub use add::run_add;
pub use delete::run_delete;
pub use labels::run_labels;
pub use list::run_list;
pub use search::run_search;
pub use seed::run_seed;
pub use serve::run_serve;
pub use show::run_show;

#[derive(Parser)]
#[command(name = "crmd")]
#[command(about = "Small CRM: contact store, filtering, and a REST API")]
#[command(version)]
pub struct Cli {
    /// Path to the SQLite store (defaults to the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the REST API server in the foreground
    Serve(ServeArgs),
    /// List contacts, narrowed by filter flags
    List(ListArgs),
    /// Search contacts across name, email, company, and label names
    Search(SearchArgs),
    /// Show full details for a contact
    Show(ShowArgs),
    /// Add a new contact
    Add(AddArgs),
    /// Delete a contact by id
    Delete(DeleteArgs),
    /// Inspect or extend the label catalog
    Labels(LabelsArgs),
    /// Insert sample contacts for demos
    Seed,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = crate::api::DEFAULT_PORT)]
    pub port: u16,
}

#[derive(Args)]
pub struct ListArgs {
    /// Substring to match against name, email, company, and label names
    #[arg(short, long)]
    pub search: Option<String>,
    /// Keep only these statuses (repeatable)
    #[arg(long, value_name = "STATUS")]
    pub status: Vec<ContactStatus>,
    /// Keep only contacts carrying this label (repeatable, by name)
    #[arg(short, long, value_name = "NAME")]
    pub label: Vec<String>,
    /// Company substring
    #[arg(short, long)]
    pub company: Option<String>,
    /// Role substring
    #[arg(short, long)]
    pub role: Option<String>,
    /// Earliest last-contact date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,
    /// Latest last-contact date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    pub query: String,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Contact id or email address
    pub identifier: String,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(short, long)]
    pub name: String,
    #[arg(short, long)]
    pub email: String,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(short, long)]
    pub company: Option<String>,
    #[arg(short, long)]
    pub role: Option<String>,
    /// active, inactive, or pending (default active)
    #[arg(short, long)]
    pub status: Option<ContactStatus>,
    /// Date of last touch (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub last_contact: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Attach a label by name (repeatable)
    #[arg(short, long, value_name = "NAME")]
    pub label: Vec<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Contact id
    pub id: String,
}

#[derive(Args)]
pub struct LabelsArgs {
    #[command(subcommand)]
    pub command: LabelsCommand,
}

#[derive(Subcommand)]
pub enum LabelsCommand {
    /// List the label catalog
    List,
    /// Add a label to the catalog
    Add(LabelAddArgs),
}

#[derive(Args)]
pub struct LabelAddArgs {
    /// Display name, unique across the catalog
    pub name: String,
    /// One of blue, green, yellow, purple, red, gray
    pub color: LabelColor,
}
