use clap::Parser;
use crmd::cli::{
    run_add, run_delete, run_labels, run_list, run_search, run_seed, run_serve, run_show, Cli,
    Commands,
};
use crmd::db::Database;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = crmd::logging::init("info")?;

    let db_path = match cli.db {
        Some(path) => path,
        None => Database::default_path()?,
    };

    // Open once up front so migrations and the label catalog are in
    // place before any command (including serve) touches the store.
    let db = Database::open_at(db_path.clone())?;

    match cli.command {
        Commands::Serve(args) => {
            run_serve(db_path, args.port)?;
        }
        Commands::List(args) => {
            run_list(&db, args)?;
        }
        Commands::Search(args) => {
            run_search(&db, &args.query)?;
        }
        Commands::Show(args) => {
            run_show(&db, &args.identifier)?;
        }
        Commands::Add(args) => {
            run_add(&db, args)?;
        }
        Commands::Delete(args) => {
            run_delete(&db, &args.id)?;
        }
        Commands::Labels(args) => {
            run_labels(&db, args.command)?;
        }
        Commands::Seed => {
            run_seed(&db)?;
        }
    }

    Ok(())
}
