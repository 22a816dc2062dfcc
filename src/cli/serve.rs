use anyhow::Result;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::ApiServer;

/// Execute the serve command (blocking until Ctrl+C).
pub fn run_serve(db_path: PathBuf, port: u16) -> Result<()> {
    let server = ApiServer::new(port, db_path)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    ctrlc_handler(shutdown_clone);

    println!("Starting CRM API server on port {}...", port);
    println!("Press Ctrl+C to stop");

    server.start(shutdown)?;
    println!("Server stopped");

    Ok(())
}

fn ctrlc_handler(shutdown: Arc<AtomicBool>) {
    let _ = ctrlc::set_handler(move || {
        println!("\nReceived Ctrl+C, shutting down...");
        shutdown.store(true, Ordering::SeqCst);
    });
}
