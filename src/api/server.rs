//! HTTP server exposing the contact store as a JSON API.

use anyhow::Result;
use log::{error, info, warn};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::query::{decode_segment, parse_contact_query, split_target};
use super::types::{ContactBody, ErrorBody, FiltersBody, InfoBody, LabelBody, MessageBody};
use crate::db::{Database, StoreError};
use crate::models::Label;

/// Port the bundled web client expects.
pub const DEFAULT_PORT: u16 = 3001;

/// HTTP server for the contact API.
pub struct ApiServer {
    port: u16,
    db_path: PathBuf,
}

impl ApiServer {
    /// Create a new API server.
    pub fn new(port: u16, db_path: PathBuf) -> Result<Self> {
        // Request handlers open their own connections; verify the
        // store is reachable once up front.
        let db = Database::open_at(db_path.clone())?;
        let _ = db.count_contacts()?;

        Ok(Self { port, db_path })
    }

    /// Start the server (blocking).
    pub fn start(&self, shutdown: Arc<AtomicBool>) -> Result<()> {
        let listener = TcpListener::bind(format!("0.0.0.0:{}", self.port))?;
        listener.set_nonblocking(true)?;

        info!("CRM API listening on 0.0.0.0:{}", self.port);

        while !shutdown.load(Ordering::SeqCst) {
            match listener.accept() {
                Ok((stream, _)) => {
                    if let Err(e) = self.handle_connection(stream) {
                        warn!("request error: {}", e);
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
                Err(e) => {
                    error!("accept error: {}", e);
                }
            }
        }

        Ok(())
    }

    fn handle_connection(&self, mut stream: TcpStream) -> Result<()> {
        stream.set_read_timeout(Some(std::time::Duration::from_secs(30)))?;
        stream.set_write_timeout(Some(std::time::Duration::from_secs(30)))?;

        let mut reader = BufReader::new(stream.try_clone()?);
        let mut request_line = String::new();
        reader.read_line(&mut request_line)?;

        let parts: Vec<&str> = request_line.trim().split_whitespace().collect();
        if parts.len() < 2 {
            let (status, body) = error_body(400, "Bad request line")?;
            return self.send_json(&mut stream, status, &body);
        }

        let method = parts[0];
        let target = parts[1];

        // Only content-length matters; other headers are skipped.
        let mut content_length = 0usize;
        loop {
            let mut header_line = String::new();
            reader.read_line(&mut header_line)?;
            let header_line = header_line.trim();
            if header_line.is_empty() {
                break;
            }
            if let Some((key, value)) = header_line.split_once(':') {
                if key.trim().eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }

        let mut body = vec![0u8; content_length];
        if content_length > 0 {
            reader.read_exact(&mut body)?;
        }

        let (status, response_body) = self.route(method, target, &body)?;
        self.send_json(&mut stream, status, &response_body)?;

        info!("{} {} {}", method, target, status);
        Ok(())
    }

    /// Dispatch a request to its handler. Returns the status code and
    /// the serialized JSON body to put on the wire.
    fn route(&self, method: &str, target: &str, body: &[u8]) -> Result<(u16, String)> {
        let (route, _) = split_target(target);

        match (method, route) {
            ("GET", "/") => json_body(200, &InfoBody::current()),

            ("GET", "/api/users") => self.handle_list_contacts(target),
            ("POST", "/api/users") => self.handle_create_contact(body),
            ("GET", p) if p.starts_with("/api/users/") => {
                let id = decode_segment(p.strip_prefix("/api/users/").unwrap_or(""));
                self.handle_get_contact(&id)
            }
            ("PUT", p) if p.starts_with("/api/users/") => {
                let id = decode_segment(p.strip_prefix("/api/users/").unwrap_or(""));
                self.handle_update_contact(&id, body)
            }
            ("DELETE", p) if p.starts_with("/api/users/") => {
                let id = decode_segment(p.strip_prefix("/api/users/").unwrap_or(""));
                self.handle_delete_contact(&id)
            }

            ("GET", "/api/labels") => self.handle_list_labels(),
            ("POST", "/api/labels") => self.handle_create_label(body),

            ("GET", "/api/filters") => self.handle_filters(),

            _ => error_body(404, "Route not found"),
        }
    }

    fn open_db(&self) -> Result<Database, StoreError> {
        Database::open_at(self.db_path.clone())
    }

    /// List contacts, narrowed by the query string.
    fn handle_list_contacts(&self, target: &str) -> Result<(u16, String)> {
        let query = match parse_contact_query(target) {
            Ok(q) => q,
            Err(message) => return error_body(400, message),
        };

        let db = match self.open_db() {
            Ok(db) => db,
            Err(e) => return store_error(e),
        };

        match db.list_contacts(&query) {
            Ok(contacts) => json_body(200, &contacts),
            Err(e) => store_error(e),
        }
    }

    /// Create a contact with its label links.
    fn handle_create_contact(&self, body: &[u8]) -> Result<(u16, String)> {
        let payload: ContactBody = match serde_json::from_slice(body) {
            Ok(p) => p,
            Err(e) => return error_body(400, format!("Invalid request: {}", e)),
        };
        if let Err(message) = payload.validate() {
            return error_body(400, message);
        }

        let db = match self.open_db() {
            Ok(db) => db,
            Err(e) => return store_error(e),
        };

        let (contact, label_ids) = payload.into_contact(None);
        if let Err(e) = db.insert_contact(&contact, &label_ids) {
            return store_error(e);
        }

        // Echo the stored contact back with labels hydrated.
        match db.get_contact(&contact.id) {
            Ok(Some(created)) => json_body(201, &created),
            Ok(None) => error_body(500, "contact missing after insert"),
            Err(e) => store_error(e),
        }
    }

    fn handle_get_contact(&self, id: &str) -> Result<(u16, String)> {
        let db = match self.open_db() {
            Ok(db) => db,
            Err(e) => return store_error(e),
        };

        match db.get_contact(id) {
            Ok(Some(contact)) => json_body(200, &contact),
            Ok(None) => error_body(404, "User not found"),
            Err(e) => store_error(e),
        }
    }

    /// Replace a contact's fields and label set.
    fn handle_update_contact(&self, id: &str, body: &[u8]) -> Result<(u16, String)> {
        let payload: ContactBody = match serde_json::from_slice(body) {
            Ok(p) => p,
            Err(e) => return error_body(400, format!("Invalid request: {}", e)),
        };
        if let Err(message) = payload.validate() {
            return error_body(400, message);
        }

        let db = match self.open_db() {
            Ok(db) => db,
            Err(e) => return store_error(e),
        };

        let (contact, label_ids) = payload.into_contact(Some(id.to_string()));
        if let Err(e) = db.update_contact(&contact, &label_ids) {
            return store_error(e);
        }

        match db.get_contact(id) {
            Ok(Some(updated)) => json_body(200, &updated),
            Ok(None) => error_body(404, "User not found"),
            Err(e) => store_error(e),
        }
    }

    fn handle_delete_contact(&self, id: &str) -> Result<(u16, String)> {
        let db = match self.open_db() {
            Ok(db) => db,
            Err(e) => return store_error(e),
        };

        match db.delete_contact(id) {
            Ok(true) => json_body(200, &MessageBody::new("User deleted successfully")),
            Ok(false) => error_body(404, "User not found"),
            Err(e) => store_error(e),
        }
    }

    fn handle_list_labels(&self) -> Result<(u16, String)> {
        let db = match self.open_db() {
            Ok(db) => db,
            Err(e) => return store_error(e),
        };

        match db.list_labels() {
            Ok(labels) => json_body(200, &labels),
            Err(e) => store_error(e),
        }
    }

    fn handle_create_label(&self, body: &[u8]) -> Result<(u16, String)> {
        let payload: LabelBody = match serde_json::from_slice(body) {
            Ok(p) => p,
            Err(e) => return error_body(400, format!("Invalid request: {}", e)),
        };
        if payload.name.trim().is_empty() {
            return error_body(400, "Label name is required");
        }

        let db = match self.open_db() {
            Ok(db) => db,
            Err(e) => return store_error(e),
        };

        let label = Label::new(payload.name, payload.color);
        match db.insert_label(&label) {
            Ok(()) => json_body(201, &label),
            Err(e) => store_error(e),
        }
    }

    /// Distinct companies and roles, for filter dropdowns.
    fn handle_filters(&self) -> Result<(u16, String)> {
        let db = match self.open_db() {
            Ok(db) => db,
            Err(e) => return store_error(e),
        };

        let companies = match db.distinct_companies() {
            Ok(v) => v,
            Err(e) => return store_error(e),
        };
        let roles = match db.distinct_roles() {
            Ok(v) => v,
            Err(e) => return store_error(e),
        };

        json_body(200, &FiltersBody { companies, roles })
    }

    fn send_json(&self, stream: &mut TcpStream, status: u16, body: &str) -> Result<()> {
        let status_text = match status {
            200 => "OK",
            201 => "Created",
            400 => "Bad Request",
            404 => "Not Found",
            409 => "Conflict",
            500 => "Internal Server Error",
            _ => "Unknown",
        };

        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status, status_text, body.len(), body
        );

        stream.write_all(response.as_bytes())?;
        stream.flush()?;
        Ok(())
    }
}

fn json_body<T: serde::Serialize>(status: u16, body: &T) -> Result<(u16, String)> {
    Ok((status, serde_json::to_string(body)?))
}

fn error_body(status: u16, message: impl Into<String>) -> Result<(u16, String)> {
    json_body(status, &ErrorBody::new(message))
}

/// Map a store failure onto the wire contract. Missing rows are 404,
/// uniqueness collisions 409, bad references 400, anything else 500.
fn store_error(e: StoreError) -> Result<(u16, String)> {
    match &e {
        StoreError::NotFound => error_body(404, "User not found"),
        StoreError::EmailConflict(_) | StoreError::LabelConflict(_) => {
            error_body(409, e.to_string())
        }
        StoreError::UnknownLabel(_) => error_body(400, e.to_string()),
        _ => {
            error!("store error: {}", e);
            error_body(500, e.to_string())
        }
    }
}
