use chrono::Utc;
use rusqlite::{params, Row};
use std::collections::HashMap;

use super::error::{StoreError, StoreResult};
use super::Database;
use crate::models::{Contact, ContactStatus, Label, LabelColor};

/// Server-side narrowing for contact listings. Empty fields do not
/// constrain, mirroring the in-memory filter semantics.
#[derive(Debug, Clone, Default)]
pub struct ContactQuery {
    pub search: String,
    pub statuses: Vec<ContactStatus>,
    pub company: String,
    pub role: String,
}

impl Database {
    // ==================== CONTACT CREATE ====================

    /// Insert a contact and its label links in one transaction.
    /// A duplicate email or unknown label id leaves nothing behind.
    pub fn insert_contact(&self, contact: &Contact, label_ids: &[String]) -> StoreResult<()> {
        self.conn.execute("BEGIN IMMEDIATE", [])?;
        if let Err(e) = self.insert_contact_inner(contact, label_ids) {
            let _ = self.conn.execute("ROLLBACK", []);
            return Err(e);
        }
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    fn insert_contact_inner(&self, contact: &Contact, label_ids: &[String]) -> StoreResult<()> {
        self.conn
            .execute(
                r#"INSERT INTO contacts (
                    id, name, email, phone, company, role, status, avatar,
                    last_contact, notes, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
                params![
                    contact.id,
                    contact.name,
                    contact.email,
                    contact.phone,
                    contact.company,
                    contact.role,
                    contact.status.as_str(),
                    contact.avatar,
                    contact.last_contact,
                    contact.notes,
                    contact.created_at.to_rfc3339(),
                    contact.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| classify_contact_write(e, &contact.email))?;

        self.link_labels(&contact.id, label_ids)
    }

    // ==================== CONTACT READ ====================

    pub fn get_contact(&self, id: &str) -> StoreResult<Option<Contact>> {
        let mut stmt = self.conn.prepare("SELECT * FROM contacts WHERE id = ?")?;

        let result = stmt.query_row([id], row_to_contact);

        match result {
            Ok(contact) => Ok(Some(self.with_labels(contact)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_contact_by_email(&self, email: &str) -> StoreResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM contacts WHERE email = ? LIMIT 1")?;

        let result = stmt.query_row([email], row_to_contact);

        match result {
            Ok(contact) => Ok(Some(self.with_labels(contact)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List contacts newest-first, optionally narrowed by `query`.
    /// Labels for the whole result set are fetched in one batch.
    pub fn list_contacts(&self, query: &ContactQuery) -> StoreResult<Vec<Contact>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if !query.search.is_empty() {
            values.push(format!("%{}%", escape_like(&query.search.to_lowercase())));
            let n = values.len();
            conditions.push(format!(
                "(LOWER(c.name) LIKE ?{0} ESCAPE '\\' \
                 OR LOWER(c.email) LIKE ?{0} ESCAPE '\\' \
                 OR LOWER(COALESCE(c.company, '')) LIKE ?{0} ESCAPE '\\' \
                 OR EXISTS (SELECT 1 FROM contact_labels cl \
                            JOIN labels l ON l.id = cl.label_id \
                            WHERE cl.contact_id = c.id \
                              AND LOWER(l.name) LIKE ?{0} ESCAPE '\\'))",
                n
            ));
        }

        if !query.statuses.is_empty() {
            let start = values.len();
            let placeholders: Vec<String> = (0..query.statuses.len())
                .map(|i| format!("?{}", start + i + 1))
                .collect();
            for status in &query.statuses {
                values.push(status.as_str().to_string());
            }
            conditions.push(format!("c.status IN ({})", placeholders.join(", ")));
        }

        if !query.company.is_empty() {
            values.push(format!("%{}%", escape_like(&query.company.to_lowercase())));
            conditions.push(format!(
                "LOWER(COALESCE(c.company, '')) LIKE ?{} ESCAPE '\\'",
                values.len()
            ));
        }

        if !query.role.is_empty() {
            values.push(format!("%{}%", escape_like(&query.role.to_lowercase())));
            conditions.push(format!(
                "LOWER(COALESCE(c.role, '')) LIKE ?{} ESCAPE '\\'",
                values.len()
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT c.* FROM contacts c {} ORDER BY c.created_at DESC",
            where_clause
        );

        let mut stmt = self.conn.prepare(&sql)?;

        let contacts = stmt
            .query_map(rusqlite::params_from_iter(&values), row_to_contact)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        self.attach_labels(contacts)
    }

    pub fn count_contacts(&self) -> StoreResult<u32> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Labels attached to one contact, sorted by name.
    pub fn get_labels_for_contact(&self, contact_id: &str) -> StoreResult<Vec<Label>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT l.id, l.name, l.color
               FROM labels l
               JOIN contact_labels cl ON cl.label_id = l.id
               WHERE cl.contact_id = ?
               ORDER BY l.name"#,
        )?;

        let labels = stmt
            .query_map([contact_id], |row| {
                let color: String = row.get(2)?;
                Ok(Label {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    color: LabelColor::parse(&color),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(labels)
    }

    // ==================== CONTACT UPDATE ====================

    /// Full-row update including the label set. Sets `updated_at` to now.
    /// The label swap shares the transaction with the row update, so a
    /// rejected label id leaves the previous links in place.
    pub fn update_contact(&self, contact: &Contact, label_ids: &[String]) -> StoreResult<()> {
        self.conn.execute("BEGIN IMMEDIATE", [])?;
        if let Err(e) = self.update_contact_inner(contact, label_ids) {
            let _ = self.conn.execute("ROLLBACK", []);
            return Err(e);
        }
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    fn update_contact_inner(&self, contact: &Contact, label_ids: &[String]) -> StoreResult<()> {
        let now = Utc::now();
        let rows = self
            .conn
            .execute(
                r#"UPDATE contacts SET
                    name = ?, email = ?, phone = ?, company = ?, role = ?,
                    status = ?, avatar = ?, last_contact = ?, notes = ?, updated_at = ?
                   WHERE id = ?"#,
                params![
                    contact.name,
                    contact.email,
                    contact.phone,
                    contact.company,
                    contact.role,
                    contact.status.as_str(),
                    contact.avatar,
                    contact.last_contact,
                    contact.notes,
                    now.to_rfc3339(),
                    contact.id,
                ],
            )
            .map_err(|e| classify_contact_write(e, &contact.email))?;

        if rows == 0 {
            return Err(StoreError::NotFound);
        }

        self.conn.execute(
            "DELETE FROM contact_labels WHERE contact_id = ?",
            [&contact.id],
        )?;
        self.link_labels(&contact.id, label_ids)
    }

    // ==================== CONTACT DELETE ====================

    /// Hard delete. Label links go with the row via CASCADE.
    pub fn delete_contact(&self, id: &str) -> StoreResult<bool> {
        let rows = self.conn.execute("DELETE FROM contacts WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    // ==================== FILTER SOURCES ====================

    /// Distinct non-empty company names, sorted, for filter pickers.
    pub fn distinct_companies(&self) -> StoreResult<Vec<String>> {
        self.distinct_column("company")
    }

    pub fn distinct_roles(&self) -> StoreResult<Vec<String>> {
        self.distinct_column("role")
    }

    fn distinct_column(&self, column: &str) -> StoreResult<Vec<String>> {
        // Whitelist columns to keep the format! safe
        let column = match column {
            "company" | "role" => column,
            _ => "company",
        };

        let sql = format!(
            "SELECT DISTINCT {0} FROM contacts WHERE {0} IS NOT NULL AND {0} != '' ORDER BY {0}",
            column
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(names)
    }

    // ==================== HELPERS ====================

    fn with_labels(&self, mut contact: Contact) -> StoreResult<Contact> {
        contact.labels = self.get_labels_for_contact(&contact.id)?;
        Ok(contact)
    }

    /// Hydrate labels for a whole page of contacts with a single
    /// IN (...) query instead of one query per row.
    fn attach_labels(&self, mut contacts: Vec<Contact>) -> StoreResult<Vec<Contact>> {
        if contacts.is_empty() {
            return Ok(contacts);
        }

        let ids: Vec<&str> = contacts.iter().map(|c| c.id.as_str()).collect();
        let placeholders: Vec<&str> = ids.iter().map(|_| "?").collect();
        let sql = format!(
            r#"SELECT cl.contact_id, l.id, l.name, l.color
               FROM contact_labels cl
               JOIN labels l ON l.id = cl.label_id
               WHERE cl.contact_id IN ({})
               ORDER BY l.name"#,
            placeholders.join(", ")
        );

        let mut stmt = self.conn.prepare(&sql)?;

        let rows = stmt
            .query_map(rusqlite::params_from_iter(ids), |row| {
                let color: String = row.get(3)?;
                Ok((
                    row.get::<_, String>(0)?,
                    Label {
                        id: row.get(1)?,
                        name: row.get(2)?,
                        color: LabelColor::parse(&color),
                    },
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut by_contact: HashMap<String, Vec<Label>> = HashMap::new();
        for (contact_id, label) in rows {
            by_contact.entry(contact_id).or_default().push(label);
        }

        for contact in &mut contacts {
            contact.labels = by_contact.remove(&contact.id).unwrap_or_default();
        }

        Ok(contacts)
    }

    fn link_labels(&self, contact_id: &str, label_ids: &[String]) -> StoreResult<()> {
        // First occurrence wins when the caller repeats an id.
        let mut unique: Vec<&str> = Vec::new();
        for id in label_ids {
            if !unique.contains(&id.as_str()) {
                unique.push(id);
            }
        }

        let mut stmt = self
            .conn
            .prepare("INSERT INTO contact_labels (contact_id, label_id) VALUES (?, ?)")?;
        for label_id in unique {
            stmt.execute(params![contact_id, label_id])
                .map_err(|e| classify_link_write(e, label_id))?;
        }
        Ok(())
    }
}

fn row_to_contact(row: &Row) -> rusqlite::Result<Contact> {
    let status: String = row.get("status")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Contact {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        company: row.get("company")?,
        role: row.get("role")?,
        status: ContactStatus::parse(&status),
        avatar: row.get("avatar")?,
        last_contact: row.get("last_contact")?,
        notes: row.get("notes")?,
        created_at: chrono::DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        updated_at: chrono::DateTime::parse_from_rfc3339(&updated_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        labels: Vec::new(),
    })
}

/// Escape LIKE metacharacters (% _ \)
fn escape_like(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' | '_' | '\\' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

fn classify_contact_write(e: rusqlite::Error, email: &str) -> StoreError {
    if let rusqlite::Error::SqliteFailure(err, Some(msg)) = &e {
        if err.code == rusqlite::ErrorCode::ConstraintViolation && msg.contains("contacts.email") {
            return StoreError::EmailConflict(email.to_string());
        }
    }
    StoreError::Sqlite(e)
}

fn classify_link_write(e: rusqlite::Error, label_id: &str) -> StoreError {
    if let rusqlite::Error::SqliteFailure(err, Some(msg)) = &e {
        if err.code == rusqlite::ErrorCode::ConstraintViolation && msg.contains("FOREIGN KEY") {
            return StoreError::UnknownLabel(label_id.to_string());
        }
    }
    StoreError::Sqlite(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_contact(name: &str, email: &str) -> Contact {
        Contact::new(name.to_string(), email.to_string())
    }

    fn ids(labels: &[Label]) -> Vec<&str> {
        labels.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_insert_and_get_contact() {
        let db = Database::open_memory().unwrap();

        let mut contact = make_contact("Sarah Johnson", "sarah.johnson@techcorp.com");
        contact.company = Some("TechCorp Solutions".to_string());
        contact.role = Some("CEO".to_string());
        contact.status = ContactStatus::Pending;
        contact.last_contact = Some("2024-01-15".to_string());
        db.insert_contact(&contact, &["label-1".to_string(), "label-3".to_string()])
            .unwrap();

        let found = db.get_contact(&contact.id).unwrap().unwrap();
        assert_eq!(found.name, "Sarah Johnson");
        assert_eq!(found.email, "sarah.johnson@techcorp.com");
        assert_eq!(found.company.as_deref(), Some("TechCorp Solutions"));
        assert_eq!(found.status, ContactStatus::Pending);
        assert_eq!(found.last_contact.as_deref(), Some("2024-01-15"));

        // Hydrated labels come back sorted by name.
        let names: Vec<&str> = found.labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Customer", "VIP"]);

        assert!(db.get_contact("missing").unwrap().is_none());
    }

    #[test]
    fn test_get_contact_by_email() {
        let db = Database::open_memory().unwrap();

        let contact = make_contact("Ann", "ann@example.com");
        db.insert_contact(&contact, &[]).unwrap();

        let found = db.get_contact_by_email("ann@example.com").unwrap().unwrap();
        assert_eq!(found.id, contact.id);
        assert!(db.get_contact_by_email("nope@example.com").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_is_a_conflict() {
        let db = Database::open_memory().unwrap();

        let first = make_contact("First", "shared@example.com");
        db.insert_contact(&first, &[]).unwrap();

        let second = make_contact("Second", "shared@example.com");
        let err = db.insert_contact(&second, &[]).unwrap_err();
        assert!(matches!(err, StoreError::EmailConflict(email) if email == "shared@example.com"));

        // Nothing from the failed insert survives.
        assert!(db.get_contact(&second.id).unwrap().is_none());
        assert_eq!(db.count_contacts().unwrap(), 1);
    }

    #[test]
    fn test_unknown_label_rolls_back_the_insert() {
        let db = Database::open_memory().unwrap();

        let contact = make_contact("Carl", "carl@example.com");
        let err = db
            .insert_contact(&contact, &["label-1".to_string(), "bogus".to_string()])
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownLabel(id) if id == "bogus"));

        assert!(db.get_contact(&contact.id).unwrap().is_none());
        assert_eq!(db.count_contacts().unwrap(), 0);
    }

    #[test]
    fn test_update_swaps_label_set_exactly() {
        let db = Database::open_memory().unwrap();

        let mut contact = make_contact("Carl", "carl@example.com");
        db.insert_contact(&contact, &["label-1".to_string(), "label-2".to_string()])
            .unwrap();

        contact.name = "Carl Updated".to_string();
        contact.status = ContactStatus::Inactive;
        db.update_contact(&contact, &["label-3".to_string()]).unwrap();

        let found = db.get_contact(&contact.id).unwrap().unwrap();
        assert_eq!(found.name, "Carl Updated");
        assert_eq!(found.status, ContactStatus::Inactive);
        // The old set is gone, not merged.
        assert_eq!(ids(&found.labels), vec!["label-3"]);
        assert!(found.updated_at >= contact.updated_at);
    }

    #[test]
    fn test_failed_label_swap_keeps_previous_links() {
        let db = Database::open_memory().unwrap();

        let contact = make_contact("Carl", "carl@example.com");
        db.insert_contact(&contact, &["label-1".to_string()]).unwrap();

        let err = db
            .update_contact(&contact, &["bogus".to_string()])
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownLabel(_)));

        let found = db.get_contact(&contact.id).unwrap().unwrap();
        assert_eq!(ids(&found.labels), vec!["label-1"]);
    }

    #[test]
    fn test_update_missing_contact_is_not_found() {
        let db = Database::open_memory().unwrap();

        let ghost = make_contact("Ghost", "ghost@example.com");
        let err = db.update_contact(&ghost, &[]).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn test_update_to_taken_email_is_a_conflict() {
        let db = Database::open_memory().unwrap();

        let ann = make_contact("Ann", "ann@example.com");
        db.insert_contact(&ann, &[]).unwrap();
        let mut bob = make_contact("Bob", "bob@example.com");
        db.insert_contact(&bob, &[]).unwrap();

        bob.email = "ann@example.com".to_string();
        let err = db.update_contact(&bob, &[]).unwrap_err();
        assert!(matches!(err, StoreError::EmailConflict(_)));

        let found = db.get_contact(&bob.id).unwrap().unwrap();
        assert_eq!(found.email, "bob@example.com");
    }

    #[test]
    fn test_delete_cascades_label_links() {
        let db = Database::open_memory().unwrap();

        let contact = make_contact("Carl", "carl@example.com");
        db.insert_contact(&contact, &["label-1".to_string(), "label-2".to_string()])
            .unwrap();

        assert!(db.delete_contact(&contact.id).unwrap());
        assert!(!db.delete_contact(&contact.id).unwrap());
        assert!(db.get_contact(&contact.id).unwrap().is_none());

        let links: u32 = db
            .conn
            .query_row("SELECT COUNT(*) FROM contact_labels", [], |row| row.get(0))
            .unwrap();
        assert_eq!(links, 0);
    }

    #[test]
    fn test_list_orders_newest_first() {
        let db = Database::open_memory().unwrap();

        for (i, name) in ["oldest", "middle", "newest"].iter().enumerate() {
            let mut contact = make_contact(name, &format!("{}@example.com", name));
            contact.created_at = Utc::now() - chrono::Duration::seconds(30 - i as i64 * 10);
            db.insert_contact(&contact, &[]).unwrap();
        }

        let listed = db.list_contacts(&ContactQuery::default()).unwrap();
        let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["newest", "middle", "oldest"]);
    }

    #[test]
    fn test_list_search_spans_label_names() {
        let db = Database::open_memory().unwrap();

        let tagged = make_contact("Tagged Person", "tagged@example.com");
        db.insert_contact(&tagged, &["label-1".to_string()]).unwrap();
        let plain = make_contact("Plain Person", "plain@example.com");
        db.insert_contact(&plain, &[]).unwrap();

        let query = ContactQuery {
            search: "vip".to_string(),
            ..Default::default()
        };
        let listed = db.list_contacts(&query).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Tagged Person");
        assert_eq!(ids(&listed[0].labels), vec!["label-1"]);
    }

    #[test]
    fn test_list_filters_by_status_set() {
        let db = Database::open_memory().unwrap();

        for (name, status) in [
            ("a", ContactStatus::Active),
            ("b", ContactStatus::Pending),
            ("c", ContactStatus::Inactive),
        ] {
            let mut contact = make_contact(name, &format!("{}@example.com", name));
            contact.status = status;
            db.insert_contact(&contact, &[]).unwrap();
        }

        let query = ContactQuery {
            statuses: vec![ContactStatus::Active, ContactStatus::Pending],
            ..Default::default()
        };
        let listed = db.list_contacts(&query).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|c| c.status != ContactStatus::Inactive));
    }

    #[test]
    fn test_list_escapes_like_wildcards() {
        let db = Database::open_memory().unwrap();

        db.insert_contact(&make_contact("100% Committed", "pct@example.com"), &[])
            .unwrap();
        db.insert_contact(&make_contact("100s of Things", "hundreds@example.com"), &[])
            .unwrap();

        let query = ContactQuery {
            search: "100%".to_string(),
            ..Default::default()
        };
        let listed = db.list_contacts(&query).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "100% Committed");
    }

    #[test]
    fn test_list_combines_company_and_role() {
        let db = Database::open_memory().unwrap();

        let mut ceo = make_contact("Ann", "ann@acme.com");
        ceo.company = Some("Acme".to_string());
        ceo.role = Some("CEO".to_string());
        db.insert_contact(&ceo, &[]).unwrap();

        let mut cto = make_contact("Bob", "bob@acme.com");
        cto.company = Some("Acme".to_string());
        cto.role = Some("CTO".to_string());
        db.insert_contact(&cto, &[]).unwrap();

        let query = ContactQuery {
            company: "acme".to_string(),
            role: "ceo".to_string(),
            ..Default::default()
        };
        let listed = db.list_contacts(&query).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Ann");
    }

    #[test]
    fn test_duplicate_label_ids_collapse() {
        let db = Database::open_memory().unwrap();

        let contact = make_contact("Carl", "carl@example.com");
        db.insert_contact(&contact, &["label-1".to_string(), "label-1".to_string()])
            .unwrap();

        let found = db.get_contact(&contact.id).unwrap().unwrap();
        assert_eq!(ids(&found.labels), vec!["label-1"]);
    }

    #[test]
    fn test_distinct_companies_and_roles() {
        let db = Database::open_memory().unwrap();

        let mut a = make_contact("A", "a@example.com");
        a.company = Some("Zeta".to_string());
        a.role = Some("Founder".to_string());
        db.insert_contact(&a, &[]).unwrap();

        let mut b = make_contact("B", "b@example.com");
        b.company = Some("Acme".to_string());
        db.insert_contact(&b, &[]).unwrap();

        let mut c = make_contact("C", "c@example.com");
        c.company = Some(String::new());
        db.insert_contact(&c, &[]).unwrap();

        assert_eq!(db.distinct_companies().unwrap(), vec!["Acme", "Zeta"]);
        assert_eq!(db.distinct_roles().unwrap(), vec!["Founder"]);
    }
}
