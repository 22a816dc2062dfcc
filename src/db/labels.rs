use rusqlite::{params, Row};

use super::error::{StoreError, StoreResult};
use super::Database;
use crate::models::{Label, LabelColor};

/// Catalog every fresh store starts with. Ids are stable so seed data
/// can reference them across opens.
pub const DEFAULT_LABELS: [(&str, &str, LabelColor); 5] = [
    ("label-1", "VIP", LabelColor::Red),
    ("label-2", "Lead", LabelColor::Blue),
    ("label-3", "Customer", LabelColor::Green),
    ("label-4", "Prospect", LabelColor::Yellow),
    ("label-5", "Partner", LabelColor::Purple),
];

impl Database {
    pub fn list_labels(&self) -> StoreResult<Vec<Label>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color FROM labels ORDER BY name")?;

        let labels = stmt
            .query_map([], row_to_label)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(labels)
    }

    pub fn get_label(&self, id: &str) -> StoreResult<Option<Label>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color FROM labels WHERE id = ?")?;

        let result = stmt.query_row([id], row_to_label);

        match result {
            Ok(label) => Ok(Some(label)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn insert_label(&self, label: &Label) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO labels (id, name, color) VALUES (?, ?, ?)",
                params![label.id, label.name, label.color.as_str()],
            )
            .map_err(|e| classify_label_write(e, &label.name))?;
        Ok(())
    }

    pub(crate) fn seed_default_labels(&self) -> StoreResult<()> {
        let mut stmt = self
            .conn
            .prepare("INSERT OR IGNORE INTO labels (id, name, color) VALUES (?, ?, ?)")?;
        for (id, name, color) in DEFAULT_LABELS {
            stmt.execute(params![id, name, color.as_str()])?;
        }
        Ok(())
    }
}

fn row_to_label(row: &Row) -> rusqlite::Result<Label> {
    let color: String = row.get("color")?;
    Ok(Label {
        id: row.get("id")?,
        name: row.get("name")?,
        color: LabelColor::parse(&color),
    })
}

fn classify_label_write(e: rusqlite::Error, name: &str) -> StoreError {
    if let rusqlite::Error::SqliteFailure(err, Some(msg)) = &e {
        if err.code == rusqlite::ErrorCode::ConstraintViolation && msg.contains("labels.name") {
            return StoreError::LabelConflict(name.to_string());
        }
    }
    StoreError::Sqlite(e)
}
