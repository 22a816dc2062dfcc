//! Request and response types for the REST API.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::{Contact, ContactStatus, LabelColor};

/// Standard error payload. Every non-2xx response carries one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Confirmation payload for operations with no data to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Service banner returned from the root route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoBody {
    pub message: String,
    pub version: String,
    pub timestamp: String,
}

impl InfoBody {
    pub fn current() -> Self {
        Self {
            message: "CRM Backend API is running!".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Distinct companies and roles present in the store, for building
/// filter dropdowns without another round trip per field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersBody {
    pub companies: Vec<String>,
    pub roles: Vec<String>,
}

/// Incoming payload for contact create and update requests. Labels
/// arrive as a list of label ids, not embedded label objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl ContactBody {
    /// Checks the fields every contact must carry.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err("Name and email are required".to_string());
        }
        if let Some(status) = &self.status {
            status.parse::<ContactStatus>()?;
        }
        Ok(())
    }

    /// Builds the contact this payload describes. `id` is kept when
    /// supplied (updates) and minted otherwise (creates). Label ids
    /// come back separately since links live in their own table.
    pub fn into_contact(self, id: Option<String>) -> (Contact, Vec<String>) {
        let mut contact = Contact::new(self.name, self.email);
        if let Some(id) = id {
            contact.id = id;
        }
        contact.phone = self.phone;
        contact.company = self.company;
        contact.role = self.role;
        if let Some(status) = &self.status {
            // Same parser as validate(), so whatever passed there
            // round-trips instead of falling back to the default.
            contact.status = status.parse().unwrap_or_default();
        }
        contact.avatar = self.avatar;
        contact.last_contact = self.last_contact;
        contact.notes = self.notes;
        (contact, self.labels)
    }
}

/// Incoming payload for label creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelBody {
    pub name: String,
    pub color: LabelColor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_body_minimal() {
        let body: ContactBody =
            serde_json::from_str(r#"{"name":"Ada","email":"ada@example.com"}"#).unwrap();
        assert!(body.validate().is_ok());

        let (contact, labels) = body.into_contact(None);
        assert_eq!(contact.name, "Ada");
        assert_eq!(contact.status, ContactStatus::Active);
        assert!(!contact.id.is_empty());
        assert!(labels.is_empty());
    }

    #[test]
    fn test_contact_body_full() {
        let body: ContactBody = serde_json::from_str(
            r#"{
                "name": "Ada",
                "email": "ada@example.com",
                "phone": "+1 555 0100",
                "company": "Analytical Engines",
                "role": "Founder",
                "status": "pending",
                "lastContact": "2024-02-01",
                "labels": ["label-1", "label-2"]
            }"#,
        )
        .unwrap();
        assert_eq!(body.last_contact.as_deref(), Some("2024-02-01"));

        let (contact, labels) = body.into_contact(Some("user-9".to_string()));
        assert_eq!(contact.id, "user-9");
        assert_eq!(contact.status, ContactStatus::Pending);
        assert_eq!(labels, vec!["label-1", "label-2"]);
    }

    #[test]
    fn test_contact_body_requires_name_and_email() {
        let body: ContactBody = serde_json::from_str(r#"{"name":"  "}"#).unwrap();
        let err = body.validate().unwrap_err();
        assert_eq!(err, "Name and email are required");
    }

    #[test]
    fn test_contact_body_rejects_unknown_status() {
        let body: ContactBody =
            serde_json::from_str(r#"{"name":"Ada","email":"a@b.c","status":"archived"}"#).unwrap();
        assert!(body.validate().unwrap_err().contains("unknown status"));
    }

    #[test]
    fn test_contact_body_status_ignores_case() {
        let body: ContactBody =
            serde_json::from_str(r#"{"name":"Ada","email":"ada@example.com","status":"PENDING"}"#)
                .unwrap();
        assert!(body.validate().is_ok());

        // A status that passed validation must survive the conversion.
        let (contact, _) = body.into_contact(None);
        assert_eq!(contact.status, ContactStatus::Pending);
    }

    #[test]
    fn test_error_body_shape() {
        let json = serde_json::to_string(&ErrorBody::new("User not found")).unwrap();
        assert_eq!(json, r#"{"error":"User not found"}"#);
    }

    #[test]
    fn test_info_body_shape() {
        let json = serde_json::to_string(&InfoBody::current()).unwrap();
        assert!(json.contains(r#""message":"CRM Backend API is running!""#));
        assert!(json.contains(r#""version""#));
    }
}
