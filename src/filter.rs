//! In-memory contact filtering.
//!
//! Criteria groups combine with AND; values inside a group (statuses,
//! label ids) combine with OR. Evaluation is a full pass over the
//! slice, takes shared references only, and preserves input order.

use chrono::NaiveDate;

use crate::models::{Contact, FilterCriteria};

/// True if the contact satisfies every active criteria group.
pub fn matches(contact: &Contact, criteria: &FilterCriteria) -> bool {
    matches_search(contact, &criteria.search)
        && matches_status(contact, criteria)
        && matches_labels(contact, criteria)
        && matches_text(contact.company.as_deref(), &criteria.company)
        && matches_text(contact.role.as_deref(), &criteria.role)
        && matches_date_range(contact, criteria)
}

/// Filter a working set down to the contacts matching `criteria`,
/// keeping their original order.
pub fn apply<'a>(contacts: &'a [Contact], criteria: &FilterCriteria) -> Vec<&'a Contact> {
    contacts.iter().filter(|c| matches(c, criteria)).collect()
}

fn matches_search(contact: &Contact, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    contact.name.to_lowercase().contains(&needle)
        || contact.email.to_lowercase().contains(&needle)
        || contact
            .company
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(&needle))
        || contact
            .labels
            .iter()
            .any(|l| l.name.to_lowercase().contains(&needle))
}

fn matches_status(contact: &Contact, criteria: &FilterCriteria) -> bool {
    criteria.statuses.is_empty() || criteria.statuses.contains(&contact.status)
}

fn matches_labels(contact: &Contact, criteria: &FilterCriteria) -> bool {
    criteria.label_ids.is_empty()
        || contact
            .labels
            .iter()
            .any(|l| criteria.label_ids.iter().any(|id| *id == l.id))
}

fn matches_text(value: Option<&str>, wanted: &str) -> bool {
    if wanted.is_empty() {
        return true;
    }
    // A contact without the field cannot match a set criterion.
    value.is_some_and(|v| v.to_lowercase().contains(&wanted.to_lowercase()))
}

fn matches_date_range(contact: &Contact, criteria: &FilterCriteria) -> bool {
    if criteria.date_from.is_none() && criteria.date_to.is_none() {
        return true;
    }
    // Unparsable values on either side fail the check rather than
    // letting the contact through.
    let Some(day) = contact.last_contact.as_deref().and_then(parse_day) else {
        return false;
    };
    if let Some(from) = criteria.date_from.as_deref() {
        match parse_day(from) {
            Some(from) if day >= from => {}
            _ => return false,
        }
    }
    if let Some(to) = criteria.date_to.as_deref() {
        match parse_day(to) {
            Some(to) if day <= to => {}
            _ => return false,
        }
    }
    true
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
