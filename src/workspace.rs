//! Owned working set for presentation-side callers.
//!
//! The full contact list and label catalog are loaded once, mutated
//! through explicit methods, and viewed through [`visible`], which
//! re-runs the filter over the whole set each time. State lives in
//! the struct the caller holds, never in globals.
//!
//! [`visible`]: Workspace::visible

use crate::filter;
use crate::models::{Contact, FilterCriteria, Label};

#[derive(Debug, Default)]
pub struct Workspace {
    contacts: Vec<Contact>,
    labels: Vec<Label>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly loaded contact set.
    pub fn replace_contacts(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
    }

    /// Swap in a freshly loaded label catalog.
    pub fn replace_labels(&mut self, labels: Vec<Label>) {
        self.labels = labels;
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn total(&self) -> usize {
        self.contacts.len()
    }

    /// Append a new contact and pick up any labels it introduces.
    pub fn insert_contact(&mut self, contact: Contact) {
        self.register_labels(&contact.labels);
        self.contacts.push(contact);
    }

    /// Replace the contact with the same id. Returns false if the id
    /// is not in the working set.
    pub fn update_contact(&mut self, contact: Contact) -> bool {
        self.register_labels(&contact.labels);
        match self.contacts.iter_mut().find(|c| c.id == contact.id) {
            Some(slot) => {
                *slot = contact;
                true
            }
            None => false,
        }
    }

    pub fn remove_contact(&mut self, id: &str) -> bool {
        let before = self.contacts.len();
        self.contacts.retain(|c| c.id != id);
        self.contacts.len() != before
    }

    /// Swap one contact's label set, registering labels the catalog
    /// has not seen yet.
    pub fn set_contact_labels(&mut self, contact_id: &str, labels: Vec<Label>) -> bool {
        self.register_labels(&labels);
        match self.contacts.iter_mut().find(|c| c.id == contact_id) {
            Some(contact) => {
                contact.labels = labels;
                true
            }
            None => false,
        }
    }

    /// Case-insensitive label lookup by name.
    pub fn find_label(&self, name: &str) -> Option<&Label> {
        self.labels
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }

    /// The contacts passing `criteria`, in working-set order.
    pub fn visible(&self, criteria: &FilterCriteria) -> Vec<&Contact> {
        filter::apply(&self.contacts, criteria)
    }

    fn register_labels(&mut self, labels: &[Label]) {
        for label in labels {
            if !self.labels.iter().any(|l| l.id == label.id) {
                self.labels.push(label.clone());
            }
        }
    }
}
