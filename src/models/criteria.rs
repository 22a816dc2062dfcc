use super::ContactStatus;

/// Filter state as the caller holds it. Every group defaults to off:
/// an empty string or empty vec does not constrain, and a `None` date
/// bound leaves that side of the range open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    /// Matched against name, email, company, and label names.
    pub search: String,
    pub statuses: Vec<ContactStatus>,
    pub label_ids: Vec<String>,
    pub company: String,
    pub role: String,
    /// Inclusive "YYYY-MM-DD" bounds on the last-contact date.
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.statuses.is_empty()
            && self.label_ids.is_empty()
            && self.company.is_empty()
            && self.role.is_empty()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }
}
