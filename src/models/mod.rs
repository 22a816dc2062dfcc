pub mod contact;
pub mod criteria;
pub mod label;

pub use contact::{Contact, ContactStatus};
pub use criteria::FilterCriteria;
pub use label::{Label, LabelColor};
