use anyhow::Result;

use crate::db::Database;
use crate::models::{Contact, ContactStatus};

struct Sample {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    company: &'static str,
    role: &'static str,
    status: ContactStatus,
    avatar_seed: &'static str,
    last_contact: &'static str,
    notes: &'static str,
    labels: &'static [&'static str],
}

const SAMPLES: &[Sample] = &[
    Sample {
        id: "user-1",
        name: "Sarah Johnson",
        email: "sarah.johnson@techcorp.com",
        phone: "+1 (555) 123-4567",
        company: "TechCorp Solutions",
        role: "CEO",
        status: ContactStatus::Active,
        avatar_seed: "Sarah",
        last_contact: "2024-01-15",
        notes: "Interested in enterprise solutions",
        labels: &["label-1", "label-3"],
    },
    Sample {
        id: "user-2",
        name: "Michael Chen",
        email: "michael.chen@innovate.io",
        phone: "+1 (555) 234-5678",
        company: "Innovate Labs",
        role: "CTO",
        status: ContactStatus::Active,
        avatar_seed: "Michael",
        last_contact: "2024-01-10",
        notes: "Technical decision maker",
        labels: &["label-2"],
    },
    Sample {
        id: "user-3",
        name: "Emily Rodriguez",
        email: "emily.rodriguez@startup.com",
        phone: "+1 (555) 345-6789",
        company: "StartupCo",
        role: "Founder",
        status: ContactStatus::Pending,
        avatar_seed: "Emily",
        last_contact: "2024-01-08",
        notes: "Early stage startup",
        labels: &["label-4"],
    },
];

/// Execute the seed command. Inserts the sample contacts, skipping any
/// id that already exists so repeated runs are harmless.
pub fn run_seed(db: &Database) -> Result<()> {
    let mut seeded = 0;
    for sample in SAMPLES {
        if db.get_contact(sample.id)?.is_some() {
            continue;
        }

        let mut contact = Contact::new(sample.name.to_string(), sample.email.to_string());
        contact.id = sample.id.to_string();
        contact.phone = Some(sample.phone.to_string());
        contact.company = Some(sample.company.to_string());
        contact.role = Some(sample.role.to_string());
        contact.status = sample.status;
        contact.avatar = Some(format!(
            "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
            sample.avatar_seed
        ));
        contact.last_contact = Some(sample.last_contact.to_string());
        contact.notes = Some(sample.notes.to_string());

        let label_ids: Vec<String> = sample.labels.iter().map(|s| s.to_string()).collect();
        db.insert_contact(&contact, &label_ids)?;
        println!("Seeded: {} <{}>", contact.name, contact.email);
        seeded += 1;
    }

    if seeded == 0 {
        println!("Sample contacts already present.");
    } else {
        println!("\nSeeded {} contact(s).", seeded);
    }

    Ok(())
}
