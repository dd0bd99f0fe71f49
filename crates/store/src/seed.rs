//! Deterministic demo dataset. Timestamps are anchored to the supplied
//! `now` so stage ages stay meaningful whenever the data is loaded.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use entity::{Company, Contact, ContactStatus, Deal, Stage};

#[derive(Clone, Debug)]
pub struct DemoData {
    pub companies: Vec<Company>,
    pub contacts: Vec<Contact>,
    pub deals: Vec<Deal>,
}

impl DemoData {
    pub fn deal_titled(&self, title: &str) -> Option<&Deal> {
        self.deals.iter().find(|d| d.title == title)
    }

    pub fn contact_named(&self, name: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.name == name)
    }
}

pub fn demo_data(now: DateTime<Utc>) -> DemoData {
    let companies = vec![
        company(1, "Northwind Systems", "Manufacturing", "https://northwind.test", now),
        company(2, "Bluepeak Media", "Media", "https://bluepeak.test", now),
        company(3, "Harbor Analytics", "Software", "https://harbor.test", now),
    ];

    let contacts = vec![
        contact(1, "Maya Chen", "maya@northwind.test", "Northwind Systems", now),
        contact(2, "Omar Haddad", "omar@bluepeak.test", "Bluepeak Media", now),
        contact(3, "Priya Nair", "priya@harbor.test", "Harbor Analytics", now),
        contact(4, "Tom Keller", "tom@northwind.test", "Northwind Systems", now),
    ];

    let deals = vec![
        deal(
            1,
            "Northwind Pilot",
            "Northwind Systems",
            1,
            "Maya Chen",
            45_000,
            Stage::Lead,
            20,
            days_ago(now, 5),
            days_ago(now, 5),
            now,
        ),
        deal(
            2,
            "Bluepeak Rebrand",
            "Bluepeak Media",
            2,
            "Omar Haddad",
            80_000,
            Stage::Lead,
            25,
            days_ago(now, 15),
            days_ago(now, 15),
            now,
        ),
        deal(
            3,
            "Harbor Dashboard Rollout",
            "Harbor Analytics",
            3,
            "Priya Nair",
            120_000,
            Stage::Qualified,
            40,
            days_ago(now, 30),
            days_ago(now, 12),
            now,
        ),
        deal(
            4,
            "Northwind Line Upgrade",
            "Northwind Systems",
            4,
            "Tom Keller",
            210_000,
            Stage::Proposal,
            55,
            days_ago(now, 45),
            days_ago(now, 8),
            now,
        ),
        deal(
            5,
            "Bluepeak Annual Retainer",
            "Bluepeak Media",
            2,
            "Omar Haddad",
            95_000,
            Stage::Negotiation,
            75,
            days_ago(now, 60),
            days_ago(now, 20),
            now,
        ),
        deal(
            6,
            "Harbor Starter Pack",
            "Harbor Analytics",
            3,
            "Priya Nair",
            30_000,
            Stage::ClosedWon,
            100,
            days_ago(now, 40),
            days_ago(now, 3),
            now,
        ),
    ];

    DemoData {
        companies,
        contacts,
        deals,
    }
}

fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

fn company(
    id: i64,
    name: &str,
    industry: &str,
    website: &str,
    now: DateTime<Utc>,
) -> Company {
    Company {
        id,
        name: name.into(),
        industry: Some(industry.into()),
        website: Some(website.into()),
        phone: None,
        created_at: days_ago(now, 90),
        updated_at: days_ago(now, 90),
    }
}

fn contact(id: i64, name: &str, email: &str, company: &str, now: DateTime<Utc>) -> Contact {
    Contact {
        id,
        name: name.into(),
        email: Some(email.into()),
        phone: None,
        company: Some(company.into()),
        status: ContactStatus::Active,
        created_at: days_ago(now, 90),
        updated_at: days_ago(now, 90),
        last_contacted_at: Some(days_ago(now, 7)),
    }
}

#[allow(clippy::too_many_arguments)]
fn deal(
    id: i64,
    title: &str,
    company: &str,
    contact_id: i64,
    contact_name: &str,
    value: i64,
    stage: Stage,
    probability: i16,
    created_at: DateTime<Utc>,
    stage_changed_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Deal {
    Deal {
        id,
        title: title.into(),
        company: company.into(),
        contact_id: Some(contact_id),
        contact_name: Some(contact_name.into()),
        value,
        stage,
        probability,
        expected_close_date: Some(close_date(now)),
        description: None,
        notes: None,
        created_at,
        updated_at: stage_changed_at,
        stage_changed_at: Some(stage_changed_at),
    }
}

fn close_date(now: DateTime<Utc>) -> NaiveDate {
    (now + Duration::days(30)).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_deals_cover_every_stage() {
        let data = demo_data(Utc::now());
        for stage in Stage::ALL {
            assert!(
                data.deals.iter().any(|d| d.stage == stage),
                "no demo deal in stage {stage}"
            );
        }
    }

    #[test]
    fn demo_ids_are_unique_and_ascending() {
        let data = demo_data(Utc::now());
        let ids: Vec<i64> = data.deals.iter().map(|d| d.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn demo_lead_ages_match_board_fixture() {
        let now = Utc::now();
        let data = demo_data(now);
        let pilot = data.deal_titled("Northwind Pilot").unwrap();
        let rebrand = data.deal_titled("Bluepeak Rebrand").unwrap();
        assert_eq!(now - pilot.stage_changed_at.unwrap(), Duration::days(5));
        assert_eq!(now - rebrand.stage_changed_at.unwrap(), Duration::days(15));
    }
}
