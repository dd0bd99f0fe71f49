use chrono::{DateTime, TimeZone, Utc};
use entity::{CompanyPatch, ContactPatch, ContactStatus, NewCompany, NewContact};
use store::{Clock, InMemoryCompanies, InMemoryContacts, StoreError};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap()
}

#[tokio::test]
async fn contact_create_marks_last_contacted() {
    let repo = InMemoryContacts::new().clock(Clock::fixed(epoch()));
    let contact = repo
        .create(NewContact {
            name: "Maya Chen".into(),
            email: Some("maya@northwind.test".into()),
            ..NewContact::default()
        })
        .await
        .unwrap();
    assert_eq!(contact.id, 1);
    assert_eq!(contact.status, ContactStatus::Active);
    assert_eq!(contact.last_contacted_at, Some(epoch()));
}

#[tokio::test]
async fn contact_update_and_delete_round_trip() {
    let repo = InMemoryContacts::new();
    let contact = repo
        .create(NewContact {
            name: "Omar Haddad".into(),
            ..NewContact::default()
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            contact.id,
            ContactPatch {
                status: Some(ContactStatus::Inactive),
                ..ContactPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, ContactStatus::Inactive);

    repo.delete(contact.id).await.unwrap();
    assert!(matches!(
        repo.get_by_id(contact.id).await,
        Err(StoreError::NotFound { entity: "contact", .. })
    ));
}

#[tokio::test]
async fn company_crud_follows_store_contract() {
    let repo = InMemoryCompanies::new();
    let company = repo
        .create(NewCompany {
            name: "Harbor Analytics".into(),
            industry: Some("Software".into()),
            ..NewCompany::default()
        })
        .await
        .unwrap();
    assert_eq!(company.id, 1);

    let updated = repo
        .update(
            company.id,
            CompanyPatch {
                website: Some("https://harbor.test".into()),
                ..CompanyPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.website.as_deref(), Some("https://harbor.test"));
    assert_eq!(updated.name, "Harbor Analytics");

    let removed = repo.delete(company.id).await.unwrap();
    assert_eq!(removed.id, company.id);
    assert!(repo.get_all().await.is_empty());
}
