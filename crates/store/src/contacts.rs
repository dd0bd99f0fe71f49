use entity::{Contact, ContactPatch, NewContact};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::support::{Clock, Latency};

struct Inner {
    contacts: Vec<Contact>,
    next_id: i64,
}

/// In-memory contact collection. Looked up by the deal layer for
/// cross-referencing names; existence is never validated there.
pub struct InMemoryContacts {
    inner: Mutex<Inner>,
    latency: Latency,
    clock: Clock,
}

impl InMemoryContacts {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(contacts: Vec<Contact>) -> Self {
        let next_id = contacts.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Inner { contacts, next_id }),
            latency: Latency::NONE,
            clock: Clock::system(),
        }
    }

    pub fn latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub async fn get_all(&self) -> Vec<Contact> {
        self.latency.pause().await;
        self.inner.lock().await.contacts.clone()
    }

    pub async fn get_by_id(&self, id: i64) -> StoreResult<Contact> {
        self.latency.pause().await;
        let inner = self.inner.lock().await;
        inner
            .contacts
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::not_found("contact", id))
    }

    pub async fn create(&self, input: NewContact) -> StoreResult<Contact> {
        self.latency.pause().await;
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();
        let id = inner.next_id;
        inner.next_id += 1;
        let contact = Contact {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            company: input.company,
            status: input.status,
            created_at: now,
            updated_at: now,
            last_contacted_at: Some(now),
        };
        inner.contacts.push(contact.clone());
        debug!(contact_id = id, "contact created");
        Ok(contact)
    }

    pub async fn update(&self, id: i64, patch: ContactPatch) -> StoreResult<Contact> {
        self.latency.pause().await;
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();
        let contact = inner
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::not_found("contact", id))?;
        if let Some(name) = patch.name {
            contact.name = name;
        }
        if let Some(email) = patch.email {
            contact.email = Some(email);
        }
        if let Some(phone) = patch.phone {
            contact.phone = Some(phone);
        }
        if let Some(company) = patch.company {
            contact.company = Some(company);
        }
        if let Some(status) = patch.status {
            contact.status = status;
        }
        if let Some(at) = patch.last_contacted_at {
            contact.last_contacted_at = Some(at);
        }
        contact.updated_at = now;
        debug!(contact_id = id, "contact updated");
        Ok(contact.clone())
    }

    pub async fn delete(&self, id: i64) -> StoreResult<Contact> {
        self.latency.pause().await;
        let mut inner = self.inner.lock().await;
        let index = inner
            .contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::not_found("contact", id))?;
        let removed = inner.contacts.remove(index);
        debug!(contact_id = id, "contact deleted");
        Ok(removed)
    }
}

impl Default for InMemoryContacts {
    fn default() -> Self {
        Self::new()
    }
}
