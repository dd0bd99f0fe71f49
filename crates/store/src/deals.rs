use std::future::Future;

use entity::{Deal, DealPatch, NewDeal, Stage};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::support::{Clock, Latency};

/// Injectable deal-collection capability. The analytics engine and the
/// stage-transition saga only ever see this surface, so a real storage
/// engine can be substituted without touching either.
pub trait DealRepository: Send + Sync {
    /// Defensive copy of every deal, insertion order.
    fn get_all(&self) -> impl Future<Output = Vec<Deal>> + Send;
    fn get_by_id(&self, id: i64) -> impl Future<Output = StoreResult<Deal>> + Send;
    fn create(&self, input: NewDeal) -> impl Future<Output = StoreResult<Deal>> + Send;
    fn update(&self, id: i64, patch: DealPatch) -> impl Future<Output = StoreResult<Deal>> + Send;
    fn delete(&self, id: i64) -> impl Future<Output = StoreResult<Deal>> + Send;
}

struct Inner {
    deals: Vec<Deal>,
    next_id: i64,
}

/// Authoritative in-memory deal collection. The mutex serializes writers so
/// each create finishes id assignment before the next caller observes the
/// store; ids come from a monotonic counter and are never reused, even
/// after the highest-id record is deleted.
pub struct InMemoryDeals {
    inner: Mutex<Inner>,
    latency: Latency,
    clock: Clock,
}

impl InMemoryDeals {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(deals: Vec<Deal>) -> Self {
        let next_id = deals.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Inner { deals, next_id }),
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
}

impl Default for InMemoryDeals {
    fn default() -> Self {
        Self::new()
    }
}

impl DealRepository for InMemoryDeals {
    async fn get_all(&self) -> Vec<Deal> {
        self.latency.pause().await;
        self.inner.lock().await.deals.clone()
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Deal> {
        self.latency.pause().await;
        let inner = self.inner.lock().await;
        inner
            .deals
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or(StoreError::not_found("deal", id))
    }

    async fn create(&self, input: NewDeal) -> StoreResult<Deal> {
        self.latency.pause().await;
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();
        let id = inner.next_id;
        inner.next_id += 1;
        let stage = input.stage.unwrap_or(Stage::Lead);
        let deal = Deal {
            id,
            title: input.title,
            company: input.company,
            contact_id: input.contact_id,
            contact_name: input.contact_name,
            value: input.value,
            stage,
            probability: input.probability,
            expected_close_date: input.expected_close_date,
            description: input.description,
            notes: input.notes,
            created_at: now,
            updated_at: now,
            stage_changed_at: input.stage.map(|_| now),
        };
        inner.deals.push(deal.clone());
        debug!(deal_id = id, stage = %stage, "deal created");
        Ok(deal)
    }

    async fn update(&self, id: i64, patch: DealPatch) -> StoreResult<Deal> {
        self.latency.pause().await;
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();
        let deal = inner
            .deals
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(StoreError::not_found("deal", id))?;
        if let Some(title) = patch.title {
            deal.title = title;
        }
        if let Some(company) = patch.company {
            deal.company = company;
        }
        if let Some(contact_id) = patch.contact_id {
            deal.contact_id = Some(contact_id);
        }
        if let Some(contact_name) = patch.contact_name {
            deal.contact_name = Some(contact_name);
        }
        if let Some(value) = patch.value {
            deal.value = value;
        }
        if let Some(stage) = patch.stage {
            // stage_changed_at moves iff the stage actually changes.
            if stage != deal.stage {
                deal.stage_changed_at = Some(now);
            }
            deal.stage = stage;
        }
        if let Some(probability) = patch.probability {
            deal.probability = probability;
        }
        if let Some(date) = patch.expected_close_date {
            deal.expected_close_date = Some(date);
        }
        if let Some(description) = patch.description {
            deal.description = Some(description);
        }
        if let Some(notes) = patch.notes {
            deal.notes = Some(notes);
        }
        deal.updated_at = now;
        debug!(deal_id = id, "deal updated");
        Ok(deal.clone())
    }

    async fn delete(&self, id: i64) -> StoreResult<Deal> {
        self.latency.pause().await;
        let mut inner = self.inner.lock().await;
        let index = inner
            .deals
            .iter()
            .position(|d| d.id == id)
            .ok_or(StoreError::not_found("deal", id))?;
        let removed = inner.deals.remove(index);
        debug!(deal_id = id, "deal deleted");
        Ok(removed)
    }
}
