use entity::{Company, CompanyPatch, NewCompany};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::support::{Clock, Latency};

struct Inner {
    companies: Vec<Company>,
    next_id: i64,
}

pub struct InMemoryCompanies {
    inner: Mutex<Inner>,
    latency: Latency,
    clock: Clock,
}

impl InMemoryCompanies {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(companies: Vec<Company>) -> Self {
        let next_id = companies.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self {
            inner: Mutex::new(Inner { companies, next_id }),
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

    pub async fn get_all(&self) -> Vec<Company> {
        self.latency.pause().await;
        self.inner.lock().await.companies.clone()
    }

    pub async fn get_by_id(&self, id: i64) -> StoreResult<Company> {
        self.latency.pause().await;
        let inner = self.inner.lock().await;
        inner
            .companies
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::not_found("company", id))
    }

    pub async fn create(&self, input: NewCompany) -> StoreResult<Company> {
        self.latency.pause().await;
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();
        let id = inner.next_id;
        inner.next_id += 1;
        let company = Company {
            id,
            name: input.name,
            industry: input.industry,
            website: input.website,
            phone: input.phone,
            created_at: now,
            updated_at: now,
        };
        inner.companies.push(company.clone());
        debug!(company_id = id, "company created");
        Ok(company)
    }

    pub async fn update(&self, id: i64, patch: CompanyPatch) -> StoreResult<Company> {
        self.latency.pause().await;
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();
        let company = inner
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::not_found("company", id))?;
        if let Some(name) = patch.name {
            company.name = name;
        }
        if let Some(industry) = patch.industry {
            company.industry = Some(industry);
        }
        if let Some(website) = patch.website {
            company.website = Some(website);
        }
        if let Some(phone) = patch.phone {
            company.phone = Some(phone);
        }
        company.updated_at = now;
        debug!(company_id = id, "company updated");
        Ok(company.clone())
    }

    pub async fn delete(&self, id: i64) -> StoreResult<Company> {
        self.latency.pause().await;
        let mut inner = self.inner.lock().await;
        let index = inner
            .companies
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::not_found("company", id))?;
        let removed = inner.companies.remove(index);
        debug!(company_id = id, "company deleted");
        Ok(removed)
    }
}

impl Default for InMemoryCompanies {
    fn default() -> Self {
        Self::new()
    }
}
