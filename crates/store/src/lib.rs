//! In-memory CRM stores: an injectable deal repository plus contact and
//! company collections. All writes are serialized behind a single mutex so
//! id assignment never races; reads hand out defensive copies.

pub mod companies;
pub mod contacts;
pub mod deals;
pub mod error;
pub mod seed;
pub mod support;

pub use companies::InMemoryCompanies;
pub use contacts::InMemoryContacts;
pub use deals::{DealRepository, InMemoryDeals};
pub use error::{StoreError, StoreResult};
pub use seed::{DemoData, demo_data};
pub use support::{Clock, Latency};
