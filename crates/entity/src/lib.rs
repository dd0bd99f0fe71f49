//! Domain models shared by the deal store, analytics engine, and apps.

pub mod company;
pub mod contact;
pub mod deal;

pub use company::{Company, CompanyPatch, NewCompany};
pub use contact::{Contact, ContactPatch, ContactStatus, NewContact};
pub use deal::{Deal, DealPatch, NewDeal, Stage, ValidationError};
