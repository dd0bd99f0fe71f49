use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pipeline stages in board order. The order is load-bearing: analytics
/// tie-breaking and board rendering both follow it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    ClosedWon,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Lead,
        Stage::Qualified,
        Stage::Proposal,
        Stage::Negotiation,
        Stage::ClosedWon,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Stage::Lead => "lead",
            Stage::Qualified => "qualified",
            Stage::Proposal => "proposal",
            Stage::Negotiation => "negotiation",
            Stage::ClosedWon => "closed-won",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Stage::Lead => "Lead",
            Stage::Qualified => "Qualified",
            Stage::Proposal => "Proposal",
            Stage::Negotiation => "Negotiation",
            Stage::ClosedWon => "Closed Won",
        }
    }

    /// Parse a stage key, tolerating surrounding whitespace and case.
    pub fn from_key(value: &str) -> Option<Stage> {
        let normalized = value.trim().to_lowercase();
        Stage::ALL
            .into_iter()
            .find(|stage| stage.key() == normalized)
    }

    pub fn is_won(self) -> bool {
        matches!(self, Stage::ClosedWon)
    }
}

impl std::str::FromStr for Stage {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Stage::from_key(value)
            .ok_or_else(|| ValidationError::new(format!("unknown stage key {value:?}")))
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub contact_id: Option<i64>,
    pub contact_name: Option<String>,
    pub value: i64,
    pub stage: Stage,
    pub probability: i16,
    pub expected_close_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set whenever `stage` changes value, including at creation when a
    /// stage is supplied.
    pub stage_changed_at: Option<DateTime<Utc>>,
}

/// Creation input. The store assigns id and timestamps.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewDeal {
    pub title: String,
    pub company: String,
    pub contact_id: Option<i64>,
    pub contact_name: Option<String>,
    pub value: i64,
    pub stage: Option<Stage>,
    pub probability: i16,
    pub expected_close_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

impl NewDeal {
    /// Caller-side preconditions. The store itself accepts whatever it is
    /// handed; form-style consumers run this before submitting.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::new("deal title is required"));
        }
        if self.company.trim().is_empty() {
            return Err(ValidationError::new("company name is required"));
        }
        if self.value < 0 {
            return Err(ValidationError::new("deal value must be non-negative"));
        }
        if !(0..=100).contains(&self.probability) {
            return Err(ValidationError::new("probability must be between 0 and 100"));
        }
        Ok(())
    }
}

/// Partial update: present fields are merged over the stored record,
/// absent fields stay untouched. The id is never patchable.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DealPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub contact_id: Option<i64>,
    pub contact_name: Option<String>,
    pub value: Option<i64>,
    pub stage: Option<Stage>,
    pub probability: Option<i16>,
    pub expected_close_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

impl DealPatch {
    pub fn stage(stage: Stage) -> Self {
        Self {
            stage: Some(stage),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
