//! Certificate lookup by display ID.
//!
//! Input is normalised (trimmed, upper-cased) before it reaches a store, so
//! `"  ezzcode-2024-wd-001 "` and `"EZZCODE-2024-WD-001"` resolve alike.

mod memory;
mod rest;

pub use memory::InMemoryRecordStore;
pub use rest::RestRecordStore;

use async_trait::async_trait;
use certforge_types::CertificateRecord;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Please enter a certificate ID")]
    EmptyIdentifier,

    #[error("Record lookup failed: {0}")]
    Failed(String),

    #[error("Invalid certificate seed data: {0}")]
    InvalidSeed(String),
}

/// A read-only source of certificate records keyed by canonical display ID.
#[async_trait]
pub trait RecordStore: Send + Sync + Debug {
    /// `display_id` is already normalised. At most one record matches.
    async fn find_by_display_id(
        &self,
        display_id: &str,
    ) -> Result<Option<CertificateRecord>, LookupError>;

    fn name(&self) -> &'static str;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn find_by_display_id(
        &self,
        display_id: &str,
    ) -> Result<Option<CertificateRecord>, LookupError> {
        (**self).find_by_display_id(display_id).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(CertificateRecord),
    NotFound { display_id: String },
}

impl LookupOutcome {
    pub fn record(&self) -> Option<&CertificateRecord> {
        match self {
            LookupOutcome::Found(record) => Some(record),
            LookupOutcome::NotFound { .. } => None,
        }
    }
}

/// Trims surrounding whitespace and upper-cases the identifier.
pub fn normalize_identifier(input: &str) -> Result<String, LookupError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LookupError::EmptyIdentifier);
    }
    Ok(trimmed.to_uppercase())
}

/// Normalises `input` and queries `store`.
///
/// A record missing a field the renderer needs is reported as a store
/// failure, so callers only ever see renderable records.
pub async fn lookup<S: RecordStore + ?Sized>(
    store: &S,
    input: &str,
) -> Result<LookupOutcome, LookupError> {
    let display_id = normalize_identifier(input)?;
    log::debug!("Looking up certificate {} via {}", display_id, store.name());

    match store.find_by_display_id(&display_id).await? {
        Some(record) => {
            record.validate().map_err(|e| {
                log::warn!("Certificate {} is incomplete: {}", display_id, e);
                LookupError::Failed(e.to_string())
            })?;
            log::info!("Certificate {} found", display_id);
            Ok(LookupOutcome::Found(record))
        }
        None => {
            log::info!("Certificate {} not found", display_id);
            Ok(LookupOutcome::NotFound { display_id })
        }
    }
}
