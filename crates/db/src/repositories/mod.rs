use async_trait::async_trait;
use thiserror::Error;

use ringforge_core::domain::configuration::{ConfigurationId, RingConfiguration};
use ringforge_core::domain::metal::{Metal, MetalId};
use ringforge_core::domain::quote::{QuoteRequest, QuoteRequestId};
use ringforge_core::domain::setting::{Setting, SettingId};
use ringforge_core::domain::stone::{Stone, StoneId};

pub mod catalog;
pub mod configuration;
pub mod quote_request;

pub use catalog::SqlCatalogRepository;
pub use configuration::SqlConfigurationRepository;
pub use quote_request::SqlQuoteRequestRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A stored row failed to decode into its domain type. Carries the
    /// offending entity and id so operators can find the bad row.
    #[error("corrupt {entity} record `{id}`: {reason}")]
    CorruptRecord { entity: &'static str, id: String, reason: String },
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_active_stones(&self) -> Result<Vec<Stone>, RepositoryError>;
    async fn list_active_settings(&self) -> Result<Vec<Setting>, RepositoryError>;
    async fn list_active_metals(&self) -> Result<Vec<Metal>, RepositoryError>;

    /// Id lookups do not filter on the active flag; pricing and saved
    /// configurations must keep resolving components that were deactivated
    /// after the fact.
    async fn stone_by_id(&self, id: &StoneId) -> Result<Option<Stone>, RepositoryError>;
    async fn setting_by_id(&self, id: &SettingId) -> Result<Option<Setting>, RepositoryError>;
    async fn metal_by_id(&self, id: &MetalId) -> Result<Option<Metal>, RepositoryError>;
}

#[async_trait]
pub trait ConfigurationRepository: Send + Sync {
    async fn save(&self, configuration: RingConfiguration) -> Result<(), RepositoryError>;
    async fn find_by_id(
        &self,
        id: &ConfigurationId,
    ) -> Result<Option<RingConfiguration>, RepositoryError>;
}

#[async_trait]
pub trait QuoteRequestRepository: Send + Sync {
    async fn insert(&self, request: QuoteRequest) -> Result<(), RepositoryError>;
    async fn find_by_id(
        &self,
        id: &QuoteRequestId,
    ) -> Result<Option<QuoteRequest>, RepositoryError>;
}

pub(crate) fn corrupt_record(
    entity: &'static str,
    id: &str,
    reason: impl Into<String>,
) -> RepositoryError {
    RepositoryError::CorruptRecord { entity, id: id.to_string(), reason: reason.into() }
}

pub(crate) fn parse_timestamp(
    entity: &'static str,
    id: &str,
    field: &str,
    value: &str,
) -> Result<chrono::DateTime<chrono::Utc>, RepositoryError> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&chrono::Utc))
        .map_err(|error| corrupt_record(entity, id, format!("{field} `{value}`: {error}")))
}

pub(crate) fn parse_stored_decimal(
    entity: &'static str,
    id: &str,
    field: &str,
    value: &str,
) -> Result<rust_decimal::Decimal, RepositoryError> {
    use std::str::FromStr;

    rust_decimal::Decimal::from_str(value)
        .map_err(|error| corrupt_record(entity, id, format!("{field} `{value}`: {error}")))
}
