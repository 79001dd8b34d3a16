use crate::domain::{
    Contract, ContractVersion, MeterLink, MeteringPoint, Partner, PartnerAddress, Profile,
};

#[derive(thiserror::Error, Debug)]
pub enum ErpError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{model} {id} not found")]
    NotFound { model: &'static str, id: i64 },
    #[error("fixture error: {0}")]
    Fixture(String),
}

/// Read-only view over the utility back office.
///
/// Lookups that may legitimately miss return `Option`; lookups of records
/// referenced by another record return `ErpError::NotFound` when absent.
#[async_trait::async_trait]
pub trait BackOffice: Send + Sync {
    /// Most recent telemetry profiles, at most `limit` rows.
    async fn profiles(&self, limit: usize) -> Result<Vec<Profile>, ErpError>;

    /// Metering point of the contract the meter with this serial belongs to.
    async fn meter_link(&self, serial: &str) -> Result<Option<MeterLink>, ErpError>;

    async fn metering_point(&self, id: i64) -> Result<MeteringPoint, ErpError>;

    /// Ids of the contracts attached to any of the given metering points.
    async fn contracts_for_metering_points(&self, ids: &[i64]) -> Result<Vec<i64>, ErpError>;

    async fn contract(&self, id: i64) -> Result<Contract, ErpError>;

    async fn contract_version(&self, id: i64) -> Result<ContractVersion, ErpError>;

    async fn partner(&self, id: i64) -> Result<Partner, ErpError>;

    async fn partner_address(&self, id: i64) -> Result<PartnerAddress, ErpError>;
}
