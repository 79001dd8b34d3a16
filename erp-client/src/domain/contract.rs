use time::Date;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contract {
    pub id: i64,
    pub name: String,
    pub active_version_id: Option<i64>,
}

/// A contractual snapshot: the terms in force between `start` and `end`.
///
/// `power` is expressed in kW as stored by the ERP.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContractVersion {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub payer_id: i64,
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub tariff: String,
    pub power: f64,
    pub activity_code: Option<String>,
    pub cups: String,
}
