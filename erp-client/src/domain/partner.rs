#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partner {
    pub id: i64,
    pub name: String,
    pub vat: Option<String>,
    /// Addresses on file, in ERP order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PartnerAddress {
    pub id: i64,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub city_code: Option<String>,
    pub province: Option<String>,
    pub province_code: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}
