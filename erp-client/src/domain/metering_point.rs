/// Resolution of a meter serial to the metering point of its contract.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeterLink {
    pub serial: String,
    pub metering_point_id: i64,
    pub cups: String,
}

/// A supply point (CUPS) with its address already joined against the
/// municipality, province and country tables.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MeteringPoint {
    pub id: i64,
    pub name: String,
    pub cpo: Option<String>,
    pub cpa: Option<String>,
    pub street_type: Option<String>,
    pub street_name: Option<String>,
    pub number: Option<String>,
    pub staircase: Option<String>,
    pub floor: Option<String>,
    pub door: Option<String>,
    pub postal_code: Option<String>,
    pub parcel_number: Option<String>,
    pub city: Option<String>,
    pub city_code: Option<String>,
    pub province: Option<String>,
    pub province_code: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}
