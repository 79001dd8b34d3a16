/// One telemetry profile row read from a metering device.
///
/// `timestamp` is the ERP's local wall-clock text (`YYYY-MM-DD HH:MM:SS`);
/// `magn` is the magnitude scale code the values are expressed in.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    pub name: String,
    pub timestamp: String,
    pub ai: f64,
    pub r1: f64,
    pub magn: String,
}
