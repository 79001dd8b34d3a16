use std::collections::{BTreeMap, HashMap};

/// Caches owned by a single export run.
///
/// Each run builds its own instance; nothing here outlives the run.
#[derive(Debug, Default)]
pub struct RunContext {
    /// Meter serial -> metering point identifier, including misses.
    serials: HashMap<String, Option<String>>,
    /// Metering point identifier -> ERP record id.
    metering_points: BTreeMap<String, i64>,
    /// Device identifier -> metering point identifier.
    device_points: BTreeMap<String, String>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when the serial was never looked up, `Some(None)` when the
    /// lookup found no metering point.
    pub fn cached_serial(&self, serial: &str) -> Option<Option<&str>> {
        self.serials.get(serial).map(|mp| mp.as_deref())
    }

    pub fn remember_serial(&mut self, serial: &str, metering_point: Option<(String, i64)>) {
        let uuid = metering_point.map(|(uuid, record_id)| {
            self.metering_points.insert(uuid.clone(), record_id);
            uuid
        });
        self.serials.insert(serial.to_string(), uuid);
    }

    pub fn link_device(&mut self, device_id: &str, metering_point_id: &str) {
        self.device_points
            .insert(device_id.to_string(), metering_point_id.to_string());
    }

    pub fn device_point(&self, device_id: &str) -> Option<&str> {
        self.device_points.get(device_id).map(String::as_str)
    }

    pub fn metering_point_record(&self, metering_point_id: &str) -> Option<i64> {
        self.metering_points.get(metering_point_id).copied()
    }

    pub fn metering_point_ids(&self) -> Vec<String> {
        self.metering_points.keys().cloned().collect()
    }

    pub fn metering_point_records(&self) -> Vec<i64> {
        self.metering_points.values().copied().collect()
    }

    pub fn device_ids(&self) -> Vec<String> {
        self.device_points.keys().cloned().collect()
    }
}

/// Partners whose records must be exported after the contracts that
/// reference them. First-seen order, no duplicates.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PartnerIds(Vec<i64>);

impl PartnerIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, partner_id: i64) {
        if !self.0.contains(&partner_id) {
            self.0.push(partner_id);
        }
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}
