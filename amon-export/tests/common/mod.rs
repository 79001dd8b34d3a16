#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use amon_export::{
    assemble::{AssembleOptions, CompanyPrefixes},
    pipeline::{ExportSettings, Exporter, PipelineError},
    schema::PayloadKind,
    sinks::{Submission, Transport},
    sources::{Fixture, FixtureBackOffice, FixtureContract},
    transform::resolve_time_zone,
};
use erp_client::domain::{
    Contract, ContractVersion, MeterLink, MeteringPoint, Partner, PartnerAddress, Profile,
};
use serde_json::Value;
use time::macros::date;

/// Keeps every batch it is handed; optionally refuses one kind.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    batches: Arc<Mutex<Vec<(PayloadKind, Vec<Value>)>>>,
    fail_on: Option<PayloadKind>,
}

impl RecordingTransport {
    pub fn failing_on(kind: PayloadKind) -> Self {
        Self {
            fail_on: Some(kind),
            ..Default::default()
        }
    }

    pub fn batches(&self) -> Vec<(PayloadKind, Vec<Value>)> {
        self.batches.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<PayloadKind> {
        self.batches().into_iter().map(|(kind, _)| kind).collect()
    }

    pub fn batch(&self, kind: PayloadKind) -> Vec<Value> {
        self.batches()
            .into_iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, payloads)| payloads)
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn submit(
        &self,
        kind: PayloadKind,
        payloads: &[Value],
    ) -> Result<Submission, PipelineError> {
        if self.fail_on == Some(kind) {
            return Err(PipelineError::Sink("connection refused".to_string()));
        }
        self.batches.lock().unwrap().push((kind, payloads.to_vec()));
        Ok(Submission {
            status: 200,
            body: format!("{} stored", payloads.len()),
        })
    }
}

pub fn settings(limit: usize) -> ExportSettings {
    ExportSettings {
        limit,
        time_zone: resolve_time_zone("Europe/Madrid").unwrap(),
        company_prefixes: CompanyPrefixes::default(),
        options: AssembleOptions::default(),
    }
}

/// Exporter over `fixture` with the default limit, recording into
/// `transport`.
pub fn exporter(
    fixture: Fixture,
    transport: &RecordingTransport,
) -> Exporter<FixtureBackOffice, RecordingTransport> {
    Exporter::new(FixtureBackOffice::new(fixture), transport.clone(), settings(80))
}

pub fn profile(name: &str, timestamp: &str, magn: &str) -> Profile {
    Profile {
        name: name.to_string(),
        timestamp: timestamp.to_string(),
        ai: 7.0,
        r1: 2.0,
        magn: magn.to_string(),
    }
}

pub const CUPS_A: &str = "ES0031406912345678JN0F";
pub const CUPS_B: &str = "ES0031406987654321QW0F";

fn metering_point(id: i64, name: &str, street: &str) -> MeteringPoint {
    MeteringPoint {
        id,
        name: name.to_string(),
        street_type: Some("Calle".to_string()),
        street_name: Some(street.to_string()),
        number: Some("12".to_string()),
        postal_code: Some("17001".to_string()),
        city: Some("Girona".to_string()),
        country: Some("España".to_string()),
        country_code: Some("ES".to_string()),
        ..Default::default()
    }
}

fn version(id: i64, owner_id: i64, payer_id: i64, cups: &str) -> ContractVersion {
    ContractVersion {
        id,
        name: "1".to_string(),
        owner_id,
        payer_id,
        start: Some(date!(2013 - 01 - 01)),
        end: Some(date!(2014 - 01 - 01)),
        tariff: "2.0A".to_string(),
        power: 4.6,
        activity_code: Some("9820".to_string()),
        cups: cups.to_string(),
    }
}

/// Five profiles, three of which belong to meters with a known metering
/// point (two meters, two metering points, two contracts, one owner).
pub fn snapshot() -> Fixture {
    Fixture {
        profiles: vec![
            profile("ZIV0000012345", "2014-01-15 10:00:00", "1000"),
            profile("ZIV0000099999", "2014-01-15 10:00:00", "1000"),
            profile("ZIV0000022222", "2014-01-15 10:00:00", "1"),
            profile("ZIV0000012345", "2014-01-15 11:00:00", "1000"),
            profile("ZIV0000088888", "2014-01-15 11:00:00", "1000"),
        ],
        meters: vec![
            MeterLink {
                serial: "12345".to_string(),
                metering_point_id: 9,
                cups: CUPS_A.to_string(),
            },
            MeterLink {
                serial: "22222".to_string(),
                metering_point_id: 10,
                cups: CUPS_B.to_string(),
            },
        ],
        metering_points: vec![
            metering_point(9, CUPS_A, "Mayor"),
            metering_point(10, CUPS_B, "Nueva"),
        ],
        contracts: vec![
            FixtureContract {
                contract: Contract {
                    id: 1,
                    name: "0001234".to_string(),
                    active_version_id: Some(100),
                },
                metering_point_id: 9,
            },
            FixtureContract {
                contract: Contract {
                    id: 2,
                    name: "0001235".to_string(),
                    active_version_id: Some(200),
                },
                metering_point_id: 10,
            },
        ],
        contract_versions: vec![version(100, 42, 43, CUPS_A), version(200, 42, 42, CUPS_B)],
        partners: vec![
            Partner {
                id: 42,
                name: "García López, Juan".to_string(),
                vat: Some("ES12345678Z".to_string()),
                address_ids: vec![7],
            },
            Partner {
                id: 43,
                name: "Cooperativa, SCCL".to_string(),
                vat: Some("F17000000".to_string()),
                address_ids: vec![],
            },
        ],
        partner_addresses: vec![PartnerAddress {
            id: 7,
            street: Some("Carrer Major 1".to_string()),
            postal_code: Some("17001".to_string()),
            ..Default::default()
        }],
    }
}
