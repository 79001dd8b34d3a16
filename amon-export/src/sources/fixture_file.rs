use std::{fs, path::Path};

use erp_client::{
    domain::{Contract, ContractVersion, MeterLink, MeteringPoint, Partner, PartnerAddress, Profile},
    BackOffice, ErpError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureContract {
    #[serde(flatten)]
    pub contract: Contract,
    pub metering_point_id: i64,
}

/// A back-office snapshot exported to JSON.
///
/// Top-level keys (all optional): `profiles`, `meters`, `metering_points`,
/// `contracts`, `contract_versions`, `partners`, `partner_addresses`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub profiles: Vec<Profile>,
    pub meters: Vec<MeterLink>,
    pub metering_points: Vec<MeteringPoint>,
    pub contracts: Vec<FixtureContract>,
    pub contract_versions: Vec<ContractVersion>,
    pub partners: Vec<Partner>,
    pub partner_addresses: Vec<PartnerAddress>,
}

/// `BackOffice` over an in-memory [`Fixture`], for offline runs and tests.
#[derive(Debug, Clone, Default)]
pub struct FixtureBackOffice {
    fixture: Fixture,
}

impl FixtureBackOffice {
    pub fn new(fixture: Fixture) -> Self {
        Self { fixture }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ErpError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ErpError::Fixture(format!("failed to read {}: {e}", path.display())))?;
        let fixture = serde_json::from_str(&contents)
            .map_err(|e| ErpError::Fixture(format!("invalid fixture {}: {e}", path.display())))?;
        Ok(Self { fixture })
    }
}

fn not_found(model: &'static str, id: i64) -> ErpError {
    ErpError::NotFound { model, id }
}

#[async_trait::async_trait]
impl BackOffice for FixtureBackOffice {
    async fn profiles(&self, limit: usize) -> Result<Vec<Profile>, ErpError> {
        Ok(self.fixture.profiles.iter().take(limit).cloned().collect())
    }

    async fn meter_link(&self, serial: &str) -> Result<Option<MeterLink>, ErpError> {
        Ok(self.fixture.meters.iter().find(|m| m.serial == serial).cloned())
    }

    async fn metering_point(&self, id: i64) -> Result<MeteringPoint, ErpError> {
        self.fixture
            .metering_points
            .iter()
            .find(|mp| mp.id == id)
            .cloned()
            .ok_or_else(|| not_found("giscedata.cups.ps", id))
    }

    async fn contracts_for_metering_points(&self, ids: &[i64]) -> Result<Vec<i64>, ErpError> {
        let mut found: Vec<i64> = self
            .fixture
            .contracts
            .iter()
            .filter(|c| ids.contains(&c.metering_point_id))
            .map(|c| c.contract.id)
            .collect();
        found.sort_unstable();
        Ok(found)
    }

    async fn contract(&self, id: i64) -> Result<Contract, ErpError> {
        self.fixture
            .contracts
            .iter()
            .find(|c| c.contract.id == id)
            .map(|c| c.contract.clone())
            .ok_or_else(|| not_found("giscedata.polissa", id))
    }

    async fn contract_version(&self, id: i64) -> Result<ContractVersion, ErpError> {
        self.fixture
            .contract_versions
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| not_found("giscedata.polissa.modcontractual", id))
    }

    async fn partner(&self, id: i64) -> Result<Partner, ErpError> {
        self.fixture
            .partners
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| not_found("res.partner", id))
    }

    async fn partner_address(&self, id: i64) -> Result<PartnerAddress, ErpError> {
        self.fixture
            .partner_addresses
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| not_found("res.partner.address", id))
    }
}
