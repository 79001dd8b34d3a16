use erp_client::{
    domain::{Contract, ContractVersion},
    BackOffice,
};
use serde_json::{json, Value};

use super::{finish, record_assembled, AssembleOptions};
use crate::identifiers::Model;
use crate::pipeline::{PartnerIds, PipelineError};
use crate::transform::to_epoch_seconds;

/// Contracted power in watts, from the ERP's kW figure.
pub fn power_watts(kw: f64) -> i64 {
    (kw * 1000.0).round() as i64
}

pub fn contract_payload(contract: &Contract, version: &ContractVersion) -> Value {
    json!({
        "id": Model::Contract.id_for(&contract.name),
        "ownerId": Model::Partner.id_for(version.owner_id),
        "payerId": Model::Partner.id_for(version.payer_id),
        "version": version.name,
        "start": to_epoch_seconds(version.start),
        "end": to_epoch_seconds(version.end),
        "tariffId": version.tariff,
        "power": power_watts(version.power),
        "activityCode": version.activity_code,
        "meteringPointId": Model::MeteringPoint.id_for(&version.cups),
    })
}

/// Exports each contract as of its active version, or as of
/// `options.contract_version` when given. The owner of every exported
/// contract is registered in `partners`.
pub async fn assemble_contracts<B>(
    backoffice: &B,
    contract_ids: &[i64],
    partners: &mut PartnerIds,
    options: &AssembleOptions,
) -> Result<Vec<Value>, PipelineError>
where
    B: BackOffice + ?Sized,
{
    let mut out = Vec::with_capacity(contract_ids.len());

    for &id in contract_ids {
        let contract = backoffice.contract(id).await?;
        let Some(version_id) = options.contract_version.or(contract.active_version_id) else {
            tracing::warn!(contract = %contract.name, "contract has no active version, skipping");
            continue;
        };
        let version = backoffice.contract_version(version_id).await?;

        partners.register(version.owner_id);
        out.push(finish(contract_payload(&contract, &version), options.mode));
    }

    record_assembled("contracts", out.len());
    Ok(out)
}
