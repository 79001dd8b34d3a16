use erp_client::{domain::MeteringPoint, BackOffice};
use serde_json::{json, Value};

use super::{finish, record_assembled, AssembleOptions};
use crate::pipeline::{PipelineError, RunContext};
use crate::transform::{assemble_street_address, AddressParts};

pub fn metering_point_payload(metering_point_id: &str, mp: &MeteringPoint) -> Value {
    let street = assemble_street_address(&AddressParts::from(mp));

    json!({
        "meteringPointId": metering_point_id,
        "metadata": {
            "cupsnumber": mp.name,
            "address": {
                "street": (!street.is_empty()).then_some(street),
                "postalCode": mp.postal_code,
                "city": mp.city,
                "cityCode": mp.city_code,
                "province": mp.province,
                "provinceCode": mp.province_code,
                "country": mp.country,
                "countryCode": mp.country_code,
                "parcelNumber": mp.parcel_number,
            },
        },
    })
}

/// Only metering points discovered while assembling readings can be
/// exported: their back-office record id is known from that lookup.
pub async fn assemble_metering_points<B>(
    backoffice: &B,
    ctx: &RunContext,
    metering_point_ids: &[String],
    options: &AssembleOptions,
) -> Result<Vec<Value>, PipelineError>
where
    B: BackOffice + ?Sized,
{
    let mut out = Vec::with_capacity(metering_point_ids.len());

    for id in metering_point_ids {
        let record_id = ctx
            .metering_point_record(id)
            .ok_or_else(|| PipelineError::UnresolvedMeteringPoint(id.clone()))?;
        let mp = backoffice.metering_point(record_id).await?;
        out.push(finish(metering_point_payload(id, &mp), options.mode));
    }

    record_assembled("metering_points", out.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::OutputMode;
    use crate::sources::{Fixture, FixtureBackOffice};

    fn cups() -> MeteringPoint {
        MeteringPoint {
            id: 9,
            name: "ES0031406912345678JN0F".to_string(),
            street_type: Some("Calle".to_string()),
            street_name: Some("Mayor".to_string()),
            number: Some("12".to_string()),
            postal_code: Some("17001".to_string()),
            city: Some("Girona".to_string()),
            city_code: Some("17079".to_string()),
            province: Some("Girona".to_string()),
            province_code: Some("17".to_string()),
            country: Some("España".to_string()),
            country_code: Some("ES".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn address_block_is_assembled_and_pruned() {
        let backoffice = FixtureBackOffice::new(Fixture {
            metering_points: vec![cups()],
            ..Default::default()
        });
        let mut ctx = RunContext::new();
        ctx.remember_serial("12345", Some(("mp-1".to_string(), 9)));

        let ids = ["mp-1".to_string()];
        let out = assemble_metering_points(&backoffice, &ctx, &ids, &AssembleOptions::default())
            .await
            .unwrap();

        assert_eq!(
            out,
            vec![json!({
                "meteringPointId": "mp-1",
                "metadata": {
                    "cupsnumber": "ES0031406912345678JN0F",
                    "address": {
                        "street": "Calle Mayor, número 12",
                        "postalCode": "17001",
                        "city": "Girona",
                        "cityCode": "17079",
                        "province": "Girona",
                        "provinceCode": "17",
                        "country": "España",
                        "countryCode": "ES",
                    }
                }
            })]
        );
    }

    #[tokio::test]
    async fn raw_mode_keeps_absent_fields() {
        let backoffice = FixtureBackOffice::new(Fixture {
            metering_points: vec![cups()],
            ..Default::default()
        });
        let mut ctx = RunContext::new();
        ctx.remember_serial("12345", Some(("mp-1".to_string(), 9)));
        let options = AssembleOptions {
            mode: OutputMode::Raw,
            ..Default::default()
        };

        let out = assemble_metering_points(&backoffice, &ctx, &["mp-1".to_string()], &options)
            .await
            .unwrap();

        assert!(out[0]["metadata"]["address"]["parcelNumber"].is_null());
        assert!(out[0]["metadata"]["address"]
            .as_object()
            .unwrap()
            .contains_key("parcelNumber"));
    }

    #[tokio::test]
    async fn metering_point_not_seen_during_the_run_is_an_error() {
        let backoffice = FixtureBackOffice::new(Fixture::default());
        let ctx = RunContext::new();

        let ids = ["mp-x".to_string()];
        let err = assemble_metering_points(&backoffice, &ctx, &ids, &AssembleOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::UnresolvedMeteringPoint(id) if id == "mp-x"));
    }
}
