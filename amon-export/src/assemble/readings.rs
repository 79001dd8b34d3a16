use erp_client::{domain::Profile, BackOffice};
use serde_json::{json, Value};
use time_tz::Tz;

use super::{finish, record_assembled, AssembleOptions};
use crate::identifiers::Model;
use crate::pipeline::{PipelineError, RunContext};
use crate::transform::{device_serial, to_utc_iso_timestamp, unit_prefix};

const ACTIVE: &str = "electricityConsumption";
const REACTIVE: &str = "electricityKiloVoltAmpHours";

/// AMON measure for one profile: an active and a reactive energy reading
/// sharing the profile's timestamp and unit scale.
pub fn reading_payload(
    profile: &Profile,
    device_id: &str,
    metering_point_id: &str,
    tz: &Tz,
) -> Result<Value, PipelineError> {
    let prefix = unit_prefix(&profile.magn)?;
    let timestamp = to_utc_iso_timestamp(&profile.timestamp, tz)?;

    Ok(json!({
        "deviceId": device_id,
        "meteringPointId": metering_point_id,
        "readings": [
            {"type": ACTIVE, "unit": format!("{prefix}Wh"), "period": "INSTANT"},
            {"type": REACTIVE, "unit": format!("{prefix}VArh"), "period": "INSTANT"},
        ],
        "measurements": [
            {"type": ACTIVE, "timestamp": timestamp, "value": profile.ai},
            {"type": REACTIVE, "timestamp": timestamp, "value": profile.r1},
        ],
    }))
}

/// Metering point identifier for the meter a device name refers to.
///
/// Results, misses included, are cached in `ctx` for the rest of the run.
pub async fn resolve_metering_point<B>(
    backoffice: &B,
    ctx: &mut RunContext,
    device_name: &str,
) -> Result<Option<String>, PipelineError>
where
    B: BackOffice + ?Sized,
{
    let serial = device_serial(device_name);
    if let Some(cached) = ctx.cached_serial(serial) {
        return Ok(cached.map(str::to_string));
    }

    let link = backoffice.meter_link(serial).await?;
    let resolved = link.map(|l| (Model::MeteringPoint.id_for(&l.cups), l.metering_point_id));
    let metering_point_id = resolved.as_ref().map(|(uuid, _)| uuid.clone());
    ctx.remember_serial(serial, resolved);

    Ok(metering_point_id)
}

/// Profiles whose meter has no known metering point are skipped.
pub async fn assemble_readings<B>(
    backoffice: &B,
    ctx: &mut RunContext,
    profiles: &[Profile],
    tz: &Tz,
    options: &AssembleOptions,
) -> Result<Vec<Value>, PipelineError>
where
    B: BackOffice + ?Sized,
{
    let mut out = Vec::with_capacity(profiles.len());

    for profile in profiles {
        let resolved = resolve_metering_point(backoffice, ctx, &profile.name).await?;
        let Some(metering_point_id) = resolved else {
            tracing::debug!(
                device = %profile.name,
                "no metering point for device, skipping reading"
            );
            metrics::counter!("amon_readings_skipped_total").increment(1);
            continue;
        };

        let device_id = Model::Meter.id_for(&profile.name);
        ctx.link_device(&device_id, &metering_point_id);

        let payload = reading_payload(profile, &device_id, &metering_point_id, tz)?;
        out.push(finish(payload, options.mode));
    }

    record_assembled("readings", out.len());
    Ok(out)
}
