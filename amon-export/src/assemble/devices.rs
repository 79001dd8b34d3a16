use serde_json::{json, Value};

use super::{finish, record_assembled, AssembleOptions};
use crate::pipeline::{PipelineError, RunContext};

pub fn device_payload(device_id: &str, metering_point_id: &str) -> Value {
    json!({
        "deviceId": device_id,
        "meteringPointId": metering_point_id,
        "metadata": {},
    })
}

/// Devices must have been seen while assembling readings; that is where
/// their metering point is learnt.
pub fn assemble_devices(
    ctx: &RunContext,
    device_ids: &[String],
    options: &AssembleOptions,
) -> Result<Vec<Value>, PipelineError> {
    let out = device_ids
        .iter()
        .map(|id| {
            let metering_point_id = ctx
                .device_point(id)
                .ok_or_else(|| PipelineError::UnresolvedDevice(id.clone()))?;
            Ok(finish(device_payload(id, metering_point_id), options.mode))
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    record_assembled("devices", out.len());
    Ok(out)
}
