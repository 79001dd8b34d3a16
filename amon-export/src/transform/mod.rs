//! Field-level conversions from back-office values to exchange primitives.

pub mod prune;

pub use prune::{prune, prune_with, EmptyObjects};

use erp_client::domain::MeteringPoint;
use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset,
};
use time_tz::{timezones, OffsetResult, PrimitiveDateTimeExt, Tz};

use crate::pipeline::PipelineError;

pub fn resolve_time_zone(name: &str) -> Result<&'static Tz, PipelineError> {
    timezones::get_by_name(name).ok_or_else(|| PipelineError::UnknownTimeZone(name.to_string()))
}

const WIRE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");
const WALL_CLOCK: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const WALL_CLOCK_T: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Convert a wall-clock timestamp in `tz` to `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Input already in that form is returned unchanged. Any other RFC 3339
/// string carries its own offset and is re-expressed in UTC, whole seconds.
/// Otherwise the input must be `YYYY-MM-DD HH:MM:SS` (a `T` separator is
/// accepted too). Ambiguous wall-clock times at the end of daylight saving
/// resolve to standard time; times skipped by the spring transition take
/// the offset in force just before it.
pub fn to_utc_iso_timestamp(raw: &str, tz: &Tz) -> Result<String, PipelineError> {
    let raw = raw.trim();
    let invalid = || PipelineError::InvalidTimestamp(raw.to_string());

    let instant = match OffsetDateTime::parse(raw, &Rfc3339) {
        Ok(instant) => instant,
        Err(_) => {
            let local = PrimitiveDateTime::parse(raw, WALL_CLOCK)
                .or_else(|_| PrimitiveDateTime::parse(raw, WALL_CLOCK_T))
                .map_err(|_| invalid())?;
            localize(local, tz).ok_or_else(invalid)?
        }
    };

    instant
        .to_offset(UtcOffset::UTC)
        .format(WIRE_FORMAT)
        .map_err(|_| invalid())
}

fn localize(local: PrimitiveDateTime, tz: &Tz) -> Option<OffsetDateTime> {
    match local.assume_timezone(tz) {
        OffsetResult::Some(dt) => Some(dt),
        // Standard time has the smaller offset, hence the later instant.
        OffsetResult::Ambiguous(a, b) => Some(if a > b { a } else { b }),
        OffsetResult::None => match (local - Duration::HOUR).assume_timezone(tz) {
            OffsetResult::Some(dt) | OffsetResult::Ambiguous(dt, _) => Some(dt + Duration::HOUR),
            OffsetResult::None => None,
        },
    }
}

/// Seconds since the Unix epoch of `date` at 00:00 UTC.
pub fn to_epoch_seconds(date: Option<Date>) -> Option<i64> {
    date.map(|d| d.midnight().assume_utc().unix_timestamp())
}

/// Unit prefix for a magnitude scale code.
pub fn unit_prefix(scale: &str) -> Result<&'static str, PipelineError> {
    match scale.trim() {
        "1" => Ok(""),
        "1000" => Ok("k"),
        other => Err(PipelineError::UnknownScale(other.to_string())),
    }
}

/// Meter serial embedded in a device name: the three-character brand
/// prefix is dropped, then the zero padding.
pub fn device_serial(device_name: &str) -> &str {
    let start = device_name
        .char_indices()
        .nth(3)
        .map(|(idx, _)| idx)
        .unwrap_or(device_name.len());
    device_name[start..].trim_start_matches('0')
}

/// The pieces a postal street line is built from.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressParts<'a> {
    pub cpo: Option<&'a str>,
    pub cpa: Option<&'a str>,
    pub street_type: Option<&'a str>,
    pub street_name: Option<&'a str>,
    pub number: Option<&'a str>,
    pub staircase: Option<&'a str>,
    pub floor: Option<&'a str>,
    pub door: Option<&'a str>,
}

impl<'a> From<&'a MeteringPoint> for AddressParts<'a> {
    fn from(mp: &'a MeteringPoint) -> Self {
        AddressParts {
            cpo: mp.cpo.as_deref(),
            cpa: mp.cpa.as_deref(),
            street_type: mp.street_type.as_deref(),
            street_name: mp.street_name.as_deref(),
            number: mp.number.as_deref(),
            staircase: mp.staircase.as_deref(),
            floor: mp.floor.as_deref(),
            door: mp.door.as_deref(),
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Street line, e.g. `"Calle Mayor, número 12, planta 3"`.
///
/// Rural addresses identified by polygon/parcel (`CPO`/`CPA`) replace the
/// street entirely.
pub fn assemble_street_address(parts: &AddressParts<'_>) -> String {
    let cpo = present(parts.cpo);
    let cpa = present(parts.cpa);
    if cpo.is_some() || cpa.is_some() {
        return format!("CPO {} CPA {}", cpo.unwrap_or(""), cpa.unwrap_or(""))
            .trim_end()
            .to_string();
    }

    let mut segments = Vec::with_capacity(5);

    let street = [parts.street_type, parts.street_name]
        .into_iter()
        .filter_map(present)
        .collect::<Vec<_>>()
        .join(" ");
    if !street.is_empty() {
        segments.push(street);
    }

    let labelled = [
        ("número", parts.number),
        ("escalera", parts.staircase),
        ("planta", parts.floor),
        ("puerta", parts.door),
    ];
    for (label, value) in labelled {
        if let Some(v) = present(value) {
            segments.push(format!("{label} {v}"));
        }
    }

    segments.join(", ")
}
