//! Payloads emitted by the exporter.

use super::{Field, FieldType, Schema};

pub const READING_TYPES: &[&str] = &[
    "electricityConsumption",
    "electricityKiloVoltAmpHours",
    "heatConsumption",
    "gasConsumption",
    "estimatedElectricityConsumption",
    "estimatedElectricityKiloVoltAmpHours",
    "estimatedHeatConsumption",
    "estimatedGasConsumption",
];

pub const UNITS: &[&str] = &["kWh", "Wh", "kVArh", "VArh"];

pub const PERIODS: &[&str] = &["INSTANT", "CUMULATIVE", "PULSE"];

pub const ADDRESS: Schema = Schema {
    name: "Address",
    fields: &[
        Field::uuid("buildingId"),
        Field::string("street"),
        Field::string("postalCode"),
        Field::string("city"),
        Field::string("cityCode"),
        Field::string("province"),
        Field::string("provinceCode"),
        Field::string("country"),
        Field::string("countryCode"),
        Field::string("parcelNumber"),
    ],
};

pub const READING: Schema = Schema {
    name: "Reading",
    fields: &[
        Field::string("type").one_of(READING_TYPES),
        Field::string("unit").one_of(UNITS),
        Field::string("period").one_of(PERIODS),
    ],
};

pub const MEASUREMENT: Schema = Schema {
    name: "Measurement",
    fields: &[
        Field::string("type").one_of(READING_TYPES),
        Field::timestamp("timestamp"),
        Field::float("value"),
    ],
};

const READING_ITEM: FieldType = FieldType::Nested(&READING);
const MEASUREMENT_ITEM: FieldType = FieldType::Nested(&MEASUREMENT);

pub const AMON_MEASURE: Schema = Schema {
    name: "AmonMeasure",
    fields: &[
        Field::uuid("deviceId").required(),
        Field::uuid("meteringPointId").required(),
        Field::list("readings", &READING_ITEM),
        Field::list("measurements", &MEASUREMENT_ITEM),
    ],
};

pub const METERING_POINT_METADATA: Schema = Schema {
    name: "MeteringPointMetadata",
    fields: &[Field::string("cupsnumber"), Field::nested("address", &ADDRESS)],
};

pub const METERING_POINT: Schema = Schema {
    name: "MeteringPoint",
    fields: &[
        Field::uuid("meteringPointId").required(),
        Field::nested("metadata", &METERING_POINT_METADATA),
    ],
};

/// Reserved; no device metadata is exported yet.
pub const DEVICE_METADATA: Schema = Schema {
    name: "DeviceMetadata",
    fields: &[],
};

pub const DEVICE: Schema = Schema {
    name: "Device",
    fields: &[
        Field::uuid("deviceId").required(),
        Field::uuid("meteringPointId").required(),
        Field::nested("metadata", &DEVICE_METADATA),
    ],
};

pub const CONTRACT: Schema = Schema {
    name: "Contract",
    fields: &[
        Field::uuid("id").required(),
        Field::uuid("ownerId"),
        Field::uuid("payerId"),
        Field::string("version"),
        Field::integer("start"),
        Field::integer("end"),
        Field::string("tariffId"),
        Field::integer("power"),
        Field::string("activityCode"),
        Field::uuid("meteringPointId"),
    ],
};

pub const PARTNER: Schema = Schema {
    name: "Partner",
    fields: &[
        Field::uuid("id").required(),
        Field::string("firstName"),
        Field::string("firstSurname"),
        Field::string("secondSurname"),
        Field::nested("address", &ADDRESS),
    ],
};
