//! Receiving-side schemas of the Empowering platform, used to validate
//! documents coming back in the same format.

use super::amon::ADDRESS;
use super::{Field, FieldType, Schema};

pub const BUILDING_DATA: Schema = Schema {
    name: "CustomerBuildingData",
    fields: &[
        Field::integer("buildingConstructionYear"),
        Field::integer("dwellingArea"),
        Field::integer("buildingVolume"),
        Field::string("buildingType").one_of(&["Single_house", "Apartment"]),
        Field::string("dwellingPositionInBuilding").one_of(&[
            "first_floor",
            "middle_floor",
            "last_floor",
            "other",
        ]),
        Field::string("dwellingOrientation").one_of(&["S", "SE", "E", "NE", "N", "NW", "W", "SW"]),
        Field::string("buildingWindowsType").one_of(&[
            "single_panel",
            "double_panel",
            "triple_panel",
            "low_emittance",
            "other",
        ]),
        Field::string("buildingWindowsFrame")
            .one_of(&["PVC", "wood", "aluminium", "steel", "other"]),
        Field::string("buildingHeatingSource").one_of(HEATING_SOURCES),
        Field::string("buildingHeatingSourceDhw").one_of(HEATING_SOURCES),
        Field::string("buildingSolarSystem").one_of(&[
            "PV",
            "solar_thermal_heating",
            "solar_thermal_DHW",
            "other",
            "not_installed",
        ]),
    ],
};

const HEATING_SOURCES: &[&str] = &[
    "electricity",
    "gas",
    "gasoil",
    "district_heating",
    "biomass",
    "other",
];

pub const EDUCATION_LEVEL: Schema = Schema {
    name: "CustomerProfileEducationLevel",
    fields: &[
        Field::integer("edu_prim"),
        Field::integer("edu_sec"),
        Field::integer("edu_uni"),
        Field::integer("edu_noStudies"),
    ],
};

pub const CUSTOMER_PROFILE: Schema = Schema {
    name: "CustomerProfile",
    fields: &[
        Field::integer("totalPersonNumber"),
        Field::integer("minorsPersonsNumber"),
        Field::integer("workingAgePersonsNumber"),
        Field::integer("retiredAgePersonsNumber"),
        Field::integer("malePersonsNumber"),
        Field::integer("femalePersonsNumber"),
        Field::nested("educationLevel", &EDUCATION_LEVEL),
    ],
};

pub const GROUPING_CRITERIA: Schema = Schema {
    name: "CustomerCustomisedGroupingCriteria",
    fields: &[],
};

pub const SERVICE_PARAMETERS: Schema = Schema {
    name: "CustomerCustomisedServiceParameters",
    fields: &[
        Field::string("OT101"),
        Field::string("OT103"),
        Field::string("OT105"),
        Field::string("OT106"),
        Field::string("OT109"),
        Field::string("OT201"),
        Field::string("OT204"),
        Field::string("OT401"),
        Field::string("OT502"),
        Field::string("OT503"),
        Field::string("OT603"),
        Field::string("OT603g"),
        Field::string("OT701"),
        Field::string("OT703"),
    ],
};

pub const CUSTOMER: Schema = Schema {
    name: "Customer",
    fields: &[
        Field::uuid("customerId"),
        Field::nested("address", &ADDRESS),
        Field::nested("buildingData", &BUILDING_DATA),
        Field::nested("profile", &CUSTOMER_PROFILE),
        Field::nested("customisedGroupingCriteria", &GROUPING_CRITERIA),
        Field::nested("customisedServiceParameters", &SERVICE_PARAMETERS),
    ],
};

pub const DEVICE_ENTRY: Schema = Schema {
    name: "Device",
    fields: &[
        Field::timestamp("dateStart"),
        Field::timestamp("dateEnd"),
        Field::uuid("deviceId"),
    ],
};

pub const TARIFF: Schema = Schema {
    name: "Tariff",
    fields: &[
        Field::timestamp("dateStart"),
        Field::timestamp("dateEnd"),
        Field::string("tariffId"),
    ],
};

pub const POWER: Schema = Schema {
    name: "Power",
    fields: &[
        Field::timestamp("dateStart"),
        Field::timestamp("dateEnd"),
        Field::integer("power"),
    ],
};

const TARIFF_ITEM: FieldType = FieldType::Nested(&TARIFF);
const POWER_ITEM: FieldType = FieldType::Nested(&POWER);
const DEVICE_ITEM: FieldType = FieldType::Nested(&DEVICE_ENTRY);

pub const CONTRACT: Schema = Schema {
    name: "Contract",
    fields: &[
        Field::uuid("payerId"),
        Field::uuid("ownerId"),
        Field::uuid("signerId"),
        Field::integer("power"),
        Field::nested("power_", &POWER),
        Field::list("powerHistory", &POWER_ITEM),
        Field::timestamp("dateStart"),
        Field::timestamp("dateEnd"),
        Field::string("contractId"),
        Field::string("tariffId"),
        Field::nested("tariff_", &TARIFF),
        Field::list("tariffHistory", &TARIFF_ITEM),
        Field::integer("version"),
        Field::string("activityCode"),
        Field::uuid("meteringPointId"),
        Field::string("climiaticZone"),
        Field::uuid("weatherStationId"),
        Field::boolean("experimentalGroupUser"),
        Field::boolean("experimentalGroupUserTest"),
        Field::boolean("activeUser"),
        Field::timestamp("activeUserDate"),
        Field::nested("customer", &CUSTOMER),
        Field::list("devices", &DEVICE_ITEM),
    ],
};
