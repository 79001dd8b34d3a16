use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

use crate::backoffice::{BackOffice, ErpError};
use crate::domain::{
    Contract, ContractVersion, MeterLink, MeteringPoint, Partner, PartnerAddress, Profile,
};

// ERP ids are int4 columns; every id projected into an `i64` is cast to int8.

const PROFILES_SQL: &str = r#"
    SELECT
        name,
        to_char(timestamp, 'YYYY-MM-DD HH24:MI:SS') AS timestamp,
        ai::float8                                  AS ai,
        r1::float8                                  AS r1,
        magn::text                                  AS magn
    FROM tg_profile
    ORDER BY id
    LIMIT $1
"#;

const METER_LINK_SQL: &str = r#"
    SELECT
        c.name        AS serial,
        cups.id::int8 AS metering_point_id,
        cups.name     AS cups
    FROM giscedata_lectures_comptador c
    JOIN giscedata_polissa p     ON p.id = c.polissa
    JOIN giscedata_cups_ps cups  ON cups.id = p.cups
    WHERE c.name = $1
    ORDER BY c.id
    LIMIT 1
"#;

const METERING_POINT_SQL: &str = r#"
    SELECT
        cups.id::int8      AS id,
        cups.name,
        cups.cpo,
        cups.cpa,
        tv.name            AS street_type,
        cups.nv            AS street_name,
        cups.pnp           AS number,
        cups.es            AS staircase,
        cups.pt            AS floor,
        cups.pu            AS door,
        cups.dp            AS postal_code,
        cups.ref_catastral AS parcel_number,
        m.name             AS city,
        m.ine              AS city_code,
        s.name             AS province,
        s.code             AS province_code,
        co.name            AS country,
        co.code            AS country_code
    FROM giscedata_cups_ps cups
    LEFT JOIN res_tipovia tv        ON tv.id = cups.tv
    LEFT JOIN res_municipi m        ON m.id = cups.id_municipi
    LEFT JOIN res_country_state s   ON s.id = m.state
    LEFT JOIN res_country co        ON co.id = s.country_id
    WHERE cups.id = $1
"#;

const CONTRACTS_FOR_METERING_POINTS_SQL: &str =
    "SELECT id::int8 FROM giscedata_polissa WHERE cups = ANY($1) ORDER BY id";

const CONTRACT_SQL: &str = r#"
    SELECT
        id::int8                    AS id,
        name,
        modcontractual_activa::int8 AS active_version_id
    FROM giscedata_polissa
    WHERE id = $1
"#;

const CONTRACT_VERSION_SQL: &str = r#"
    SELECT
        mc.id::int8          AS id,
        mc.name,
        mc.titular::int8     AS owner_id,
        mc.pagador::int8     AS payer_id,
        mc.data_inici        AS start,
        mc.data_final        AS "end",
        t.name               AS tariff,
        mc.potencia::float8  AS power,
        cnae.name            AS activity_code,
        cups.name            AS cups
    FROM giscedata_polissa_modcontractual mc
    JOIN giscedata_polissa_tarifa t   ON t.id = mc.tarifa
    JOIN giscedata_cups_ps cups       ON cups.id = mc.cups
    LEFT JOIN giscemisc_cnae cnae     ON cnae.id = mc.cnae
    WHERE mc.id = $1
"#;

const PARTNER_SQL: &str = "SELECT id::int8, name, vat FROM res_partner WHERE id = $1";

const PARTNER_ADDRESS_IDS_SQL: &str =
    "SELECT id::int8 FROM res_partner_address WHERE partner_id = $1 ORDER BY id";

const PARTNER_ADDRESS_SQL: &str = r#"
    SELECT
        a.id::int8 AS id,
        a.street,
        a.zip    AS postal_code,
        m.name   AS city,
        m.ine    AS city_code,
        s.name   AS province,
        s.code   AS province_code,
        co.name  AS country,
        co.code  AS country_code
    FROM res_partner_address a
    LEFT JOIN res_municipi m       ON m.id = a.id_municipi
    LEFT JOIN res_country_state s  ON s.id = a.state_id
    LEFT JOIN res_country co       ON co.id = a.country_id
    WHERE a.id = $1
"#;

/// `BackOffice` backed by the ERP's own PostgreSQL database.
#[derive(Clone)]
pub struct PgBackOffice {
    pool: PgPool,
}

impl PgBackOffice {
    pub async fn connect(
        options: PgConnectOptions,
        max_connections: u32,
    ) -> Result<Self, ErpError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }
}

/// Latest profile rows in id order. The timestamp is rendered as local
/// wall-clock text; conversion to UTC happens on the export side.
pub async fn profiles(pool: &PgPool, limit: usize) -> Result<Vec<Profile>, ErpError> {
    let rows = sqlx::query_as::<_, Profile>(PROFILES_SQL)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

pub async fn meter_link(pool: &PgPool, serial: &str) -> Result<Option<MeterLink>, ErpError> {
    let row = sqlx::query_as::<_, MeterLink>(METER_LINK_SQL)
        .bind(serial)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn metering_point(pool: &PgPool, id: i64) -> Result<MeteringPoint, ErpError> {
    sqlx::query_as::<_, MeteringPoint>(METERING_POINT_SQL)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ErpError::NotFound {
            model: "giscedata.cups.ps",
            id,
        })
}

pub async fn contracts_for_metering_points(
    pool: &PgPool,
    ids: &[i64],
) -> Result<Vec<i64>, ErpError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query_scalar::<_, i64>(CONTRACTS_FOR_METERING_POINTS_SQL)
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

pub async fn contract(pool: &PgPool, id: i64) -> Result<Contract, ErpError> {
    sqlx::query_as::<_, Contract>(CONTRACT_SQL)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ErpError::NotFound {
            model: "giscedata.polissa",
            id,
        })
}

pub async fn contract_version(pool: &PgPool, id: i64) -> Result<ContractVersion, ErpError> {
    sqlx::query_as::<_, ContractVersion>(CONTRACT_VERSION_SQL)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ErpError::NotFound {
            model: "giscedata.polissa.modcontractual",
            id,
        })
}

pub async fn partner(pool: &PgPool, id: i64) -> Result<Partner, ErpError> {
    let (id, name, vat) = sqlx::query_as::<_, (i64, String, Option<String>)>(PARTNER_SQL)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ErpError::NotFound {
            model: "res.partner",
            id,
        })?;

    let address_ids = sqlx::query_scalar::<_, i64>(PARTNER_ADDRESS_IDS_SQL)
        .bind(id)
        .fetch_all(pool)
        .await?;

    Ok(Partner {
        id,
        name,
        vat,
        address_ids,
    })
}

pub async fn partner_address(pool: &PgPool, id: i64) -> Result<PartnerAddress, ErpError> {
    sqlx::query_as::<_, PartnerAddress>(PARTNER_ADDRESS_SQL)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ErpError::NotFound {
            model: "res.partner.address",
            id,
        })
}

#[async_trait::async_trait]
impl BackOffice for PgBackOffice {
    async fn profiles(&self, limit: usize) -> Result<Vec<Profile>, ErpError> {
        profiles(&self.pool, limit).await
    }

    async fn meter_link(&self, serial: &str) -> Result<Option<MeterLink>, ErpError> {
        meter_link(&self.pool, serial).await
    }

    async fn metering_point(&self, id: i64) -> Result<MeteringPoint, ErpError> {
        metering_point(&self.pool, id).await
    }

    async fn contracts_for_metering_points(&self, ids: &[i64]) -> Result<Vec<i64>, ErpError> {
        contracts_for_metering_points(&self.pool, ids).await
    }

    async fn contract(&self, id: i64) -> Result<Contract, ErpError> {
        contract(&self.pool, id).await
    }

    async fn contract_version(&self, id: i64) -> Result<ContractVersion, ErpError> {
        contract_version(&self.pool, id).await
    }

    async fn partner(&self, id: i64) -> Result<Partner, ErpError> {
        partner(&self.pool, id).await
    }

    async fn partner_address(&self, id: i64) -> Result<PartnerAddress, ErpError> {
        partner_address(&self.pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `i64` only decodes from INT8; the ERP stores ids as INT4.
    fn assert_int8(sql: &str, projection: &str) {
        assert!(
            sql.contains(&format!("{projection}::int8")),
            "`{projection}` is not cast to int8 in:\n{sql}"
        );
    }

    #[test]
    fn id_projections_decode_as_int8() {
        assert_int8(METER_LINK_SQL, "cups.id");
        assert_int8(METERING_POINT_SQL, "cups.id");
        assert_int8(CONTRACTS_FOR_METERING_POINTS_SQL, "SELECT id");
        assert_int8(CONTRACT_SQL, "id");
        assert_int8(CONTRACT_SQL, "modcontractual_activa");
        assert_int8(CONTRACT_VERSION_SQL, "mc.id");
        assert_int8(CONTRACT_VERSION_SQL, "mc.titular");
        assert_int8(CONTRACT_VERSION_SQL, "mc.pagador");
        assert_int8(PARTNER_SQL, "SELECT id");
        assert_int8(PARTNER_ADDRESS_IDS_SQL, "SELECT id");
        assert_int8(PARTNER_ADDRESS_SQL, "a.id");
    }

    #[test]
    fn lookups_by_id_keep_the_bind_parameter() {
        for sql in [
            METERING_POINT_SQL,
            CONTRACT_SQL,
            CONTRACT_VERSION_SQL,
            PARTNER_SQL,
            PARTNER_ADDRESS_IDS_SQL,
            PARTNER_ADDRESS_SQL,
        ] {
            assert!(sql.contains("= $1"), "missing id filter in:\n{sql}");
        }
    }
}
