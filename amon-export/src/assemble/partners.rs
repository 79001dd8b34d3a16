use std::str::FromStr;

use erp_client::{
    domain::{Partner, PartnerAddress},
    BackOffice,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{finish, record_assembled, AssembleOptions};
use crate::identifiers::Model;
use crate::pipeline::PipelineError;

/// Leading letters of a Spanish tax id (NIF) that denote a legal entity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct CompanyPrefixes(Vec<char>);

impl CompanyPrefixes {
    pub const DEFAULT: &'static str = "ABCDEFGHJUVNPQRSW";

    pub fn contains(&self, letter: char) -> bool {
        self.0.contains(&letter.to_ascii_uppercase())
    }

    /// Whether `vat` belongs to a company. A nine-character VAT is a bare
    /// NIF; longer values carry a two-letter country prefix first.
    pub fn is_company(&self, vat: Option<&str>) -> bool {
        let vat = vat.map(str::trim).unwrap_or("");
        let nif = if vat.chars().count() == 9 {
            vat
        } else {
            vat.char_indices().nth(2).map_or("", |(idx, _)| &vat[idx..])
        };
        nif.chars().next().is_some_and(|c| self.contains(c))
    }
}

impl Default for CompanyPrefixes {
    fn default() -> Self {
        Self::from(Self::DEFAULT.to_string())
    }
}

impl From<String> for CompanyPrefixes {
    fn from(letters: String) -> Self {
        CompanyPrefixes(
            letters
                .chars()
                .filter(|c| c.is_ascii_alphabetic())
                .map(|c| c.to_ascii_uppercase())
                .collect(),
        )
    }
}

impl FromStr for CompanyPrefixes {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub first_name: String,
    pub first_surname: String,
}

/// People are filed as `"Surnames, Name"`; companies keep their whole name.
pub fn split_name(display_name: &str, is_company: bool) -> PersonName {
    if !is_company {
        if let Some((surnames, first_name)) = display_name.rsplit_once(',') {
            return PersonName {
                first_name: first_name.trim().to_string(),
                first_surname: surnames
                    .split(',')
                    .map(str::trim)
                    .collect::<Vec<_>>()
                    .join(" "),
            };
        }
    }

    PersonName {
        first_name: display_name.to_string(),
        first_surname: String::new(),
    }
}

pub fn partner_payload(
    partner: &Partner,
    address: &PartnerAddress,
    prefixes: &CompanyPrefixes,
) -> Value {
    let name = split_name(&partner.name, prefixes.is_company(partner.vat.as_deref()));

    json!({
        "id": Model::Partner.id_for(partner.id),
        "firstName": name.first_name,
        "firstSurname": name.first_surname,
        "address": {
            "street": address.street,
            "postalCode": address.postal_code,
            "city": address.city,
            "cityCode": address.city_code,
            "province": address.province,
            "provinceCode": address.province_code,
            "country": address.country,
            "countryCode": address.country_code,
            "parcelNumber": Value::Null,
        },
    })
}

/// Partners with no address on file, and no override, are skipped.
pub async fn assemble_partners<B>(
    backoffice: &B,
    partner_ids: &[i64],
    prefixes: &CompanyPrefixes,
    options: &AssembleOptions,
) -> Result<Vec<Value>, PipelineError>
where
    B: BackOffice + ?Sized,
{
    let mut out = Vec::with_capacity(partner_ids.len());

    for &id in partner_ids {
        let partner = backoffice.partner(id).await?;
        let Some(address_id) = options
            .partner_address
            .or_else(|| partner.address_ids.first().copied())
        else {
            tracing::debug!(partner = id, "partner has no address, skipping");
            metrics::counter!("amon_partners_skipped_total").increment(1);
            continue;
        };
        let address = backoffice.partner_address(address_id).await?;

        out.push(finish(partner_payload(&partner, &address, prefixes), options.mode));
    }

    record_assembled("partners", out.len());
    Ok(out)
}
