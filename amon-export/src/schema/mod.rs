//! Declarative descriptions of the exchange format and a generic validator.
//!
//! A [`Schema`] is plain data: field names, primitive types and, for
//! restricted strings, the closed set of legal values. Unknown keys are
//! ignored, like the receiving side does.

pub mod amon;
pub mod empowering;

use std::fmt;

use serde_json::Value;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

use crate::pipeline::PipelineError;

#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Uuid,
    /// RFC 3339 string.
    Timestamp,
    Nested(&'static Schema),
    List(&'static FieldType),
}

impl FieldType {
    fn describe(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "number",
            FieldType::Boolean => "boolean",
            FieldType::Uuid => "uuid",
            FieldType::Timestamp => "timestamp",
            FieldType::Nested(_) => "object",
            FieldType::List(_) => "list",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
    pub one_of: Option<&'static [&'static str]>,
    pub required: bool,
}

impl Field {
    pub const fn new(name: &'static str, ty: FieldType) -> Self {
        Field {
            name,
            ty,
            one_of: None,
            required: false,
        }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub const fn float(name: &'static str) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub const fn uuid(name: &'static str) -> Self {
        Self::new(name, FieldType::Uuid)
    }

    pub const fn timestamp(name: &'static str) -> Self {
        Self::new(name, FieldType::Timestamp)
    }

    pub const fn nested(name: &'static str, schema: &'static Schema) -> Self {
        Self::new(name, FieldType::Nested(schema))
    }

    pub const fn list(name: &'static str, item: &'static FieldType) -> Self {
        Self::new(name, FieldType::List(item))
    }

    pub const fn one_of(self, values: &'static [&'static str]) -> Self {
        Field {
            one_of: Some(values),
            ..self
        }
    }

    pub const fn required(self) -> Self {
        Field {
            required: true,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

/// The five payload kinds the exporter emits, one per submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Reading,
    MeteringPoint,
    Device,
    Contract,
    Partner,
}

impl PayloadKind {
    pub const ALL: [PayloadKind; 5] = [
        PayloadKind::Reading,
        PayloadKind::MeteringPoint,
        PayloadKind::Device,
        PayloadKind::Contract,
        PayloadKind::Partner,
    ];

    pub fn schema(self) -> &'static Schema {
        match self {
            PayloadKind::Reading => &amon::AMON_MEASURE,
            PayloadKind::MeteringPoint => &amon::METERING_POINT,
            PayloadKind::Device => &amon::DEVICE,
            PayloadKind::Contract => &amon::CONTRACT,
            PayloadKind::Partner => &amon::PARTNER,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PayloadKind::Reading => "readings",
            PayloadKind::MeteringPoint => "metering_points",
            PayloadKind::Device => "devices",
            PayloadKind::Contract => "contracts",
            PayloadKind::Partner => "partners",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check `value` against `schema`, recursing into nested objects and lists.
pub fn validate(schema: &Schema, value: &Value) -> Result<(), PipelineError> {
    validate_object(schema, value, "")
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn validate_object(schema: &Schema, value: &Value, path: &str) -> Result<(), PipelineError> {
    let map = value.as_object().ok_or_else(|| PipelineError::InvalidFieldType {
        schema: schema.name,
        field: if path.is_empty() { "<root>".to_string() } else { path.to_string() },
        expected: "object",
    })?;

    for field in schema.fields {
        let field_path = join(path, field.name);
        match map.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    return Err(PipelineError::MissingField {
                        schema: schema.name,
                        field: field_path,
                    });
                }
            }
            Some(v) => {
                check_type(schema, &field.ty, v, &field_path)?;
                if let (Some(allowed), Some(s)) = (field.one_of, v.as_str()) {
                    if !allowed.contains(&s) {
                        return Err(PipelineError::InvalidEnumValue {
                            schema: schema.name,
                            field: field_path,
                            value: s.to_string(),
                        });
                    }
                }
            }
        }
    }

    Ok(())
}

fn check_type(
    schema: &Schema,
    ty: &FieldType,
    value: &Value,
    path: &str,
) -> Result<(), PipelineError> {
    let ok = match ty {
        FieldType::String => value.is_string(),
        FieldType::Integer => value.is_i64() || value.is_u64(),
        FieldType::Float => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Uuid => value.as_str().is_some_and(|s| Uuid::parse_str(s).is_ok()),
        FieldType::Timestamp => value
            .as_str()
            .is_some_and(|s| OffsetDateTime::parse(s, &Rfc3339).is_ok()),
        FieldType::Nested(inner) => return validate_object(inner, value, path),
        FieldType::List(item) => match value.as_array() {
            Some(items) => {
                for (idx, v) in items.iter().enumerate() {
                    check_type(schema, item, v, &format!("{path}[{idx}]"))?;
                }
                true
            }
            None => false,
        },
    };

    if ok {
        Ok(())
    } else {
        Err(PipelineError::InvalidFieldType {
            schema: schema.name,
            field: path.to_string(),
            expected: ty.describe(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLOUR: Schema = Schema {
        name: "Colour",
        fields: &[
            Field::string("name").required(),
            Field::string("tone").one_of(&["warm", "cold"]),
            Field::integer("rank"),
        ],
    };

    const COLOUR_ITEM: FieldType = FieldType::Nested(&COLOUR);

    const PALETTE: Schema = Schema {
        name: "Palette",
        fields: &[Field::uuid("id"), Field::list("colours", &COLOUR_ITEM)],
    };

    #[test]
    fn accepts_valid_payload_and_ignores_unknown_keys() {
        let v = json!({"name": "red", "tone": "warm", "rank": 1, "extra": [1, 2]});
        assert!(validate(&COLOUR, &v).is_ok());
    }

    #[test]
    fn rejects_value_outside_enumeration() {
        let v = json!({"name": "red", "tone": "lukewarm"});
        match validate(&COLOUR, &v) {
            Err(PipelineError::InvalidEnumValue { schema, field, value }) => {
                assert_eq!(schema, "Colour");
                assert_eq!(field, "tone");
                assert_eq!(value, "lukewarm");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_wrong_primitive_type() {
        let v = json!({"name": "red", "rank": 1.5});
        assert!(matches!(
            validate(&COLOUR, &v),
            Err(PipelineError::InvalidFieldType { expected: "integer", .. })
        ));
    }

    #[test]
    fn missing_required_field_is_reported() {
        let v = json!({"tone": "cold"});
        assert!(matches!(
            validate(&COLOUR, &v),
            Err(PipelineError::MissingField { field, .. }) if field == "name"
        ));
    }

    #[test]
    fn errors_inside_lists_carry_the_item_path() {
        let v = json!({
            "id": "9dcb447b-50e3-5967-9259-c096aef8268b",
            "colours": [{"name": "red"}, {"name": "blue", "tone": "neon"}]
        });
        match validate(&PALETTE, &v) {
            Err(PipelineError::InvalidEnumValue { field, .. }) => {
                assert_eq!(field, "colours[1].tone")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn uuid_fields_must_parse() {
        let v = json!({"id": "not-a-uuid"});
        assert!(matches!(
            validate(&PALETTE, &v),
            Err(PipelineError::InvalidFieldType { expected: "uuid", .. })
        ));
    }
}
