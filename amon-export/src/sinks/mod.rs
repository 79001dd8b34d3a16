pub mod http;

pub use http::HttpTransport;

use serde::Deserialize;
use serde_json::Value;

use crate::pipeline::PipelineError;
use crate::schema::PayloadKind;

/// What the receiver answered to one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub status: u16,
    pub body: String,
}

/// Destination for assembled payloads: one call per batch, one kind per
/// batch.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn submit(
        &self,
        kind: PayloadKind,
        payloads: &[Value],
    ) -> Result<Submission, PipelineError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// `item0=<json>&item1=<json>…`, form-urlencoded.
    #[default]
    Form,
    /// A single JSON array.
    Json,
}

/// Form fields for a batch, one `item{n}` key per payload.
pub fn form_items(payloads: &[Value]) -> Result<Vec<(String, String)>, PipelineError> {
    payloads
        .iter()
        .enumerate()
        .map(|(idx, payload)| {
            serde_json::to_string(payload)
                .map(|json| (format!("item{idx}"), json))
                .map_err(|e| PipelineError::Sink(format!("failed to encode payload {idx}: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn form_items_are_numbered_in_order() {
        let items = form_items(&[json!({"a": 1}), json!({"b": "x"})]).unwrap();
        assert_eq!(
            items,
            vec![
                ("item0".to_string(), r#"{"a":1}"#.to_string()),
                ("item1".to_string(), r#"{"b":"x"}"#.to_string()),
            ]
        );
    }

    #[test]
    fn encoding_names_deserialize_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            encoding: Encoding,
        }
        let w: Wrapper = toml::from_str(r#"encoding = "json""#).unwrap();
        assert_eq!(w.encoding, Encoding::Json);
    }
}
