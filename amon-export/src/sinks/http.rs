use serde_json::Value;

use super::{form_items, Encoding, Submission, Transport};
use crate::pipeline::PipelineError;
use crate::schema::PayloadKind;

/// POSTs each batch to a single receiver URL.
///
/// The receiver's answer is recorded, never interpreted: a non-success
/// status is logged but is not an error.
pub struct HttpTransport {
    url: String,
    encoding: Encoding,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, encoding: Encoding) -> Self {
        Self {
            url: url.into(),
            encoding,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn submit(
        &self,
        kind: PayloadKind,
        payloads: &[Value],
    ) -> Result<Submission, PipelineError> {
        let request = self.client.post(&self.url);
        let request = match self.encoding {
            Encoding::Form => request.form(&form_items(payloads)?),
            Encoding::Json => request.json(payloads),
        };

        let response = request.send().await.map_err(|e| {
            metrics::counter!("amon_submission_errors_total", "kind" => kind.as_str()).increment(1);
            PipelineError::Sink(format!("POST {} failed: {e}", self.url))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                PipelineError::Sink(format!("failed to read response from {}: {e}", self.url))
            })?;

        metrics::counter!("amon_submissions_total", "kind" => kind.as_str()).increment(1);
        if !status.is_success() {
            tracing::warn!(
                %kind,
                status = status.as_u16(),
                "receiver answered with a non-success status"
            );
        }

        Ok(Submission {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Bytes,
        http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
        routing::post,
        Router,
    };
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Vec<(String, String)>>>;

    async fn spawn_receiver(status: StatusCode) -> (String, Captured) {
        let captured: Captured = Arc::default();
        let sink = captured.clone();
        let app = Router::new().route(
            "/",
            post(move |headers: HeaderMap, body: Bytes| {
                let sink = sink.clone();
                async move {
                    let content_type = headers
                        .get(CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    sink.lock()
                        .unwrap()
                        .push((content_type, String::from_utf8_lossy(&body).into_owned()));
                    (status, "stored")
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service()).await.unwrap();
        });

        (format!("http://{addr}/"), captured)
    }

    #[tokio::test]
    async fn form_encoding_posts_numbered_items() {
        let (url, captured) = spawn_receiver(StatusCode::OK).await;
        let transport = HttpTransport::new(url, Encoding::Form);

        let submission = transport
            .submit(PayloadKind::Device, &[json!({"deviceId": "d"}), json!({"deviceId": "e"})])
            .await
            .unwrap();

        assert_eq!(submission, Submission { status: 200, body: "stored".to_string() });
        let requests = captured.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "application/x-www-form-urlencoded");
        assert!(requests[0].1.starts_with("item0="));
        assert!(requests[0].1.contains("&item1="));
    }

    #[tokio::test]
    async fn json_encoding_posts_an_array() {
        let (url, captured) = spawn_receiver(StatusCode::OK).await;
        let transport = HttpTransport::new(url, Encoding::Json);

        transport
            .submit(PayloadKind::Device, &[json!({"deviceId": "d"})])
            .await
            .unwrap();

        let requests = captured.lock().unwrap();
        assert_eq!(requests[0].0, "application/json");
        let body: Value = serde_json::from_str(&requests[0].1).unwrap();
        assert_eq!(body, json!([{"deviceId": "d"}]));
    }

    #[tokio::test]
    async fn error_status_is_reported_not_raised() {
        let (url, _captured) = spawn_receiver(StatusCode::INTERNAL_SERVER_ERROR).await;
        let transport = HttpTransport::new(url, Encoding::Json);

        let submission = transport.submit(PayloadKind::Partner, &[]).await.unwrap();

        assert_eq!(submission.status, 500);
        assert_eq!(submission.body, "stored");
    }

    #[tokio::test]
    async fn unreachable_receiver_is_a_sink_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(format!("http://{addr}/"), Encoding::Json);
        let err = transport.submit(PayloadKind::Partner, &[]).await.unwrap_err();

        assert!(matches!(err, PipelineError::Sink(_)));
    }
}
