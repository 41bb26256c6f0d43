/// HTTP seam to the processing endpoint
use std::future::Future;

use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use super::form::{FieldValue, OutboundRequest};
use crate::error::Result;

/// What came back from the endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    /// Post the request. Only failures to get any response are errors here;
    /// HTTP error statuses come back as a normal response.
    fn send(&self, request: OutboundRequest) -> impl Future<Output = Result<TransportResponse>> + Send;
}

/// `reqwest` multipart transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    server_url: String,
}

impl HttpTransport {
    pub fn new(server_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, request: &OutboundRequest) -> String {
        format!("{}{}", self.server_url, request.route.path())
    }
}

fn to_multipart(request: OutboundRequest) -> Form {
    request
        .fields
        .into_iter()
        .fold(Form::new(), |form, field| match field.value {
            FieldValue::Text(text) => form.text(field.name, text),
            FieldValue::File { file_name, bytes } => {
                form.part(field.name, Part::bytes(bytes).file_name(file_name))
            }
        })
}

impl Transport for HttpTransport {
    fn send(&self, request: OutboundRequest) -> impl Future<Output = Result<TransportResponse>> + Send {
        let url = self.url_for(&request);
        let client = self.client.clone();

        async move {
            debug!(url = %url, fields = ?request.names(), "posting multipart request");
            let response = client.post(&url).multipart(to_multipart(request)).send().await?;

            let status = response.status().as_u16();
            let content_disposition = response
                .headers()
                .get(CONTENT_DISPOSITION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let body = response.bytes().await?.to_vec();

            Ok(TransportResponse {
                status,
                content_disposition,
                body,
            })
        }
    }
}
