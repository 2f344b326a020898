use crate::error::Result;
use crate::zoho::request::ApiRequest;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

/// Status and body of an HTTP response, exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a fully built request over the wire.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::ClientBuilder::new().build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        debug!(method = %request.method, url = %request.url, "Sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());

        if let Some(authorization) = &request.authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        if let Some(content_type) = request.body.content_type() {
            builder = builder
                .header(CONTENT_TYPE, content_type)
                .body(request.body.to_bytes()?);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays canned responses in order and records every request sent.
    #[derive(Clone, Default)]
    pub(crate) struct MockTransport {
        pub responses: Arc<Mutex<VecDeque<RawResponse>>>,
        pub requests: Arc<Mutex<Vec<ApiRequest>>>,
    }

    impl MockTransport {
        pub(crate) fn replying(responses: Vec<RawResponse>) -> Self {
            Self {
                responses: Arc::new(Mutex::new(responses.into())),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub(crate) fn json(status: u16, body: serde_json::Value) -> Self {
            Self::replying(vec![RawResponse::new(status, body.to_string())])
        }

        pub(crate) fn sent(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub(crate) fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
            self.requests.lock().unwrap().push(request);
            let response = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no canned response left");
            Ok(response)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(301, "").is_success());
        assert!(!RawResponse::new(401, "denied").is_success());
    }
}
