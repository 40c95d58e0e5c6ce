//! Executing `HttpRequest` values against the network.
//!
//! `Transport` is the seam between the I/O-free core and whatever actually
//! speaks HTTP. Implementations must return every received response as data,
//! whatever its status; only a missing response is an error.

use std::future::Future;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Sends one request and waits for its response.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

#[cfg(feature = "reqwest")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
mod reqwest_transport {
    use reqwest::Method;
    use tracing::debug;

    use super::Transport;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// `Transport` backed by `reqwest`.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    impl From<HttpMethod> for Method {
        fn from(method: HttpMethod) -> Self {
            match method {
                HttpMethod::Get => Method::GET,
                HttpMethod::Post => Method::POST,
                HttpMethod::Put => Method::PUT,
                HttpMethod::Delete => Method::DELETE,
            }
        }
    }

    impl Transport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let mut builder = self.client.request(request.method.into(), request.url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| TransportError(e.to_string()))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            // A status line that already rules out success is reported even
            // when the body is cut short; the expected status needs its body.
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) if status != request.expected_status => {
                    debug!(status, error = %e, "dropping unreadable error body");
                    String::new()
                }
                Err(e) => return Err(TransportError(e.to_string())),
            };

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
