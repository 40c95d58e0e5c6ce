//! Async request execution on top of `CarsClient`.
//!
//! # Design
//! `Executor` pairs the request builders with a `Transport`. Each operation
//! builds one request, sends it exactly once and maps the response with
//! `client::outcome`. Nothing is retried, cached or shared between calls, so
//! any number of operations may be in flight at once on the same executor.

use tracing::debug;

use crate::client::{outcome, CarsClient, RequestOutcome};
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::query::ListQuery;
use crate::transport::Transport;
use crate::types::{CarPayload, ResourceId};

#[derive(Debug, Clone)]
pub struct Executor<T> {
    client: CarsClient,
    transport: T,
}

impl<T: Transport> Executor<T> {
    pub fn new(client: CarsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CarsClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a prepared request and resolve it against its expected status.
    pub async fn execute(&self, request: HttpRequest) -> RequestOutcome {
        let expected = request.expected_status;
        debug!(method = %request.method, url = %request.url, "sending request");
        match self.transport.send(request).await {
            Ok(response) => {
                debug!(status = response.status, expected, "received response");
                outcome(response, expected)
            }
            Err(err) => {
                debug!(error = %err, "no response received");
                Err(err.into())
            }
        }
    }

    pub async fn list_cars(&self, query: &ListQuery) -> RequestOutcome {
        self.execute(self.client.build_list_cars(query)).await
    }

    pub async fn get_car(&self, id: &ResourceId) -> RequestOutcome {
        self.execute(self.client.build_get_car(id)).await
    }

    pub async fn create_car(&self, input: &CarPayload) -> Result<String, ApiError> {
        let request = self.client.build_create_car(input)?;
        Ok(self.execute(request).await?)
    }

    pub async fn update_car(&self, id: &ResourceId, input: &CarPayload) -> Result<String, ApiError> {
        let request = self.client.build_update_car(id, input)?;
        Ok(self.execute(request).await?)
    }

    pub async fn delete_car(&self, id: &ResourceId) -> RequestOutcome {
        self.execute(self.client.build_delete_car(id)).await
    }

    pub async fn list_makes(&self) -> RequestOutcome {
        self.execute(self.client.build_list_makes()).await
    }

    pub async fn list_models(&self, make_id: &ResourceId) -> RequestOutcome {
        self.execute(self.client.build_list_models(make_id)).await
    }

    pub async fn list_body_types(&self) -> RequestOutcome {
        self.execute(self.client.build_list_body_types()).await
    }
}
