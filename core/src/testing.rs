//! Scripted transport for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

type Reply = Result<HttpResponse, TransportError>;

/// Answers requests from a table keyed by `(method, url)`. Unknown routes get
/// a 404. Every request is recorded in the order it was sent.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: HashMap<(HttpMethod, String), (Duration, Reply)>,
    sent: Mutex<Vec<HttpRequest>>,
    completed: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, method: HttpMethod, url: &str, status: u16, body: &str) -> Self {
        self.reply_after(method, url, Duration::ZERO, Ok(HttpResponse::new(status, body)))
    }

    pub fn fail(self, method: HttpMethod, url: &str, message: &str) -> Self {
        self.reply_after(method, url, Duration::ZERO, Err(TransportError(message.to_string())))
    }

    pub fn reply_after(mut self, method: HttpMethod, url: &str, delay: Duration, reply: Reply) -> Self {
        self.routes.insert((method, url.to_string()), (delay, reply));
        self
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// URLs in the order their responses were delivered.
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        let (delay, reply) = self
            .routes
            .get(&(request.method, request.url.clone()))
            .cloned()
            .unwrap_or((Duration::ZERO, Ok(HttpResponse::new(404, ""))));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.completed.lock().unwrap().push(request.url);
        reply
    }
}
