//! Mock transport for testing and development.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::RwLock;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::{ComputeError, Result};
use crate::requests::{Request, Response};
use crate::traits::Transport;
use crate::types::{TASK_TYPE, VCLOUD_NAMESPACE};
use crate::xml::{render, Element, RenderOptions};

/// In-memory transport.
///
/// Records every request and answers with the status the request expects
/// and a queued `Task` body, the way vCloud acknowledges asynchronous
/// operations. Useful for:
/// - Unit and integration testing of the request layer
/// - Dry runs that print what would be sent
pub struct MockTransport {
    requests: RwLock<Vec<Request>>,
    scripted: RwLock<VecDeque<Response>>,
    failure: RwLock<Option<Response>>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        info!("Creating mock transport");
        Self {
            requests: RwLock::new(Vec::new()),
            scripted: RwLock::new(VecDeque::new()),
            failure: RwLock::new(None),
        }
    }

    /// Answer every following request with `status` and `body`.
    pub fn fail_with(&self, status: u16, body: impl Into<String>) -> Result<()> {
        let mut failure = self.failure.write().map_err(|_| lock_poisoned())?;
        *failure = Some(Response::new(status, body));
        Ok(())
    }

    /// Queue a response for the next request. Queued responses take
    /// precedence over [`fail_with`](Self::fail_with).
    pub fn push_response(&self, response: Response) -> Result<()> {
        let mut scripted = self.scripted.write().map_err(|_| lock_poisoned())?;
        scripted.push_back(response);
        Ok(())
    }

    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Result<Vec<Request>> {
        let requests = self.requests.read().map_err(|_| lock_poisoned())?;
        Ok(requests.clone())
    }

    /// The most recent request.
    pub fn last_request(&self) -> Result<Option<Request>> {
        let requests = self.requests.read().map_err(|_| lock_poisoned())?;
        Ok(requests.last().cloned())
    }

    /// Forget recorded requests and scripted responses.
    pub fn reset(&self) -> Result<()> {
        self.requests.write().map_err(|_| lock_poisoned())?.clear();
        self.scripted.write().map_err(|_| lock_poisoned())?.clear();
        *self.failure.write().map_err(|_| lock_poisoned())? = None;
        Ok(())
    }

    fn next_scripted(&self) -> Result<Option<Response>> {
        let mut scripted = self.scripted.write().map_err(|_| lock_poisoned())?;
        if let Some(response) = scripted.pop_front() {
            return Ok(Some(response));
        }
        let failure = self.failure.read().map_err(|_| lock_poisoned())?;
        Ok(failure.clone())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn send(&self, request: Request) -> Result<Response> {
        let response = match self.next_scripted()? {
            Some(response) => response,
            None => Response::new(request.expects, task_body(&request)?)
                .with_header("Content-Type", format!("{};version=5.1", TASK_TYPE)),
        };

        debug!(status = response.status, "Mock response");

        let mut requests = self.requests.write().map_err(|_| lock_poisoned())?;
        requests.push(request);

        Ok(response)
    }
}

/// A queued task acknowledging `request`.
fn task_body(request: &Request) -> Result<String> {
    let id = Uuid::new_v4();
    let task = Element::new("Task")
        .with_attr("xmlns", VCLOUD_NAMESPACE)
        .with_attr("status", "queued")
        .with_attr("operation", format!("{} {}", request.method, request.path))
        .with_attr("id", format!("urn:vcloud:task:{}", id))
        .with_attr("startTime", chrono::Utc::now().to_rfc3339())
        .with_attr("type", TASK_TYPE);
    render(&task, &RenderOptions::default())
}

fn lock_poisoned() -> ComputeError {
    ComputeError::Internal("Lock poisoned".to_string())
}
