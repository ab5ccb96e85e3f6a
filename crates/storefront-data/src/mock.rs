//! Scripted transport for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{FetchError, Request, Response, Transport};

type Reply = Box<dyn Fn() -> Result<Response, FetchError> + Send + Sync>;

/// Transport that answers from a per-path script and records every request.
///
/// Replies registered for a path are consumed in order; the last one keeps
/// answering once the queue is down to a single entry. A request to a path
/// with no script fails with [`FetchError::ConnectionError`].
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    /// Create a transport with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `path` with a `200` JSON body.
    pub fn reply_json(&self, path: &str, body: serde_json::Value) -> &Self {
        self.push(path, Box::new(move || Ok(Response::json_ok(&body))))
    }

    /// Fail requests to `path` as if the server were unreachable.
    pub fn fail(&self, path: &str, message: &str) -> &Self {
        let message = message.to_string();
        self.push(
            path,
            Box::new(move || Err(FetchError::ConnectionError(message.clone()))),
        )
    }

    /// Reply to `path` with an arbitrary response.
    pub fn reply(&self, path: &str, response: Response) -> &Self {
        self.push(path, Box::new(move || Ok(response.clone())))
    }

    /// All requests sent so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Requests whose URL ends with `path`.
    pub fn requests_to(&self, path: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.ends_with(path))
            .collect()
    }

    fn push(&self, path: &str, reply: Reply) -> &Self {
        if let Ok(mut replies) = self.replies.lock() {
            replies.entry(path.to_string()).or_default().push_back(reply);
        }
        self
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, FetchError> {
        let url = request.url.clone();
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let mut replies = self
            .replies
            .lock()
            .map_err(|_| FetchError::RequestError("mock transport poisoned".to_string()))?;

        let queue = replies
            .iter_mut()
            .find(|(path, _)| url.ends_with(path.as_str()))
            .map(|(_, queue)| queue);

        match queue {
            Some(queue) if queue.len() > 1 => {
                let reply = queue.pop_front().ok_or_else(|| no_script(&url))?;
                reply()
            }
            Some(queue) => match queue.front() {
                Some(reply) => reply(),
                None => Err(no_script(&url)),
            },
            None => Err(no_script(&url)),
        }
    }
}

fn no_script(url: &str) -> FetchError {
    FetchError::ConnectionError(format!("no scripted reply for {}", url))
}
