/*!
 * Scripted transport for tests.
 *
 * Replies are registered per URL fragment and handed out in order:
 * - `ScriptedTransport::new().on_get("watch?v=", reply)` queues a reply
 * - once a route's queue is down to its last reply, that reply repeats
 * - unmatched requests answer 404
 *
 * Clones share the same script and request log, and the transport is its
 * own `Connector`, so a test can hand it to the API and inspect it later.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use super::{Connector, HttpResponse, SessionOptions, Transport};
use crate::errors::TransportError;

/// Scripted outcome of one request
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedReply {
    /// Respond with a status and body
    Respond { status: u16, body: String },
    /// Fail as if the request timed out
    Timeout,
    /// Fail as if the connection was refused
    ConnectionFailed,
}

impl ScriptedReply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::Respond {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self::Respond {
            status,
            body: String::new(),
        }
    }
}

/// HTTP method of a recorded request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Request observed by the scripted transport
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug)]
struct Route {
    method: Method,
    fragment: String,
    replies: VecDeque<ScriptedReply>,
}

#[derive(Debug, Default)]
struct Script {
    routes: Vec<Route>,
    requests: Vec<RecordedRequest>,
    sessions: Vec<SessionOptions>,
}

/// Transport answering from a script instead of the network
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for GET requests whose URL contains `fragment`
    pub fn on_get(self, fragment: impl Into<String>, reply: ScriptedReply) -> Self {
        self.push(Method::Get, fragment.into(), reply);
        self
    }

    /// Queue a reply for POST requests whose URL contains `fragment`
    pub fn on_post(self, fragment: impl Into<String>, reply: ScriptedReply) -> Self {
        self.push(Method::Post, fragment.into(), reply);
        self
    }

    fn push(&self, method: Method, fragment: String, reply: ScriptedReply) {
        let mut script = self.script.lock();
        match script
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.fragment == fragment)
        {
            Some(route) => route.replies.push_back(reply),
            None => script.routes.push(Route {
                method,
                fragment,
                replies: VecDeque::from(vec![reply]),
            }),
        }
    }

    /// Every request seen so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().requests.clone()
    }

    /// Number of requests whose URL contains `fragment`
    pub fn request_count(&self, fragment: &str) -> usize {
        self.script
            .lock()
            .requests
            .iter()
            .filter(|r| r.url.contains(fragment))
            .count()
    }

    /// Options of every session opened through this transport
    pub fn sessions(&self) -> Vec<SessionOptions> {
        self.script.lock().sessions.clone()
    }

    fn answer(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, TransportError> {
        let mut script = self.script.lock();
        script.requests.push(RecordedRequest {
            method,
            url: url.to_string(),
            body,
        });

        let reply = script
            .routes
            .iter_mut()
            .find(|r| r.method == method && url.contains(&r.fragment))
            .and_then(|route| {
                if route.replies.len() > 1 {
                    route.replies.pop_front()
                } else {
                    route.replies.front().cloned()
                }
            });

        match reply {
            Some(ScriptedReply::Respond { status, body }) => Ok(HttpResponse { status, body }),
            Some(ScriptedReply::Timeout) => {
                Err(TransportError::Timeout(format!("scripted timeout for {}", url)))
            }
            Some(ScriptedReply::ConnectionFailed) => Err(TransportError::Connection(format!(
                "scripted connection failure for {}",
                url
            ))),
            None => Ok(HttpResponse::new(404, "")),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.answer(Method::Get, url, None)
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        self.answer(Method::Post, url, Some(body.clone()))
    }
}

impl Connector for ScriptedTransport {
    fn connect(&self, options: &SessionOptions) -> Result<Arc<dyn Transport>, TransportError> {
        self.script.lock().sessions.push(options.clone());
        Ok(Arc::new(self.clone()))
    }
}
