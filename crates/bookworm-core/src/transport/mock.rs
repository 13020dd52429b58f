//! Canned-response transport for tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Method;

use super::{ApiRequest, ApiTransport};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub enum MockReply {
    Json(serde_json::Value),
    Status(u16, String),
    Network(String),
}

/// Replies are queued per (method, path); the last reply of a queue repeats.
/// Every request is recorded.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<(Method, String), VecDeque<MockReply>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, method: Method, path: &str, reply: MockReply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn reply_json(self, method: Method, path: &str, body: serde_json::Value) -> Self {
        self.reply(method, path, MockReply::Json(body))
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ApiTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<serde_json::Value> {
        let key = (request.method.clone(), request.path.clone());
        self.requests.lock().unwrap().push(request);

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(MockReply::Json(value)) => Ok(value),
            Some(MockReply::Status(status, body)) => Err(Error::from_status(status, &body)),
            Some(MockReply::Network(msg)) => Err(Error::network(msg)),
            None => Err(Error::network(format!("no mock reply for {} {}", key.0, key.1))),
        }
    }
}

/// JSON fixtures shared by the service and workflow tests
pub mod fixtures {
    use serde_json::{json, Value};

    pub fn book(id: i64, available: i64) -> Value {
        json!({
            "id": id,
            "timeStamp": "AAAAAAAAB9E=",
            "title": format!("Book {}", id),
            "bookGenre": "Fiction",
            "credit": 2,
            "authors": [],
            "publishers": [],
            "numberOfTotalCopies": 5,
            "numberOfAvailableCopies": available,
            "createdAt": "2024-01-01T00:00:00"
        })
    }

    pub fn minimal_user(id: i64, role: &str) -> Value {
        json!({"id": id, "name": format!("User {}", id), "userRole": role})
    }

    pub fn borrowing(id: i64, status: &str) -> Value {
        json!({
            "id": id,
            "timeStamp": "AAAAAAAAC1E=",
            "status": status,
            "dateOut": "2024-02-01T10:00:00",
            "dueDate": "2024-02-15T10:00:00",
            "createdAt": "2024-01-31T09:00:00",
            "bookNavigation": book(100 + id, 3),
            "userNavigation": minimal_user(7, "User")
        })
    }

    pub fn auth_response(user_id: i64, role: &str, token: Option<&str>) -> Value {
        json!({
            "userId": user_id,
            "userName": "Ada",
            "userRole": role,
            "imageUrl": null,
            "accessToken": token
        })
    }
}
