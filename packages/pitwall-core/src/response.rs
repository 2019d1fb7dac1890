//! HTTP-shaped outcome of a view request
//!
//! | outcome | status | body |
//! |---|---|---|
//! | payload | 200 | `{"status": "success", "data": [...]}` |
//! | zero primary records | 404 | `{"message": "No races found"}` |
//! | unknown collection | 404 | `{"message": "Route not found"}` |
//! | store failure | 500 | `{"message": "..."}` |

use pitwall_storage::CollectionStore;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::assembly::{assemble_named, ViewQuery};
use crate::{CoreError, Result};

pub const ROUTE_NOT_FOUND: &str = "Route not found";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn success(data: Value) -> Self {
        Self {
            status: 200,
            body: json!({ "status": "success", "data": data }),
        }
    }

    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "message": message.into() }),
        }
    }

    pub fn from_result(result: Result<Value>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) if err.is_empty_result() => Self::message(404, err.to_string()),
            Err(CoreError::UnknownCollection(name)) => {
                warn!(collection = %name, "unknown collection requested");
                Self::message(404, ROUTE_NOT_FOUND)
            }
            Err(err) => {
                error!(error = %err, "view failed");
                Self::message(500, err.to_string())
            }
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Assemble the view called `collection` and map the outcome to a response
pub async fn handle<S>(store: &S, collection: &str, query: &ViewQuery) -> ApiResponse
where
    S: CollectionStore + ?Sized,
{
    ApiResponse::from_result(assemble_named(store, collection, query).await)
}
