//! Request handlers.

pub mod applications;
pub mod health;
pub mod jobs;
pub mod session;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ApiError, ApiResult};

pub use applications::*;
pub use health::*;
pub use jobs::*;
pub use session::*;

/// Type a request body after dropping any client-supplied `_id`.
pub(crate) fn typed_body<T: DeserializeOwned>(
    mut fields: Map<String, Value>,
    what: &str,
) -> ApiResult<T> {
    fields.remove("_id");
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| ApiError::bad_request(format!("Invalid {} fields: {}", what, e)))
}
