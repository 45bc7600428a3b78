// src/api/types.rs
//! Request and response types shared by the transport, classifier and paginator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// One logical GraphQL call: a query or mutation body plus its variables.
///
/// The body is opaque to this layer. `idempotent` marks requests whose
/// semantic failures (`ApiError`, `Unknown`) may be retried like transient
/// ones; it is never sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
    query: String,
    variables: Map<String, Value>,
    #[serde(skip)]
    idempotent: bool,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: Map::new(),
            idempotent: false,
        }
    }

    /// Replaces all variables.
    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    /// Sets a single variable, replacing any previous value under `name`.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Marks the request safe to retry after semantic failures.
    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }

    pub fn is_idempotent(&self) -> bool {
        self.idempotent
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn variables(&self) -> &Map<String, Value> {
        &self.variables
    }
}

/// What came back from one HTTP exchange, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutcome {
    /// No HTTP response at all: connect, DNS, timeout or body read failure.
    TransportFailure { reason: String },
    /// A complete HTTP response.
    Http {
        status: u16,
        retry_after: Option<Duration>,
        body: String,
    },
}

impl RawOutcome {
    /// A 200 response carrying `body` serialized as JSON.
    pub fn ok_json(body: &Value) -> Self {
        Self::Http {
            status: 200,
            retry_after: None,
            body: body.to_string(),
        }
    }
}

/// The service's query cost accounting, returned alongside `data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complexity {
    pub before: Option<i64>,
    pub after: Option<i64>,
    pub query: Option<i64>,
    pub reset_in_x_seconds: Option<i64>,
}

/// A successful GraphQL response. `data` is always a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphqlResponse {
    data: Value,
    complexity: Option<Complexity>,
}

impl GraphqlResponse {
    pub(crate) fn new(data: Map<String, Value>) -> Self {
        let complexity = data
            .get("complexity")
            .and_then(|value| serde_json::from_value(value.clone()).ok());
        Self {
            data: Value::Object(data),
            complexity,
        }
    }

    /// The `data` object of the response.
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    /// Looks up a value inside `data` by JSON pointer (e.g. `/boards/0/columns`).
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.data.pointer(pointer)
    }

    pub fn complexity(&self) -> Option<Complexity> {
        self.complexity
    }
}
