//! Runtime domain types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A mirror object referencing a JavaScript value in the page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    /// Object type ("object", "string", "undefined", ...).
    #[serde(rename = "type")]
    pub object_type: String,
    /// Primitive value or serialized value when returned by value.
    pub value: Option<Value>,
    /// Handle for by-reference objects.
    pub object_id: Option<String>,
    /// String representation.
    pub description: Option<String>,
}

/// Details of a thrown exception.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    /// Exception text.
    pub text: String,
    /// Line number of the throw site.
    pub line_number: Option<i64>,
    /// The exception object.
    pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
    /// Best human-readable rendering of the exception.
    pub fn message(&self) -> String {
        self.exception
            .as_ref()
            .and_then(|e| e.description.clone())
            .unwrap_or_else(|| self.text.clone())
    }
}

/// Parameters for Runtime.evaluate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
    /// Expression to evaluate.
    pub expression: String,
    /// Whether the result should be serialized by value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by_value: Option<bool>,
    /// Whether to await a returned promise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub await_promise: Option<bool>,
}

impl EvaluateParams {
    /// Evaluate an expression, serializing the result by value.
    pub fn by_value(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            return_by_value: Some(true),
            await_promise: Some(true),
        }
    }
}

/// Result of Runtime.evaluate.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResult {
    /// Evaluation result.
    pub result: RemoteObject,
    /// Present when the expression threw.
    pub exception_details: Option<ExceptionDetails>,
}

/// An argument passed to Runtime.callFunctionOn.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CallArgument {
    /// Primitive value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Remote object handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
}

/// Parameters for Runtime.callFunctionOn.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFunctionOnParams {
    /// Source of the function to call; `this` is bound to the target object.
    pub function_declaration: String,
    /// Object to call the function on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Call arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<CallArgument>>,
    /// Whether the result should be serialized by value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by_value: Option<bool>,
}

/// Result of Runtime.callFunctionOn.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFunctionOnResult {
    /// Call result.
    pub result: RemoteObject,
    /// Present when the function threw.
    pub exception_details: Option<ExceptionDetails>,
}

/// Parameters for Runtime.releaseObject.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseObjectParams {
    /// Handle to release.
    pub object_id: String,
}
