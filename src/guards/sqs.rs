//! Queue (SQS) envelope shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TypeGuard;

/// A queue delivery carrying zero or more records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqsEvent {
    #[serde(rename = "Records")]
    pub records: Vec<SqsRecord>,
}

/// One queued message; `body` is opaque serialized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqsRecord {
    pub body: String,
}

impl SqsEvent {
    /// Single-record envelope whose body is the JSON text of `payload`.
    pub fn wrap(payload: &Value) -> Self {
        Self {
            records: vec![SqsRecord {
                body: payload.to_string(),
            }],
        }
    }

    /// Envelope with one record per payload, in order.
    pub fn wrap_all<'a>(payloads: impl IntoIterator<Item = &'a Value>) -> Self {
        Self {
            records: payloads
                .into_iter()
                .map(|payload| SqsRecord {
                    body: payload.to_string(),
                })
                .collect(),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!(self)
    }
}

/// Whether `value` is an object whose `Records` is an array of objects that
/// each carry a string `body`. Extra fields are ignored.
pub fn is_sqs_event(value: &Value) -> bool {
    value
        .get("Records")
        .and_then(Value::as_array)
        .is_some_and(|records| records.iter().all(is_sqs_record))
}

fn is_sqs_record(value: &Value) -> bool {
    value.get("body").is_some_and(Value::is_string)
}

/// [`TypeGuard`] form of [`is_sqs_event`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SqsEventShape;

impl TypeGuard for SqsEventShape {
    type Target = SqsEvent;

    fn narrow(&self, value: &Value) -> Option<SqsEvent> {
        // The structural check rules out serde's sequence form of a struct.
        if !is_sqs_event(value) {
            return None;
        }
        SqsEvent::deserialize(value).ok()
    }

    fn is(&self, value: &Value) -> bool {
        is_sqs_event(value)
    }
}

/// Wrap `payload` as it arrives when sent straight to the queue.
pub fn wrap_for_sqs(payload: &Value) -> Value {
    SqsEvent::wrap(payload).to_value()
}
