//! Pub/sub (SNS) envelope shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TypeGuard;
use super::sqs::SqsEvent;

/// A fan-out notification; `message` is opaque serialized text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsMessage {
    #[serde(rename = "Message")]
    pub message: String,
}

impl SnsMessage {
    /// Notification whose `Message` is the JSON text of `payload`.
    pub fn wrap(payload: &Value) -> Self {
        Self {
            message: payload.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!(self)
    }
}

/// Whether `value` is an object with a string `Message`. Extra fields are ignored.
pub fn is_sns_message(value: &Value) -> bool {
    value.get("Message").is_some_and(Value::is_string)
}

/// [`TypeGuard`] form of [`is_sns_message`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SnsMessageShape;

impl TypeGuard for SnsMessageShape {
    type Target = SnsMessage;

    fn narrow(&self, value: &Value) -> Option<SnsMessage> {
        if !is_sns_message(value) {
            return None;
        }
        SnsMessage::deserialize(value).ok()
    }

    fn is(&self, value: &Value) -> bool {
        is_sns_message(value)
    }
}

/// Wrap `payload` as it arrives when published to a topic that fans out to
/// the queue.
pub fn wrap_for_sns(payload: &Value) -> Value {
    SqsEvent::wrap(&SnsMessage::wrap(payload).to_value()).to_value()
}
