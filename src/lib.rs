//! Event Unwrap — pull typed payloads out of queue and pub/sub envelopes.
//!
//! ```
//! use event_unwrap::guards::{predicate, wrap_for_sns};
//! use event_unwrap::unwrap_first;
//! use serde_json::json;
//!
//! let order = json!({"id": 7});
//! let event = wrap_for_sns(&order);
//! let payload = unwrap_first(event, predicate(|v| v["id"].is_u64())).unwrap();
//! assert_eq!(payload, order);
//! ```

pub mod config;
pub mod error;
pub mod guards;
pub mod logging;
pub mod unwrap;

pub use config::{DrainPolicy, RecordMatch, UnwrapConfig};
pub use error::{ErrorKind, Result, UnwrapError};
pub use guards::{Predicate, Shape, TypeGuard, predicate};
pub use unwrap::{
    Unwrapper, unwrap_all, unwrap_all_with, unwrap_first, unwrap_sequence, unwrap_sequence_with,
};
