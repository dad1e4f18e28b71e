//! Pull-based unwrapping state machine.

use std::iter::FusedIterator;
use std::mem;
use std::vec;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{RecordMatch, UnwrapConfig};
use crate::error::UnwrapError;
use crate::guards::{SnsMessageShape, SqsEventShape, SqsRecord, TypeGuard};

/// Lazy sequence of payloads unwrapped from one event.
///
/// Yields `Ok` for each payload and at most one `Err`, after which it is
/// exhausted. A direct match yields one payload and ends cleanly; once the
/// input is treated as a queue envelope the sequence only ends in an error.
/// Failures are logged at `warn`, except the `NoRecords` that follows a fully
/// unwrapped envelope, which is logged at `debug`.
#[derive(Debug)]
pub struct Unwrapper<G> {
    guard: G,
    record_match: RecordMatch,
    state: State,
}

#[derive(Debug)]
enum State {
    /// Nothing pulled yet.
    Start(Value),
    /// Peeling queue records.
    Records {
        records: vec::IntoIter<SqsRecord>,
        /// Index of the next record to decode.
        next_index: usize,
        /// Decoded body already yielded as a direct match, still owed the
        /// pub/sub check.
        pending: Option<Value>,
    },
    Done,
}

impl<G: TypeGuard> Unwrapper<G> {
    pub(crate) fn new(input: Value, guard: G, config: &UnwrapConfig) -> Self {
        Self {
            guard,
            record_match: config.record_match,
            state: State::Start(input),
        }
    }

    fn start(&mut self, input: Value) -> Option<Result<G::Target, UnwrapError>> {
        if let Some(payload) = self.guard.narrow(&input) {
            debug!("Event matched target type directly");
            return Some(Ok(payload));
        }

        let Some(event) = SqsEventShape.narrow(&input) else {
            return fail(UnwrapError::UnrecognizedShape, None);
        };

        debug!(records = event.records.len(), "Unwrapping queue envelope");
        self.records(event.records.into_iter(), 0, None)
    }

    fn records(
        &mut self,
        mut records: vec::IntoIter<SqsRecord>,
        next_index: usize,
        pending: Option<Value>,
    ) -> Option<Result<G::Target, UnwrapError>> {
        // A body already yielded directly only has the pub/sub check left.
        let (index, message) = match pending {
            Some(message) => (next_index - 1, message),
            None => {
                let Some(record) = records.next() else {
                    // Every record consumed without error produced a payload.
                    if next_index > 0 {
                        debug!(records = next_index, "Queue envelope exhausted");
                        return Some(Err(UnwrapError::NoRecords));
                    }
                    return fail(UnwrapError::NoRecords, None);
                };
                let index = next_index;
                let message: Value = match serde_json::from_str(&record.body) {
                    Ok(message) => message,
                    Err(e) => return fail(e.into(), Some(index)),
                };

                if let Some(payload) = self.guard.narrow(&message) {
                    debug!(record = index, path = "sqs", "Unwrapped record body");
                    let pending = match self.record_match {
                        RecordMatch::Exhaustive => Some(message),
                        RecordMatch::FirstMatch => None,
                    };
                    self.state = State::Records {
                        records,
                        next_index: index + 1,
                        pending,
                    };
                    return Some(Ok(payload));
                }
                (index, message)
            }
        };

        let Some(notification) = SnsMessageShape.narrow(&message) else {
            return fail(UnwrapError::InvalidEnvelope, Some(index));
        };

        let request: Value = match serde_json::from_str(&notification.message) {
            Ok(request) => request,
            Err(e) => return fail(e.into(), Some(index)),
        };

        let Some(payload) = self.guard.narrow(&request) else {
            return fail(UnwrapError::PayloadMismatch, Some(index));
        };

        debug!(record = index, path = "sns", "Unwrapped pub/sub message");
        self.state = State::Records {
            records,
            next_index: index + 1,
            pending: None,
        };
        Some(Ok(payload))
    }
}

fn fail<T>(err: UnwrapError, record: Option<usize>) -> Option<Result<T, UnwrapError>> {
    match record {
        Some(record) => warn!(
            kind = err.kind().label(),
            record,
            error = %err,
            "Failed to unwrap event"
        ),
        None => warn!(kind = err.kind().label(), error = %err, "Failed to unwrap event"),
    }
    Some(Err(err))
}

impl<G: TypeGuard> Iterator for Unwrapper<G> {
    type Item = Result<G::Target, UnwrapError>;

    fn next(&mut self) -> Option<Self::Item> {
        // Every branch leaves `Done` unless it stores a resumable state.
        match mem::replace(&mut self.state, State::Done) {
            State::Start(input) => self.start(input),
            State::Records {
                records,
                next_index,
                pending,
            } => self.records(records, next_index, pending),
            State::Done => None,
        }
    }
}

impl<G: TypeGuard> FusedIterator for Unwrapper<G> {}
