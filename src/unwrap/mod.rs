//! Unwrapping engine.
//!
//! An event reaches the entry point in one of three forms:
//! 1. the payload itself
//! 2. a queue envelope whose record bodies are the payload's JSON text
//! 3. a queue envelope whose record bodies are pub/sub envelopes, whose
//!    `Message` is the payload's JSON text
//!
//! [`unwrap_sequence`] peels those layers lazily; [`unwrap_first`] and
//! [`unwrap_all`] are the usual ways to consume it.

mod sequence;

pub use sequence::Unwrapper;

use serde_json::Value;

use crate::config::{DrainPolicy, UnwrapConfig};
use crate::error::{Result, UnwrapError};
use crate::guards::TypeGuard;

/// Lazily unwrap `input` into payloads recognized by `guard`.
pub fn unwrap_sequence<G: TypeGuard>(input: Value, guard: G) -> Unwrapper<G> {
    Unwrapper::new(input, guard, &UnwrapConfig::default())
}

/// [`unwrap_sequence`] with explicit configuration.
pub fn unwrap_sequence_with<G: TypeGuard>(
    input: Value,
    guard: G,
    config: &UnwrapConfig,
) -> Unwrapper<G> {
    Unwrapper::new(input, guard, config)
}

/// Unwrap the first payload in `input`.
///
/// Only one element is ever pulled, so later records are never decoded and
/// their errors are never observed.
pub fn unwrap_first<G: TypeGuard>(input: Value, guard: G) -> Result<G::Target> {
    unwrap_sequence(input, guard)
        .next()
        .unwrap_or(Err(UnwrapError::NoRecords))
}

/// Unwrap every payload in `input`, in record order.
///
/// Uses the default [`DrainPolicy::Lenient`]: the terminal `NoRecords` of a
/// queue envelope ends the result once a payload was produced. Any other
/// error, or `NoRecords` with nothing collected, propagates.
pub fn unwrap_all<G: TypeGuard>(input: Value, guard: G) -> Result<Vec<G::Target>> {
    unwrap_all_with(input, guard, &UnwrapConfig::default())
}

/// [`unwrap_all`] with explicit configuration.
pub fn unwrap_all_with<G: TypeGuard>(
    input: Value,
    guard: G,
    config: &UnwrapConfig,
) -> Result<Vec<G::Target>> {
    let mut payloads = Vec::new();
    for item in unwrap_sequence_with(input, guard, config) {
        match item {
            Ok(payload) => payloads.push(payload),
            Err(UnwrapError::NoRecords)
                if config.drain == DrainPolicy::Lenient && !payloads.is_empty() =>
            {
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(payloads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecordMatch;
    use crate::error::ErrorKind;
    use crate::guards::{Shape, SqsEvent, predicate, wrap_for_sns, wrap_for_sqs};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Deserialize)]
    struct MyInput {
        foo: String,
        bar: f64,
        baz: bool,
    }

    fn input() -> Value {
        json!({"foo": "foo", "bar": 0, "baz": false})
    }

    fn is_my_input(value: &Value) -> bool {
        value["foo"].is_string() && value["bar"].is_number() && value["baz"].is_boolean()
    }

    #[test]
    fn first_direct() {
        assert_eq!(unwrap_first(input(), predicate(is_my_input)).unwrap(), input());
    }

    #[test]
    fn first_from_sqs_and_sns() {
        let guard = predicate(is_my_input);
        assert_eq!(unwrap_first(wrap_for_sqs(&input()), &guard).unwrap(), input());
        assert_eq!(unwrap_first(wrap_for_sns(&input()), &guard).unwrap(), input());
    }

    #[test]
    fn first_narrows_with_serde_shape() {
        let parsed = unwrap_first(wrap_for_sns(&input()), Shape::<MyInput>::new()).unwrap();
        assert_eq!(
            parsed,
            MyInput {
                foo: "foo".into(),
                bar: 0.0,
                baz: false,
            }
        );
    }

    #[test]
    fn shape_rejects_array_bodies() {
        let guard = Shape::<MyInput>::new();
        let direct = unwrap_first(json!(["foo", 0, false]), &guard).unwrap_err();
        assert_eq!(direct.kind(), ErrorKind::UnrecognizedShape);

        let event = json!({"Records": [{"body": "[\"foo\",0,false]"}]});
        let err = unwrap_first(event, &guard).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEnvelope);

        let sns = wrap_for_sns(&json!(["foo", 0, false]));
        let err = unwrap_first(sns, &guard).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PayloadMismatch);
    }

    #[test]
    fn first_ignores_broken_later_records() {
        let event = json!({"Records": [
            {"body": json!({"Message": input().to_string()}).to_string()},
            {"body": "not json at all"}
        ]});
        assert_eq!(unwrap_first(event, predicate(is_my_input)).unwrap(), input());
    }

    #[test]
    fn first_error_kinds() {
        let guard = predicate(is_my_input);
        let cases = [
            (json!({}), ErrorKind::UnrecognizedShape),
            (json!(null), ErrorKind::UnrecognizedShape),
            (json!({"Records": []}), ErrorKind::NoRecords),
            (json!({"Records": [{"body": "{}"}]}), ErrorKind::InvalidEnvelope),
            (
                json!({"Records": [{"body": json!({"Message": "{}"}).to_string()}]}),
                ErrorKind::PayloadMismatch,
            ),
            (json!({"Records": [{"body": "{"}]}), ErrorKind::MalformedText),
        ];
        for (event, expected) in cases {
            let err = unwrap_first(event.clone(), &guard).unwrap_err();
            assert_eq!(err.kind(), expected, "event: {event}");
        }
    }

    #[test]
    fn all_direct_is_single_element() {
        assert_eq!(unwrap_all(input(), predicate(is_my_input)).unwrap(), vec![input()]);
    }

    #[test]
    fn all_lenient_collects_sns_records() {
        let other = json!({"foo": "other", "bar": 1, "baz": true});
        let event = SqsEvent::wrap_all(&[
            json!({"Message": input().to_string()}),
            json!({"Message": other.to_string()}),
        ])
        .to_value();
        assert_eq!(
            unwrap_all(event, predicate(is_my_input)).unwrap(),
            vec![input(), other]
        );
    }

    #[test]
    fn all_strict_propagates_no_records() {
        let config = UnwrapConfig::default().with_drain(DrainPolicy::Strict);
        let err = unwrap_all_with(wrap_for_sns(&input()), predicate(is_my_input), &config)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoRecords);
    }

    #[test]
    fn all_empty_records_fails_even_when_lenient() {
        let err = unwrap_all(json!({"Records": []}), predicate(is_my_input)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoRecords);
    }

    #[test]
    fn all_plain_sqs_depends_on_record_match() {
        let guard = predicate(is_my_input);
        let err = unwrap_all(wrap_for_sqs(&input()), &guard).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEnvelope);

        let config = UnwrapConfig::default().with_record_match(RecordMatch::FirstMatch);
        let payloads = unwrap_all_with(wrap_for_sqs(&input()), &guard, &config).unwrap();
        assert_eq!(payloads, vec![input()]);
    }

    #[test]
    fn all_unrecognized_shape_propagates() {
        let err = unwrap_all(json!({}), predicate(is_my_input)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedShape);
    }
}
