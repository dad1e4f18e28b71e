//! Structural type guards over untyped JSON values.
//!
//! A guard answers "is this value a `T`?" and, when it is, hands back the
//! narrowed value. The envelope recognizers in [`sqs`] and [`sns`] are guards
//! too, so caller predicates and envelope checks compose the same way.

pub mod sns;
pub mod sqs;

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use sns::{SnsMessage, SnsMessageShape, is_sns_message, wrap_for_sns};
pub use sqs::{SqsEvent, SqsEventShape, SqsRecord, is_sqs_event, wrap_for_sqs};

/// Capability that recognizes a target shape inside an arbitrary value.
///
/// Implementations must be total: any value, however malformed, yields
/// `None` rather than panicking.
pub trait TypeGuard {
    /// The narrowed payload type.
    type Target;

    /// Narrow `value` to the target type, or `None` if it does not conform.
    fn narrow(&self, value: &Value) -> Option<Self::Target>;

    /// Whether `value` conforms to the target type.
    fn is(&self, value: &Value) -> bool {
        self.narrow(value).is_some()
    }
}

impl<G: TypeGuard + ?Sized> TypeGuard for &G {
    type Target = G::Target;

    fn narrow(&self, value: &Value) -> Option<Self::Target> {
        (**self).narrow(value)
    }

    fn is(&self, value: &Value) -> bool {
        (**self).is(value)
    }
}

/// Guard built from a plain `Fn(&Value) -> bool`; the payload stays a [`Value`].
#[derive(Clone, Copy)]
pub struct Predicate<F>(F);

/// Wrap a boolean predicate as a [`TypeGuard`].
pub fn predicate<F>(f: F) -> Predicate<F>
where
    F: Fn(&Value) -> bool,
{
    Predicate(f)
}

impl<F> TypeGuard for Predicate<F>
where
    F: Fn(&Value) -> bool,
{
    type Target = Value;

    fn narrow(&self, value: &Value) -> Option<Value> {
        (self.0)(value).then(|| value.clone())
    }

    fn is(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl<F> fmt::Debug for Predicate<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate")
    }
}

/// Guard for record-shaped payloads: accepts a JSON object deserializing into `T`.
///
/// Non-objects are rejected before serde sees them, so the sequence form of a
/// struct (`["foo", 0, false]`) is not a `T`. Unknown fields are tolerated
/// unless `T` opts into `deny_unknown_fields`. Use [`predicate`] for scalar
/// or array payloads.
pub struct Shape<T>(PhantomData<fn() -> T>);

impl<T> Shape<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Shape<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Shape<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Shape<T> {}

impl<T> fmt::Debug for Shape<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape<{}>", std::any::type_name::<T>())
    }
}

impl<T: DeserializeOwned> TypeGuard for Shape<T> {
    type Target = T;

    fn narrow(&self, value: &Value) -> Option<T> {
        if !value.is_object() {
            return None;
        }
        T::deserialize(value).ok()
    }
}
