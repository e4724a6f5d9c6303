//! Value - promise が運ぶ動的な値
//!
//! fulfillment value も rejection reason も同じ `Value` です。
//! 解決手続きが区別するのは「thenable かどうか」だけなので、
//! それ以外は JSON 値かエラーとして素通しします。

use std::fmt;
use std::rc::Rc;

use crate::domain::errors::PromiseError;
use crate::ports::Thenable;

use super::Promise;

#[derive(Clone, Default)]
pub enum Value {
    /// No value, e.g. what a handler returns when it has nothing to say.
    #[default]
    Undefined,
    Json(serde_json::Value),
    Error(PromiseError),
    Promise(Promise),
    /// Any foreign object with a `then` method.
    Thenable(Rc<dyn Thenable>),
}

impl Value {
    pub fn thenable<T: Thenable + 'static>(thenable: T) -> Self {
        Value::Thenable(Rc::new(thenable))
    }

    /// Shorthand for `Value::Error(PromiseError::thrown(message))`.
    pub fn error(message: impl Into<String>) -> Self {
        Value::Error(PromiseError::thrown(message))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_json().and_then(serde_json::Value::as_i64)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(serde_json::Value::as_str)
    }

    pub fn as_error(&self) -> Option<&PromiseError> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Is this exactly `promise` (same handle, not an equal-looking one)?
    pub fn is_promise(&self, promise: &Promise) -> bool {
        matches!(self, Value::Promise(p) if p.ptr_eq(promise))
    }

    /// The `then` capability of this value, if it has one.
    pub(crate) fn as_thenable(&self) -> Option<Rc<dyn Thenable>> {
        match self {
            Value::Promise(p) => Some(Rc::new(p.clone())),
            Value::Thenable(t) => Some(Rc::clone(t)),
            _ => None,
        }
    }

    /// Lossy JSON view for output. Thenables have no data to show.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined => serde_json::Value::Null,
            Value::Json(v) => v.clone(),
            Value::Error(e) => serde_json::Value::String(e.to_string()),
            Value::Promise(_) | Value::Thenable(_) => serde_json::Value::String(self.to_string()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Json(v) => f.debug_tuple("Json").field(v).finish(),
            Value::Error(e) => f.debug_tuple("Error").field(e).finish(),
            Value::Promise(p) => f.debug_tuple("Promise").field(&p.id()).finish(),
            Value::Thenable(_) => f.write_str("Thenable(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Json(serde_json::Value::String(s)) => f.write_str(s),
            Value::Json(v) => write!(f, "{v}"),
            Value::Error(e) => write!(f, "{e}"),
            Value::Promise(p) => write!(f, "[{}]", p.id()),
            Value::Thenable(_) => f.write_str("[thenable]"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Json(a), Value::Json(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Promise(a), Value::Promise(b)) => a.ptr_eq(b),
            (Value::Thenable(a), Value::Thenable(b)) => {
                Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
            }
            _ => false,
        }
    }
}

macro_rules! impl_from_json {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Json(serde_json::Value::from(v))
                }
            }
        )*
    };
}

impl_from_json!(i32, i64, u32, u64, f64, bool, &str, String);

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<PromiseError> for Value {
    fn from(e: PromiseError) -> Self {
        Value::Error(e)
    }
}

impl From<Promise> for Value {
    fn from(p: Promise) -> Self {
        Value::Promise(p)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}
