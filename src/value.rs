use std::{borrow::Cow, fmt, sync::Arc};

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use smol_str::SmolStr;

use crate::expr::Expression;

/// Error returned by a [`SqlValuer`] conversion.
pub type ValuerError = Box<dyn std::error::Error + Send + Sync>;

/// A runtime value that can be embedded in generated sql as a literal.
///
/// Indirections (`Option`, `Box`) are removed when converting with
/// [`IntoValue`], so the encoder only ever sees the underlying shape.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    /// Raw bytes, rendered as text.
    Bytes(Vec<u8>),
    Time(DateTime<Utc>),
    /// A generic sequence, used for `IN` lists.
    List(Vec<Value>),
    Expression(Box<Expression>),
    /// A composite record with no literal form; holds the type name.
    Record(&'static str),
    /// A value that converts itself right before encoding.
    Valuer(Arc<dyn SqlValuer>),
}

/// Custom conversion into a [`Value`], invoked by the literal encoder.
pub trait SqlValuer: fmt::Debug + Send + Sync {
    fn sql_value(&self) -> Result<Value, ValuerError>;
}

impl Value {
    pub fn bytes<B: Into<Vec<u8>>>(bytes: B) -> Self {
        Self::Bytes(bytes.into())
    }

    pub fn valuer<V: SqlValuer + 'static>(valuer: V) -> Self {
        Self::Valuer(Arc::new(valuer))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::I8(v) => Some(v.into()),
            Value::I16(v) => Some(v.into()),
            Value::I32(v) => Some(v.into()),
            Value::I64(v) => Some(v),
            Value::U8(v) => Some(v.into()),
            Value::U16(v) => Some(v.into()),
            Value::U32(v) => Some(v.into()),
            Value::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Time(_) => "time",
            Value::List(_) => "list",
            Value::Expression(expr) => expr.kind(),
            Value::Record(name) => name,
            Value::Valuer(_) => "valuer",
        }
    }
}

pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

macro_rules! into_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl IntoValue for $ty {
                #[inline]
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )+
    };
}

into_value!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    DateTime<Utc> => Time,
);

impl IntoValue for isize {
    fn into_value(self) -> Value {
        Value::I64(self as i64)
    }
}

impl IntoValue for usize {
    fn into_value(self) -> Value {
        Value::U64(self as u64)
    }
}

impl IntoValue for char {
    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_owned())
    }
}

impl IntoValue for &String {
    fn into_value(self) -> Value {
        Value::String(self.clone())
    }
}

impl IntoValue for Box<str> {
    fn into_value(self) -> Value {
        Value::String(self.into_string())
    }
}

impl IntoValue for Cow<'_, str> {
    fn into_value(self) -> Value {
        Value::String(self.into_owned())
    }
}

impl IntoValue for SmolStr {
    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl IntoValue for DateTime<FixedOffset> {
    fn into_value(self) -> Value {
        Value::Time(self.with_timezone(&Utc))
    }
}

impl IntoValue for NaiveDateTime {
    fn into_value(self) -> Value {
        Value::Time(self.and_utc())
    }
}

impl<T> IntoValue for Option<T>
where
    T: IntoValue,
{
    fn into_value(self) -> Value {
        if let Some(value) = self {
            value.into_value()
        } else {
            Value::Null
        }
    }
}

impl<T> IntoValue for Box<T>
where
    T: IntoValue,
{
    fn into_value(self) -> Value {
        (*self).into_value()
    }
}

impl<T> IntoValue for Vec<T>
where
    T: IntoValue,
{
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T, const N: usize> IntoValue for [T; N]
where
    T: IntoValue,
{
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T> IntoValue for &[T]
where
    T: IntoValue + Clone,
{
    fn into_value(self) -> Value {
        Value::List(self.iter().cloned().map(IntoValue::into_value).collect())
    }
}

#[cfg(feature = "uuid")]
impl IntoValue for uuid::Uuid {
    fn into_value(self) -> Value {
        Value::String(self.hyphenated().to_string())
    }
}

#[cfg(feature = "json")]
impl IntoValue for serde_json::Value {
    fn into_value(self) -> Value {
        match self {
            serde_json::Value::Null => Value::Null,
            other => Value::String(other.to_string()),
        }
    }
}

#[cfg(feature = "time")]
impl IntoValue for time::OffsetDateTime {
    fn into_value(self) -> Value {
        let nanos = self.unix_timestamp_nanos();
        let secs = nanos.div_euclid(1_000_000_000) as i64;
        let subsec = nanos.rem_euclid(1_000_000_000) as u32;
        match DateTime::from_timestamp(secs, subsec) {
            Some(time) => Value::Time(time),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Cents(i64);

    impl SqlValuer for Cents {
        fn sql_value(&self) -> Result<Value, ValuerError> {
            Ok(Value::I64(self.0 * 100))
        }
    }

    #[test]
    fn test_option_unwraps_to_inner_or_null() {
        assert!(matches!(Some(5).into_value(), Value::I32(5)));
        assert!(None::<i32>.into_value().is_null());
        assert!(matches!(Some(Box::new("a")).into_value(), Value::String(ref s) if s == "a"));
    }

    #[test]
    fn test_sequences_become_lists() {
        let value = vec![1u8, 2, 3].into_value();
        match value {
            Value::List(items) => assert_eq!(3, items.len()),
            other => panic!("expected a list, got {other:?}"),
        }
        assert!(matches!(Value::bytes("hi"), Value::Bytes(ref b) if b == b"hi"));
    }

    #[test]
    fn test_as_i64_rejects_high_bit() {
        assert_eq!(Some(i64::MAX), Value::U64(i64::MAX as u64).as_i64());
        assert_eq!(None, Value::U64(1 << 63).as_i64());
    }

    #[test]
    fn test_valuer_is_kept_for_encoding() {
        let value = Value::valuer(Cents(3));
        let Value::Valuer(valuer) = value else {
            panic!("expected a valuer");
        };
        assert!(matches!(valuer.sql_value(), Ok(Value::I64(300))));
    }
}
