use crate::{Error, Result, Value};
use anyhow::Context;
use std::any;
use time::{
    OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

/// Conversion between a Rust type and [`Value`].
pub trait AsValue {
    /// The typed NULL of this type.
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Parse the textual representation some backends return.
    fn parse(input: &str) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "Cannot parse `{input}` as {}",
            any::type_name::<Self>()
        )))
    }
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path, $parse:expr $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self.into()))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v.into()),
                    $($pat_rest => $expr_rest,)*
                    #[allow(unreachable_patterns)]
                    Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
                    _ => Err(Error::msg(format!(
                        "Cannot convert {value:?} to {}",
                        any::type_name::<Self>(),
                    ))),
                }
            }
            fn parse(input: &str) -> Result<Self> {
                $parse(input)
            }
        }
    };
}

macro_rules! parse_number {
    ($input:expr) => {
        $input.trim().parse::<Self>().with_context(|| {
            format!(
                "Cannot parse `{}` as {}",
                $input,
                any::type_name::<Self>()
            )
        })
    };
}

impl_as_value!(
    bool,
    Value::Boolean,
    |input: &str| match input.trim() {
        x if x.eq_ignore_ascii_case("true") || x.eq_ignore_ascii_case("t") || x == "1" => Ok(true),
        x if x.eq_ignore_ascii_case("false") || x.eq_ignore_ascii_case("f") || x == "0" => Ok(false),
        _ => Err(Error::msg(format!("Cannot parse boolean from `{input}`"))),
    },
    Value::Int32(Some(v)) => Ok(v != 0),
    Value::Int64(Some(v)) => Ok(v != 0),
    Value::UInt32(Some(v)) => Ok(v != 0),
    Value::UInt64(Some(v)) => Ok(v != 0),
);
impl_as_value!(
    i32,
    Value::Int32,
    |input: &str| parse_number!(input),
    Value::Int64(Some(v)) => i32::try_from(v).with_context(|| format!("Value {v}: i64 is out of range for i32")),
    Value::UInt32(Some(v)) => i32::try_from(v).with_context(|| format!("Value {v}: u32 is out of range for i32")),
    Value::UInt64(Some(v)) => i32::try_from(v).with_context(|| format!("Value {v}: u64 is out of range for i32")),
);
impl_as_value!(
    i64,
    Value::Int64,
    |input: &str| parse_number!(input),
    Value::Int32(Some(v)) => Ok(v as _),
    Value::UInt32(Some(v)) => Ok(v as _),
    Value::UInt64(Some(v)) => i64::try_from(v).with_context(|| format!("Value {v}: u64 is out of range for i64")),
);
impl_as_value!(
    u32,
    Value::UInt32,
    |input: &str| parse_number!(input),
    Value::Int32(Some(v)) => u32::try_from(v).with_context(|| format!("Value {v}: i32 is out of range for u32")),
    Value::Int64(Some(v)) => u32::try_from(v).with_context(|| format!("Value {v}: i64 is out of range for u32")),
    Value::UInt64(Some(v)) => u32::try_from(v).with_context(|| format!("Value {v}: u64 is out of range for u32")),
);
impl_as_value!(
    u64,
    Value::UInt64,
    |input: &str| parse_number!(input),
    Value::UInt32(Some(v)) => Ok(v as _),
    Value::Int32(Some(v)) => u64::try_from(v).with_context(|| format!("Value {v}: i32 is out of range for u64")),
    Value::Int64(Some(v)) => u64::try_from(v).with_context(|| format!("Value {v}: i64 is out of range for u64")),
);
impl_as_value!(
    f32,
    Value::Float32,
    |input: &str| parse_number!(input),
    Value::Float64(Some(v)) => Ok(v as _),
);
impl_as_value!(
    f64,
    Value::Float64,
    |input: &str| parse_number!(input),
    Value::Float32(Some(v)) => Ok(v as _),
    Value::Int32(Some(v)) => Ok(v as _),
    Value::Int64(Some(v)) => Ok(v as _),
    Value::UInt32(Some(v)) => Ok(v as _),
    Value::UInt64(Some(v)) => Ok(v as _),
);
impl_as_value!(
    String,
    Value::Varchar,
    |input: &str| Ok(input.to_owned()),
    Value::Blob(Some(v)) => String::from_utf8(v.into_vec()).context("Blob is not valid utf-8"),
);
impl_as_value!(
    Box<[u8]>,
    Value::Blob,
    |input: &str| Ok(input.as_bytes().into()),
);

const TIMESTAMP_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
];

const TIMESTAMP_WITH_TIMEZONE_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
    ),
    format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
    ),
    format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond][offset_hour sign:mandatory]"
    ),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]"),
];

fn parse_timestamp(input: &str) -> Result<PrimitiveDateTime> {
    let input = input.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(input, format).ok())
        .ok_or_else(|| Error::msg(format!("Cannot parse `{input}` as a timestamp")))
}

fn parse_timestamp_with_timezone(input: &str) -> Result<OffsetDateTime> {
    let input = input.trim();
    if let Ok(result) = OffsetDateTime::parse(input, &Rfc3339) {
        return Ok(result);
    }
    TIMESTAMP_WITH_TIMEZONE_FORMATS
        .iter()
        .find_map(|format| OffsetDateTime::parse(input, format).ok())
        .map(Ok)
        .unwrap_or_else(|| parse_timestamp(input).map(PrimitiveDateTime::assume_utc))
}

impl_as_value!(
    PrimitiveDateTime,
    Value::Timestamp,
    parse_timestamp,
    Value::TimestampWithTimezone(Some(v)) => {
        let v = v.to_offset(time::UtcOffset::UTC);
        Ok(PrimitiveDateTime::new(v.date(), v.time()))
    },
);
impl_as_value!(
    OffsetDateTime,
    Value::TimestampWithTimezone,
    parse_timestamp_with_timezone,
    Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
);

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(if value.is_null() {
            None
        } else {
            Some(<T as AsValue>::try_from_value(value)?)
        })
    }
    fn parse(input: &str) -> Result<Self> {
        if input.trim().eq_ignore_ascii_case("null") {
            return Ok(None);
        }
        T::parse(input).map(Some)
    }
}

impl<T: AsValue> AsValue for Box<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        (*self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(Self::new(<T as AsValue>::try_from_value(value)?))
    }
    fn parse(input: &str) -> Result<Self> {
        T::parse(input).map(Self::new)
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}
