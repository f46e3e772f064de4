//! FHIR R5 primitive data types
//!
//! `string`, `boolean`, `integer` and `decimal` map to `String`, `bool`, `i32` and
//! [`rust_decimal::Decimal`]. Every other primitive is a newtype that checks its lexical
//! form on construction and on deserialization, so an instance is always valid.

use super::visitor::{walk, PrimitiveValue, Visitable, Visitor};
use crate::error::{Error, Result};
use chrono::{FixedOffset, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9\-\.]{1,64}$").unwrap());

static CODE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s]+( [^\s]+)*$").unwrap());

static URI_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+$").unwrap());

static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}(-(0[1-9]|1[0-2])(-(0[1-9]|[12][0-9]|3[01]))?)?$").unwrap()
});

static DATE_TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9]{4}(-(0[1-9]|1[0-2])(-(0[1-9]|[12][0-9]|3[01])(T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]{1,9})?(Z|[+-]((0[0-9]|1[0-3]):[0-5][0-9]|14:00)))?)?)?$",
    )
    .unwrap()
});

static INSTANT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]{1,9})?(Z|[+-]((0[0-9]|1[0-3]):[0-5][0-9]|14:00))$",
    )
    .unwrap()
});

static BASE64_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*([0-9a-zA-Z+/=]){4}\s*)+$").unwrap());

/// Declares a string-backed primitive with a lexical check
macro_rules! string_primitive {
    ($(#[$meta:meta])* $name:ident, $type_name:literal, $check:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self> {
                let value = value.into();
                let check: fn(&str) -> bool = $check;
                if check(&value) {
                    Ok(Self(value))
                } else {
                    Err(Error::InvalidPrimitive {
                        type_name: $type_name,
                        value,
                    })
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = Error;

            fn try_from(value: &str) -> Result<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Visitable for $name {
            fn type_name(&self) -> &'static str {
                $type_name
            }

            fn has_children(&self) -> bool {
                false
            }

            fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
                walk(self, element_name, element_index, visitor, |_| {});
            }

            fn primitive_value(&self) -> Option<PrimitiveValue<'_>> {
                Some(PrimitiveValue::String(&self.0))
            }
        }
    };
}

string_primitive!(
    /// Logical id: up to 64 letters, digits, `-` and `.`
    Id,
    "id",
    |v| ID_PATTERN.is_match(v)
);

string_primitive!(
    /// Code from a terminology: no leading, trailing or repeated whitespace
    Code,
    "code",
    |v| CODE_PATTERN.is_match(v)
);

string_primitive!(
    /// Uniform resource identifier
    Uri,
    "uri",
    |v| URI_PATTERN.is_match(v)
);

string_primitive!(
    /// URI that refers to a canonical resource, optionally with `|version`
    Canonical,
    "canonical",
    |v| URI_PATTERN.is_match(v)
);

string_primitive!(
    /// Markdown text
    Markdown,
    "markdown",
    |v| !v.trim().is_empty()
);

string_primitive!(
    /// Base64 encoded content
    Base64Binary,
    "base64Binary",
    |v| BASE64_PATTERN.is_match(v)
);

string_primitive!(
    /// Date with year, year-month or full precision
    Date,
    "date",
    |v| DATE_PATTERN.is_match(v) && full_date_is_valid(v)
);

string_primitive!(
    /// Date and time with year, year-month, date or full precision; a time always carries an offset
    DateTime,
    "dateTime",
    |v| DATE_TIME_PATTERN.is_match(v) && full_date_is_valid(v)
);

string_primitive!(
    /// Instant in time with at least second precision and a mandatory offset
    Instant,
    "instant",
    |v| INSTANT_PATTERN.is_match(v) && parse_timestamp(v).is_some()
);

/// Rejects calendar-impossible days such as `2023-02-30`
fn full_date_is_valid(value: &str) -> bool {
    match value.get(..10) {
        Some(date) if date.len() == 10 && date.as_bytes()[7] == b'-' => {
            NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
        }
        _ => true,
    }
}

fn parse_timestamp(value: &str) -> Option<chrono::DateTime<FixedOffset>> {
    chrono::DateTime::parse_from_rfc3339(value).ok()
}

/// Precision of a partial date or dateTime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatePrecision {
    Year,
    YearMonth,
    Date,
    DateTime,
}

fn precision_of(value: &str) -> DatePrecision {
    match value.len() {
        4 => DatePrecision::Year,
        7 => DatePrecision::YearMonth,
        10 => DatePrecision::Date,
        _ => DatePrecision::DateTime,
    }
}

impl Date {
    pub fn precision(&self) -> DatePrecision {
        precision_of(&self.0)
    }

    /// Calendar date when the value has day precision
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, "%Y-%m-%d").ok()
    }
}

impl DateTime {
    pub fn precision(&self) -> DatePrecision {
        precision_of(&self.0)
    }

    /// Timestamp when the value has time precision
    pub fn to_chrono(&self) -> Option<chrono::DateTime<FixedOffset>> {
        match self.precision() {
            DatePrecision::DateTime => parse_timestamp(&self.0),
            _ => None,
        }
    }
}

impl From<chrono::DateTime<FixedOffset>> for DateTime {
    fn from(value: chrono::DateTime<FixedOffset>) -> Self {
        Self(value.to_rfc3339())
    }
}

impl Instant {
    pub fn timestamp(&self) -> chrono::DateTime<FixedOffset> {
        // The lexical check guarantees the value parses.
        parse_timestamp(&self.0).unwrap_or_default()
    }
}

impl From<chrono::DateTime<FixedOffset>> for Instant {
    fn from(value: chrono::DateTime<FixedOffset>) -> Self {
        Self(value.to_rfc3339())
    }
}

/// Declares an integer primitive bounded below by `$min` and above by the 32-bit signed maximum
macro_rules! integer_primitive {
    ($(#[$meta:meta])* $name:ident, $type_name:literal, $min:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "serde_json::Number", into = "u32")]
        pub struct $name(u32);

        impl $name {
            pub const MIN: u32 = $min;
            pub const MAX: u32 = i32::MAX as u32;

            pub fn new(value: u32) -> Result<Self> {
                if (Self::MIN..=Self::MAX).contains(&value) {
                    Ok(Self(value))
                } else {
                    Err(Error::InvalidPrimitive {
                        type_name: $type_name,
                        value: value.to_string(),
                    })
                }
            }

            pub fn value(&self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<u32> for $name {
            type Error = Error;

            fn try_from(value: u32) -> Result<Self> {
                Self::new(value)
            }
        }

        // Numbers buffered by flattened or tagged containers arrive as `serde_json::Number`
        impl TryFrom<serde_json::Number> for $name {
            type Error = Error;

            fn try_from(value: serde_json::Number) -> Result<Self> {
                match value.as_u64().and_then(|number| u32::try_from(number).ok()) {
                    Some(number) => Self::new(number),
                    None => Err(Error::InvalidPrimitive {
                        type_name: $type_name,
                        value: value.to_string(),
                    }),
                }
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl Visitable for $name {
            fn type_name(&self) -> &'static str {
                $type_name
            }

            fn has_children(&self) -> bool {
                false
            }

            fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
                walk(self, element_name, element_index, visitor, |_| {});
            }

            fn primitive_value(&self) -> Option<PrimitiveValue<'_>> {
                Some(PrimitiveValue::Integer(i64::from(self.0)))
            }
        }
    };
}

integer_primitive!(
    /// Integer greater than zero
    PositiveInt,
    "positiveInt",
    1
);

integer_primitive!(
    /// Non-negative integer
    UnsignedInt,
    "unsignedInt",
    0
);

impl Visitable for String {
    fn type_name(&self) -> &'static str {
        "string"
    }

    fn has_children(&self) -> bool {
        false
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |_| {});
    }

    fn primitive_value(&self) -> Option<PrimitiveValue<'_>> {
        Some(PrimitiveValue::String(self))
    }
}

impl Visitable for bool {
    fn type_name(&self) -> &'static str {
        "boolean"
    }

    fn has_children(&self) -> bool {
        false
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |_| {});
    }

    fn primitive_value(&self) -> Option<PrimitiveValue<'_>> {
        Some(PrimitiveValue::Boolean(*self))
    }
}

impl Visitable for i32 {
    fn type_name(&self) -> &'static str {
        "integer"
    }

    fn has_children(&self) -> bool {
        false
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |_| {});
    }

    fn primitive_value(&self) -> Option<PrimitiveValue<'_>> {
        Some(PrimitiveValue::Integer(i64::from(*self)))
    }
}

impl Visitable for Decimal {
    fn type_name(&self) -> &'static str {
        "decimal"
    }

    fn has_children(&self) -> bool {
        false
    }

    fn accept(&self, element_name: &str, element_index: Option<usize>, visitor: &mut dyn Visitor) {
        walk(self, element_name, element_index, visitor, |_| {});
    }

    fn primitive_value(&self) -> Option<PrimitiveValue<'_>> {
        Some(PrimitiveValue::Decimal(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_pattern() {
        assert!(Id::new("example-1.a").is_ok());
        assert!(Id::new("").is_err());
        assert!(Id::new("has space").is_err());
        assert!(Id::new("a".repeat(65)).is_err());
    }

    #[test]
    fn test_code_rejects_extra_whitespace() {
        assert!(Code::new("entered-in-error").is_ok());
        assert!(Code::new("two words").is_ok());
        assert!(Code::new(" leading").is_err());
        assert!(Code::new("double  space").is_err());
    }

    #[test]
    fn test_date_time_precision() {
        let year = DateTime::new("2023").unwrap();
        assert_eq!(year.precision(), DatePrecision::Year);
        assert!(year.to_chrono().is_none());

        let full = DateTime::new("2023-04-01T10:15:30+02:00").unwrap();
        assert_eq!(full.precision(), DatePrecision::DateTime);
        assert_eq!(full.to_chrono().unwrap().offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_date_time_requires_offset_with_time() {
        assert!(DateTime::new("2023-04-01T10:15:30").is_err());
        assert!(DateTime::new("2023-02-30").is_err());
        assert!(DateTime::new("2023-13").is_err());
    }

    #[test]
    fn test_instant_requires_full_precision() {
        assert!(Instant::new("2023-04-01").is_err());
        let instant = Instant::new("2023-04-01T10:15:30.123Z").unwrap();
        assert_eq!(instant.timestamp().timestamp(), 1_680_344_130);
    }

    #[test]
    fn test_integer_bounds() {
        assert!(PositiveInt::new(0).is_err());
        assert_eq!(PositiveInt::new(3).unwrap().value(), 3);
        assert!(UnsignedInt::new(0).is_ok());
        assert!(UnsignedInt::new(2_147_483_647).is_ok());
        assert!(UnsignedInt::new(2_147_483_648).is_err());
        assert!(PositiveInt::new(u32::MAX).is_err());
    }

    #[test]
    fn test_integer_wire_range() {
        assert_eq!(serde_json::from_str::<UnsignedInt>("2147483647").unwrap().value(), 2_147_483_647);
        assert!(serde_json::from_str::<UnsignedInt>("2147483648").is_err());
        assert!(serde_json::from_str::<UnsignedInt>("-1").is_err());
        assert!(serde_json::from_str::<PositiveInt>("1.5").is_err());
        assert_eq!(serde_json::to_string(&PositiveInt::new(7).unwrap()).unwrap(), "7");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Id = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(ok.as_str(), "abc");
        assert!(serde_json::from_str::<Id>("\"a b\"").is_err());
        assert!(serde_json::from_str::<PositiveInt>("0").is_err());
    }
}
