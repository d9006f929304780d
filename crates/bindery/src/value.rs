//! Typed values bound to action parameters.
//!
//! The [`Value`] enum is what the converter produces from raw tokens and what
//! declared defaults are expressed in. Handlers read values back into native
//! Rust types through [`FromValue`].

use std::fmt;

use chrono::NaiveDate;

use crate::types::ValueType;

/// Date layout used on the command line and in usage output.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// A typed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Long(i64),
    Float(f64),
    /// Stored as a binary float, so fractions like `0.1` are approximate.
    Decimal(f64),
    Char(char),
    Bool(bool),
    Str(String),
    Date(NaiveDate),
    /// Enumeration variant, by name.
    Enum(String),
    StrArray(Vec<String>),
    IntArray(Vec<i32>),
    /// Absent value of a nullable or reference-like type.
    Null,
}

impl Value {
    /// Builds a decimal value.
    pub fn decimal(v: f64) -> Self {
        Value::Decimal(v)
    }

    /// Builds an enumeration value.
    pub fn variant(name: impl Into<String>) -> Self {
        Value::Enum(name.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Char(_) => "char",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Date(_) => "date",
            Value::Enum(_) => "enum",
            Value::StrArray(_) => "string[]",
            Value::IntArray(_) => "int[]",
            Value::Null => "null",
        }
    }

    /// Whether this value can be stored in a parameter of type `ty` as is.
    ///
    /// No conversion takes place: a string is not assignable to a date
    /// parameter even if it spells a valid date.
    pub fn is_assignable_to(&self, ty: &ValueType) -> bool {
        match (self, ty) {
            (Value::Null, ty) => ty.can_be_null(),
            (value, ValueType::Nullable(inner)) => value.is_assignable_to(inner),
            (Value::Int(_), ValueType::Int)
            | (Value::Long(_), ValueType::Long)
            | (Value::Float(_), ValueType::Float)
            | (Value::Decimal(_), ValueType::Decimal)
            | (Value::Char(_), ValueType::Char)
            | (Value::Bool(_), ValueType::Bool)
            | (Value::Str(_), ValueType::String)
            | (Value::Date(_), ValueType::Date)
            | (Value::StrArray(_), ValueType::StringArray)
            | (Value::IntArray(_), ValueType::IntArray) => true,
            (Value::Enum(name), ValueType::Enum(variants)) => variants.contains(name),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Long(n) => write!(f, "{n}"),
            Value::Float(n) | Value::Decimal(n) => write!(f, "{n}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) | Value::Enum(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::StrArray(items) => f.write_str(&items.join("+")),
            Value::IntArray(items) => {
                let parts: Vec<String> = items.iter().map(i32::to_string).collect();
                f.write_str(&parts.join("+"))
            }
            Value::Null => Ok(()),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<Vec<String>> for Value {
    fn from(v: Vec<String>) -> Self {
        Value::StrArray(v)
    }
}

impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Value::IntArray(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Extraction of a native Rust value from a bound [`Value`].
pub trait FromValue: Sized {
    /// Type name used in mismatch diagnostics.
    const EXPECTED: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    const EXPECTED: &'static str = "value";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "i32";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "i64";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "f64";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(n) | Value::Decimal(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for char {
    const EXPECTED: &'static str = "char";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "String";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(String::from)
    }
}

impl FromValue for NaiveDate {
    const EXPECTED: &'static str = "NaiveDate";

    fn from_value(value: &Value) -> Option<Self> {
        value.as_date()
    }
}

impl FromValue for Vec<String> {
    const EXPECTED: &'static str = "Vec<String>";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::StrArray(items) => Some(items.clone()),
            _ => None,
        }
    }
}

impl FromValue for Vec<i32> {
    const EXPECTED: &'static str = "Vec<i32>";

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::IntArray(items) => Some(items.clone()),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(Value::Int(-4).to_string(), "-4");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Date(date(31, 12, 2008)).to_string(), "31-12-2008");
        assert_eq!(Value::Date(date(1, 2, 3)).to_string(), "01-02-0003");
        assert_eq!(Value::IntArray(vec![1, 2, 3]).to_string(), "1+2+3");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_null_assignable_only_to_nullable_types() {
        assert!(Value::Null.is_assignable_to(&ValueType::String));
        assert!(Value::Null.is_assignable_to(&ValueType::nullable(ValueType::Int)));
        assert!(!Value::Null.is_assignable_to(&ValueType::Int));
    }

    #[test]
    fn test_assignability_is_strict() {
        assert!(Value::Int(10).is_assignable_to(&ValueType::Int));
        assert!(!Value::Int(10).is_assignable_to(&ValueType::String));
        assert!(!Value::Int(10).is_assignable_to(&ValueType::Long));
        assert!(!Value::from("test").is_assignable_to(&ValueType::Int));
        assert!(!Value::from("31-12-2008").is_assignable_to(&ValueType::Date));
        assert!(Value::Int(3).is_assignable_to(&ValueType::nullable(ValueType::Int)));
    }

    #[test]
    fn test_enum_assignability_checks_variant() {
        let ty = ValueType::enumeration(["One", "Two"]);
        assert!(Value::variant("Two").is_assignable_to(&ty));
        assert!(!Value::variant("Three").is_assignable_to(&ty));
    }

    #[test]
    fn test_from_value_extraction() {
        assert_eq!(i32::from_value(&Value::Int(7)), Some(7));
        assert_eq!(i64::from_value(&Value::Int(7)), Some(7));
        assert_eq!(i32::from_value(&Value::Long(7)), None);
        assert_eq!(String::from_value(&Value::variant("One")), Some("One".into()));
        assert_eq!(Option::<i32>::from_value(&Value::Null), Some(None));
        assert_eq!(Option::<i32>::from_value(&Value::Int(1)), Some(Some(1)));
        assert_eq!(Option::<i32>::from_value(&Value::Bool(true)), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Str("x".into()));
    }
}
