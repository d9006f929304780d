//! Declared parameter types.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::value::Value;

/// The declared type of an action parameter.
///
/// Types can be written as strings, which is how catalogs declare them:
///
/// | Text | Type |
/// |------|------|
/// | `int`, `long`, `float`, `decimal`, `char`, `bool`, `string`, `date` | scalars |
/// | `string[]`, `int[]` | `+` separated lists |
/// | `int?` | nullable wrapper around any non-nullable type |
/// | `enum(Red\|Green)` | enumeration with the listed variants |
///
/// Anything else parses as [`ValueType::Unknown`], which fails at conversion
/// time rather than at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Long,
    Float,
    Decimal,
    Char,
    Bool,
    String,
    Date,
    Enum(Vec<String>),
    Nullable(Box<ValueType>),
    StringArray,
    IntArray,
    Unknown(String),
}

impl ValueType {
    /// Builds an enumeration type from its variant names.
    pub fn enumeration<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueType::Enum(variants.into_iter().map(Into::into).collect())
    }

    /// Wraps a type so that it also accepts [`Value::Null`].
    pub fn nullable(inner: ValueType) -> Self {
        ValueType::Nullable(Box::new(inner))
    }

    /// Whether [`Value::Null`] is a legal value of this type.
    pub fn can_be_null(&self) -> bool {
        matches!(
            self,
            ValueType::String
                | ValueType::StringArray
                | ValueType::IntArray
                | ValueType::Nullable(_)
        )
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, ValueType::Bool)
    }

    /// True for `date` and `date?`.
    pub fn is_date(&self) -> bool {
        match self {
            ValueType::Date => true,
            ValueType::Nullable(inner) => inner.is_date(),
            _ => false,
        }
    }

    /// The value bound when an empty token is converted.
    pub fn zero_value(&self) -> Value {
        match self {
            ValueType::Int => Value::Int(0),
            ValueType::Long => Value::Long(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::Decimal => Value::Decimal(0.0),
            ValueType::Char => Value::Char('\0'),
            ValueType::Bool => Value::Bool(false),
            ValueType::Date => Value::Date(epoch_zero()),
            ValueType::Enum(variants) => variants
                .first()
                .map(|v| Value::Enum(v.clone()))
                .unwrap_or(Value::Null),
            ValueType::String
            | ValueType::Nullable(_)
            | ValueType::StringArray
            | ValueType::IntArray
            | ValueType::Unknown(_) => Value::Null,
        }
    }

    /// Short placeholder describing the expected token, used in usage lines.
    pub fn value_kind(&self) -> String {
        match self {
            ValueType::Int | ValueType::Long => "number".into(),
            ValueType::Float | ValueType::Decimal => "decimal".into(),
            ValueType::Char => "char".into(),
            ValueType::Bool => "true|false".into(),
            ValueType::String => "value".into(),
            ValueType::Date => "dd-mm-yyyy".into(),
            ValueType::Enum(variants) => variants.join("|"),
            ValueType::Nullable(inner) => inner.value_kind(),
            ValueType::StringArray => "value[+value]".into(),
            ValueType::IntArray => "number[+number]".into(),
            ValueType::Unknown(name) => name.clone(),
        }
    }
}

// 1 January of year 1, the zero date.
fn epoch_zero() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Int => f.write_str("int"),
            ValueType::Long => f.write_str("long"),
            ValueType::Float => f.write_str("float"),
            ValueType::Decimal => f.write_str("decimal"),
            ValueType::Char => f.write_str("char"),
            ValueType::Bool => f.write_str("bool"),
            ValueType::String => f.write_str("string"),
            ValueType::Date => f.write_str("date"),
            ValueType::Enum(variants) => write!(f, "enum({})", variants.join("|")),
            ValueType::Nullable(inner) => write!(f, "{inner}?"),
            ValueType::StringArray => f.write_str("string[]"),
            ValueType::IntArray => f.write_str("int[]"),
            ValueType::Unknown(name) => f.write_str(name),
        }
    }
}

impl FromStr for ValueType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s.strip_suffix('?') {
            let inner: ValueType = inner.parse()?;
            return Ok(match inner {
                ValueType::Unknown(_) | ValueType::Nullable(_) => ValueType::Unknown(s.into()),
                inner => ValueType::nullable(inner),
            });
        }
        if let Some(body) = s.strip_prefix("enum(").and_then(|r| r.strip_suffix(')')) {
            let variants: Vec<String> = body
                .split('|')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .collect();
            if !variants.is_empty() {
                return Ok(ValueType::Enum(variants));
            }
        }
        Ok(match s.to_ascii_lowercase().as_str() {
            "int" => ValueType::Int,
            "long" => ValueType::Long,
            "float" | "double" => ValueType::Float,
            "decimal" => ValueType::Decimal,
            "char" => ValueType::Char,
            "bool" => ValueType::Bool,
            "string" => ValueType::String,
            "date" => ValueType::Date,
            "string[]" => ValueType::StringArray,
            "int[]" => ValueType::IntArray,
            _ => ValueType::Unknown(s.into()),
        })
    }
}
