//! Conversion of raw command-line tokens into typed values.

use std::num::IntErrorKind;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{BindError, Result};
use crate::types::ValueType;
use crate::value::Value;

/// Separator between the items of an array token (`1+2+3`).
pub const ARRAY_SEPARATOR: char = '+';

/// Converts a raw token into a value of the declared type.
///
/// An empty token yields the type's zero value. Array tokens are split on
/// `+` and every segment goes through the scalar path; the first bad segment
/// fails the whole conversion.
pub fn convert(raw: &str, ty: &ValueType) -> Result<Value> {
    match ty {
        ValueType::StringArray => {
            if raw.is_empty() {
                return Ok(Value::Null);
            }
            Ok(Value::StrArray(
                raw.split(ARRAY_SEPARATOR).map(String::from).collect(),
            ))
        }
        ValueType::IntArray => {
            if raw.is_empty() {
                return Ok(Value::Null);
            }
            let items = raw
                .split(ARRAY_SEPARATOR)
                .map(int_segment)
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::IntArray(items))
        }
        ValueType::Nullable(inner) => {
            if raw.is_empty() {
                Ok(Value::Null)
            } else {
                convert(raw, inner)
            }
        }
        ValueType::Unknown(name) => Err(BindError::UnknownType { name: name.clone() }),
        scalar if raw.is_empty() => Ok(scalar.zero_value()),
        ValueType::String => Ok(Value::Str(raw.to_string())),
        ValueType::Int => parse_int(raw, ty_name(ty)).map(Value::Int),
        ValueType::Long => parse_int(raw, ty_name(ty)).map(Value::Long),
        ValueType::Float => parse_float(raw, ty).map(Value::Float),
        ValueType::Decimal => parse_float(raw, ty).map(Value::Decimal),
        ValueType::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(BindError::conversion(raw, ty)),
            }
        }
        ValueType::Bool => {
            if raw.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(BindError::conversion(raw, ty))
            }
        }
        ValueType::Date => parse_date(raw).map(Value::Date),
        ValueType::Enum(variants) => parse_variant(raw, variants)
            .map(Value::Enum)
            .ok_or_else(|| BindError::conversion(raw, ty)),
    }
}

/// Whether `raw` spells a valid `dd-mm-yyyy` date.
pub fn can_be_converted_to_date(raw: &str) -> bool {
    parse_date(raw).is_ok()
}

fn ty_name(ty: &ValueType) -> String {
    ty.to_string()
}

fn parse_int<T>(raw: &str, type_name: String) -> Result<T>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    raw.trim().parse::<T>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => BindError::out_of_range(raw),
        _ => BindError::conversion(raw, type_name),
    })
}

/// Converts one segment of a compound token through the `int` path.
fn int_segment(segment: &str) -> Result<i32> {
    match convert(segment, &ValueType::Int)? {
        Value::Int(n) => Ok(n),
        _ => Err(BindError::conversion(segment, ValueType::Int)),
    }
}

fn parse_float(raw: &str, ty: &ValueType) -> Result<f64> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| BindError::conversion(raw, ty))?;
    if value.is_finite() {
        return Ok(value);
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") {
        Err(BindError::conversion(raw, ty))
    } else {
        Err(BindError::out_of_range(raw))
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    let invalid = || BindError::DateConversion {
        raw: raw.to_string(),
    };
    let parts: Vec<&str> = raw.split('-').collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(invalid());
    };
    let day = u32::try_from(int_segment(day)?).map_err(|_| invalid())?;
    let month = u32::try_from(int_segment(month)?).map_err(|_| invalid())?;
    let year = int_segment(year)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn parse_variant(raw: &str, variants: &[String]) -> Option<String> {
    let raw = raw.trim();
    if let Some(exact) = variants.iter().find(|v| v.as_str() == raw) {
        return Some(exact.clone());
    }
    if let Some(folded) = variants.iter().find(|v| v.eq_ignore_ascii_case(raw)) {
        return Some(folded.clone());
    }
    raw.parse::<usize>()
        .ok()
        .and_then(|index| variants.get(index))
        .cloned()
}
