//! Cell values.
//!
//! [`Value`] is what a [`DataModel`](super::DataModel) hands out for one
//! cell. It carries enough type information for ordering and for a sensible
//! default text rendering; anything richer is the job of a column renderer.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The value of a single cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No data.
    #[default]
    None,
    /// Text.
    String(String),
    /// Integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Date and time without a zone.
    DateTime(NaiveDateTime),
}

impl Value {
    /// Returns `true` if this is `Value::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Attempts to get the value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to get the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to get the value as a float. Integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Attempts to get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Human-readable text for the value. Not escaped.
    pub fn display_text(&self) -> String {
        match self {
            Value::None => String::new(),
            Value::String(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::DateTime(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::None => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::DateTime(_) => 3,
            Value::String(_) => 4,
        }
    }
}

/// Total order over cell values used by the default column comparator.
///
/// `None` sorts first. Strings compare case-insensitively, falling back to a
/// case-sensitive comparison so the order is total. Integers and floats
/// compare numerically with each other. Values of different kinds order by
/// kind.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::None, Value::None) => Ordering::Equal,
        (Value::String(sa), Value::String(sb)) => sa
            .to_lowercase()
            .cmp(&sb.to_lowercase())
            .then_with(|| sa.cmp(sb)),
        (Value::Int(ia), Value::Int(ib)) => ia.cmp(ib),
        (Value::Bool(ba), Value::Bool(bb)) => ba.cmp(bb),
        (Value::DateTime(da), Value::DateTime(db)) => da.cmp(db),
        (Value::Float(fa), Value::Float(fb)) => compare_floats(*fa, *fb),
        (Value::Int(ia), Value::Float(fb)) => compare_int_float(*ia, *fb),
        (Value::Float(fa), Value::Int(ib)) => compare_int_float(*ib, *fa).reverse(),
        _ => a.kind_rank().cmp(&b.kind_rank()),
    }
}

/// NaN sorts after every number; `-0.0` equals `0.0`.
fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison of an integer with a float, without rounding the
/// integer through `f64`.
fn compare_int_float(int: i64, float: f64) -> Ordering {
    // 2^63, the first float above every i64.
    const I64_END: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() || float >= I64_END {
        return Ordering::Less;
    }
    if float < -I64_END {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    int.cmp(&(whole as i64)).then_with(|| compare_floats(whole, float))
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_display_text() {
        assert_eq!(Value::None.display_text(), "");
        assert_eq!(Value::from("Alice").display_text(), "Alice");
        assert_eq!(Value::from(42).display_text(), "42");
        assert_eq!(Value::from(true).display_text(), "true");

        let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(Value::from(dt).display_text(), "2024-03-01 09:30");
    }

    #[test]
    fn test_string_compare_is_case_insensitive() {
        assert_eq!(
            compare_values(&Value::from("alice"), &Value::from("Bob")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::from("Alice"), &Value::from("alice")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::from("same"), &Value::from("same")),
            Ordering::Equal
        );
    }

    #[test]
    fn test_numeric_compare_across_kinds() {
        assert_eq!(
            compare_values(&Value::from(2), &Value::from(2.5)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::from(3.0), &Value::from(3)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_large_int_float_compare_is_exact() {
        let two_53 = 9_007_199_254_740_992_i64;
        let int = Value::Int(two_53);
        let float = Value::Float(two_53 as f64);
        let next = Value::Int(two_53 + 1);

        assert_eq!(compare_values(&int, &float), Ordering::Equal);
        assert_eq!(compare_values(&next, &float), Ordering::Greater);
        assert_eq!(compare_values(&float, &next), Ordering::Less);
        assert_eq!(compare_values(&int, &next), Ordering::Less);

        assert_eq!(
            compare_values(&Value::Int(i64::MAX), &Value::Float(i64::MAX as f64)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::Int(i64::MIN), &Value::Float(i64::MIN as f64)),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(&Value::Int(-3), &Value::Float(-2.5)),
            Ordering::Less
        );
    }

    #[test]
    fn test_nan_and_signed_zero() {
        assert_eq!(
            compare_values(&Value::Float(f64::NAN), &Value::Int(i64::MAX)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::Float(f64::NAN), &Value::Float(f64::INFINITY)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::Float(-0.0), &Value::Float(0.0)),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(&Value::Float(-0.0), &Value::Int(0)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_mixed_numbers_sort_consistently() {
        let two_53 = 9_007_199_254_740_992_i64;
        let mut values = vec![
            Value::Int(two_53 + 1),
            Value::Float(f64::NAN),
            Value::Float(two_53 as f64),
            Value::Int(two_53 - 1),
            Value::Float(f64::NEG_INFINITY),
            Value::Int(two_53),
        ];
        values.sort_by(compare_values);
        assert_eq!(values[0], Value::Float(f64::NEG_INFINITY));
        assert_eq!(values[1], Value::Int(two_53 - 1));
        assert_eq!(values[4], Value::Int(two_53 + 1));
        assert!(matches!(values[5], Value::Float(f) if f.is_nan()));
    }

    #[test]
    fn test_none_sorts_first() {
        assert_eq!(
            compare_values(&Value::None, &Value::from(-100)),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::from("a"), &Value::None),
            Ordering::Greater
        );
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(Some(5)), Value::Int(5));
        assert_eq!(Value::from(None::<i64>), Value::None);
    }
}
