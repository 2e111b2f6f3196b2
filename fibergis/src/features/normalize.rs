//! Normalization of store-native values into interchange-safe JSON
//!
//! The building table carries an open attribute set, so rows are decoded
//! dynamically by postgres type rather than into fixed structs. The
//! mapping is total: any cell the store can return has a defined image,
//! degrading to text or null instead of failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tokio_postgres::types::Type;
use tokio_postgres::Row;

/// f64 → JSON number; non-finite values have no JSON image and become null
pub fn float_value(v: f64) -> Value {
    serde_json::Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

/// Arbitrary-precision NUMERIC → standard floating point
pub fn decimal_value(d: Decimal) -> Value {
    d.to_f64().map(float_value).unwrap_or(Value::Null)
}

/// DATE → ISO-8601 date text
pub fn date_value(d: NaiveDate) -> Value {
    Value::String(d.format("%Y-%m-%d").to_string())
}

/// TIMESTAMP (no zone) → ISO-8601 date-time text
pub fn datetime_value(d: NaiveDateTime) -> Value {
    Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
}

/// TIMESTAMPTZ → RFC 3339 text
pub fn timestamptz_value(d: DateTime<Utc>) -> Value {
    Value::String(d.to_rfc3339())
}

fn get_or_null<'a, T>(row: &'a Row, idx: usize, to_json: impl Fn(T) -> Value) -> Value
where
    T: tokio_postgres::types::FromSql<'a>,
{
    match row.try_get::<_, Option<T>>(idx) {
        Ok(Some(v)) => to_json(v),
        // Null cell or a driver-side decode mismatch; both normalize to null
        Ok(None) | Err(_) => Value::Null,
    }
}

/// Normalizes one row cell into a JSON scalar, keyed on the column type
pub fn column_value(row: &Row, idx: usize) -> Value {
    let ty = row.columns()[idx].type_();
    match ty {
        t if *t == Type::BOOL => get_or_null(row, idx, Value::Bool),
        t if *t == Type::INT2 => get_or_null(row, idx, |v: i16| Value::from(v)),
        t if *t == Type::INT4 => get_or_null(row, idx, |v: i32| Value::from(v)),
        t if *t == Type::INT8 => get_or_null(row, idx, |v: i64| Value::from(v)),
        t if *t == Type::FLOAT4 => get_or_null(row, idx, |v: f32| float_value(f64::from(v))),
        t if *t == Type::FLOAT8 => get_or_null(row, idx, float_value),
        t if *t == Type::NUMERIC => get_or_null(row, idx, decimal_value),
        t if *t == Type::DATE => get_or_null(row, idx, date_value),
        t if *t == Type::TIMESTAMP => get_or_null(row, idx, datetime_value),
        t if *t == Type::TIMESTAMPTZ => get_or_null(row, idx, timestamptz_value),
        t if *t == Type::JSON || *t == Type::JSONB => get_or_null(row, idx, |v: Value| v),
        t if *t == Type::TEXT || *t == Type::VARCHAR || *t == Type::BPCHAR || *t == Type::NAME => {
            get_or_null(row, idx, Value::String)
        }
        // Unknown column types degrade to their text form when the driver
        // can produce one, null otherwise
        _ => get_or_null(row, idx, Value::String),
    }
}

/// Builds a normalized property map from every column not in `skip`
pub fn row_to_properties(row: &Row, skip: &[&str]) -> Map<String, Value> {
    let mut props = Map::new();
    for (idx, column) in row.columns().iter().enumerate() {
        if skip.contains(&column.name()) {
            continue;
        }
        props.insert(column.name().to_string(), column_value(row, idx));
    }
    props
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_value_finite() {
        assert_eq!(float_value(1.5), serde_json::json!(1.5));
    }

    #[test]
    fn test_float_value_non_finite_is_null() {
        assert_eq!(float_value(f64::NAN), Value::Null);
        assert_eq!(float_value(f64::INFINITY), Value::Null);
    }

    #[test]
    fn test_decimal_value() {
        let d: Decimal = "42.195".parse().unwrap();
        assert_eq!(decimal_value(d), serde_json::json!(42.195));
    }

    #[test]
    fn test_date_value_iso() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(date_value(d), Value::String("2024-03-15".into()));
    }

    #[test]
    fn test_datetime_value_iso() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(datetime_value(d), Value::String("2024-03-15T10:30:00".into()));
    }

    #[test]
    fn test_timestamptz_value_rfc3339() {
        let d = DateTime::parse_from_rfc3339("2024-03-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(timestamptz_value(d), Value::String("2024-03-15T10:30:00+00:00".into()));
    }

    #[test]
    fn test_idempotent_on_already_normalized() {
        // A value already in its image maps to itself
        let v = float_value(7.0);
        if let Value::Number(n) = &v {
            assert_eq!(float_value(n.as_f64().unwrap()), v);
        } else {
            panic!("expected number");
        }
    }
}
