use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Number, Value};
use sqlx::mysql::MySqlRow;
use sqlx::types::Json;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// One result row, keyed by column name in select order.
pub type Record = Map<String, Value>;

/// How a MySQL column type is rendered in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Bool,
    Signed,
    Unsigned,
    Float,
    Double,
    Decimal,
    Text,
    Binary,
    Date,
    Time,
    DateTime,
    Timestamp,
    Json,
    Other,
}

/// Maps a type name as reported by the driver (e.g. `INT UNSIGNED`, `VARCHAR`).
pub fn column_kind(type_name: &str) -> ColumnKind {
    let upper = type_name.to_ascii_uppercase();
    let unsigned = upper.ends_with(" UNSIGNED");
    let base = upper.split_whitespace().next().unwrap_or_default();

    match base {
        "BOOLEAN" | "BOOL" => ColumnKind::Bool,
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" => {
            if unsigned {
                ColumnKind::Unsigned
            } else {
                ColumnKind::Signed
            }
        }
        "FLOAT" => ColumnKind::Float,
        "DOUBLE" | "REAL" => ColumnKind::Double,
        "DECIMAL" | "NUMERIC" => ColumnKind::Decimal,
        "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM" | "SET" => {
            ColumnKind::Text
        }
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            ColumnKind::Binary
        }
        // Sent as a two-byte integer under the binary protocol.
        "YEAR" => ColumnKind::Unsigned,
        "DATE" => ColumnKind::Date,
        "TIME" => ColumnKind::Time,
        "DATETIME" => ColumnKind::DateTime,
        "TIMESTAMP" => ColumnKind::Timestamp,
        "JSON" => ColumnKind::Json,
        _ => ColumnKind::Other,
    }
}

/// Converts a row into a JSON object, one entry per column.
pub fn row_to_record(row: &MySqlRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new();

    for column in row.columns() {
        let idx = column.ordinal();
        let value = if row.try_get_raw(idx)?.is_null() {
            Value::Null
        } else {
            decode_column(row, idx, column_kind(column.type_info().name()))?
        };
        record.insert(column.name().to_string(), value);
    }

    Ok(record)
}

fn decode_column(row: &MySqlRow, idx: usize, kind: ColumnKind) -> Result<Value, sqlx::Error> {
    let value = match kind {
        ColumnKind::Bool => Value::Bool(row.try_get::<bool, _>(idx)?),
        ColumnKind::Signed => Value::from(row.try_get::<i64, _>(idx)?),
        ColumnKind::Unsigned => Value::from(row.try_get::<u64, _>(idx)?),
        ColumnKind::Float => float_value(f64::from(row.try_get::<f32, _>(idx)?)),
        ColumnKind::Double => float_value(row.try_get::<f64, _>(idx)?),
        ColumnKind::Decimal => decimal_value(row.try_get::<Decimal, _>(idx)?),
        ColumnKind::Text => Value::String(row.try_get::<String, _>(idx)?),
        ColumnKind::Date => Value::String(row.try_get::<NaiveDate, _>(idx)?.to_string()),
        ColumnKind::Time => Value::String(row.try_get::<NaiveTime, _>(idx)?.to_string()),
        ColumnKind::DateTime => Value::String(
            row.try_get::<NaiveDateTime, _>(idx)?
                .format("%Y-%m-%dT%H:%M:%S%.f")
                .to_string(),
        ),
        ColumnKind::Timestamp => Value::String(row.try_get::<DateTime<Utc>, _>(idx)?.to_rfc3339()),
        ColumnKind::Json => row.try_get::<Json<Value>, _>(idx)?.0,
        ColumnKind::Binary | ColumnKind::Other => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(idx)?;
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
    };
    Ok(value)
}

/// NaN and infinities have no JSON form and become `null`.
fn float_value(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

/// Whole decimals stay integers; everything else becomes a JSON float.
pub fn decimal_value(d: Decimal) -> Value {
    if d.fract().is_zero() {
        if let Some(i) = d.to_i64() {
            return Value::from(i);
        }
    }
    d.to_f64().map(float_value).unwrap_or(Value::Null)
}
