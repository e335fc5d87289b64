use crate::error::Error;
use crate::pipeline::{FieldRule, Pipeline};
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Number, Value};

/// Validates a batch of fetched rows against the pipeline's validation
/// schema, propagating the first failure.
pub fn validate_rows(
    rows: Vec<Map<String, Value>>,
    pipeline: &Pipeline,
) -> Result<Vec<Map<String, Value>>, Error> {
    rows.into_iter()
        .map(|row| validate_row(row, pipeline))
        .collect()
}

/// Maps one loosely-typed API row to a schema-conformant record.
///
/// Every present field must have a rule in the validation schema; fields the
/// schema knows about but the API omitted are allowed (the API drops metrics
/// that are zero for a row).
pub fn validate_row(
    row: Map<String, Value>,
    pipeline: &Pipeline,
) -> Result<Map<String, Value>, Error> {
    let mut validated = Map::with_capacity(row.len());

    for (field, value) in row {
        let rule = pipeline
            .validation_schema
            .get(field.as_str())
            .ok_or_else(|| Error::UnknownField {
                field: field.clone(),
            })?;

        let normalized = apply_rule(&field, *rule, value)?;
        validated.insert(field, normalized);
    }

    Ok(validated)
}

fn apply_rule(field: &str, rule: FieldRule, value: Value) -> Result<Value, Error> {
    match rule {
        FieldRule::Date => normalize_date(field, value),
        FieldRule::Text => validate_text(field, value),
        FieldRule::Number => coerce_number(field, value),
        FieldRule::UnsafeNumber => coerce_unsafe_number(field, value),
        FieldRule::ActionBreakdown => validate_action_breakdown(field, value),
    }
}

fn normalize_date(field: &str, value: Value) -> Result<Value, Error> {
    match value {
        Value::String(raw) => match parse_date(&raw) {
            Some(date) => Ok(Value::String(date.format("%Y-%m-%d").to_string())),
            None => Err(mismatch(field, FieldRule::Date, &Value::String(raw))),
        },
        other => Err(mismatch(field, FieldRule::Date, &other)),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }

    // The Graph API also emits datetimes with an offset without a colon,
    // e.g. 2022-01-01T00:00:00+0000
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .ok()
        .map(|datetime| datetime.date_naive())
}

fn validate_text(field: &str, value: Value) -> Result<Value, Error> {
    match value {
        Value::String(s) => Ok(Value::String(s)),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        other => Err(mismatch(field, FieldRule::Text, &other)),
    }
}

fn coerce_number(field: &str, value: Value) -> Result<Value, Error> {
    match value {
        Value::Number(n) => Ok(Value::Number(n)),
        Value::String(s) => {
            if let Ok(int) = s.parse::<i64>() {
                return Ok(Value::Number(int.into()));
            }

            match s.parse::<f64>().ok().and_then(Number::from_f64) {
                Some(n) => Ok(Value::Number(n)),
                None => Err(mismatch(field, FieldRule::Number, &Value::String(s))),
            }
        }
        other => Err(mismatch(field, FieldRule::Number, &other)),
    }
}

/// Like [`coerce_number`], but identifiers larger than a double can hold
/// exactly must stay on the integer path so no digits are lost.
fn coerce_unsafe_number(field: &str, value: Value) -> Result<Value, Error> {
    match value {
        Value::Number(n) => Ok(Value::Number(n)),
        Value::String(s) => {
            if let Ok(int) = s.parse::<i64>() {
                return Ok(Value::Number(int.into()));
            }

            if let Ok(int) = s.parse::<u64>() {
                return Ok(Value::Number(int.into()));
            }

            match s.parse::<f64>().ok().and_then(Number::from_f64) {
                Some(n) => Ok(Value::Number(n)),
                None => Err(mismatch(field, FieldRule::UnsafeNumber, &Value::String(s))),
            }
        }
        other => Err(mismatch(field, FieldRule::UnsafeNumber, &other)),
    }
}

fn validate_action_breakdown(field: &str, value: Value) -> Result<Value, Error> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(mismatch(field, FieldRule::ActionBreakdown, &other)),
    };

    let mut validated = Vec::with_capacity(items.len());

    for (idx, item) in items.into_iter().enumerate() {
        let entry = match item {
            Value::Object(entry) => entry,
            other => {
                return Err(mismatch(
                    &format!("{field}[{idx}]"),
                    FieldRule::ActionBreakdown,
                    &other,
                ))
            }
        };

        let mut record = Map::with_capacity(entry.len());
        for (key, val) in entry {
            let path = format!("{field}[{idx}].{key}");
            match key.as_str() {
                "action_type" => {
                    record.insert(key, validate_text(&path, val)?);
                }
                "value" => {
                    record.insert(key, coerce_number(&path, val)?);
                }
                _ => return Err(Error::UnknownField { field: path }),
            }
        }

        validated.push(Value::Object(record));
    }

    Ok(Value::Array(validated))
}

fn mismatch(field: &str, rule: FieldRule, value: &Value) -> Error {
    Error::SchemaMismatch {
        field: field.to_string(),
        expected: rule.expected(),
        got: describe(value),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{s}'"),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}
