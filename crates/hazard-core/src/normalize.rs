//! Raw feed → canonical alerts.

use serde_json::Value;
use tracing::debug;

use crate::alert::{Alert, RawAlertRecord};
use crate::error::EnvelopeError;

/// Keys that may hold the record list when the document is an object.
const LIST_KEYS: &[&str] = &["data", "alerts", "features", "entries"];

/// Normalize typed raw records.
///
/// Records whose level is not yellow, orange or red are dropped here, so the
/// feed's "no hazard" state never reaches any consumer.
pub fn normalize(raw: &[RawAlertRecord]) -> Vec<Alert> {
    raw.iter()
        .map(Alert::from_raw)
        .filter(|alert| {
            let keep = alert.level.is_known();
            if !keep {
                debug!(id = %alert.id, "Dropping record without an active warning level");
            }
            keep
        })
        .collect()
}

/// Normalize a list of untyped records. Non-object entries are skipped.
pub fn normalize_values(values: &[Value]) -> Vec<Alert> {
    let records: Vec<RawAlertRecord> = values
        .iter()
        .filter_map(|value| {
            let record = RawAlertRecord::from_value(value);
            if record.is_none() {
                debug!("Skipping non-object feed entry");
            }
            record
        })
        .collect();
    normalize(&records)
}

/// Locate the record list inside a feed document.
pub fn extract_records(document: &Value) -> Result<&[Value], EnvelopeError> {
    match document {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Object(obj) => LIST_KEYS
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_array))
            .map(|items| items.as_slice())
            .ok_or_else(|| EnvelopeError::MissingRecordList(LIST_KEYS.join(", "))),
        Value::Null => Err(EnvelopeError::UnexpectedRoot("null")),
        Value::Bool(_) => Err(EnvelopeError::UnexpectedRoot("boolean")),
        Value::Number(_) => Err(EnvelopeError::UnexpectedRoot("number")),
        Value::String(_) => Err(EnvelopeError::UnexpectedRoot("string")),
    }
}

/// Normalize a whole feed document (array or wrapped list).
pub fn normalize_document(document: &Value) -> Result<Vec<Alert>, EnvelopeError> {
    let records = extract_records(document)?;
    Ok(normalize_values(records))
}
