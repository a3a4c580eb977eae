use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde_json::{Map, Value};

use crate::error::{ReservoirError, ReservoirResult};

/// Synthetic field: 1-based position of the document in its load batch.
pub const DOCUMENT_ID_FIELD: &str = "_document_id";

/// Synthetic field: wall-clock time the row was transformed.
pub const CREATED_AT_FIELD: &str = "_created_at";

//==============================================================================
// Field Values
//==============================================================================

/// A single document field value.
///
/// Dates stay a distinct type rather than being stringified so that stored
/// documents remain sortable by check-in/check-out downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Explicit null - empty cells are stored, not omitted
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Type name as shown by `verify` when listing a sample document
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::DateTime(_) => "datetime",
        }
    }

    /// JSON form used for persistence. Dates become a tagged
    /// `{"$date": "..."}` object so the type survives the round trip.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => serde_json::json!(n),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::DateTime(dt) => {
                let mut map = Map::new();
                map.insert(
                    "$date".to_string(),
                    Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
                );
                Value::Object(map)
            }
        }
    }

    /// Inverse of [`to_json`](Self::to_json).
    pub fn from_json(value: &Value) -> FieldValue {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(0.0)),
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Object(map) => {
                if let Some(Value::String(raw)) = map.get("$date") {
                    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
                        return FieldValue::DateTime(dt.with_timezone(&Utc));
                    }
                }
                FieldValue::Text(value.to_string())
            }
            Value::Array(_) => FieldValue::Text(value.to_string()),
        }
    }

    /// Human-readable form for console tables. Nulls render as "N/A";
    /// midnight timestamps render as a bare date.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Null => "N/A".to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(s) => s.clone(),
            FieldValue::DateTime(dt) => {
                if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
        }
    }
}

/// Format a number for display, removing unnecessary decimal places
pub fn format_number(n: f64) -> String {
    let rounded = (n * 1e6).round() / 1e6;
    format!("{:.6}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

//==============================================================================
// Documents
//==============================================================================

/// A stored record: ordered (normalized field name -> value) pairs.
///
/// Order is insertion order, which for loaded documents means the source
/// spreadsheet's column order followed by the two synthetic fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: Vec<(String, FieldValue)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any existing value under the same name.
    pub fn set(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        if let Some(slot) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The synthetic `_document_id`, if present.
    pub fn document_id(&self) -> Option<i64> {
        match self.get(DOCUMENT_ID_FIELD) {
            Some(FieldValue::Number(n)) => Some(*n as i64),
            _ => None,
        }
    }

    /// JSON object form used for persistence (field order preserved).
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        Value::Object(map)
    }

    /// Rebuild a document from its stored JSON body.
    pub fn from_json(value: &Value) -> ReservoirResult<Document> {
        let map = value.as_object().ok_or_else(|| {
            ReservoirError::Malformed(format!("expected a JSON object, got: {value}"))
        })?;
        let mut doc = Document::new();
        for (name, raw) in map {
            doc.set(name.clone(), FieldValue::from_json(raw));
        }
        Ok(doc)
    }
}

impl serde::Serialize for FieldValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl serde::Serialize for Document {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Normalize a spreadsheet column name into a document field name:
/// lowercase, spaces and hyphens become underscores. Idempotent.
pub fn normalize_field_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace([' ', '-'], "_")
}
