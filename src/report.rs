//! Projection of stored documents into the reporting view.
//!
//! The projection is a fixed, hand-picked field map defined once; it is
//! produced read-only from stored documents and never persisted.

use crate::types::{Document, FieldValue};

/// Rendered stand-in for null or missing values.
pub const NOT_AVAILABLE: &str = "N/A";

/// A fixed field map from stored document fields to renamed report keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// (output key, source field) pairs, in display order
    fields: Vec<(String, String)>,
}

impl Projection {
    /// The reservation summary projection used by every command:
    /// building/city, confirmation code, stay dates, rating, platform.
    pub fn reservation_summary() -> Self {
        let fields = [
            ("building_city", "building"),
            ("confirmation_code", "reservation_code"),
            ("checkin_date", "ds_checkin"),
            ("checkout_date", "ds_checkout"),
            ("overall_rating", "overall_rating"),
            ("booking_platform", "booking_platform"),
        ];
        Self {
            fields: fields
                .iter()
                .map(|(key, source)| (key.to_string(), source.to_string()))
                .collect(),
        }
    }

    /// Output keys, in display order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Project one document. Every output key is always present: a missing
    /// or null source field projects to the null sentinel, never omitted.
    pub fn apply(&self, document: &Document) -> ProjectedView {
        ProjectedView {
            fields: self
                .fields
                .iter()
                .map(|(key, source)| {
                    let value = document.get(source).cloned().unwrap_or(FieldValue::Null);
                    (key.clone(), value)
                })
                .collect(),
        }
    }

    /// Lazily project documents in their given (insertion) order, with an
    /// optional head limit. No filtering predicate is applied.
    pub fn apply_all<'a, I>(
        &'a self,
        documents: I,
        limit: Option<usize>,
    ) -> impl Iterator<Item = ProjectedView> + 'a
    where
        I: IntoIterator<Item = Document>,
        I::IntoIter: 'a,
    {
        documents
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(move |doc| self.apply(&doc))
    }
}

/// A read-only, renamed subset of one document's fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedView {
    fields: Vec<(String, FieldValue)>,
}

impl ProjectedView {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Display form of one key; unknown keys render as the sentinel.
    pub fn display(&self, key: &str) -> String {
        self.get(key)
            .map(FieldValue::display)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}
