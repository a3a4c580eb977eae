//! Row-to-document transformation and the clear-then-insert load path.

use chrono::Utc;

use crate::error::ReservoirResult;
use crate::sheet::SheetTable;
use crate::store::DocumentStore;
use crate::types::{normalize_field_name, Document, FieldValue, CREATED_AT_FIELD, DOCUMENT_ID_FIELD};

/// Fixed batch cap: only the first 10 rows of a sheet are ever loaded.
/// More rows is truncation, not an error.
pub const BATCH_CAP: usize = 10;

/// Counts reported by a completed load run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Documents removed before the insert (destructive overwrite)
    pub cleared: u64,
    /// Documents inserted from the transformed batch
    pub inserted: usize,
}

/// Transforms sheet rows into documents and writes them to the store.
#[derive(Debug, Clone)]
pub struct Loader {
    batch_cap: usize,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        Self {
            batch_cap: BATCH_CAP,
        }
    }

    /// Transform rows into documents, in row order, capped at
    /// `min(row_count, 10)`.
    ///
    /// Per row: column names are normalized, empty cells stay as explicit
    /// nulls, `_created_at` is captured per row (an accepted source of
    /// nondeterminism across runs), and `_document_id` is the 1-based row
    /// position.
    pub fn transform(&self, table: &SheetTable) -> Vec<Document> {
        let documents: Vec<Document> = table
            .rows
            .iter()
            .take(self.batch_cap)
            .enumerate()
            .map(|(index, row)| {
                let mut doc = Document::new();
                for (column, value) in table.columns.iter().zip(row.iter()) {
                    doc.set(normalize_field_name(column), value.clone());
                }
                doc.set(CREATED_AT_FIELD, FieldValue::DateTime(Utc::now()));
                doc.set(DOCUMENT_ID_FIELD, FieldValue::Number((index + 1) as f64));
                doc
            })
            .collect();

        tracing::debug!(
            rows = table.row_count(),
            documents = documents.len(),
            "transformed sheet rows"
        );
        documents
    }

    /// Clear the collection, then insert the transformed batch.
    ///
    /// This is a destructive overwrite, not an upsert: prior documents are
    /// removed first. The two steps are not atomic - an insert failure
    /// leaves whatever made it in, with no rollback.
    pub fn run(&self, store: &dyn DocumentStore, table: &SheetTable) -> ReservoirResult<LoadOutcome> {
        let cleared = store.clear()?;
        let documents = self.transform(table);
        let inserted = store.insert_many(&documents)?;
        Ok(LoadOutcome { cleared, inserted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;

    fn table_with_rows(count: usize) -> SheetTable {
        SheetTable {
            columns: vec!["Reservation Code".to_string(), "Building".to_string()],
            rows: (0..count)
                .map(|i| {
                    vec![
                        FieldValue::Text(format!("R{i}")),
                        FieldValue::Text("NYC".to_string()),
                    ]
                })
                .collect(),
        }
    }

    #[test]
    fn test_transform_caps_at_ten() {
        let loader = Loader::new();
        assert_eq!(loader.transform(&table_with_rows(25)).len(), 10);
        assert_eq!(loader.transform(&table_with_rows(10)).len(), 10);
    }

    #[test]
    fn test_transform_keeps_short_inputs() {
        let loader = Loader::new();
        assert_eq!(loader.transform(&table_with_rows(3)).len(), 3);
        assert_eq!(loader.transform(&table_with_rows(0)).len(), 0);
    }

    #[test]
    fn test_document_ids_are_sequential_one_based() {
        let loader = Loader::new();
        let documents = loader.transform(&table_with_rows(12));

        let ids: Vec<i64> = documents.iter().filter_map(|d| d.document_id()).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<i64>>());
    }

    #[test]
    fn test_transform_normalizes_field_names() {
        let loader = Loader::new();
        let documents = loader.transform(&table_with_rows(1));
        let doc = &documents[0];

        assert!(doc.get("reservation_code").is_some());
        assert!(doc.get("building").is_some());
        assert!(doc.get("Reservation Code").is_none());
    }

    #[test]
    fn test_transform_adds_synthetic_fields() {
        let loader = Loader::new();
        let documents = loader.transform(&table_with_rows(2));

        for doc in &documents {
            assert!(matches!(
                doc.get(CREATED_AT_FIELD),
                Some(FieldValue::DateTime(_))
            ));
            assert!(doc.get(DOCUMENT_ID_FIELD).is_some());
        }
    }

    #[test]
    fn test_transform_keeps_nulls_explicit() {
        let table = SheetTable {
            columns: vec!["Ds Checkin".to_string()],
            rows: vec![vec![FieldValue::Null]],
        };
        let documents = Loader::new().transform(&table);

        assert_eq!(documents[0].get("ds_checkin"), Some(&FieldValue::Null));
    }
}
