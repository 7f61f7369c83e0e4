// ============================================================
// Layer 4 — Dataset Preprocessor
// ============================================================
// Cleans a raw Dataset before it is handed to training.
//
// Cleaning stages (applied in order, all keyed on the `text` column):
//   1. Drop duplicate `text` values, keeping the first occurrence
//      (exact comparison, so "Hello" and "HELLO" both survive)
//   2. Drop rows whose `text` is null or absent
//   3. Lowercase string `text` values
//   4. Drop duplicates again, now on the lowercased value
//
// Lowercasing can turn distinct values into equal ones, so stage 4
// is needed for clean() to be idempotent: `["Hello", "HELLO"]` ends
// up as a single "hello" row.
//
// A dataset without a `text` column passes through unchanged.
// The column set is never altered and rows are never added.

use std::collections::HashSet;

use serde_json::Value;

use crate::data::dataset::Dataset;
use crate::domain::record::TEXT_COLUMN;

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Run all cleaning stages and return the cleaned table.
    pub fn clean(&self, ds: &Dataset) -> Dataset {
        if !ds.has_column(TEXT_COLUMN) {
            tracing::debug!("No '{}' column, dataset left unchanged", TEXT_COLUMN);
            return ds.clone();
        }

        // ── Step 1: exact deduplication ───────────────────────────────────────
        let ds = dedup_text(ds);

        // ── Step 2: drop null text ────────────────────────────────────────────
        let ds = drop_null_text(&ds);

        // ── Step 3: lowercase ─────────────────────────────────────────────────
        let ds = ds.map_column(TEXT_COLUMN, lowercase);

        // ── Step 4: deduplicate what lowercasing merged ───────────────────────
        let ds = dedup_text(&ds);

        tracing::info!("Preprocessed data: {} records remaining", ds.len());
        ds
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep the first row for each distinct `text` value. Nulls compare
/// equal to each other.
fn dedup_text(ds: &Dataset) -> Dataset {
    let Some(texts) = ds.column(TEXT_COLUMN) else {
        return ds.clone();
    };

    let mut seen = HashSet::new();
    let keep: Vec<usize> = texts
        .iter()
        .enumerate()
        .filter(|(_, v)| seen.insert(dedup_key(v)))
        .map(|(i, _)| i)
        .collect();

    ds.select_rows(&keep)
}

fn drop_null_text(ds: &Dataset) -> Dataset {
    let Some(texts) = ds.column(TEXT_COLUMN) else {
        return ds.clone();
    };

    let keep: Vec<usize> = texts
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_null())
        .map(|(i, _)| i)
        .collect();

    ds.select_rows(&keep)
}

/// serde_json::Value is not Hash; its canonical JSON text is.
/// The string "1" and the number 1 serialise differently, so they
/// stay distinct.
fn dedup_key(v: &Value) -> String {
    v.to_string()
}

/// Non-string values are left as they are.
fn lowercase(v: &Value) -> Value {
    match v {
        Value::String(s) => Value::String(s.to_lowercase()),
        other => other.clone(),
    }
}
