// ============================================================
// Layer 4 — Dataset (column-oriented table)
// ============================================================
// The in-memory table every pipeline stage works on.
//
// Layout:
//   columns: [ Column { name: "text",   values: ["Hello", "Bye", ...] },
//              Column { name: "intent", values: ["greet", null,  ...] } ]
//
// Every column holds exactly `len` values. Columns are the union of
// the fields of all records, in order of first appearance; a record
// that lacks a field contributes `null` for it.
//
// Stages never edit a Dataset they were handed. They build a new
// one (`select_rows`, `map_column`).

use serde_json::Value;

use crate::domain::error::PipelineError;
use crate::domain::record::RawRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name:   String,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    len:     usize,
}

impl Dataset {
    /// Build a table from records, inferring columns from the union of
    /// fields present.
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        let len = records.len();
        let mut columns: Vec<Column> = Vec::new();

        for (row, record) in records.into_iter().enumerate() {
            for (field, value) in record {
                let idx = match columns.iter().position(|c| c.name == field) {
                    Some(idx) => idx,
                    None => {
                        // A new column is back-filled with nulls for earlier rows
                        columns.push(Column {
                            name:   field,
                            values: vec![Value::Null; len],
                        });
                        columns.len() - 1
                    }
                };
                columns[idx].values[row] = value;
            }
        }

        Self { columns, len }
    }

    /// Parse a JSON body that must be an array of objects.
    pub fn from_json_str(body: &str) -> Result<Self, PipelineError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| PipelineError::DatasetParse(e.to_string()))?;

        let items = match value {
            Value::Array(items) => items,
            other => {
                return Err(PipelineError::DatasetParse(format!(
                    "expected a JSON array, found {}",
                    json_kind(&other)
                )))
            }
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(PipelineError::DatasetParse(format!(
                    "element {i} is {}, expected an object",
                    json_kind(&other)
                ))),
            })
            .collect::<Result<Vec<RawRecord>, _>>()?;

        Ok(Self::from_records(records))
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Row `index` as a record. Null cells are kept so every row has the
    /// full column set.
    pub fn row(&self, index: usize) -> Option<RawRecord> {
        if index >= self.len {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| (c.name.clone(), c.values[index].clone()))
                .collect(),
        )
    }

    /// All rows, in order
    pub fn to_records(&self) -> Vec<RawRecord> {
        (0..self.len).filter_map(|i| self.row(i)).collect()
    }

    /// New table containing only the given rows, in the given order.
    /// Indices past the end are ignored.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let indices: Vec<usize> = indices.iter().copied().filter(|&i| i < self.len).collect();
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name:   c.name.clone(),
                values: indices.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();

        Self { columns, len: indices.len() }
    }

    /// New table with `f` applied to every value of column `name`.
    /// Unknown columns leave the table unchanged.
    pub fn map_column<F>(&self, name: &str, f: F) -> Self
    where
        F: Fn(&Value) -> Value,
    {
        let mut out = self.clone();
        if let Some(col) = out.columns.iter_mut().find(|c| c.name == name) {
            col.values = col.values.iter().map(&f).collect();
        }
        out
    }

    /// Serialise back to a JSON array of records
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_records())
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null      => "null",
        Value::Bool(_)   => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_)  => "an array",
        Value::Object(_) => "an object",
    }
}
