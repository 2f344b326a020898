use crate::error::{Result, SheetError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property Zoho uses to report a record's sheet row.
pub const ROW_INDEX_FIELD: &str = "row_index";

/// A generic row: column name to cell value, in column order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SheetRecord {
    pub row_index: u64,
    pub data: Map<String, Value>,
}

impl SheetRecord {
    pub fn new(row_index: u64) -> Self {
        Self {
            row_index,
            data: Map::new(),
        }
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.data.get(column)
    }

    /// Split a fetched record object into its row index and column values.
    pub(crate) fn from_row(mut row: Map<String, Value>, row_index_required: bool) -> Result<Self> {
        let row_index = match row.shift_remove(ROW_INDEX_FIELD) {
            Some(value) => parse_row_index(&value)?,
            None if row_index_required => {
                return Err(SheetError::MalformedResponse(format!(
                    "missing field `{}` in record",
                    ROW_INDEX_FIELD
                )));
            }
            None => 0,
        };

        Ok(Self {
            row_index,
            data: row,
        })
    }

    /// Map any serializable struct onto a record, one column per field.
    pub fn from_object<T: Serialize>(object: &T, row_index: u64) -> Result<Self> {
        match serde_json::to_value(object) {
            Ok(Value::Object(data)) => Ok(Self { row_index, data }),
            Ok(other) => Err(SheetError::RecordConversion {
                row_index,
                message: format!("expected an object, got {}", other),
            }),
            Err(e) => Err(SheetError::RecordConversion {
                row_index,
                message: e.to_string(),
            }),
        }
    }

    /// Rows are numbered from 1 in slice order.
    pub fn from_objects<T: Serialize>(objects: &[T]) -> Result<Vec<Self>> {
        objects
            .iter()
            .zip(1u64..)
            .map(|(object, row_index)| Self::from_object(object, row_index))
            .collect()
    }

    /// Rebuild a typed value from the record's columns. Type mismatches
    /// are reported, never dropped.
    pub fn to_object<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.data.clone())).map_err(|e| {
            SheetError::RecordConversion {
                row_index: self.row_index,
                message: e.to_string(),
            }
        })
    }

    pub fn to_objects<T: DeserializeOwned>(records: &[SheetRecord]) -> Result<Vec<T>> {
        records.iter().map(SheetRecord::to_object).collect()
    }
}

fn parse_row_index(value: &Value) -> Result<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .ok_or_else(|| {
            SheetError::MalformedResponse(format!(
                "field `{}` is not a row number: {}",
                ROW_INDEX_FIELD, value
            ))
        })
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    pub(crate) struct TaskItem {
        pub task_name: String,
        pub assigned_to: String,
        pub status: String,
        pub priority: i32,
        pub due_date: String,
    }

    pub(crate) fn mock_task(name: &str, priority: i32) -> TaskItem {
        TaskItem {
            task_name: name.to_string(),
            assigned_to: "Beth".to_string(),
            status: "Open".to_string(),
            priority,
            due_date: "2025-10-01".to_string(),
        }
    }
}
