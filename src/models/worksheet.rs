use crate::zoho::types::{ZohoSheet, ZohoWorksheetName};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A worksheet inside a workbook. Names are not cached between calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorksheetRef {
    pub id: String,
    pub name: String,
}

impl From<ZohoSheet> for WorksheetRef {
    fn from(sheet: ZohoSheet) -> Self {
        WorksheetRef {
            id: sheet.id,
            name: sheet.name,
        }
    }
}

impl From<ZohoWorksheetName> for WorksheetRef {
    fn from(sheet: ZohoWorksheetName) -> Self {
        WorksheetRef {
            id: sheet.worksheet_id,
            name: sheet.worksheet_name,
        }
    }
}

/// Parameters for `worksheet.records.fetch`.
#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetRecordQuery {
    /// Server-side filter such as `"Month"="March" AND "Amount">30`.
    pub criteria: Option<String>,
    pub column_names: Vec<String>,
    pub records_start_index: u32,
    pub count: u32,
    pub is_case_sensitive: bool,
    pub render_option: String,
    pub header_row: u32,
}

impl Default for WorksheetRecordQuery {
    fn default() -> Self {
        Self {
            criteria: None,
            column_names: Vec::new(),
            records_start_index: 1,
            count: 50,
            is_case_sensitive: true,
            render_option: "formatted".to_string(),
            header_row: 1,
        }
    }
}

/// Arguments for `worksheet.records.update`.
#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetRecordUpdate {
    pub criteria: String,
    pub data: Map<String, Value>,
    pub is_case_sensitive: bool,
    pub header_row: u32,
}

impl WorksheetRecordUpdate {
    pub fn new(criteria: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            criteria: criteria.into(),
            data,
            is_case_sensitive: true,
            header_row: 1,
        }
    }
}

/// Which rows `worksheet.records.delete` should remove.
#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetRecordDeletion {
    pub criteria: Option<String>,
    pub row_array: Vec<u32>,
    pub header_row: u32,
    pub delete_rows: bool,
}

impl Default for WorksheetRecordDeletion {
    fn default() -> Self {
        Self {
            criteria: None,
            row_array: Vec::new(),
            header_row: 1,
            delete_rows: true,
        }
    }
}
