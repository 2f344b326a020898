use crate::zoho::types::ZohoTable;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rectangular table region inside a worksheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub table_name: String,
    pub table_id: u64,
    pub start_row: u32,
    pub start_column: u32,
    pub end_row: u32,
    pub end_column: u32,
}

impl From<ZohoTable> for Table {
    fn from(t: ZohoTable) -> Self {
        Table {
            table_name: t.table_name,
            table_id: t.table_id,
            start_row: t.start_row,
            start_column: t.start_column,
            end_row: t.end_row,
            end_column: t.end_column,
        }
    }
}

/// Arguments for `table.create`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTable {
    pub worksheet_name: String,
    pub start_row: u32,
    pub start_column: u32,
    pub end_row: u32,
    pub end_column: u32,
    pub contains_header: bool,
    pub header_names: Vec<String>,
    pub table_style: Value,
}

/// One filter predicate. Serialized with the field names and order the
/// record endpoints receive, e.g. `{"Key":"Month","Operator":"equals",...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct RecordCriteria {
    pub key: String,
    pub operator: String,
    pub matcher: Value,
    #[serde(rename = "Type")]
    pub type_: String,
}

impl RecordCriteria {
    pub fn new(
        key: impl Into<String>,
        operator: impl Into<String>,
        matcher: impl Into<Value>,
        type_: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            operator: operator.into(),
            matcher: matcher.into(),
            type_: type_.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct HeaderRename {
    pub old_name: String,
    pub new_name: String,
}

impl HeaderRename {
    pub fn new(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }
}

/// Parameters for `table.records.fetch`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRecordQuery {
    pub criteria: Vec<RecordCriteria>,
    /// Boolean combination of criteria positions, e.g. `"1 and 2"`.
    pub criteria_pattern: String,
    pub column_names: Vec<String>,
    pub render_option: String,
    pub count: u32,
    pub is_case_sensitive: bool,
}

impl Default for TableRecordQuery {
    fn default() -> Self {
        Self {
            criteria: Vec::new(),
            criteria_pattern: String::new(),
            column_names: Vec::new(),
            render_option: "formatted".to_string(),
            count: 50,
            is_case_sensitive: true,
        }
    }
}

/// Compound filter for the table update/delete methods.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRecordFilter {
    pub criteria: Vec<RecordCriteria>,
    pub criteria_pattern: String,
    pub is_case_sensitive: bool,
}

impl TableRecordFilter {
    pub fn new(criteria: Vec<RecordCriteria>, criteria_pattern: impl Into<String>) -> Self {
        Self {
            criteria,
            criteria_pattern: criteria_pattern.into(),
            is_case_sensitive: true,
        }
    }
}

/// Row counts reported by the record delete methods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletedRows {
    pub deleted: u64,
    pub remaining: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_criteria_wire_format() {
        let criteria = vec![
            RecordCriteria::new("Month", "equals", "March", "text"),
            RecordCriteria::new("Amount", "greater_than", 30, "number"),
        ];

        let encoded = serde_json::to_string(&criteria).unwrap();
        assert_eq!(
            encoded,
            r#"[{"Key":"Month","Operator":"equals","Matcher":"March","Type":"text"},{"Key":"Amount","Operator":"greater_than","Matcher":30,"Type":"number"}]"#
        );

        let decoded: Vec<RecordCriteria> = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, criteria);
    }

    #[test]
    fn test_header_rename_wire_format() {
        let renames = vec![HeaderRename::new("Qty", "Quantity")];
        assert_eq!(
            serde_json::to_value(&renames).unwrap(),
            json!([{ "OldName": "Qty", "NewName": "Quantity" }])
        );
    }

    #[test]
    fn test_query_defaults() {
        let query = TableRecordQuery::default();
        assert_eq!(query.render_option, "formatted");
        assert_eq!(query.count, 50);
        assert!(query.is_case_sensitive);
        assert!(TableRecordFilter::new(Vec::new(), "and").is_case_sensitive);
    }
}
