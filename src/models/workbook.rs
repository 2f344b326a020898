use crate::zoho::types::{ZohoCreatedWorkbook, ZohoWorkbook};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workbook {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub created_by: Option<String>,
    pub created_time: Option<String>,
    pub last_modified_time: Option<String>,
}

impl From<ZohoWorkbook> for Workbook {
    fn from(wb: ZohoWorkbook) -> Self {
        Workbook {
            id: wb.resource_id,
            name: wb.workbook_name,
            url: wb.workbook_url,
            created_by: wb.created_by,
            created_time: wb.created_time,
            last_modified_time: wb.last_modified_time,
        }
    }
}

// The create response only echoes identity and URL.
impl From<ZohoCreatedWorkbook> for Workbook {
    fn from(wb: ZohoCreatedWorkbook) -> Self {
        Workbook {
            id: wb.resource_id,
            name: wb.workbook_name,
            url: wb.workbook_url,
            created_by: None,
            created_time: None,
            last_modified_time: None,
        }
    }
}

/// Paging and ordering for `workbook.list`.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookListOptions {
    pub start_index: u32,
    pub count: u32,
    pub sort_option: String,
}

impl Default for WorkbookListOptions {
    fn default() -> Self {
        Self {
            start_index: 1,
            count: 50,
            sort_option: "recently_modified".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workbook_from_list_entry() {
        let entry: ZohoWorkbook = serde_json::from_str(
            r#"{
                "resource_id": "aaaaabbbbb",
                "workbook_name": "Budget",
                "workbook_url": "https://sheet.zoho.com/sheet/open/aaaaabbbbb",
                "created_by": "jane",
                "created_time": "Mon, 01 Sep 2025 10:00:00",
                "last_modified_time": 1756720800000,
                "capabilities": {"is_editable": true}
            }"#,
        )
        .unwrap();

        let workbook = Workbook::from(entry);
        assert_eq!(workbook.id, "aaaaabbbbb");
        assert_eq!(workbook.name, "Budget");
        assert_eq!(workbook.created_by.as_deref(), Some("jane"));
        assert_eq!(workbook.last_modified_time.as_deref(), Some("1756720800000"));
    }

    #[test]
    fn test_list_defaults() {
        let options = WorkbookListOptions::default();
        assert_eq!(options.start_index, 1);
        assert_eq!(options.count, 50);
        assert_eq!(options.sort_option, "recently_modified");
    }
}
