use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

// https://www.zoho.com/accounts/protocol/oauth/devices.html
#[derive(Debug, Deserialize)]
pub(crate) struct DeviceCodeResponse {
    pub(crate) device_code: String,
    pub(crate) user_code: String,
    pub(crate) verification_url: String,
    pub(crate) expires_in: u64,
    pub(crate) interval: u64,
}

/// Shared by the device-token and refresh exchanges. Zoho reports some
/// failures as HTTP 200 with only `error` set.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub(crate) access_token: Option<String>,
    #[serde(default)]
    pub(crate) refresh_token: Option<String>,
    #[serde(default)]
    pub(crate) expires_in: Option<i64>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkbooksResponse {
    pub(crate) workbooks: Vec<ZohoWorkbook>,
}

#[derive(Debug, Deserialize)]
pub struct ZohoWorkbook {
    #[serde(deserialize_with = "stringly")]
    pub resource_id: String,
    pub workbook_name: String,
    #[serde(default)]
    pub workbook_url: Option<String>,
    #[serde(default, deserialize_with = "optional_stringly")]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "optional_stringly")]
    pub created_time: Option<String>,
    #[serde(default, deserialize_with = "optional_stringly")]
    pub last_modified_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ZohoCreatedWorkbook {
    #[serde(deserialize_with = "stringly")]
    pub resource_id: String,
    pub workbook_name: String,
    #[serde(default)]
    pub workbook_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SheetsResponse {
    pub(crate) data: Vec<ZohoSheet>,
}

#[derive(Debug, Deserialize)]
pub struct ZohoSheet {
    #[serde(deserialize_with = "stringly")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorksheetInsertResponse {
    pub(crate) worksheet_names: Vec<ZohoWorksheetName>,
    pub(crate) new_worksheet_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ZohoWorksheetName {
    #[serde(deserialize_with = "stringly")]
    pub worksheet_id: String,
    pub worksheet_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TablesResponse {
    #[serde(default)]
    pub(crate) tables: Vec<ZohoTable>,
}

#[derive(Debug, Deserialize)]
pub struct ZohoTable {
    pub table_name: String,
    pub table_id: u64,
    pub start_row: u32,
    pub start_column: u32,
    pub end_row: u32,
    pub end_column: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedTableResponse {
    pub(crate) table_name: String,
    pub(crate) table_id: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(default)]
    pub(crate) status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AffectedRowsResponse {
    #[serde(default)]
    pub(crate) no_of_affected_rows: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeletedRowsResponse {
    #[serde(default)]
    pub(crate) no_of_rows_deleted: u64,
    #[serde(default)]
    pub(crate) no_of_rows_remaining: u64,
}

/// Record objects have one property per column, so they stay schema-less.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordsResponse {
    #[serde(default)]
    pub(crate) records: Vec<Map<String, Value>>,
}

/// Zoho is inconsistent about quoting ids. An id must be present and not null.
fn stringly<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Err(D::Error::custom("identifier is null")),
        other => Ok(other.to_string()),
    }
}

fn optional_stringly<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Ok(Some(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ids_are_read_as_strings() {
        let sheet: ZohoSheet = serde_json::from_str(r#"{"id": 42, "name": "Sheet1"}"#).unwrap();
        assert_eq!(sheet.id, "42");

        let sheet: ZohoSheet =
            serde_json::from_str(r#"{"id": "0#", "name": "Sheet1", "extra": true}"#).unwrap();
        assert_eq!(sheet.id, "0#");
    }

    #[test]
    fn test_null_identifier_rejected() {
        let result: Result<ZohoWorkbook, _> =
            serde_json::from_str(r#"{"resource_id": null, "workbook_name": "Budget"}"#);
        assert!(result.unwrap_err().to_string().contains("identifier is null"));

        let result: Result<ZohoWorksheetName, _> =
            serde_json::from_str(r#"{"worksheet_id": null, "worksheet_name": "Sheet1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_workbook_details_are_optional() {
        let workbook: ZohoWorkbook = serde_json::from_str(
            r#"{"resource_id": "wb1", "workbook_name": "Budget", "created_time": 1700000000, "created_by": null}"#,
        )
        .unwrap();

        assert_eq!(workbook.resource_id, "wb1");
        assert!(workbook.workbook_url.is_none());
        assert!(workbook.created_by.is_none());
        assert_eq!(workbook.created_time.as_deref(), Some("1700000000"));
        assert!(workbook.last_modified_time.is_none());
    }

    #[test]
    fn test_token_response_tolerates_error_only_body() {
        let resp: TokenResponse = serde_json::from_str(r#"{"error":"invalid_code"}"#).unwrap();
        assert!(resp.access_token.is_none());
        assert_eq!(resp.error.as_deref(), Some("invalid_code"));
    }
}
