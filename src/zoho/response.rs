//! Maps raw Zoho responses onto typed results.
//!
//! A non-2xx status is always `RemoteApi` with the body untouched. A 2xx
//! body that does not fit the expected shape is `MalformedResponse`, with
//! serde's message naming the offending field. Decoding is all-or-nothing.

use crate::error::{Result, SheetError};
use crate::models::{DeletedRows, SheetRecord, Table, Workbook, WorksheetRef};
use crate::zoho::transport::RawResponse;
use crate::zoho::types::{
    AffectedRowsResponse, DeletedRowsResponse, RecordsResponse, SheetsResponse, StatusResponse,
    TablesResponse, WorkbooksResponse, WorksheetInsertResponse,
};
use serde::de::DeserializeOwned;
use tracing::warn;

const SUCCESS_STATUS: &str = "success";

pub(crate) fn check_status(response: RawResponse) -> Result<RawResponse> {
    if !response.is_success() {
        return Err(SheetError::RemoteApi {
            status: response.status,
            body: response.body,
        });
    }
    Ok(response)
}

pub(crate) fn decode<T: DeserializeOwned>(response: RawResponse) -> Result<T> {
    let response = check_status(response)?;
    serde_json::from_str(&response.body)
        .map_err(|e| SheetError::MalformedResponse(format!("{} in body: {}", e, response.body)))
}

/// `true` only for a `status` of `"success"`, case-insensitively.
pub(crate) fn decode_status(response: RawResponse) -> Result<bool> {
    let body: StatusResponse = decode(response)?;
    let success = body
        .status
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case(SUCCESS_STATUS));

    if !success {
        warn!(status = ?body.status, "Zoho did not report success");
    }
    Ok(success)
}

pub(crate) fn decode_affected_rows(response: RawResponse) -> Result<u64> {
    let body: AffectedRowsResponse = decode(response)?;
    Ok(body.no_of_affected_rows)
}

pub(crate) fn decode_deleted_rows(response: RawResponse) -> Result<DeletedRows> {
    let body: DeletedRowsResponse = decode(response)?;
    Ok(DeletedRows {
        deleted: body.no_of_rows_deleted,
        remaining: body.no_of_rows_remaining,
    })
}

pub(crate) fn decode_workbooks(response: RawResponse) -> Result<Vec<Workbook>> {
    let body: WorkbooksResponse = decode(response)?;
    Ok(body.workbooks.into_iter().map(Into::into).collect())
}

pub(crate) fn decode_worksheets(response: RawResponse) -> Result<Vec<WorksheetRef>> {
    let body: SheetsResponse = decode(response)?;
    Ok(body.data.into_iter().map(Into::into).collect())
}

/// Picks the newly inserted sheet out of the full sheet list Zoho returns.
pub(crate) fn decode_inserted_worksheet(response: RawResponse) -> Result<WorksheetRef> {
    let body: WorksheetInsertResponse = decode(response)?;
    let new_name = body.new_worksheet_name;

    body.worksheet_names
        .into_iter()
        .find(|sheet| sheet.worksheet_name == new_name)
        .map(Into::into)
        .ok_or_else(|| {
            SheetError::MalformedResponse(format!(
                "new worksheet '{}' not present in `worksheet_names`",
                new_name
            ))
        })
}

pub(crate) fn decode_tables(response: RawResponse) -> Result<Vec<Table>> {
    let body: TablesResponse = decode(response)?;
    Ok(body.tables.into_iter().map(Into::into).collect())
}

pub(crate) fn decode_records(
    response: RawResponse,
    row_index_required: bool,
) -> Result<Vec<SheetRecord>> {
    let body: RecordsResponse = decode(response)?;
    body.records
        .into_iter()
        .map(|row| SheetRecord::from_row(row, row_index_required))
        .collect()
}
