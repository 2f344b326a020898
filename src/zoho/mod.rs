pub mod auth;
mod client;
pub mod request;
mod response;
pub mod transport;
pub mod types;

pub use auth::{DeviceAuthorization, StaticToken, TokenAuthority, TokenSource};
pub use client::SheetClient;
pub use transport::{RawResponse, ReqwestTransport, Transport};

use crate::error::Result;
use crate::models::{
    DeletedRows, HeaderRename, NewTable, SheetRecord, Table, TableRecordFilter, TableRecordQuery,
    Workbook, WorkbookListOptions, WorksheetRecordDeletion, WorksheetRecordQuery,
    WorksheetRecordUpdate, WorksheetRef,
};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Every remote operation is a single round trip: no retries, batching or caching.
#[async_trait]
pub trait SheetOperations {
    async fn list_workbooks(&self, options: &WorkbookListOptions) -> Result<Vec<Workbook>>;

    async fn create_workbook(&self, name: &str) -> Result<Workbook>;

    async fn delete_workbook(&self, workbook_id: &str) -> Result<()>;

    async fn list_worksheets(&self, workbook_id: &str) -> Result<Vec<WorksheetRef>>;

    async fn create_worksheet(&self, workbook_id: &str, worksheet_name: &str)
    -> Result<WorksheetRef>;

    async fn rename_worksheet(&self, workbook_id: &str, old_name: &str, new_name: &str)
    -> Result<()>;

    async fn delete_worksheet(&self, workbook_id: &str, worksheet_name: &str) -> Result<()>;

    async fn add_columns(&self, workbook_id: &str, sheet_id: &str, columns: &[String])
    -> Result<()>;

    async fn remove_columns(
        &self,
        workbook_id: &str,
        sheet_id: &str,
        column_indexes: &[u32],
    ) -> Result<()>;

    async fn add_row(&self, workbook_id: &str, sheet_id: &str, row: &[Value]) -> Result<()>;

    async fn update_cell(
        &self,
        workbook_id: &str,
        sheet_id: &str,
        row: u32,
        col: u32,
        value: Value,
    ) -> Result<()>;

    async fn delete_row(&self, workbook_id: &str, sheet_id: &str, row_index: u32) -> Result<()>;

    async fn list_tables(&self, resource_id: &str) -> Result<Vec<Table>>;

    async fn create_table(&self, resource_id: &str, table: &NewTable) -> Result<Table>;

    async fn delete_table(&self, resource_id: &str, table_name: &str, clear_format: bool)
    -> Result<bool>;

    async fn rename_table_headers(
        &self,
        resource_id: &str,
        table_name: &str,
        headers: &[HeaderRename],
    ) -> Result<bool>;

    async fn fetch_table_records(
        &self,
        resource_id: &str,
        table_name: &str,
        query: &TableRecordQuery,
    ) -> Result<Vec<SheetRecord>>;

    async fn update_table_records(
        &self,
        resource_id: &str,
        table_name: &str,
        filter: &TableRecordFilter,
        data: &Map<String, Value>,
    ) -> Result<u64>;

    async fn delete_table_records(
        &self,
        resource_id: &str,
        table_name: &str,
        filter: &TableRecordFilter,
    ) -> Result<DeletedRows>;

    async fn insert_table_columns(
        &self,
        resource_id: &str,
        table_name: &str,
        column_names: &[String],
        insert_after: &str,
    ) -> Result<bool>;

    async fn delete_table_columns(
        &self,
        resource_id: &str,
        table_name: &str,
        column_names: &[String],
    ) -> Result<bool>;

    async fn fetch_worksheet_records(
        &self,
        resource_id: &str,
        worksheet_name: &str,
        query: &WorksheetRecordQuery,
    ) -> Result<Vec<SheetRecord>>;

    async fn add_worksheet_records(
        &self,
        resource_id: &str,
        worksheet_name: &str,
        records: &[Map<String, Value>],
        header_row: u32,
    ) -> Result<bool>;

    async fn update_worksheet_records(
        &self,
        resource_id: &str,
        worksheet_name: &str,
        update: &WorksheetRecordUpdate,
    ) -> Result<u64>;

    async fn delete_worksheet_records(
        &self,
        resource_id: &str,
        worksheet_name: &str,
        deletion: &WorksheetRecordDeletion,
    ) -> Result<DeletedRows>;

    async fn insert_worksheet_columns(
        &self,
        resource_id: &str,
        worksheet_name: &str,
        insert_after: &str,
        column_names: &[String],
    ) -> Result<bool>;
}
