use super::SheetOperations;
use crate::config::Credentials;
use crate::error::{Result, SheetError, require, require_items};
use crate::models::{
    DeletedRows, HeaderRename, NewTable, SheetRecord, Table, TableRecordFilter, TableRecordQuery,
    Workbook, WorkbookListOptions, WorksheetRecordDeletion, WorksheetRecordQuery,
    WorksheetRecordUpdate, WorksheetRef,
};
use crate::zoho::auth::{TokenAuthority, TokenSource};
use crate::zoho::request::{ApiCall, FormParams};
use crate::zoho::response;
use crate::zoho::transport::{RawResponse, ReqwestTransport, Transport};
use crate::zoho::types::{CreatedTableResponse, ZohoCreatedWorkbook};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, instrument};
use url::Url;

pub struct SheetClient {
    tokens: Arc<dyn TokenSource>,
    transport: Arc<dyn Transport>,
    api_base: Url,
}

impl SheetClient {
    /// Client with its own reqwest transport and token authority.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::new()?);
        let authority = TokenAuthority::new(credentials, transport);
        Self::from_authority(Arc::new(authority))
    }

    /// Share an authority (and its transport) the caller also drives directly,
    /// e.g. to run the device flow.
    pub fn from_authority(authority: Arc<TokenAuthority>) -> Result<Self> {
        let api_base = authority.credentials().api_base_url();
        let transport = authority.transport();
        Self::with_parts(&api_base, authority, transport)
    }

    pub fn with_parts(
        api_base: &str,
        tokens: Arc<dyn TokenSource>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        Ok(Self {
            tokens,
            transport,
            api_base: Url::parse(api_base)?,
        })
    }

    async fn send(&self, call: ApiCall) -> Result<RawResponse> {
        let request = call.build(&self.api_base, self.tokens.as_ref()).await?;
        let response = self.transport.send(request).await?;
        debug!(status = response.status, "Zoho responded");
        Ok(response)
    }

    async fn send_checked(&self, call: ApiCall) -> Result<()> {
        response::check_status(self.send(call).await?)?;
        Ok(())
    }
}

fn sheet_path(workbook_id: &str, sheet_id: &str, tail: &[&str]) -> Vec<String> {
    ["workbooks", workbook_id, "sheets", sheet_id]
        .iter()
        .chain(tail)
        .map(|segment| segment.to_string())
        .collect()
}

fn require_sheet(workbook_id: &str, sheet_id: &str) -> Result<()> {
    require(workbook_id, "workbook_id")?;
    require(sheet_id, "sheet_id")
}

fn require_data(data: &Map<String, Value>) -> Result<()> {
    if data.is_empty() {
        return Err(SheetError::InvalidArgument(
            "data cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn require_region(table: &NewTable) -> Result<()> {
    if table.start_row == 0 || table.start_column == 0 {
        return Err(SheetError::InvalidArgument(
            "table rows and columns are numbered from 1".to_string(),
        ));
    }
    if table.end_row < table.start_row || table.end_column < table.start_column {
        return Err(SheetError::InvalidArgument(format!(
            "table region ({},{})-({},{}) is inverted",
            table.start_row, table.start_column, table.end_row, table.end_column
        )));
    }
    Ok(())
}

#[async_trait]
impl SheetOperations for SheetClient {
    #[instrument(name = "Listing workbooks", skip_all)]
    async fn list_workbooks(&self, options: &WorkbookListOptions) -> Result<Vec<Workbook>> {
        let params = FormParams::new()
            .int("start_index", options.start_index.into())
            .int("count", options.count.into())
            .text("sort_option", options.sort_option.as_str());

        let call = ApiCall::rpc("workbooks", "workbook.list").form(params);
        response::decode_workbooks(self.send(call).await?)
    }

    #[instrument(name = "Creating workbook", skip(self))]
    async fn create_workbook(&self, name: &str) -> Result<Workbook> {
        require(name, "workbook_name")?;

        let call = ApiCall::rpc("create", "workbook.create")
            .form(FormParams::new().text("workbook_name", name));
        let created: ZohoCreatedWorkbook = response::decode(self.send(call).await?)?;

        Ok(created.into())
    }

    #[instrument(name = "Deleting workbook", skip(self))]
    async fn delete_workbook(&self, workbook_id: &str) -> Result<()> {
        require(workbook_id, "workbook_id")?;

        let call = ApiCall::rest(Method::DELETE, ["workbooks", workbook_id]);
        self.send_checked(call).await
    }

    #[instrument(name = "Listing worksheets", skip(self))]
    async fn list_worksheets(&self, workbook_id: &str) -> Result<Vec<WorksheetRef>> {
        require(workbook_id, "workbook_id")?;

        let call = ApiCall::rest(Method::GET, ["workbooks", workbook_id, "sheets"]);
        response::decode_worksheets(self.send(call).await?)
    }

    #[instrument(name = "Creating worksheet", skip(self))]
    async fn create_worksheet(
        &self,
        workbook_id: &str,
        worksheet_name: &str,
    ) -> Result<WorksheetRef> {
        require(workbook_id, "workbook_id")?;
        require(worksheet_name, "worksheet_name")?;

        let call = ApiCall::rpc(workbook_id, "worksheet.insert")
            .form(FormParams::new().text("worksheet_name", worksheet_name));
        response::decode_inserted_worksheet(self.send(call).await?)
    }

    #[instrument(name = "Renaming worksheet", skip(self))]
    async fn rename_worksheet(
        &self,
        workbook_id: &str,
        old_name: &str,
        new_name: &str,
    ) -> Result<()> {
        require(workbook_id, "workbook_id")?;
        require(old_name, "old_name")?;
        require(new_name, "new_name")?;

        let params = FormParams::new()
            .text("old_name", old_name)
            .text("new_name", new_name);
        self.send_checked(ApiCall::rpc(workbook_id, "worksheet.rename").form(params))
            .await
    }

    #[instrument(name = "Deleting worksheet", skip(self))]
    async fn delete_worksheet(&self, workbook_id: &str, worksheet_name: &str) -> Result<()> {
        require(workbook_id, "workbook_id")?;
        require(worksheet_name, "worksheet_name")?;

        let call = ApiCall::rpc(workbook_id, "worksheet.delete")
            .form(FormParams::new().text("worksheet_name", worksheet_name));
        self.send_checked(call).await
    }

    #[instrument(name = "Adding columns", skip(self, columns))]
    async fn add_columns(
        &self,
        workbook_id: &str,
        sheet_id: &str,
        columns: &[String],
    ) -> Result<()> {
        require_sheet(workbook_id, sheet_id)?;
        require_items(columns, "columns")?;

        let call = ApiCall::rest(Method::POST, sheet_path(workbook_id, sheet_id, &["columns"]))
            .json(json!({ "columns": columns }));
        self.send_checked(call).await
    }

    #[instrument(name = "Removing columns", skip(self, column_indexes))]
    async fn remove_columns(
        &self,
        workbook_id: &str,
        sheet_id: &str,
        column_indexes: &[u32],
    ) -> Result<()> {
        require_sheet(workbook_id, sheet_id)?;
        require_items(column_indexes, "column_indexes")?;

        let call = ApiCall::rest(Method::DELETE, sheet_path(workbook_id, sheet_id, &["columns"]))
            .json(json!({ "columns": column_indexes }));
        self.send_checked(call).await
    }

    #[instrument(name = "Adding row", skip(self, row))]
    async fn add_row(&self, workbook_id: &str, sheet_id: &str, row: &[Value]) -> Result<()> {
        require_sheet(workbook_id, sheet_id)?;
        require_items(row, "row")?;

        let call = ApiCall::rest(Method::POST, sheet_path(workbook_id, sheet_id, &["rows"]))
            .json(json!({ "data": [row] }));
        self.send_checked(call).await
    }

    #[instrument(name = "Updating cell", skip(self, value))]
    async fn update_cell(
        &self,
        workbook_id: &str,
        sheet_id: &str,
        row: u32,
        col: u32,
        value: Value,
    ) -> Result<()> {
        require_sheet(workbook_id, sheet_id)?;

        let call = ApiCall::rest(Method::PATCH, sheet_path(workbook_id, sheet_id, &["rows"]))
            .json(json!({ "data": [{ "row": row, "col": col, "value": value }] }));
        self.send_checked(call).await
    }

    #[instrument(name = "Deleting row", skip(self))]
    async fn delete_row(&self, workbook_id: &str, sheet_id: &str, row_index: u32) -> Result<()> {
        require_sheet(workbook_id, sheet_id)?;

        let row = row_index.to_string();
        let path = sheet_path(workbook_id, sheet_id, &["rows", &row]);
        self.send_checked(ApiCall::rest(Method::DELETE, path)).await
    }

    #[instrument(name = "Listing tables", skip(self))]
    async fn list_tables(&self, resource_id: &str) -> Result<Vec<Table>> {
        require(resource_id, "resource_id")?;

        let call = ApiCall::rpc(resource_id, "table.list");
        response::decode_tables(self.send(call).await?)
    }

    #[instrument(name = "Creating table", skip(self, table), fields(worksheet = %table.worksheet_name))]
    async fn create_table(&self, resource_id: &str, table: &NewTable) -> Result<Table> {
        require(resource_id, "resource_id")?;
        require(&table.worksheet_name, "worksheet_name")?;
        require_region(table)?;

        let params = FormParams::new()
            .text("worksheet_name", table.worksheet_name.as_str())
            .int("start_row", table.start_row.into())
            .int("start_column", table.start_column.into())
            .int("end_row", table.end_row.into())
            .int("end_column", table.end_column.into())
            .flag("contains_header", table.contains_header)
            .json("header_names", &table.header_names)?
            .json("table_style", &table.table_style)?;

        let call = ApiCall::rpc(resource_id, "table.create").form(params);
        let created: CreatedTableResponse = response::decode(self.send(call).await?)?;

        Ok(Table {
            table_name: created.table_name,
            table_id: created.table_id,
            start_row: table.start_row,
            start_column: table.start_column,
            end_row: table.end_row,
            end_column: table.end_column,
        })
    }

    #[instrument(name = "Deleting table", skip(self))]
    async fn delete_table(
        &self,
        resource_id: &str,
        table_name: &str,
        clear_format: bool,
    ) -> Result<bool> {
        require(resource_id, "resource_id")?;
        require(table_name, "table_name")?;

        let params = FormParams::new()
            .text("table_name", table_name)
            .flag("clear_format", clear_format);
        let call = ApiCall::rpc(resource_id, "table.remove").form(params);
        response::decode_status(self.send(call).await?)
    }

    #[instrument(name = "Renaming table headers", skip(self, headers))]
    async fn rename_table_headers(
        &self,
        resource_id: &str,
        table_name: &str,
        headers: &[HeaderRename],
    ) -> Result<bool> {
        require(resource_id, "resource_id")?;
        require(table_name, "table_name")?;
        require_items(headers, "headers")?;

        let params = FormParams::new()
            .text("table_name", table_name)
            .json("data", headers)?;
        let call = ApiCall::rpc(resource_id, "table.header.rename").form(params);
        response::decode_status(self.send(call).await?)
    }

    #[instrument(name = "Fetching table records", skip(self, query))]
    async fn fetch_table_records(
        &self,
        resource_id: &str,
        table_name: &str,
        query: &TableRecordQuery,
    ) -> Result<Vec<SheetRecord>> {
        require(resource_id, "resource_id")?;
        require(table_name, "table_name")?;

        let params = FormParams::new()
            .text("table_name", table_name)
            .json("criteria_json", &query.criteria)?
            .text("criteria_pattern", query.criteria_pattern.as_str())
            .joined("column_names", &query.column_names)
            .text("render_option", query.render_option.as_str())
            .int("count", query.count.into())
            .flag("is_case_sensitive", query.is_case_sensitive);

        let call = ApiCall::rpc(resource_id, "table.records.fetch").form(params);
        response::decode_records(self.send(call).await?, true)
    }

    #[instrument(name = "Updating table records", skip(self, filter, data))]
    async fn update_table_records(
        &self,
        resource_id: &str,
        table_name: &str,
        filter: &TableRecordFilter,
        data: &Map<String, Value>,
    ) -> Result<u64> {
        require(resource_id, "resource_id")?;
        require(table_name, "table_name")?;
        require_items(&filter.criteria, "criteria")?;
        require_data(data)?;

        let params = FormParams::new()
            .text("table_name", table_name)
            .json("criteria_json", &filter.criteria)?
            .text("criteria_pattern", filter.criteria_pattern.as_str())
            .flag("is_case_sensitive", filter.is_case_sensitive)
            .json("data", data)?;

        let call = ApiCall::rpc(resource_id, "table.records.update").form(params);
        response::decode_affected_rows(self.send(call).await?)
    }

    #[instrument(name = "Deleting table records", skip(self, filter))]
    async fn delete_table_records(
        &self,
        resource_id: &str,
        table_name: &str,
        filter: &TableRecordFilter,
    ) -> Result<DeletedRows> {
        require(resource_id, "resource_id")?;
        require(table_name, "table_name")?;
        require_items(&filter.criteria, "criteria")?;

        let params = FormParams::new()
            .text("table_name", table_name)
            .json("criteria_json", &filter.criteria)?
            .text("criteria_pattern", filter.criteria_pattern.as_str())
            .flag("is_case_sensitive", filter.is_case_sensitive);

        let call = ApiCall::rpc(resource_id, "table.records.delete").form(params);
        response::decode_deleted_rows(self.send(call).await?)
    }

    #[instrument(name = "Inserting table columns", skip(self, column_names))]
    async fn insert_table_columns(
        &self,
        resource_id: &str,
        table_name: &str,
        column_names: &[String],
        insert_after: &str,
    ) -> Result<bool> {
        require(resource_id, "resource_id")?;
        require(table_name, "table_name")?;
        require_items(column_names, "column_names")?;
        require(insert_after, "insert_column_after")?;

        let params = FormParams::new()
            .text("table_name", table_name)
            .json("column_names", column_names)?
            .text("insert_column_after", insert_after);

        let call = ApiCall::rpc(resource_id, "table.columns.insert").form(params);
        response::decode_status(self.send(call).await?)
    }

    #[instrument(name = "Deleting table columns", skip(self, column_names))]
    async fn delete_table_columns(
        &self,
        resource_id: &str,
        table_name: &str,
        column_names: &[String],
    ) -> Result<bool> {
        require(resource_id, "resource_id")?;
        require(table_name, "table_name")?;
        require_items(column_names, "column_names")?;

        let params = FormParams::new()
            .text("table_name", table_name)
            .json("column_names", column_names)?;

        let call = ApiCall::rpc(resource_id, "table.columns.delete").form(params);
        response::decode_status(self.send(call).await?)
    }

    #[instrument(name = "Fetching worksheet records", skip(self, query))]
    async fn fetch_worksheet_records(
        &self,
        resource_id: &str,
        worksheet_name: &str,
        query: &WorksheetRecordQuery,
    ) -> Result<Vec<SheetRecord>> {
        require(resource_id, "resource_id")?;
        require(worksheet_name, "worksheet_name")?;

        let params = FormParams::new()
            .text("worksheet_name", worksheet_name)
            .int("header_row", query.header_row.into())
            .text_opt("criteria", query.criteria.as_deref())
            .joined("column_names", &query.column_names)
            .text("render_option", query.render_option.as_str())
            .int("records_start_index", query.records_start_index.into())
            .int("count", query.count.into())
            .flag("is_case_sensitive", query.is_case_sensitive);

        let call = ApiCall::rpc(resource_id, "worksheet.records.fetch").form(params);
        response::decode_records(self.send(call).await?, false)
    }

    #[instrument(name = "Adding worksheet records", skip(self, records), fields(count = records.len()))]
    async fn add_worksheet_records(
        &self,
        resource_id: &str,
        worksheet_name: &str,
        records: &[Map<String, Value>],
        header_row: u32,
    ) -> Result<bool> {
        require(resource_id, "resource_id")?;
        require(worksheet_name, "worksheet_name")?;
        require_items(records, "records")?;

        let params = FormParams::new()
            .text("worksheet_name", worksheet_name)
            .int("header_row", header_row.into())
            .json("json_data", records)?;

        let call = ApiCall::rpc(resource_id, "worksheet.records.add").form(params);
        response::decode_status(self.send(call).await?)
    }

    #[instrument(name = "Updating worksheet records", skip(self, update))]
    async fn update_worksheet_records(
        &self,
        resource_id: &str,
        worksheet_name: &str,
        update: &WorksheetRecordUpdate,
    ) -> Result<u64> {
        require(resource_id, "resource_id")?;
        require(worksheet_name, "worksheet_name")?;
        require_data(&update.data)?;

        let params = FormParams::new()
            .text("worksheet_name", worksheet_name)
            .int("header_row", update.header_row.into())
            .text("criteria", update.criteria.as_str())
            .flag("is_case_sensitive", update.is_case_sensitive)
            .json("data", &update.data)?;

        let call = ApiCall::rpc(resource_id, "worksheet.records.update").form(params);
        response::decode_affected_rows(self.send(call).await?)
    }

    #[instrument(name = "Deleting worksheet records", skip(self, deletion))]
    async fn delete_worksheet_records(
        &self,
        resource_id: &str,
        worksheet_name: &str,
        deletion: &WorksheetRecordDeletion,
    ) -> Result<DeletedRows> {
        require(resource_id, "resource_id")?;
        require(worksheet_name, "worksheet_name")?;

        let mut params = FormParams::new()
            .text("worksheet_name", worksheet_name)
            .int("header_row", deletion.header_row.into())
            .text_opt("criteria", deletion.criteria.as_deref());
        if !deletion.row_array.is_empty() {
            params = params.json("row_array", &deletion.row_array)?;
        }
        let params = params.flag("delete_rows", deletion.delete_rows);

        let call = ApiCall::rpc(resource_id, "worksheet.records.delete").form(params);
        response::decode_deleted_rows(self.send(call).await?)
    }

    #[instrument(name = "Inserting worksheet columns", skip(self, column_names))]
    async fn insert_worksheet_columns(
        &self,
        resource_id: &str,
        worksheet_name: &str,
        insert_after: &str,
        column_names: &[String],
    ) -> Result<bool> {
        require(resource_id, "resource_id")?;
        require(worksheet_name, "worksheet_name")?;
        require(insert_after, "insert_column_after")?;
        require_items(column_names, "column_names")?;

        let params = FormParams::new()
            .text("worksheet_name", worksheet_name)
            .text("insert_column_after", insert_after)
            .json("column_names", column_names)?;

        let call = ApiCall::rpc(resource_id, "records.columns.insert").form(params);
        response::decode_status(self.send(call).await?)
    }
}
