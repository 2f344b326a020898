use clap::Subcommand;
use serde_json::Value;
use std::io;
use zoho_sheet::error::{Result, SheetError};
use zoho_sheet::models::{SheetRecord, TableRecordQuery, WorksheetRecordQuery};
use zoho_sheet::{SheetClient, SheetOperations};

#[derive(Subcommand, Debug)]
pub enum RecordsAction {
    /// Print records from a table or worksheet as CSV
    Fetch {
        resource_id: String,
        #[arg(long, conflicts_with = "worksheet", required_unless_present = "worksheet")]
        table: Option<String>,
        #[arg(long)]
        worksheet: Option<String>,
        /// Worksheet criteria, e.g. "Month"="March"
        #[arg(long, requires = "worksheet")]
        criteria: Option<String>,
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
        #[arg(long, default_value_t = 50)]
        count: u32,
    },
}

impl RecordsAction {
    pub async fn execute(&self, client: &SheetClient) -> Result<()> {
        match self {
            RecordsAction::Fetch {
                resource_id,
                table,
                worksheet,
                criteria,
                columns,
                count,
            } => {
                let records = match (table, worksheet) {
                    (Some(table), _) => {
                        let query = TableRecordQuery {
                            column_names: columns.clone(),
                            count: *count,
                            ..Default::default()
                        };
                        client.fetch_table_records(resource_id, table, &query).await?
                    }
                    (None, Some(worksheet)) => {
                        let query = WorksheetRecordQuery {
                            criteria: criteria.clone(),
                            column_names: columns.clone(),
                            count: *count,
                            ..Default::default()
                        };
                        client
                            .fetch_worksheet_records(resource_id, worksheet, &query)
                            .await?
                    }
                    (None, None) => {
                        return Err(SheetError::InvalidArgument(
                            "either --table or --worksheet is required".to_string(),
                        ));
                    }
                };
                write_csv(&records, io::stdout())
            }
        }
    }
}

/// Columns in first-seen order across all records.
fn headers(records: &[SheetRecord]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for column in record.data.keys() {
            if !headers.contains(column) {
                headers.push(column.clone());
            }
        }
    }
    headers
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn write_csv<W: io::Write>(records: &[SheetRecord], out: W) -> Result<()> {
    let columns = headers(records);
    let mut writer = csv::Writer::from_writer(out);

    let mut header_row = vec!["row_index".to_string()];
    header_row.extend(columns.iter().cloned());
    writer
        .write_record(&header_row)
        .map_err(anyhow::Error::from)?;

    for record in records {
        let mut row = vec![record.row_index.to_string()];
        row.extend(columns.iter().map(|c| cell(record.get(c))));
        writer.write_record(&row).map_err(anyhow::Error::from)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_csv_unions_columns() {
        let records = vec![
            SheetRecord::new(2).with("Month", "March").with("Amount", 40),
            SheetRecord::new(3).with("Month", "April").with("Note", Value::Null),
        ];

        let mut out = Vec::new();
        write_csv(&records, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "row_index,Month,Amount,Note\n2,March,40,\n3,April,,\n"
        );
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell(Some(&json!("a,b"))), "a,b");
        assert_eq!(cell(Some(&json!(true))), "true");
        assert_eq!(cell(None), "");
    }
}
