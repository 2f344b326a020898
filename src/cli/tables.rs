use clap::Subcommand;
use zoho_sheet::error::Result;
use zoho_sheet::{SheetClient, SheetOperations};

#[derive(Subcommand, Debug)]
pub enum TablesAction {
    List { resource_id: String },
}

impl TablesAction {
    pub async fn execute(&self, client: &SheetClient) -> Result<()> {
        match self {
            TablesAction::List { resource_id } => {
                for table in client.list_tables(resource_id).await? {
                    println!(
                        "{}\t{}\tR{}C{}:R{}C{}",
                        table.table_id,
                        table.table_name,
                        table.start_row,
                        table.start_column,
                        table.end_row,
                        table.end_column
                    );
                }
            }
        }
        Ok(())
    }
}
