use clap::Subcommand;
use tracing::info;
use zoho_sheet::error::Result;
use zoho_sheet::{SheetClient, SheetOperations};

#[derive(Subcommand, Debug)]
pub enum SheetsAction {
    List {
        workbook_id: String,
    },
    Create {
        workbook_id: String,
        name: String,
    },
    Rename {
        workbook_id: String,
        old_name: String,
        new_name: String,
    },
    Delete {
        workbook_id: String,
        name: String,
    },
}

impl SheetsAction {
    pub async fn execute(&self, client: &SheetClient) -> Result<()> {
        match self {
            SheetsAction::List { workbook_id } => {
                for sheet in client.list_worksheets(workbook_id).await? {
                    println!("{}\t{}", sheet.id, sheet.name);
                }
            }
            SheetsAction::Create { workbook_id, name } => {
                let sheet = client.create_worksheet(workbook_id, name).await?;
                info!(id = sheet.id, name = sheet.name, "Worksheet created");
            }
            SheetsAction::Rename {
                workbook_id,
                old_name,
                new_name,
            } => {
                client
                    .rename_worksheet(workbook_id, old_name, new_name)
                    .await?;
                info!(from = old_name, to = new_name, "Worksheet renamed");
            }
            SheetsAction::Delete { workbook_id, name } => {
                client.delete_worksheet(workbook_id, name).await?;
                info!(name, "Worksheet deleted");
            }
        }
        Ok(())
    }
}
