use clap::Subcommand;
use dialoguer::Confirm;
use tracing::info;
use zoho_sheet::error::Result;
use zoho_sheet::models::WorkbookListOptions;
use zoho_sheet::{SheetClient, SheetOperations};

#[derive(Subcommand, Debug)]
pub enum WorkbooksAction {
    List {
        #[arg(long, default_value_t = 1)]
        start_index: u32,
        #[arg(long, default_value_t = 50)]
        count: u32,
        #[arg(long, default_value = "recently_modified")]
        sort: String,
    },
    Create {
        name: String,
    },
    Delete {
        workbook_id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

impl WorkbooksAction {
    pub async fn execute(&self, client: &SheetClient) -> Result<()> {
        match self {
            WorkbooksAction::List {
                start_index,
                count,
                sort,
            } => {
                let options = WorkbookListOptions {
                    start_index: *start_index,
                    count: *count,
                    sort_option: sort.clone(),
                };
                for workbook in client.list_workbooks(&options).await? {
                    println!("{}\t{}", workbook.id, workbook.name);
                }
            }
            WorkbooksAction::Create { name } => {
                let workbook = client.create_workbook(name).await?;
                info!(id = workbook.id, url = ?workbook.url, "Workbook created");
            }
            WorkbooksAction::Delete { workbook_id, yes } => {
                let confirmed = *yes
                    || Confirm::new()
                        .with_prompt(format!("Delete workbook {}?", workbook_id))
                        .default(false)
                        .interact()
                        .map_err(anyhow::Error::from)?;
                if confirmed {
                    client.delete_workbook(workbook_id).await?;
                    info!(id = workbook_id, "Workbook deleted");
                }
            }
        }
        Ok(())
    }
}
