mod auth;
mod records;
mod sheets;
mod show;
mod tables;
mod workbooks;

use clap::{Parser, Subcommand};
use std::sync::Arc;
use zoho_sheet::error::Result;
use zoho_sheet::zoho::ReqwestTransport;
use zoho_sheet::{Config, SheetClient, TokenAuthority};

pub use auth::AuthAction;
pub use records::RecordsAction;
pub use sheets::SheetsAction;
pub use show::ShowResource;
pub use tables::TablesAction;
pub use workbooks::WorkbooksAction;

#[derive(Parser, Debug)]
#[command(name = "zoho-sheet")]
#[command(about = "Manage Zoho Sheet workbooks, worksheets and records", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Auth { action } => action.execute().await,
            Commands::Show { resource } => resource.execute().await,
            Commands::Workbooks { action } => action.execute(&connect()?).await,
            Commands::Sheets { action } => action.execute(&connect()?).await,
            Commands::Tables { action } => action.execute(&connect()?).await,
            Commands::Records { action } => action.execute(&connect()?).await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authorize this client against a Zoho account
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
    Workbooks {
        #[command(subcommand)]
        action: WorkbooksAction,
    },
    /// Worksheets inside a workbook
    Sheets {
        #[command(subcommand)]
        action: SheetsAction,
    },
    Tables {
        #[command(subcommand)]
        action: TablesAction,
    },
    Records {
        #[command(subcommand)]
        action: RecordsAction,
    },
}

pub(crate) fn authority(config: Config) -> Result<Arc<TokenAuthority>> {
    let transport = Arc::new(ReqwestTransport::new()?);
    Ok(Arc::new(TokenAuthority::new(config.zoho, transport)))
}

fn connect() -> Result<SheetClient> {
    let config = Config::load()?;
    SheetClient::from_authority(authority(config)?)
}
