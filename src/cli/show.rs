use clap::Subcommand;
use tracing::info;
use zoho_sheet::Config;
use zoho_sheet::error::Result;

#[derive(Subcommand, Debug)]
pub enum ShowResource {
    /// Show the config file path
    Paths,
    /// Show the data center and API root in use
    Endpoints,
}

impl ShowResource {
    pub async fn execute(&self) -> Result<()> {
        match self {
            ShowResource::Paths => show_paths(),
            ShowResource::Endpoints => show_endpoints(),
        }
    }
}

fn show_paths() -> Result<()> {
    let config_path = Config::config_file()?;

    info!(path = ?config_path, "Config path");

    Ok(())
}

fn show_endpoints() -> Result<()> {
    let config = Config::load()?;

    info!(data_center = config.zoho.data_center(), "Data center");
    info!(url = config.zoho.api_base_url(), "API root");
    info!(url = config.zoho.token_url(), "Token endpoint");

    Ok(())
}
