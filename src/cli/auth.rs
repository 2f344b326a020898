use super::authority;
use clap::Subcommand;
use dialoguer::Confirm;
use tracing::info;
use zoho_sheet::error::{Result, SheetError};
use zoho_sheet::Config;

#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Run the device authorization flow and store the refresh token
    Login,
    /// Check that the stored credentials yield an access token
    Verify,
}

impl AuthAction {
    pub async fn execute(&self) -> Result<()> {
        match self {
            AuthAction::Login => login().await,
            AuthAction::Verify => verify().await,
        }
    }
}

async fn login() -> Result<()> {
    let mut config = Config::load()?;
    config.zoho.refresh_token = None;
    let authority = authority(config.clone())?;

    let device = authority.begin_device_authorization().await?;
    println!("Visit {} and enter the code {}", device.verification_url, device.user_code);
    println!("The code expires in {} seconds.", device.expires_in);
    println!();

    let approved = Confirm::new()
        .with_prompt("Have you approved access?")
        .default(true)
        .interact()
        .map_err(anyhow::Error::from)?;
    if !approved {
        return Err(SheetError::AuthConfiguration(
            "device authorization was not approved".to_string(),
        ));
    }

    authority.use_device_code(device.device_code);
    authority.get_access_token().await?;

    config.zoho.refresh_token = authority.get_refresh_token();
    config.zoho.device_code = None;
    config.save()?;

    info!(path = ?Config::config_file()?, "Refresh token saved");

    Ok(())
}

async fn verify() -> Result<()> {
    let authority = authority(Config::load()?)?;
    authority.get_access_token().await?;

    info!("Zoho authentication verified");

    Ok(())
}
