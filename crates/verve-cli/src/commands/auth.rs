//! Google Calendar connection commands.

use clap::Subcommand;
use verve_core::google::oauth;
use verve_core::OAuthConfig;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Connect a Google account (opens the browser for consent)
    Login {
        /// Use a pre-obtained access token instead of the browser flow
        #[arg(long)]
        token: Option<String>,
    },
    /// Disconnect and forget the stored token
    Logout,
    /// Show the connection status
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut engine, config) = super::open_engine()?;

    match action {
        AuthAction::Login { token } => {
            let rt = super::runtime()?;
            let token = match token {
                Some(token) => token,
                None => {
                    let oauth_config = OAuthConfig::google(
                        &config.google.client_id,
                        &config.google.client_secret,
                        config.google.redirect_port,
                    );
                    rt.block_on(oauth::authorize(&oauth_config))?
                }
            };
            let mut store = super::load_store_lossy(&engine);
            let report = rt.block_on(engine.connect(&mut store, token))?;
            println!("Google Calendar connected");
            super::print_report(&report);
        }
        AuthAction::Logout => {
            engine.disconnect()?;
            println!("Google Calendar disconnected");
        }
        AuthAction::Status => {
            println!(
                "{}",
                if engine.stored_token()?.is_some() {
                    "connected"
                } else {
                    "not connected"
                }
            );
        }
    }
    Ok(())
}
