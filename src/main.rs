mod booking;
mod config;
mod models;

use anyhow::Result;
use booking::session::SessionDriver;
use config::BotConfig;
use dotenv::dotenv;
use models::credential::read_credentials;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv().ok();

    let config = BotConfig::from_env();
    let credentials = read_credentials(&config.credentials_path)?;
    if credentials.is_empty() {
        warn!("no credentials found in {}, nothing to do", config.credentials_path);
        return Ok(());
    }
    info!("starting {} booking session(s)", credentials.len());

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received, shutting down all sessions");
                shutdown.cancel();
            }
        });
    }

    let mut sessions = JoinSet::new();
    for credential in credentials {
        let driver = SessionDriver::new(credential, config.clone());
        let shutdown = shutdown.clone();
        sessions.spawn(async move { driver.run(shutdown).await });
    }

    while let Some(joined) = sessions.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("session ended with error: {e:#}"),
            Err(e) => error!("session task panicked: {e}"),
        }
    }

    info!("all sessions finished");
    Ok(())
}
