use std::sync::Arc;

use sab_core::{
    config::Config,
    dispatch::{DispatchSettings, Dispatcher},
};
use sab_sellauth::SellAuthClient;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), sab_core::Error> {
    sab_core::logging::init("sab")?;

    let cfg = Config::load()?;
    info!(shop = %cfg.shop_id, base_url = %cfg.sellauth_base_url, "starting SellAuth bot");

    let api = Arc::new(SellAuthClient::new(
        cfg.sellauth_base_url.clone(),
        cfg.sellauth_api_key.clone(),
        cfg.http_timeout,
    )?);
    let dispatcher = Arc::new(Dispatcher::new(api, DispatchSettings::from_config(&cfg)));

    sab_discord::run(&cfg, dispatcher)
        .await
        .map_err(|e| sab_core::Error::External(format!("discord bot failed: {e}")))?;

    Ok(())
}
