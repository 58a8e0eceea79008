use std::sync::Arc;

use async_trait::async_trait;
use serenity::{
    client::{Client, Context, EventHandler},
    model::{
        application::{Command, Interaction},
        gateway::{GatewayIntents, Ready},
        id::ApplicationId,
    },
};
use tracing::{error, info, warn};

use sab_core::{
    config::Config,
    dispatch::{Dispatcher, GuildRoles},
};

use crate::{commands, DiscordGuild, SlashInteraction};

struct Handler {
    dispatcher: Arc<Dispatcher>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "connected to Discord");

        match Command::set_global_commands(&ctx.http, commands::registrations()).await {
            Ok(registered) => info!(count = registered.len(), "registered slash commands"),
            Err(e) => error!(error = %e, "failed to register slash commands"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let request = commands::to_request(&command);
        let guild = DiscordGuild::from_interaction(ctx.http.clone(), &command);
        let reply = SlashInteraction::new(ctx.http.clone(), command);

        self.dispatcher
            .handle(
                &request,
                &reply,
                guild.as_ref().map(|g| g as &dyn GuildRoles),
            )
            .await;
    }
}

/// Connect to the gateway and serve interactions until Ctrl-C / SIGTERM.
pub async fn run(cfg: &Config, dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
    // Slash commands arrive as interactions; no privileged intents are needed.
    let mut client = Client::builder(&cfg.discord_token, GatewayIntents::GUILDS)
        .application_id(ApplicationId::new(cfg.application_id))
        .event_handler(Handler { dispatcher })
        .await?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutting down");
        shard_manager.shutdown_all().await;
    });

    if let Err(e) = client.start().await {
        error!(error = %e, "discord client error");
        anyhow::bail!("discord client error: {e}");
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
