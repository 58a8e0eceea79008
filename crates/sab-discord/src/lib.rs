//! Discord adapter (serenity).
//!
//! This crate implements the `sab-core` interaction and guild-role ports over
//! Discord slash-command interactions.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use serenity::{
    builder::{
        CreateInteractionResponse, CreateInteractionResponseFollowup,
        CreateInteractionResponseMessage, EditInteractionResponse,
    },
    http::Http,
    model::{application::CommandInteraction, id, permissions::Permissions},
};

pub mod commands;
pub mod render;
pub mod router;

pub use router::run;

use sab_core::{
    dispatch::{GuildRoles, Interaction},
    domain::{RoleId, UserId},
    errors::Error,
    formatting::{batch_documents, DisplayDocument},
    Result,
};

fn map_err(e: serenity::Error) -> Error {
    Error::External(format!("discord error: {e}"))
}

/// Permission that gates shop-mutating commands, also registered as their
/// default member permission.
pub const MANAGE_PERMISSION: Permissions = Permissions::MANAGE_GUILD;

/// Resolved member permissions only arrive on guild interactions.
fn can_manage(permissions: Option<Permissions>) -> bool {
    permissions.is_some_and(|p| p.intersects(Permissions::ADMINISTRATOR | MANAGE_PERMISSION))
}

/// One slash-command invocation.
///
/// Tracks whether the interaction has been deferred, which decides how the
/// answer is delivered.
pub struct SlashInteraction {
    http: Arc<Http>,
    command: CommandInteraction,
    deferred: AtomicBool,
}

impl SlashInteraction {
    pub fn new(http: Arc<Http>, command: CommandInteraction) -> Self {
        Self {
            http,
            command,
            deferred: AtomicBool::new(false),
        }
    }

    fn is_deferred(&self) -> bool {
        self.deferred.load(Ordering::Acquire)
    }
}

#[async_trait]
impl Interaction for SlashInteraction {
    fn invoker(&self) -> UserId {
        UserId(self.command.user.id.get())
    }

    fn invoker_can_manage(&self) -> bool {
        can_manage(self.command.member.as_ref().and_then(|m| m.permissions))
    }

    async fn defer(&self) -> Result<()> {
        self.command.defer(&self.http).await.map_err(map_err)?;
        self.deferred.store(true, Ordering::Release);
        Ok(())
    }

    async fn reply_documents(&self, documents: Vec<DisplayDocument>) -> Result<()> {
        let mut batches = batch_documents(documents).into_iter();
        let Some(first) = batches.next() else {
            return self.reply_ephemeral("Nothing to show.").await;
        };

        let first = render::embeds(&first);
        if self.is_deferred() {
            self.command
                .edit_response(&self.http, EditInteractionResponse::new().embeds(first))
                .await
                .map_err(map_err)?;
        } else {
            self.command
                .create_response(
                    &self.http,
                    CreateInteractionResponse::Message(
                        CreateInteractionResponseMessage::new().embeds(first),
                    ),
                )
                .await
                .map_err(map_err)?;
        }

        for batch in batches {
            self.command
                .create_followup(
                    &self.http,
                    CreateInteractionResponseFollowup::new().embeds(render::embeds(&batch)),
                )
                .await
                .map_err(map_err)?;
        }
        Ok(())
    }

    async fn reply_ephemeral(&self, text: &str) -> Result<()> {
        if !self.is_deferred() {
            return self
                .command
                .create_response(
                    &self.http,
                    CreateInteractionResponse::Message(
                        CreateInteractionResponseMessage::new()
                            .content(text)
                            .ephemeral(true),
                    ),
                )
                .await
                .map_err(map_err);
        }

        // The deferred placeholder is public; replace it with a private follow-up.
        self.command
            .delete_response(&self.http)
            .await
            .map_err(map_err)?;
        self.command
            .create_followup(
                &self.http,
                CreateInteractionResponseFollowup::new()
                    .content(text)
                    .ephemeral(true),
            )
            .await
            .map_err(map_err)?;
        Ok(())
    }
}

/// Role access for the invoking member's guild.
pub struct DiscordGuild {
    http: Arc<Http>,
    guild_id: id::GuildId,
    user_id: id::UserId,
    member_roles: Vec<id::RoleId>,
}

impl DiscordGuild {
    /// `None` for interactions outside a guild.
    pub fn from_interaction(http: Arc<Http>, command: &CommandInteraction) -> Option<Self> {
        let guild_id = command.guild_id?;
        let member = command.member.as_ref()?;
        Some(Self {
            http,
            guild_id,
            user_id: command.user.id,
            member_roles: member.roles.clone(),
        })
    }
}

#[async_trait]
impl GuildRoles for DiscordGuild {
    async fn find_role(&self, name: &str) -> Result<Option<RoleId>> {
        let roles = self.guild_id.roles(&self.http).await.map_err(map_err)?;
        Ok(roles
            .values()
            .find(|r| r.name == name)
            .map(|r| RoleId(r.id.get())))
    }

    async fn member_has_role(&self, role: RoleId) -> Result<bool> {
        Ok(self.member_roles.iter().any(|r| r.get() == role.0))
    }

    async fn grant_role(&self, role: RoleId) -> Result<()> {
        self.http
            .add_member_role(
                self.guild_id,
                self.user_id,
                id::RoleId::new(role.0),
                Some("Customer role claim"),
            )
            .await
            .map_err(map_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manage_requires_guild_permission() {
        assert!(!can_manage(None));
        assert!(!can_manage(Some(Permissions::empty())));
        assert!(!can_manage(Some(
            Permissions::SEND_MESSAGES | Permissions::MANAGE_MESSAGES
        )));
        assert!(can_manage(Some(Permissions::MANAGE_GUILD)));
        assert!(can_manage(Some(Permissions::ADMINISTRATOR)));
    }
}
