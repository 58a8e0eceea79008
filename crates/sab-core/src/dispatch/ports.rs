use async_trait::async_trait;

use crate::{
    domain::{RoleId, UserId},
    formatting::DisplayDocument,
    Result,
};

/// One in-flight slash-command invocation.
///
/// Discord is the only implementation; the dispatcher only needs to
/// acknowledge, then answer once, either publicly or privately.
#[async_trait]
pub trait Interaction: Send + Sync {
    fn invoker(&self) -> UserId;

    /// Whether the invoker may run shop-mutating commands. False outside a
    /// guild.
    fn invoker_can_manage(&self) -> bool;

    /// Acknowledge within the platform deadline; the answer follows later.
    async fn defer(&self) -> Result<()>;

    /// Public answer. May span several messages when the documents exceed
    /// one message's limits.
    async fn reply_documents(&self, documents: Vec<DisplayDocument>) -> Result<()>;

    /// Private answer visible only to the invoker.
    async fn reply_ephemeral(&self, text: &str) -> Result<()>;
}

/// Role operations scoped to the guild and member of the current interaction.
#[async_trait]
pub trait GuildRoles: Send + Sync {
    async fn find_role(&self, name: &str) -> Result<Option<RoleId>>;
    async fn member_has_role(&self, role: RoleId) -> Result<bool>;
    async fn grant_role(&self, role: RoleId) -> Result<()>;
}
