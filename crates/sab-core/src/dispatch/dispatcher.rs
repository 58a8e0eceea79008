use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    api::{ApiFailure, CommerceApi, NewCoupon},
    config::Config,
    domain::{ShopId, UserId},
    errors::Error,
    formatting::{
        balances_document, coupon_created_document, coupon_deleted_document, coupons_document,
        group_document, groups_document, invoice_document, price_updated_document,
        product_deleted_document, product_document, product_page_document,
        role_claimed_document, shop_documents, DisplayDocument,
    },
};

use super::{
    command::{Command, CommandRequest},
    ports::{GuildRoles, Interaction},
};

const ROLE_GRANT_FAILED: &str =
    "I could not assign the role. Please check my permissions and role hierarchy.";

/// The subset of [`Config`] that shapes command handling.
#[derive(Clone, Debug)]
pub struct DispatchSettings {
    pub shop_id: ShopId,
    pub products_page_limit: u32,
    pub embed_color: u32,
    pub customer_role_name: String,
    pub verify_claim_orders: bool,
}

impl DispatchSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            shop_id: cfg.shop_id.clone(),
            products_page_limit: cfg.products_page_limit,
            embed_color: cfg.embed_color,
            customer_role_name: cfg.customer_role_name.clone(),
            verify_claim_orders: cfg.verify_claim_orders,
        }
    }
}

enum Reply {
    Documents(Vec<DisplayDocument>),
    Ephemeral(String),
}

impl Reply {
    fn document(doc: DisplayDocument) -> Self {
        Reply::Documents(vec![doc])
    }

    fn failure(context: &str, failure: &ApiFailure) -> Self {
        warn!(kind = ?failure.kind, message = %failure.message, "{context} failed");
        Reply::Ephemeral(format!("❌ Error {context}: {}", failure.message))
    }
}

/// Stateless per invocation; one instance serves every interaction.
pub struct Dispatcher {
    api: Arc<dyn CommerceApi>,
    settings: DispatchSettings,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn CommerceApi>, settings: DispatchSettings) -> Self {
        Self { api, settings }
    }

    /// Handle one invocation end to end. Never fails: every outcome becomes a
    /// reply, and delivery errors are logged.
    ///
    /// `guild` is `None` outside a server (direct messages).
    pub async fn handle(
        &self,
        request: &CommandRequest,
        interaction: &dyn Interaction,
        guild: Option<&dyn GuildRoles>,
    ) {
        let command = match Command::parse(request) {
            Ok(c) => c,
            Err(e) => {
                warn!(command = %request.name, error = %e, "rejected invocation");
                self.deliver(interaction, Reply::Ephemeral(format!("❌ {}", user_message(&e))))
                    .await;
                return;
            }
        };

        let user = interaction.invoker();
        if command.requires_manage() && !interaction.invoker_can_manage() {
            warn!(
                command = command.name(),
                user = %user,
                "refused shop mutation without manage permission"
            );
            self.deliver(
                interaction,
                Reply::Ephemeral(
                    "❌ You need the Manage Server permission to use this command.".to_string(),
                ),
            )
            .await;
            return;
        }

        info!(command = command.name(), user = %user, "handling command");

        if let Err(e) = interaction.defer().await {
            error!(command = command.name(), error = %e, "failed to acknowledge interaction");
            return;
        }

        let reply = self.execute(command, user, guild).await;
        self.deliver(interaction, reply).await;
    }

    async fn deliver(&self, interaction: &dyn Interaction, reply: Reply) {
        let result = match reply {
            Reply::Documents(mut docs) => {
                for doc in &mut docs {
                    doc.color = self.settings.embed_color;
                }
                interaction.reply_documents(docs).await
            }
            Reply::Ephemeral(text) => interaction.reply_ephemeral(&text).await,
        };
        if let Err(e) = result {
            error!(error = %e, "failed to deliver reply");
        }
    }

    async fn execute(
        &self,
        command: Command,
        user: UserId,
        guild: Option<&dyn GuildRoles>,
    ) -> Reply {
        let api = self.api.as_ref();
        let shop = &self.settings.shop_id;

        match command {
            Command::GetInvoice { invoice_id } => match api.get_invoice(shop, &invoice_id).await {
                Ok(invoice) => Reply::document(invoice_document(&invoice)),
                Err(f) => Reply::failure("fetching invoice", &f),
            },
            Command::ShopInfo => match api.get_shop_info(shop).await {
                Ok(info) => Reply::Documents(shop_documents(&info)),
                Err(f) => Reply::failure("fetching shop information", &f),
            },
            Command::Balances => match api.get_payout_balances(shop).await {
                Ok(balances) => Reply::document(balances_document(&balances)),
                Err(f) => Reply::failure("fetching balances", &f),
            },
            Command::Groups => match api.get_groups(shop).await {
                Ok(groups) => Reply::document(groups_document(&groups)),
                Err(f) => Reply::failure("fetching groups", &f),
            },
            Command::Coupons => match api.get_coupons(shop).await {
                Ok(coupons) => Reply::document(coupons_document(&coupons)),
                Err(f) => Reply::failure("fetching coupons", &f),
            },
            Command::ClaimRole { order_id } => self.claim_role(&order_id, user, guild).await,
            Command::DeleteCoupon { coupon_id } => {
                match api.delete_coupon(shop, &coupon_id).await {
                    Ok(()) => Reply::document(coupon_deleted_document(&coupon_id)),
                    Err(f) => Reply::failure("deleting coupon", &f),
                }
            }
            Command::Products { page } => {
                match api
                    .get_products(shop, page, self.settings.products_page_limit)
                    .await
                {
                    Ok(listing) if listing.data.is_none() => Reply::Ephemeral(
                        "No products found or invalid response structure.".to_string(),
                    ),
                    Ok(listing) => Reply::document(product_page_document(&listing, page)),
                    Err(f) => Reply::failure("fetching products", &f),
                }
            }
            Command::Product { product_id } => {
                match api.get_product_details(shop, &product_id).await {
                    Ok(Some(product)) => Reply::document(product_document(&product)),
                    Ok(None) => Reply::failure(
                        "fetching product",
                        &ApiFailure::not_found(
                            "Product not found. Please check the ID and try again.",
                        ),
                    ),
                    Err(f) => Reply::failure("fetching product", &f),
                }
            }
            Command::Group { group_id } => match api.get_group(shop, &group_id).await {
                Ok(group) if group.id.is_none() => Reply::failure(
                    "fetching group",
                    &ApiFailure::validation("Invalid group data received."),
                ),
                Ok(group) => Reply::document(group_document(&group)),
                Err(f) => Reply::failure("fetching group", &f),
            },
            Command::CreateCoupon {
                shop_id,
                code,
                discount,
                kind,
                global,
            } => {
                if shop_id != shop.0 {
                    warn!(requested = %shop_id, configured = %shop, "coupon for foreign shop");
                    return Reply::Ephemeral(format!(
                        "❌ This bot manages shop `{shop}` only; coupons for other shops cannot be created here."
                    ));
                }
                let coupon = NewCoupon {
                    discount,
                    code,
                    global: global.unwrap_or(false),
                    kind,
                };
                match api.create_coupon(shop, &coupon).await {
                    Ok(created) => Reply::document(coupon_created_document(&created)),
                    Err(f) => Reply::failure("creating coupon", &f),
                }
            }
            Command::DeleteProduct { product_id } => {
                match api.delete_product(shop, &product_id).await {
                    Ok(()) => Reply::document(product_deleted_document(&product_id)),
                    Err(f) => Reply::failure("deleting product", &f),
                }
            }
            Command::EditPrice { product_id, price } => {
                match api.edit_product_price(shop, &product_id, price).await {
                    Ok(update) => Reply::document(price_updated_document(&product_id, &update)),
                    Err(f) => Reply::failure("updating product price", &f),
                }
            }
        }
    }

    async fn claim_role(
        &self,
        order_id: &str,
        user: UserId,
        guild: Option<&dyn GuildRoles>,
    ) -> Reply {
        let Some(guild) = guild else {
            return Reply::Ephemeral("This command can only be used inside a server.".to_string());
        };
        let role_name = &self.settings.customer_role_name;

        let role = match guild.find_role(role_name).await {
            Ok(Some(role)) => role,
            Ok(None) => {
                return Reply::Ephemeral(format!("The role \"{role_name}\" does not exist."))
            }
            Err(e) => {
                warn!(error = %e, "role lookup failed");
                return Reply::Ephemeral(ROLE_GRANT_FAILED.to_string());
            }
        };

        match guild.member_has_role(role).await {
            Ok(true) => return Reply::Ephemeral(format!("You already have the {role_name} role.")),
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "member role check failed");
                return Reply::Ephemeral(ROLE_GRANT_FAILED.to_string());
            }
        }

        if self.settings.verify_claim_orders {
            if let Some(refusal) = self.verify_order(order_id, user).await {
                return refusal;
            }
        }

        match guild.grant_role(role).await {
            Ok(()) => {
                info!(user = %user, order_id, role = %role_name, "role granted");
                Reply::document(role_claimed_document(role_name))
            }
            Err(e) => {
                warn!(user = %user, error = %e, "role grant failed");
                Reply::Ephemeral(ROLE_GRANT_FAILED.to_string())
            }
        }
    }

    /// `None` when the order is completed and linked to `user`.
    async fn verify_order(&self, order_id: &str, user: UserId) -> Option<Reply> {
        let invoice = match self.api.get_invoice(&self.settings.shop_id, order_id).await {
            Ok(invoice) => invoice,
            Err(f) => return Some(Reply::failure("verifying order", &f)),
        };

        let completed = invoice
            .field("status")
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("completed"));
        if !completed {
            return Some(Reply::Ephemeral(format!(
                "Order `{order_id}` has not been completed yet."
            )));
        }

        match invoice.field("discord_user_id") {
            Some(owner) if owner.trim() == user.to_string() => None,
            _ => Some(Reply::Ephemeral(format!(
                "Order `{order_id}` is not linked to your Discord account."
            ))),
        }
    }
}

fn user_message(err: &Error) -> String {
    match err {
        Error::Validation(msg) => msg.clone(),
        other => other.to_string(),
    }
}
