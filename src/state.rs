use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::feed::OrderFeed;
use crate::lifecycle::MarketplaceSystem;
use crate::media::MediaStore;
use crate::services::{AccountService, CatalogService, OrderService};

/// Router state shared by all handlers.
pub struct State {
    pub config: Config,
    pub tokens: TokenIssuer,
    pub accounts: AccountService,
    pub catalog: CatalogService,
    pub orders: OrderService,
}

pub type SharedState = Arc<State>;

impl State {
    /// Builds the services on top of a started system.
    pub fn new(config: Config, system: &MarketplaceSystem, media: MediaStore) -> SharedState {
        let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_ttl);
        let feed = OrderFeed::new();

        Arc::new(Self {
            accounts: AccountService::new(
                system.account_client.clone(),
                tokens.clone(),
                media.clone(),
            ),
            catalog: CatalogService::new(system.product_client.clone(), media),
            orders: OrderService::new(
                system.order_client.clone(),
                system.product_client.clone(),
                system.account_client.clone(),
                feed,
            ),
            tokens,
            config,
        })
    }
}

impl FromRef<SharedState> for TokenIssuer {
    fn from_ref(state: &SharedState) -> Self {
        state.tokens.clone()
    }
}
