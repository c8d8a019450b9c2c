use crate::clients::{AccountClient, CounterClient, OrderClient, ProductClient};
use crate::media::MediaStore;
use crate::model::ORDER_COUNTER;
use crate::order_actor::OrderContext;
use crate::counter_actor::CounterError;
use tracing::{error, info};

/// Starts the four resource actors and hands out their clients.
///
/// # Wiring
///
/// - **Account** and **Product** actors get the [`MediaStore`] so their hooks
///   can delete replaced or orphaned files.
/// - **Counter** has no dependencies.
/// - **Order** gets an [`OrderContext`] with the product and counter clients
///   and the id of the `orders` counter, which is created before the order
///   actor starts.
///
/// # Example
///
/// ```ignore
/// let system = MarketplaceSystem::start(MediaStore::new("uploads")).await?;
/// let vendor_id = system.account_client.create_account(vendor).await?;
/// system.shutdown().await?;
/// ```
pub struct MarketplaceSystem {
    pub account_client: AccountClient,
    pub product_client: ProductClient,
    pub order_client: OrderClient,
    pub counter_client: CounterClient,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl MarketplaceSystem {
    pub async fn start(media: MediaStore) -> Result<Self, CounterError> {
        let (account_actor, account_client) = crate::account_actor::new();
        let (product_actor, product_client) = crate::product_actor::new();
        let (counter_actor, counter_client) = crate::counter_actor::new();
        let (order_actor, order_client) = crate::order_actor::new();

        let account_handle = tokio::spawn(account_actor.run(media.clone()));
        let product_handle = tokio::spawn(product_actor.run(media));
        let counter_handle = tokio::spawn(counter_actor.run(()));

        let counter_id = counter_client.create_counter(ORDER_COUNTER).await?;
        let order_handle = tokio::spawn(order_actor.run(OrderContext {
            products: product_client.clone(),
            counters: counter_client.clone(),
            counter_id,
        }));

        info!("Marketplace actors started");
        Ok(Self {
            account_client,
            product_client,
            order_client,
            counter_client,
            handles: vec![account_handle, product_handle, counter_handle, order_handle],
        })
    }

    /// Drops every client handed out by the system and waits for the actors
    /// to drain.
    ///
    /// An actor only stops once all clones of its client are gone, so callers
    /// must drop the clones they hold (services, router state) first. The
    /// order actor holds product and counter clients in its context; those
    /// actors stop after it does.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.order_client);
        drop(self.account_client);
        drop(self.product_client);
        drop(self.counter_client);

        // Order first: it owns the last product and counter clients
        for handle in self.handles.into_iter().rev() {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
