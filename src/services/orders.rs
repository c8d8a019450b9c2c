//! # Order Service
//!
//! Public order placement, role-scoped listing, status changes and the
//! per-order feed. Every change is published to the [`OrderFeed`].
//!
//! Who sees what:
//!
//! | Role | Listing | Status | Delete | Feed |
//! |---|---|---|---|---|
//! | admin | all orders | yes | yes | yes |
//! | vendor | orders placed with them | own orders | no | own orders |
//! | customer | orders they placed | no | no | orders they placed |

use crate::auth::can_mutate;
use crate::clients::{AccountClient, OrderClient, ProductClient};
use crate::error::AppError;
use crate::feed::{FeedEntry, FeedEvent, OrderFeed, Subscription};
use crate::model::{
    Account, AccountId, Order, OrderCreate, OrderId, OrderStatus, OrderView, Principal, Product,
    ProductId, ProductSummary, Role, VendorSummary,
};
use chrono::NaiveDate;
use resource_actor::{ActorClient, Filter};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{info, instrument};

/// Query parameters accepted by the order listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilters {
    /// Case-insensitive substring of the product's vendor name.
    pub vendor_name: Option<String>,
    /// First calendar day (UTC, `YYYY-MM-DD`), inclusive.
    pub start_date: Option<String>,
    /// Last calendar day (UTC, `YYYY-MM-DD`), inclusive.
    pub end_date: Option<String>,
    /// Substring of the contact phone.
    pub phone: Option<String>,
}

/// Body of a new order.
///
/// The storefront sends `product`, `vendor` and `selectedImage`; the
/// `productId`, `vendorId` and `image` spellings are accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    #[serde(alias = "product")]
    pub product_id: ProductId,
    #[serde(alias = "vendor")]
    pub vendor_id: AccountId,
    pub quantity: i64,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(alias = "selectedImage")]
    pub image: Option<String>,
}

/// [`OrderFilters`] with dates parsed and blank values dropped.
#[derive(Debug, Default)]
struct OrderQuery {
    vendor_name: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    phone: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_day(value: Option<String>, name: &str) -> Result<Option<NaiveDate>, AppError> {
    present(value)
        .map(|day| {
            NaiveDate::parse_from_str(&day, "%Y-%m-%d").map_err(|_| {
                AppError::Validation(format!("{name} must be a date formatted YYYY-MM-DD"))
            })
        })
        .transpose()
}

impl OrderQuery {
    fn parse(filters: OrderFilters) -> Result<Self, AppError> {
        Ok(Self {
            vendor_name: present(filters.vendor_name).map(|name| name.to_lowercase()),
            start: parse_day(filters.start_date, "startDate")?,
            end: parse_day(filters.end_date, "endDate")?,
            phone: present(filters.phone),
        })
    }

    fn matches(&self, order: &Order, vendor: Option<&Account>) -> bool {
        let day = order.created_at.date_naive();
        if self.start.is_some_and(|start| day < start) || self.end.is_some_and(|end| day > end) {
            return false;
        }
        if let Some(phone) = &self.phone {
            if !order.phone.contains(phone.as_str()) {
                return false;
            }
        }
        match &self.vendor_name {
            Some(needle) => vendor.is_some_and(|v| v.name.to_lowercase().contains(needle)),
            None => true,
        }
    }
}

fn is_participant(principal: &Principal, order: &Order) -> bool {
    match principal.role {
        Role::Admin => true,
        Role::Vendor => order.vendor_id == principal.account_id,
        Role::Customer => order.customer_id == Some(principal.account_id),
    }
}

#[derive(Clone)]
pub struct OrderService {
    orders: OrderClient,
    products: ProductClient,
    accounts: AccountClient,
    feed: OrderFeed,
}

impl OrderService {
    pub fn new(
        orders: OrderClient,
        products: ProductClient,
        accounts: AccountClient,
        feed: OrderFeed,
    ) -> Self {
        Self {
            orders,
            products,
            accounts,
            feed,
        }
    }

    /// Places an order. A customer placing it is recorded as its customer,
    /// and contact details they leave out are taken from their account.
    #[instrument(skip(self, request), fields(product_id = %request.product_id))]
    pub async fn place(
        &self,
        principal: Option<Principal>,
        request: PlaceOrder,
    ) -> Result<Order, AppError> {
        let quantity = u32::try_from(request.quantity)
            .map_err(|_| AppError::Validation("Quantity must be at least 1".into()))?;

        let customer = match principal.filter(|p| p.is(Role::Customer)) {
            Some(p) => self.accounts.get(p.account_id).await?,
            None => None,
        };
        let from_account = |field: Option<String>, fallback: Option<&String>| {
            present(field).or_else(|| fallback.cloned())
        };
        let params = OrderCreate {
            product_id: request.product_id,
            vendor_id: request.vendor_id,
            customer_id: customer.as_ref().map(|c| c.id),
            customer_name: from_account(
                request.customer_name,
                customer.as_ref().map(|c| &c.name),
            ),
            phone: from_account(request.phone, customer.as_ref().and_then(|c| c.phone.as_ref())),
            address: from_account(
                request.address,
                customer.as_ref().and_then(|c| c.address.as_ref()),
            ),
            quantity,
            image: request.image,
        };

        let id = self.orders.place_order(params).await?;
        let order = self
            .orders
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".into()))?;
        self.feed.publish(
            order.id,
            FeedEvent::Created {
                number: order.number,
            },
        );
        info!(%id, number = order.number, "Order placed");
        Ok(order)
    }

    /// Orders visible to `principal`, newest first, with product and vendor resolved.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        principal: &Principal,
        filters: OrderFilters,
    ) -> Result<Vec<OrderView>, AppError> {
        let query = OrderQuery::parse(filters)?;

        let scope = match principal.role {
            Role::Admin => Filter::all(),
            // Placement pins the order's vendor to the product owner, and
            // products never change owner.
            Role::Vendor => {
                let vendor = principal.account_id;
                Filter::new(move |o: &Order| o.vendor_id == vendor)
            }
            Role::Customer => {
                let customer = principal.account_id;
                Filter::new(move |o: &Order| o.customer_id == Some(customer))
            }
        };
        let orders = self.orders.list(scope).await?;

        let products: HashMap<ProductId, Product> = self
            .products
            .list_all()
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let vendors: HashMap<AccountId, Account> = self
            .accounts
            .list_by_role(Role::Vendor)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        Ok(orders
            .into_iter()
            .rev()
            .filter_map(|order| {
                let product = products.get(&order.product_id);
                let vendor = product.and_then(|p| vendors.get(&p.vendor_id));
                query.matches(&order, vendor).then(|| OrderView {
                    product: product.map(|p| ProductSummary {
                        id: p.id,
                        name: p.name.clone(),
                        price: p.price,
                        vendor: vendor.map(VendorSummary::from),
                    }),
                    order,
                })
            })
            .collect())
    }

    /// The order, if `principal` may change it. Absent and not-yours look the same.
    async fn mutable(&self, id: OrderId, principal: &Principal) -> Result<Order, AppError> {
        self.orders
            .get(id)
            .await?
            .filter(|order| can_mutate(principal, order))
            .ok_or_else(|| AppError::NotFound("Order not found".into()))
    }

    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: OrderId,
        principal: &Principal,
        status: OrderStatus,
    ) -> Result<Order, AppError> {
        if principal.is(Role::Customer) {
            return Err(AppError::Forbidden(
                "Customers cannot change order status".into(),
            ));
        }
        self.mutable(id, principal).await?;

        let change = self.orders.set_status(id, status).await?;
        self.feed.publish(
            id,
            FeedEvent::StatusChanged {
                from: change.previous,
                to: status,
            },
        );
        info!(%id, from = %change.previous, to = %status, "Order status changed");
        Ok(change.order)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: OrderId, principal: &Principal) -> Result<(), AppError> {
        if !principal.is(Role::Admin) {
            return Err(AppError::Forbidden("Only admins can delete orders".into()));
        }
        self.orders.delete(id).await?;
        self.feed.publish(id, FeedEvent::Deleted);
        Ok(())
    }

    async fn participating(&self, id: OrderId, principal: &Principal) -> Result<Order, AppError> {
        self.orders
            .get(id)
            .await?
            .filter(|order| is_participant(principal, order))
            .ok_or_else(|| AppError::NotFound("Order not found".into()))
    }

    /// The order's feed so far, oldest first.
    pub async fn events(
        &self,
        id: OrderId,
        principal: &Principal,
    ) -> Result<Vec<FeedEntry>, AppError> {
        self.participating(id, principal).await?;
        Ok(self.feed.history(id))
    }

    #[instrument(skip(self, text))]
    pub async fn post_message(
        &self,
        id: OrderId,
        principal: &Principal,
        text: &str,
    ) -> Result<FeedEntry, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Message text is required".into()));
        }
        self.participating(id, principal).await?;
        Ok(self.feed.publish(
            id,
            FeedEvent::Message {
                author: principal.account_id,
                role: principal.role,
                text: text.to_string(),
            },
        ))
    }

    /// Joins the order's live feed.
    pub async fn subscribe(
        &self,
        id: OrderId,
        principal: &Principal,
    ) -> Result<Subscription, AppError> {
        self.participating(id, principal).await?;
        Ok(self.feed.join(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use resource_actor::ActorEntity;

    #[test]
    fn storefront_order_body_is_accepted() {
        let body = serde_json::json!({
            "product": 3,
            "vendor": 2,
            "quantity": 4,
            "customerName": "Walk-in",
            "phone": "0600000000",
            "address": "Market street 1",
            "selectedImage": "front.png",
        });
        let request: PlaceOrder = serde_json::from_value(body).unwrap();
        assert_eq!(request.product_id, ProductId(3));
        assert_eq!(request.vendor_id, AccountId(2));
        assert_eq!(request.quantity, 4);
        assert_eq!(request.image.as_deref(), Some("front.png"));

        let legacy: PlaceOrder = serde_json::from_value(serde_json::json!({
            "productId": 3,
            "vendorId": 2,
            "quantity": 1,
        }))
        .unwrap();
        assert_eq!(legacy.product_id, ProductId(3));
        assert_eq!(legacy.image, None);
    }

    fn order_on(day: u32, phone: &str) -> Order {
        let mut order = Order::from_create_params(
            OrderId(1),
            OrderCreate {
                product_id: ProductId(1),
                vendor_id: AccountId(2),
                customer_id: None,
                customer_name: None,
                phone: Some(phone.into()),
                address: None,
                quantity: 1,
                image: None,
            },
        )
        .unwrap();
        order.created_at = Utc.with_ymd_and_hms(2024, 3, day, 23, 59, 0).unwrap();
        order
    }

    #[test]
    fn date_range_is_inclusive_by_calendar_day() {
        let query = OrderQuery::parse(OrderFilters {
            start_date: Some("2024-03-02".into()),
            end_date: Some("2024-03-04".into()),
            ..Default::default()
        })
        .unwrap();

        assert!(!query.matches(&order_on(1, ""), None));
        assert!(query.matches(&order_on(2, ""), None));
        assert!(query.matches(&order_on(4, ""), None));
        assert!(!query.matches(&order_on(5, ""), None));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let result = OrderQuery::parse(OrderFilters {
            start_date: Some("03/02/2024".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn blank_filters_are_ignored() {
        let query = OrderQuery::parse(OrderFilters {
            vendor_name: Some("  ".into()),
            phone: Some("".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(query.matches(&order_on(1, "555"), None));
    }

    #[test]
    fn phone_filter_matches_substrings() {
        let query = OrderQuery::parse(OrderFilters {
            phone: Some("0123".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(query.matches(&order_on(1, "+33 0123 456"), None));
        assert!(!query.matches(&order_on(1, "+33 9999"), None));
    }
}
