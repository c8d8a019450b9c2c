use marketplace::auth::TokenIssuer;
use marketplace::error::AppError;
use marketplace::feed::{FeedEvent, OrderFeed};
use marketplace::lifecycle::MarketplaceSystem;
use marketplace::media::{MediaStore, Upload};
use marketplace::model::{AccountId, OrderStatus, Principal, Product, Role};
use marketplace::services::{
    AccountService, CatalogService, CustomerForm, LoginRequest, MediaUploads, OrderFilters,
    OrderService, PlaceOrder, ProductAttrs, VendorForm,
};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

/// All real actors, with the services on top.
struct Harness {
    system: MarketplaceSystem,
    accounts: AccountService,
    catalog: CatalogService,
    orders: OrderService,
    tokens: TokenIssuer,
    uploads: PathBuf,
    _dir: TempDir,
}

impl Harness {
    async fn start() -> Self {
        let dir = TempDir::new().unwrap();
        let uploads = dir.path().join("uploads");
        let media = MediaStore::new(&uploads);
        media.ensure_root().await.unwrap();

        let system = MarketplaceSystem::start(media.clone()).await.unwrap();
        let tokens = TokenIssuer::new(b"integration-secret", Duration::from_secs(3600));
        Self {
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
                OrderFeed::new(),
            ),
            system,
            tokens,
            uploads,
            _dir: dir,
        }
    }

    async fn vendor(&self, name: &str, email: &str) -> Principal {
        let account = self
            .accounts
            .create_vendor(
                VendorForm {
                    name: Some(name.into()),
                    email: Some(email.into()),
                    password: Some("vendor-pw".into()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        Principal::new(account.id, Role::Vendor)
    }

    async fn customer(&self, name: &str, phone: &str) -> Principal {
        let account = self
            .accounts
            .create_customer(CustomerForm {
                name: Some(name.into()),
                phone: Some(phone.into()),
                password: Some("customer-pw".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        Principal::new(account.id, Role::Customer)
    }

    async fn product(&self, vendor: &Principal, name: &str) -> Product {
        self.catalog
            .create(vendor.account_id, attrs(name), MediaUploads::default())
            .await
            .unwrap()
    }

    fn file_count(&self) -> usize {
        std::fs::read_dir(&self.uploads).unwrap().count()
    }

    async fn finish(self) {
        let Harness {
            system,
            accounts,
            catalog,
            orders,
            ..
        } = self;
        drop((accounts, catalog, orders));
        system.shutdown().await.unwrap();
    }
}

fn attrs(name: &str) -> ProductAttrs {
    ProductAttrs {
        name: Some(name.into()),
        category: Some("Grocery".into()),
        price: Some(9.5),
        quantity_per_carton: Some(24),
        manufacturer: Some("Acme Foods".into()),
        description: None,
    }
}

fn upload(name: &str) -> Upload {
    Upload {
        file_name: name.into(),
        bytes: b"file-bytes".to_vec(),
    }
}

fn order_for(product: &Product, quantity: i64) -> PlaceOrder {
    PlaceOrder {
        product_id: product.id,
        vendor_id: product.vendor_id,
        quantity,
        customer_name: None,
        phone: None,
        address: None,
        image: None,
    }
}

const ADMIN: Principal = Principal {
    account_id: AccountId(1000),
    role: Role::Admin,
};

#[tokio::test]
async fn test_login_token_carries_account_id_and_role() {
    let h = Harness::start().await;
    let vendor = h.vendor("Green Grocer", "green@shop.test").await;

    let response = h
        .accounts
        .login(LoginRequest {
            identifier: "GREEN@shop.test".into(),
            password: "vendor-pw".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.user_id, vendor.account_id);
    assert_eq!(response.role, Role::Vendor);
    assert_eq!(h.tokens.verify(&response.token).unwrap(), vendor);

    h.finish().await;
}

#[tokio::test]
async fn test_blocked_customer_login_differs_from_bad_password() {
    let h = Harness::start().await;
    let customer = h.customer("Dana", "0611111111").await;

    let bad_password = h
        .accounts
        .login(LoginRequest {
            identifier: "0611111111".into(),
            password: "wrong".into(),
        })
        .await;
    assert_eq!(bad_password.unwrap_err(), AppError::InvalidCredentials);

    h.accounts
        .block_customer(customer.account_id, "Chargebacks")
        .await
        .unwrap();
    let blocked = h
        .accounts
        .login(LoginRequest {
            identifier: "0611111111".into(),
            password: "customer-pw".into(),
        })
        .await;
    assert_eq!(
        blocked.unwrap_err(),
        AppError::AccountBlocked("Chargebacks".into())
    );

    let unblocked = h.accounts.unblock_customer(customer.account_id).await.unwrap();
    assert!(!unblocked.blocked);
    assert_eq!(unblocked.block_reason, None);
    assert!(h
        .accounts
        .login(LoginRequest {
            identifier: "0611111111".into(),
            password: "customer-pw".into(),
        })
        .await
        .is_ok());

    h.finish().await;
}

#[tokio::test]
async fn test_blocking_requires_a_reason() {
    let h = Harness::start().await;
    let customer = h.customer("Eli", "0622222222").await;

    let result = h.accounts.block_customer(customer.account_id, "   ").await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    h.finish().await;
}

#[tokio::test]
async fn test_duplicate_vendor_email_is_a_validation_error() {
    let h = Harness::start().await;
    h.vendor("First", "same@shop.test").await;

    let result = h
        .accounts
        .create_vendor(
            VendorForm {
                name: Some("Second".into()),
                email: Some("Same@Shop.test".into()),
                password: Some("pw".into()),
                ..Default::default()
            },
            None,
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    // A customer may reuse the address
    h.accounts
        .create_customer(CustomerForm {
            name: Some("Shopper".into()),
            phone: Some("0633333333".into()),
            email: Some("same@shop.test".into()),
            password: Some("pw".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    h.finish().await;
}

#[tokio::test]
async fn test_vendor_logo_lifecycle() {
    let h = Harness::start().await;

    let vendor = h
        .accounts
        .create_vendor(
            VendorForm {
                name: Some("Logo Shop".into()),
                email: Some("logo@shop.test".into()),
                password: Some("pw".into()),
                ..Default::default()
            },
            Some(upload("logo.png")),
        )
        .await
        .unwrap();
    let first_logo = vendor.logo.clone().unwrap();
    assert!(h.uploads.join(&first_logo).exists());

    let updated = h
        .accounts
        .update_vendor(
            vendor.id,
            VendorForm {
                description: Some("Now with a new logo".into()),
                ..Default::default()
            },
            Some(upload("logo2.jpg")),
        )
        .await
        .unwrap();
    let second_logo = updated.logo.clone().unwrap();
    assert_ne!(first_logo, second_logo);
    assert!(!h.uploads.join(&first_logo).exists());
    assert!(h.uploads.join(&second_logo).exists());

    let listed = h.accounts.list_vendors().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].logo.as_deref(), Some(second_logo.as_str()));

    h.accounts.delete_vendor(vendor.id).await.unwrap();
    assert!(!h.uploads.join(&second_logo).exists());

    let again = h.accounts.delete_vendor(vendor.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));

    h.finish().await;
}

#[tokio::test]
async fn test_products_with_videos_need_images() {
    let h = Harness::start().await;
    let vendor = h.vendor("Video Shop", "video@shop.test").await;

    let result = h
        .catalog
        .create(
            vendor.account_id,
            attrs("Blender"),
            MediaUploads {
                images: vec![],
                videos: vec![upload("demo.mp4")],
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(h.file_count(), 0, "rejected uploads are removed");

    let product = h
        .catalog
        .create(
            vendor.account_id,
            attrs("Blender"),
            MediaUploads {
                images: vec![upload("front.png")],
                videos: vec![upload("demo.mp4")],
            },
        )
        .await
        .unwrap();
    assert_eq!(product.images.len(), 1);
    assert_eq!(product.videos.len(), 1);
    assert!(!product.approved);

    h.finish().await;
}

#[tokio::test]
async fn test_approval_controls_public_visibility() {
    let h = Harness::start().await;
    let vendor = h.vendor("Shop", "shop@shop.test").await;
    let product = h.product(&vendor, "Honey").await;

    assert!(h.catalog.list_approved().await.unwrap().is_empty());
    assert!(h
        .catalog
        .list_by_vendor(vendor.account_id, true)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        h.catalog
            .list_by_vendor(vendor.account_id, false)
            .await
            .unwrap()
            .len(),
        1
    );

    h.catalog.approve(product.id).await.unwrap();
    h.catalog.approve(product.id).await.unwrap();
    let public = h.catalog.list_approved().await.unwrap();
    assert_eq!(public.len(), 1);
    assert!(public[0].approved);

    h.finish().await;
}

#[tokio::test]
async fn test_only_the_owner_updates_or_deletes_a_product() {
    let h = Harness::start().await;
    let owner = h.vendor("Owner", "owner@shop.test").await;
    let other = h.vendor("Other", "other@shop.test").await;

    let product = h
        .catalog
        .create(
            owner.account_id,
            attrs("Coffee"),
            MediaUploads {
                images: vec![upload("bag.png")],
                videos: vec![],
            },
        )
        .await
        .unwrap();

    let update = h
        .catalog
        .update(
            product.id,
            &other,
            ProductAttrs {
                price: Some(1.0),
                ..Default::default()
            },
            MediaUploads::default(),
        )
        .await;
    assert!(matches!(update, Err(AppError::NotFound(_))));
    let delete = h.catalog.delete(product.id, &other).await;
    assert!(matches!(delete, Err(AppError::NotFound(_))));

    // Owner replaces the image; the old file goes away
    let updated = h
        .catalog
        .update(
            product.id,
            &owner,
            ProductAttrs {
                price: Some(11.0),
                ..Default::default()
            },
            MediaUploads {
                images: vec![upload("bag-v2.png")],
                videos: vec![],
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, 11.0);
    assert!(!h.uploads.join(&product.images[0]).exists());
    assert!(h.uploads.join(&updated.images[0]).exists());

    h.catalog.delete(product.id, &owner).await.unwrap();
    assert_eq!(h.file_count(), 0);

    h.finish().await;
}

#[tokio::test]
async fn test_order_vendor_must_match_product_vendor() {
    let h = Harness::start().await;
    let seller = h.vendor("Seller", "seller@shop.test").await;
    let other = h.vendor("Other", "other@shop.test").await;
    let product = h.product(&seller, "Tea").await;

    let mismatch = PlaceOrder {
        vendor_id: other.account_id,
        ..order_for(&product, 1)
    };
    assert!(matches!(
        h.orders.place(None, mismatch).await,
        Err(AppError::Conflict(_))
    ));

    let missing = PlaceOrder {
        product_id: marketplace::model::ProductId(999),
        ..order_for(&product, 1)
    };
    assert!(matches!(
        h.orders.place(None, missing).await,
        Err(AppError::NotFound(_))
    ));

    assert!(matches!(
        h.orders.place(None, order_for(&product, 0)).await,
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        h.orders.place(None, order_for(&product, -2)).await,
        Err(AppError::Validation(_))
    ));

    let first = h.orders.place(None, order_for(&product, 2)).await.unwrap();
    let second = h.orders.place(None, order_for(&product, 1)).await.unwrap();
    assert_eq!(first.status, OrderStatus::Pending);
    assert_eq!(first.customer_id, None);
    assert_eq!((first.number, second.number), (1, 2));

    h.finish().await;
}

#[tokio::test]
async fn test_order_listing_is_role_scoped() {
    let h = Harness::start().await;
    let fresh = h.vendor("Fresh Farms", "fresh@shop.test").await;
    let tools = h.vendor("Tool Depot", "tools@shop.test").await;
    let apples = h.product(&fresh, "Apples").await;
    let hammer = h.product(&tools, "Hammer").await;

    let alice = h.customer("Alice", "0644444444").await;
    let bob = h.customer("Bob", "0655555555").await;

    let alice_order = h.orders.place(Some(alice), order_for(&apples, 1)).await.unwrap();
    h.orders.place(Some(bob), order_for(&hammer, 1)).await.unwrap();
    h.orders.place(None, order_for(&hammer, 3)).await.unwrap();

    // Contact details default to the customer's account
    assert_eq!(alice_order.customer_id, Some(alice.account_id));
    assert_eq!(alice_order.customer_name, "Alice");
    assert_eq!(alice_order.phone, "0644444444");

    let mine = h.orders.list(&alice, OrderFilters::default()).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].order.id, alice_order.id);

    let for_tools = h.orders.list(&tools, OrderFilters::default()).await.unwrap();
    assert_eq!(for_tools.len(), 2);
    assert!(for_tools.iter().all(|v| v.order.vendor_id == tools.account_id));

    let all = h.orders.list(&ADMIN, OrderFilters::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let by_vendor = h
        .orders
        .list(
            &ADMIN,
            OrderFilters {
                vendor_name: Some("fReSh".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_vendor.len(), 1);
    let summary = by_vendor[0].product.as_ref().unwrap();
    assert_eq!(summary.name, "Apples");
    assert_eq!(summary.vendor.as_ref().unwrap().name, "Fresh Farms");

    let by_phone = h
        .orders
        .list(
            &ADMIN,
            OrderFilters {
                phone: Some("55555".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_phone.len(), 1);

    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let today_only = h
        .orders
        .list(
            &ADMIN,
            OrderFilters {
                start_date: Some(today.clone()),
                end_date: Some(today),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(today_only.len(), 3);

    h.finish().await;
}

#[tokio::test]
async fn test_status_changes_and_deletion_rights() {
    let h = Harness::start().await;
    let seller = h.vendor("Seller", "seller@shop.test").await;
    let other = h.vendor("Other", "other@shop.test").await;
    let customer = h.customer("Cleo", "0666666666").await;
    let product = h.product(&seller, "Rice").await;
    let order = h
        .orders
        .place(Some(customer), order_for(&product, 1))
        .await
        .unwrap();

    let by_customer = h
        .orders
        .update_status(order.id, &customer, OrderStatus::Delivered)
        .await;
    assert!(matches!(by_customer, Err(AppError::Forbidden(_))));

    let by_other = h
        .orders
        .update_status(order.id, &other, OrderStatus::Shipped)
        .await;
    assert!(matches!(by_other, Err(AppError::NotFound(_))));

    let shipped = h
        .orders
        .update_status(order.id, &seller, OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);
    h.orders
        .update_status(order.id, &ADMIN, OrderStatus::Delivered)
        .await
        .unwrap();

    h.orders
        .post_message(order.id, &customer, "Thanks!")
        .await
        .unwrap();
    let events = h.orders.events(order.id, &seller).await.unwrap();
    let seqs: Vec<u64> = events.iter().map(|e| e.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3, 4]);
    assert!(matches!(events[0].event, FeedEvent::Created { number: 1 }));
    assert_eq!(
        events[1].event,
        FeedEvent::StatusChanged {
            from: OrderStatus::Pending,
            to: OrderStatus::Shipped,
        }
    );
    assert!(matches!(
        h.orders.events(order.id, &other).await,
        Err(AppError::NotFound(_))
    ));

    assert!(matches!(
        h.orders.delete(order.id, &seller).await,
        Err(AppError::Forbidden(_))
    ));
    h.orders.delete(order.id, &ADMIN).await.unwrap();
    assert!(matches!(
        h.orders.delete(order.id, &ADMIN).await,
        Err(AppError::NotFound(_))
    ));

    h.finish().await;
}

#[tokio::test]
async fn test_admin_seed_is_idempotent() {
    let h = Harness::start().await;

    let first = h
        .accounts
        .seed_admin("Root", "root@shop.test", "root-pw")
        .await
        .unwrap();
    assert!(first.is_some());
    let second = h
        .accounts
        .seed_admin("Root", "root@shop.test", "root-pw")
        .await
        .unwrap();
    assert!(second.is_none());

    let login = h
        .accounts
        .login(LoginRequest {
            identifier: "root@shop.test".into(),
            password: "root-pw".into(),
        })
        .await
        .unwrap();
    assert_eq!(login.role, Role::Admin);

    h.finish().await;
}

#[tokio::test]
async fn test_vendor_edit_keeps_emails_unique() {
    let h = Harness::start().await;
    let first = h.vendor("First", "first@shop.test").await;
    h.vendor("Second", "second@shop.test").await;

    let taken = h
        .accounts
        .update_vendor(
            first.account_id,
            VendorForm {
                email: Some("Second@Shop.test".into()),
                ..Default::default()
            },
            None,
        )
        .await;
    assert!(matches!(taken, Err(AppError::Validation(_))));

    // Re-saving the vendor's own address is not a conflict
    let updated = h
        .accounts
        .update_vendor(
            first.account_id,
            VendorForm {
                email: Some("FIRST@shop.test".into()),
                description: Some("Family run".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.email.as_deref(), Some("first@shop.test"));
    assert_eq!(updated.description.as_deref(), Some("Family run"));

    h.finish().await;
}

#[tokio::test]
async fn test_rejected_vendor_edit_discards_the_new_logo() {
    let h = Harness::start().await;
    h.vendor("Taken", "taken@shop.test").await;
    let vendor = h
        .accounts
        .create_vendor(
            VendorForm {
                name: Some("Logo Shop".into()),
                email: Some("logo@shop.test".into()),
                password: Some("pw".into()),
                ..Default::default()
            },
            Some(upload("logo.png")),
        )
        .await
        .unwrap();
    let logo = vendor.logo.clone().unwrap();
    assert_eq!(h.file_count(), 1);

    let result = h
        .accounts
        .update_vendor(
            vendor.id,
            VendorForm {
                email: Some("taken@shop.test".into()),
                ..Default::default()
            },
            Some(upload("replacement.png")),
        )
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(h.file_count(), 1);
    assert!(h.uploads.join(&logo).exists());

    let listed = h.accounts.list_vendors().await.unwrap();
    let unchanged = listed.iter().find(|v| v.id == vendor.id).unwrap();
    assert_eq!(unchanged.logo.as_deref(), Some(logo.as_str()));
    assert_eq!(unchanged.email.as_deref(), Some("logo@shop.test"));

    h.finish().await;
}

#[tokio::test]
async fn test_customer_edit() {
    let h = Harness::start().await;
    let customer = h.customer("Gus", "0611111111").await;
    h.customer("Hal", "0622222222").await;

    let updated = h
        .accounts
        .update_customer(
            customer.account_id,
            CustomerForm {
                name: Some("Gustav".into()),
                phone: Some("0699999999".into()),
                address: Some("Harbor road 4".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Gustav");
    assert_eq!(updated.phone.as_deref(), Some("0699999999"));
    assert_eq!(updated.address.as_deref(), Some("Harbor road 4"));

    let taken = h
        .accounts
        .update_customer(
            customer.account_id,
            CustomerForm {
                phone: Some("0622222222".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(taken, Err(AppError::Validation(_))));

    // The new phone number is the login now
    let login = h
        .accounts
        .login(LoginRequest {
            identifier: "0699999999".into(),
            password: "customer-pw".into(),
        })
        .await
        .unwrap();
    assert_eq!(login.user_id, customer.account_id);

    h.finish().await;
}

#[tokio::test]
async fn test_vendor_keeps_orders_of_a_deleted_product() {
    let h = Harness::start().await;
    let vendor = h.vendor("Seasonal", "seasonal@shop.test").await;
    let product = h.product(&vendor, "Pumpkins").await;
    let order = h.orders.place(None, order_for(&product, 4)).await.unwrap();

    h.catalog.delete(product.id, &vendor).await.unwrap();

    let listed = h.orders.list(&vendor, OrderFilters::default()).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].order.id, order.id);
    assert!(listed[0].product.is_none());

    // Listing and status changes agree on which orders are the vendor's
    let shipped = h
        .orders
        .update_status(order.id, &vendor, OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);

    h.finish().await;
}
