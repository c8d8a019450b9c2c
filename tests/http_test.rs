use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use marketplace::config::Config;
use marketplace::lifecycle::MarketplaceSystem;
use marketplace::media::MediaStore;
use marketplace::model::{AccountId, Principal, Role};
use marketplace::services::{MediaUploads, ProductAttrs, VendorForm};
use marketplace::state::{SharedState, State};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "marketplace-test-boundary";

struct TestApp {
    system: MarketplaceSystem,
    state: SharedState,
    app: Router,
    uploads: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    async fn start() -> Self {
        let dir = TempDir::new().unwrap();
        let uploads = dir.path().join("uploads");
        let media = MediaStore::new(&uploads);
        media.ensure_root().await.unwrap();

        let config = Config {
            port: 0,
            jwt_secret: "http-test-secret".into(),
            token_ttl: Duration::from_secs(600),
            uploads_dir: uploads.clone(),
            max_upload_bytes: 1024 * 1024,
            cors_max_age: Duration::from_secs(60),
            admin: None,
        };
        let system = MarketplaceSystem::start(media.clone()).await.unwrap();
        let state = State::new(config, &system, media);
        let app = marketplace::http::router(state.clone());
        Self {
            system,
            state,
            app,
            uploads,
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn token(&self, principal: Principal) -> String {
        self.state.tokens.issue(principal).unwrap()
    }

    async fn admin(&self) -> String {
        let id = self
            .state
            .accounts
            .seed_admin("Root", "root@shop.test", "root-pw")
            .await
            .unwrap()
            .unwrap();
        self.token(Principal::new(id, Role::Admin))
    }

    async fn finish(self) {
        let TestApp {
            system, state, app, ..
        } = self;
        drop(app);
        drop(state);
        system.shutdown().await.unwrap();
    }
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// A `multipart/form-data` body of text fields followed by files.
fn multipart(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let app = TestApp::start().await;

    let (status, body) = app.send(get("/api/orders", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let (status, _) = app.send(get("/api/orders", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(get("/api/customers", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.finish().await;
}

#[tokio::test]
async fn test_wrong_role_is_forbidden() {
    let app = TestApp::start().await;
    let vendor = app.token(Principal::new(AccountId(7), Role::Vendor));
    let customer = app.token(Principal::new(AccountId(8), Role::Customer));

    let (status, _) = app
        .send(get("/api/products/all-products", Some(&vendor)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(get("/api/products/my-products", Some(&customer)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(json_request(
            "PUT",
            "/api/customers/1/block",
            Some(&vendor),
            json!({ "reason": "spam" }),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.finish().await;
}

#[tokio::test]
async fn test_customer_registers_logs_in_and_lists_orders() {
    let app = TestApp::start().await;

    let (status, account) = app
        .send(json_request(
            "POST",
            "/api/auth/register-customer",
            None,
            json!({ "name": "Fay", "phone": "0677777777", "password": "secret" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(account["role"], "customer");
    assert!(account.get("passwordHash").is_none());

    let (status, body) = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "phone": "0677777777", "password": "wrong" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, login) = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "identifier": "0677777777", "password": "secret" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["role"], "customer");
    assert_eq!(login["userId"], account["id"]);

    let token = login["token"].as_str().unwrap();
    let (status, orders) = app.send(get("/api/orders", Some(token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders, json!([]));

    app.finish().await;
}

#[tokio::test]
async fn test_anonymous_order_flow() {
    let app = TestApp::start().await;
    let admin = app.admin().await;

    let vendor = app
        .state
        .accounts
        .create_vendor(
            VendorForm {
                name: Some("Corner Shop".into()),
                email: Some("corner@shop.test".into()),
                password: Some("pw".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    let product = app
        .state
        .catalog
        .create(
            vendor.id,
            ProductAttrs {
                name: Some("Olive Oil".into()),
                category: Some("Grocery".into()),
                price: Some(12.0),
                quantity_per_carton: Some(6),
                manufacturer: Some("Grove".into()),
                description: None,
            },
            MediaUploads::default(),
        )
        .await
        .unwrap();

    let (status, order) = app
        .send(json_request(
            "POST",
            "/api/orders",
            None,
            json!({
                "product": product.id,
                "vendor": vendor.id,
                "quantity": 2,
                "customerName": "Walk-in",
                "phone": "0688888888",
                "address": "Market street 1",
                "selectedImage": "olive-front.png",
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["number"], 1);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["image"], "olive-front.png");
    assert_eq!(order["customerName"], "Walk-in");

    let (status, _) = app
        .send(json_request(
            "POST",
            "/api/orders",
            None,
            json!({ "productId": product.id, "vendorId": 999, "quantity": 1 }),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, listed) = app
        .send(get("/api/orders?vendorName=CORNER", Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["product"]["name"], "Olive Oil");

    let (status, _) = app
        .send(get("/api/orders?startDate=yesterday", Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let order_uri = format!("/api/orders/{}", order["id"]);
    let (status, body) = app
        .send(
            Request::builder()
                .method("DELETE")
                .uri(&order_uri)
                .header(header::AUTHORIZATION, format!("Bearer {admin}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    app.finish().await;
}

#[tokio::test]
async fn test_vendor_uploads_a_product() {
    let app = TestApp::start().await;
    let vendor = app
        .state
        .accounts
        .create_vendor(
            VendorForm {
                name: Some("Bakery".into()),
                email: Some("bakery@shop.test".into()),
                password: Some("pw".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    let token = app.token(Principal::new(vendor.id, Role::Vendor));

    let body = multipart(
        &[
            ("name", "Sourdough"),
            ("category", "Bread"),
            ("price", "4.5"),
            ("quantityPerCarton", "10"),
            ("manufacturer", "Bakery"),
        ],
        &[
            ("images", "loaf.JPG", &b"jpeg-bytes"[..]),
            ("videos", "", &b""[..]),
        ],
    );
    let request = Request::builder()
        .method("POST")
        .uri("/api/products")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, product) = app.send(request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["approved"], false);
    assert_eq!(product["videos"], json!([]));

    let image = product["images"][0].as_str().unwrap();
    assert!(image.ends_with(".jpg"));
    assert!(app.uploads.join(image).exists());

    let (_, public) = app.send(get("/api/products", None)).await;
    assert_eq!(public, json!([]));
    let (_, mine) = app
        .send(get("/api/products/my-products", Some(&token)))
        .await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let bad_price = multipart(&[("name", "Bagel"), ("price", "cheap")], &[]);
    let request = Request::builder()
        .method("POST")
        .uri("/api/products")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(bad_price))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Price must be a number");

    app.finish().await;
}

#[tokio::test]
async fn test_malformed_ids_are_json_validation_errors() {
    let app = TestApp::start().await;
    let admin = app.admin().await;

    let (status, body) = app.send(get("/api/products/vendor/abc", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = app
        .send(json_request(
            "PUT",
            "/api/orders/not-a-number/status",
            Some(&admin),
            json!({ "status": "confirmed" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    app.finish().await;
}

#[tokio::test]
async fn test_admin_edits_a_customer() {
    let app = TestApp::start().await;
    let admin = app.admin().await;

    let (status, customer) = app
        .send(json_request(
            "POST",
            "/api/customers",
            Some(&admin),
            json!({ "name": "Ida", "phone": "0655555555", "password": "pw" }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/customers/{}", customer["id"]);

    let (status, updated) = app
        .send(json_request(
            "PUT",
            &uri,
            Some(&admin),
            json!({ "name": "Ida Marsh", "address": "Quay 9" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Ida Marsh");
    assert_eq!(updated["address"], "Quay 9");
    assert_eq!(updated["phone"], "0655555555");

    let (status, body) = app
        .send(json_request(
            "PUT",
            "/api/customers/4242",
            Some(&admin),
            json!({ "name": "Nobody" }),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());

    app.finish().await;
}
